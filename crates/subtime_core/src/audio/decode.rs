//! Audio decoding.
//!
//! [`FfmpegDecoder`] pipes the media through FFmpeg, downmixed to mono and
//! resampled to the requested rate, as raw f32 samples.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::audio::types::{AudioData, AudioError, AudioResult};

/// Default decode sample rate. Plenty for a visual envelope.
pub const DEFAULT_DECODE_SAMPLE_RATE: u32 = 16_000;

/// Bytes read from the decoder pipe between cancellation checks.
const READ_CHUNK_BYTES: usize = 64 * 1024;

/// Handle for cancelling a running decode from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The decoder stops at its next chunk boundary.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Source of mono samples for a media file.
pub trait AudioDecoder: Send + Sync {
    /// Decode `path` to mono at `sample_rate`, checking `cancel` periodically.
    fn decode(&self, path: &Path, sample_rate: u32, cancel: &CancelHandle) -> AudioResult<AudioData>;
}

/// Decoder backed by an `ffmpeg` executable.
#[derive(Debug, Clone)]
pub struct FfmpegDecoder {
    program: PathBuf,
}

impl Default for FfmpegDecoder {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
        }
    }
}

impl FfmpegDecoder {
    /// Use a specific ffmpeg binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, input_path: &Path, sample_rate: u32) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-nostdin")
            .arg("-i")
            .arg(input_path)
            .arg("-vn") // No video
            .arg("-ac")
            .arg("1") // Mono
            .arg("-ar")
            .arg(sample_rate.to_string())
            .arg("-f")
            .arg("f32le")
            .arg("-acodec")
            .arg("pcm_f32le")
            .arg("pipe:1");
        cmd.stdin(Stdio::null())
            .stderr(Stdio::null())
            .stdout(Stdio::piped());
        cmd
    }
}

impl AudioDecoder for FfmpegDecoder {
    fn decode(&self, input_path: &Path, sample_rate: u32, cancel: &CancelHandle) -> AudioResult<AudioData> {
        if !input_path.exists() {
            return Err(AudioError::SourceNotFound(input_path.display().to_string()));
        }

        let mut cmd = self.command(input_path, sample_rate);
        tracing::debug!("Running FFmpeg: {:?}", cmd);

        let mut child = cmd
            .spawn()
            .map_err(|e| AudioError::FfmpegError(format!("Failed to spawn FFmpeg: {}", e)))?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| AudioError::FfmpegError("Failed to capture FFmpeg stdout".to_string()))?;

        let mut samples = Vec::new();
        let mut pending = Vec::with_capacity(4);
        let mut chunk = vec![0u8; READ_CHUNK_BYTES];

        loop {
            if cancel.is_cancelled() {
                stop(&mut child);
                tracing::debug!("Decode of {} cancelled", input_path.display());
                return Err(AudioError::Cancelled);
            }

            let read = match stdout.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    stop(&mut child);
                    return Err(AudioError::FfmpegError(format!(
                        "Failed to read FFmpeg output: {}",
                        e
                    )));
                }
            };
            append_f32_samples(&mut samples, &mut pending, &chunk[..read]);
        }

        let status = child
            .wait()
            .map_err(|e| AudioError::FfmpegError(format!("FFmpeg process error: {}", e)))?;

        if !status.success() {
            return Err(AudioError::FfmpegError(format!(
                "FFmpeg exited with code: {:?}",
                status.code()
            )));
        }

        if samples.is_empty() {
            return Err(AudioError::ExtractionError(
                "No audio samples extracted".to_string(),
            ));
        }

        tracing::debug!(
            "Decoded {} samples ({:.2}s) from {}",
            samples.len(),
            samples.len() as f64 / sample_rate as f64,
            input_path.display()
        );

        Ok(AudioData::new(samples, sample_rate))
    }
}

fn stop(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Convert little-endian f32 bytes, carrying a partial sample across calls in `pending`.
fn append_f32_samples(samples: &mut Vec<f32>, pending: &mut Vec<u8>, bytes: &[u8]) {
    let mut rest = bytes;
    if !pending.is_empty() {
        let needed = (4 - pending.len()).min(rest.len());
        pending.extend_from_slice(&rest[..needed]);
        rest = &rest[needed..];
        if pending.len() == 4 {
            samples.push(f32::from_le_bytes([pending[0], pending[1], pending[2], pending[3]]));
            pending.clear();
        }
    }

    let chunks = rest.chunks_exact(4);
    pending.extend_from_slice(chunks.remainder());
    samples.extend(chunks.map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]])));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn le_bytes(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn bytes_to_samples_converts_correctly() {
        let mut samples = Vec::new();
        let mut pending = Vec::new();
        append_f32_samples(&mut samples, &mut pending, &le_bytes(&[0.5, -0.25]));
        assert_eq!(samples, vec![0.5, -0.25]);
        assert!(pending.is_empty());
    }

    #[test]
    fn bytes_split_across_reads() {
        let bytes = le_bytes(&[0.5, -0.25, 1.0]);
        let mut samples = Vec::new();
        let mut pending = Vec::new();

        append_f32_samples(&mut samples, &mut pending, &bytes[..3]);
        assert!(samples.is_empty());
        append_f32_samples(&mut samples, &mut pending, &bytes[3..5]);
        assert_eq!(samples, vec![0.5]);
        append_f32_samples(&mut samples, &mut pending, &bytes[5..]);
        assert_eq!(samples, vec![0.5, -0.25, 1.0]);
        assert!(pending.is_empty());
    }

    #[test]
    fn decode_rejects_missing_file() {
        let result = FfmpegDecoder::default().decode(
            Path::new("/nonexistent/file.mkv"),
            DEFAULT_DECODE_SAMPLE_RATE,
            &CancelHandle::new(),
        );
        assert!(matches!(result, Err(AudioError::SourceNotFound(_))));
    }

    #[test]
    fn decode_reports_missing_program() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let decoder = FfmpegDecoder::with_program("/nonexistent/ffmpeg-binary");
        let result = decoder.decode(file.path(), DEFAULT_DECODE_SAMPLE_RATE, &CancelHandle::new());
        assert!(matches!(result, Err(AudioError::FfmpegError(_))));
    }

    #[test]
    fn cancel_handle_is_shared() {
        let handle = CancelHandle::new();
        let clone = handle.clone();
        clone.cancel();
        assert!(handle.is_cancelled());
    }
}
