//! Background audio loading.
//!
//! Decoding runs on a worker thread and reports back over a channel that the
//! interaction thread drains with [`AudioLoader::poll`]. Every request bumps a
//! generation counter; a result is applied only if its generation and path
//! still match the current request, so a slow decode for media that has since
//! been replaced can never overwrite newer state.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::audio::analysis::{AnalysisOptions, AudioAnalysis};
use crate::audio::decode::{AudioDecoder, CancelHandle};
use crate::audio::types::{AudioError, AudioResult};

/// What the timeline can currently draw.
#[derive(Debug, Clone)]
pub enum AudioState {
    /// No media requested.
    Idle,
    /// A decode is in flight.
    Loading { path: PathBuf },
    Ready(Arc<AudioAnalysis>),
    /// Decoding failed; the timeline draws without audio.
    Unavailable { path: PathBuf, reason: String },
}

impl AudioState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Idle => None,
            Self::Loading { path } | Self::Unavailable { path, .. } => Some(path),
            Self::Ready(analysis) => Some(&analysis.media_path),
        }
    }
}

/// Message sent from a worker thread.
struct LoadMessage {
    generation: u64,
    path: PathBuf,
    result: AudioResult<AudioAnalysis>,
}

/// Owns the current audio analysis and at most one live decode.
pub struct AudioLoader {
    decoder: Arc<dyn AudioDecoder>,
    options: AnalysisOptions,
    generation: u64,
    state: AudioState,
    cancel: Option<CancelHandle>,
    tx: Sender<LoadMessage>,
    rx: Receiver<LoadMessage>,
}

impl AudioLoader {
    pub fn new(decoder: Arc<dyn AudioDecoder>, options: AnalysisOptions) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            decoder,
            options,
            generation: 0,
            state: AudioState::Idle,
            cancel: None,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &AudioState {
        &self.state
    }

    pub fn analysis(&self) -> Option<&Arc<AudioAnalysis>> {
        match &self.state {
            AudioState::Ready(analysis) => Some(analysis),
            _ => None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start loading `path`, cancelling any decode for other media.
    ///
    /// Requesting the media that is already loading or loaded is a no-op.
    /// Returns the generation of the request now current.
    pub fn request(&mut self, path: impl Into<PathBuf>) -> u64 {
        let path = path.into();
        let same_media = matches!(
            &self.state,
            AudioState::Loading { .. } | AudioState::Ready(_)
        ) && self.state.path() == Some(path.as_path());
        if same_media {
            return self.generation;
        }

        self.cancel_in_flight();
        self.generation += 1;
        let generation = self.generation;
        let cancel = CancelHandle::new();
        self.cancel = Some(cancel.clone());
        self.state = AudioState::Loading { path: path.clone() };

        tracing::info!("Loading audio for {} (generation {})", path.display(), generation);

        let decoder = Arc::clone(&self.decoder);
        let options = self.options;
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = decoder
                .decode(&path, options.sample_rate, &cancel)
                .and_then(|data| {
                    if cancel.is_cancelled() {
                        return Err(AudioError::Cancelled);
                    }
                    AudioAnalysis::compute(path.clone(), &data, &options)
                });
            // receiver is gone once the loader is dropped
            let _ = tx.send(LoadMessage {
                generation,
                path,
                result,
            });
        });

        generation
    }

    /// Apply finished decodes. Returns true if the state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.rx.try_recv() {
                Ok(message) => changed |= self.apply(message),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    /// Block until the current request finishes or `timeout` elapses.
    /// Returns true if the state changed.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut changed = false;
        while self.state.is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.rx.recv_timeout(remaining) {
                Ok(message) => changed |= self.apply(message),
                Err(_) => break,
            }
        }
        changed
    }

    /// Cancel any decode and drop the cached analysis.
    pub fn close(&mut self) {
        self.cancel_in_flight();
        // results still in flight become stale
        self.generation += 1;
        if !matches!(self.state, AudioState::Idle) {
            tracing::debug!("Audio released");
        }
        self.state = AudioState::Idle;
    }

    fn cancel_in_flight(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
    }

    fn apply(&mut self, message: LoadMessage) -> bool {
        let current = matches!(&self.state, AudioState::Loading { path } if *path == message.path);
        if message.generation != self.generation || !current {
            tracing::debug!(
                "Discarding stale audio result for {} (generation {}, current {})",
                message.path.display(),
                message.generation,
                self.generation
            );
            return false;
        }

        self.cancel = None;
        self.state = match message.result {
            Ok(analysis) => {
                tracing::info!(
                    "Audio ready for {} ({} ms)",
                    message.path.display(),
                    analysis.duration_ms
                );
                AudioState::Ready(Arc::new(analysis))
            }
            Err(e) => {
                tracing::warn!("Audio unavailable for {}: {}", message.path.display(), e);
                AudioState::Unavailable {
                    path: message.path,
                    reason: e.to_string(),
                }
            }
        };
        true
    }
}

impl Drop for AudioLoader {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::types::AudioData;

    /// Decodes any path to a constant tone; paths containing "slow" take a
    /// while and ignore cancellation, paths containing "bad" fail.
    struct FakeDecoder;

    impl AudioDecoder for FakeDecoder {
        fn decode(&self, path: &Path, sample_rate: u32, _cancel: &CancelHandle) -> AudioResult<AudioData> {
            let name = path.to_string_lossy();
            if name.contains("bad") {
                return Err(AudioError::ExtractionError("no audio stream".to_string()));
            }
            if name.contains("slow") {
                thread::sleep(Duration::from_millis(100));
            }
            Ok(AudioData::new(vec![0.5; sample_rate as usize], sample_rate))
        }
    }

    fn loader() -> AudioLoader {
        let options = AnalysisOptions {
            sample_rate: 8000,
            peak_width: 64,
            ..AnalysisOptions::default()
        };
        AudioLoader::new(Arc::new(FakeDecoder), options)
    }

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[test]
    fn test_load_ready() {
        let mut loader = loader();
        let generation = loader.request("movie.mkv");
        assert_eq!(generation, 1);
        assert!(loader.state().is_loading());

        assert!(loader.wait(TIMEOUT));
        let analysis = loader.analysis().unwrap();
        assert_eq!(analysis.media_path, PathBuf::from("movie.mkv"));
        assert_eq!(analysis.duration_ms, 1000);
        assert_eq!(analysis.peaks.len(), 64);

        // same media is cached
        assert_eq!(loader.request("movie.mkv"), 1);
        assert!(loader.analysis().is_some());
    }

    #[test]
    fn test_failure_is_unavailable() {
        crate::logging::init_test_tracing();
        let mut loader = loader();
        loader.request("bad.mkv");
        loader.wait(TIMEOUT);
        assert!(matches!(
            loader.state(),
            AudioState::Unavailable { reason, .. } if reason.contains("no audio stream")
        ));
        assert!(loader.analysis().is_none());
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut loader = loader();
        loader.request("slow.mkv");
        let generation = loader.request("fast.mkv");
        assert_eq!(generation, 2);

        loader.wait(TIMEOUT);
        assert_eq!(
            loader.analysis().map(|a| a.media_path.clone()),
            Some(PathBuf::from("fast.mkv"))
        );

        // let the slow decode finish, then drain it
        thread::sleep(Duration::from_millis(300));
        assert!(!loader.poll());
        assert_eq!(loader.state().path(), Some(Path::new("fast.mkv")));
    }

    #[test]
    fn test_stale_generation_with_matching_path_is_discarded() {
        let mut loader = loader();
        loader.request("slow.mkv");
        loader
            .tx
            .send(LoadMessage {
                generation: 0,
                path: PathBuf::from("slow.mkv"),
                result: Err(AudioError::Cancelled),
            })
            .unwrap();
        assert!(!loader.poll());
        assert!(loader.state().is_loading());
    }

    #[test]
    fn test_close_drops_buffers() {
        let mut loader = loader();
        loader.request("movie.mkv");
        loader.wait(TIMEOUT);
        assert!(loader.analysis().is_some());

        loader.close();
        assert!(matches!(loader.state(), AudioState::Idle));
        assert!(loader.analysis().is_none());
    }

    #[test]
    fn test_close_mid_decode_discards_result() {
        let mut loader = loader();
        loader.request("slow.mkv");
        loader.close();

        thread::sleep(Duration::from_millis(300));
        assert!(!loader.poll());
        assert!(matches!(loader.state(), AudioState::Idle));
    }
}
