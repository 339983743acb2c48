//! Core types for audio analysis.

use thiserror::Error;

use crate::subtitles::Millis;

/// Decoded mono audio.
#[derive(Debug, Clone, Default)]
pub struct AudioData {
    /// Mono samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl AudioData {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in milliseconds, rounded down.
    pub fn duration_ms(&self) -> Millis {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.samples.len() as u64 * 1000 / self.sample_rate as u64) as Millis
    }
}

/// Errors that can occur while decoding or analysing audio.
#[derive(Error, Debug)]
pub enum AudioError {
    /// FFmpeg execution failed.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// The decoder produced no usable samples.
    #[error("Audio extraction failed: {0}")]
    ExtractionError(String),

    /// Media file not found.
    #[error("Media file not found: {0}")]
    SourceNotFound(String),

    /// Analysis parameters out of range.
    #[error("Invalid analysis parameters: {0}")]
    InvalidParams(String),

    /// The decode was cancelled.
    #[error("Audio decode cancelled")]
    Cancelled,

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Type alias for audio results.
pub type AudioResult<T> = Result<T, AudioError>;
