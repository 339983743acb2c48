//! Audio analysis for the timeline.
//!
//! Provides decoding of the current media to mono samples and the two visual
//! derivatives the timeline draws.
//!
//! # Components
//!
//! - **decode**: [`AudioDecoder`] trait and the FFmpeg-backed implementation
//! - **peaks**: max-amplitude envelope, one value per pixel
//! - **spectrogram**: coarse per-frame band energies
//! - **analysis**: [`AudioAnalysis`], both of the above for one media file
//! - **loader**: [`AudioLoader`], background decoding with stale-result rejection
//!
//! Audio failures never block editing; they surface as
//! [`AudioState::Unavailable`].

mod analysis;
mod decode;
mod loader;
mod peaks;
mod spectrogram;
mod types;

pub use analysis::{AnalysisOptions, AudioAnalysis};
pub use decode::{AudioDecoder, CancelHandle, FfmpegDecoder, DEFAULT_DECODE_SAMPLE_RATE};
pub use loader::{AudioLoader, AudioState};
pub use peaks::compute_peaks;
pub use spectrogram::{band_frequencies, compute_spectrogram, BandScale, Spectrogram, SpectrogramParams};
pub use types::{AudioData, AudioError, AudioResult};
