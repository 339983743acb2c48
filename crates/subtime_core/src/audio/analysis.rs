//! Per-media visual analysis: peak envelope plus spectrogram.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::audio::decode::DEFAULT_DECODE_SAMPLE_RATE;
use crate::audio::peaks::compute_peaks;
use crate::audio::spectrogram::{compute_spectrogram, Spectrogram, SpectrogramParams};
use crate::audio::types::{AudioData, AudioResult};
use crate::subtitles::Millis;

/// How to decode and what to compute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Rate the decoder resamples to.
    pub sample_rate: u32,
    /// Number of peak envelope values across the whole media.
    pub peak_width: usize,
    pub spectrogram: SpectrogramParams,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_DECODE_SAMPLE_RATE,
            peak_width: 4096,
            spectrogram: SpectrogramParams::default(),
        }
    }
}

/// Everything the timeline draws for one media file.
///
/// Computed once per load; the decoded samples are not kept.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioAnalysis {
    pub media_path: PathBuf,
    pub sample_rate: u32,
    pub duration_ms: Millis,
    pub peaks: Vec<f32>,
    pub spectrogram: Spectrogram,
}

impl AudioAnalysis {
    pub fn compute(
        media_path: impl Into<PathBuf>,
        data: &AudioData,
        options: &AnalysisOptions,
    ) -> AudioResult<Self> {
        let spectrogram = compute_spectrogram(&data.samples, data.sample_rate, &options.spectrogram)?;
        Ok(Self {
            media_path: media_path.into(),
            sample_rate: data.sample_rate,
            duration_ms: data.duration_ms(),
            peaks: compute_peaks(&data.samples, options.peak_width),
            spectrogram,
        })
    }

    /// Peak envelope value covering `time_ms`, if within the media.
    pub fn peak_at(&self, time_ms: Millis) -> Option<f32> {
        if self.duration_ms <= 0 || time_ms < 0 || time_ms >= self.duration_ms {
            return None;
        }
        let idx = (time_ms as u128 * self.peaks.len() as u128 / self.duration_ms as u128) as usize;
        self.peaks.get(idx).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_fills_every_part() {
        let data = AudioData::new(vec![0.25; 16_000], 16_000);
        let options = AnalysisOptions {
            peak_width: 100,
            ..AnalysisOptions::default()
        };
        let analysis = AudioAnalysis::compute("clip.wav", &data, &options).unwrap();

        assert_eq!(analysis.duration_ms, 1000);
        assert_eq!(analysis.peaks.len(), 100);
        assert_eq!(analysis.spectrogram.frames, options.spectrogram.frames);
        assert_eq!(analysis.peak_at(500), Some(0.25));
        assert_eq!(analysis.peak_at(1000), None);
    }
}
