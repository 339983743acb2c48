//! Coarse spectrogram for the timeline background.
//!
//! The grid is small (a few hundred frames by a few dozen bands), so each
//! band's energy is a direct correlation with one complex exponential at the
//! band centre rather than a full FFT.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::audio::types::{AudioError, AudioResult};

/// Spacing of band centre frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandScale {
    #[default]
    Log,
    Linear,
}

/// Shape of the spectrogram grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrogramParams {
    /// Columns across the whole media duration.
    pub frames: usize,
    /// Rows between `floor_hz` and Nyquist.
    pub bands: usize,
    /// Lowest band edge in Hz.
    pub floor_hz: f32,
    /// Analysis window length in samples.
    pub window_size: usize,
    pub scale: BandScale,
}

impl Default for SpectrogramParams {
    fn default() -> Self {
        Self {
            frames: 512,
            bands: 48,
            floor_hz: 60.0,
            window_size: 1024,
            scale: BandScale::Log,
        }
    }
}

/// `frames × bands` grid of per-frame normalised energies in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spectrogram {
    pub frames: usize,
    pub bands: usize,
    /// Centre frequency of each band, low to high.
    pub band_hz: Vec<f32>,
    /// Frame-major values, `frames * bands` long.
    values: Vec<f32>,
}

impl Spectrogram {
    /// Band energies of one frame, low to high.
    pub fn frame(&self, frame: usize) -> Option<&[f32]> {
        let start = frame.checked_mul(self.bands)?;
        self.values.get(start..start + self.bands)
    }

    pub fn value(&self, frame: usize, band: usize) -> Option<f32> {
        if band >= self.bands {
            return None;
        }
        self.frame(frame).map(|f| f[band])
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

/// Centre frequencies of `bands` bands between `floor_hz` and `nyquist`.
pub fn band_frequencies(bands: usize, floor_hz: f32, nyquist: f32, scale: BandScale) -> Vec<f32> {
    let floor = floor_hz as f64;
    let top = nyquist as f64;
    (0..bands)
        .map(|b| {
            let t = (b as f64 + 0.5) / bands as f64;
            let hz = match scale {
                BandScale::Log => floor * (top / floor).powf(t),
                BandScale::Linear => floor + (top - floor) * t,
            };
            hz as f32
        })
        .collect()
}

/// Create a periodic Hann window.
fn hann_window(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / size as f64).cos()))
        .collect()
}

/// Compute the spectrogram of mono `samples`.
///
/// Frame `f` analyses a Hann-windowed span of `window_size` samples centred on
/// the middle of the `f`-th equal slice of the input (zero-padded at the
/// edges). Each frame is scaled so its strongest band is 1; silent frames stay 0.
pub fn compute_spectrogram(
    samples: &[f32],
    sample_rate: u32,
    params: &SpectrogramParams,
) -> AudioResult<Spectrogram> {
    validate(sample_rate, params)?;

    let nyquist = sample_rate as f32 / 2.0;
    let band_hz = band_frequencies(params.bands, params.floor_hz, nyquist, params.scale);
    let mut values = vec![0.0f32; params.frames * params.bands];

    if !samples.is_empty() {
        let n = params.window_size;
        let window = hann_window(n);
        // cos/sin tables per band
        let basis: Vec<(Vec<f64>, Vec<f64>)> = band_hz
            .iter()
            .map(|&hz| {
                let omega = 2.0 * PI * hz as f64 / sample_rate as f64;
                (0..n)
                    .map(|i| {
                        let phase = omega * i as f64;
                        (phase.cos() * window[i], phase.sin() * window[i])
                    })
                    .unzip()
            })
            .collect();

        let len = samples.len() as f64;
        let mut frame_samples = vec![0.0f64; n];

        for (frame, row) in values.chunks_mut(params.bands).enumerate() {
            let centre = ((frame as f64 + 0.5) * len / params.frames as f64) as i64;
            let start = centre - (n / 2) as i64;
            for (i, slot) in frame_samples.iter_mut().enumerate() {
                let idx = start + i as i64;
                *slot = if idx >= 0 && (idx as usize) < samples.len() {
                    samples[idx as usize] as f64
                } else {
                    0.0
                };
            }

            for (cell, (cos, sin)) in row.iter_mut().zip(&basis) {
                let (re, im) = frame_samples
                    .iter()
                    .zip(cos.iter().zip(sin))
                    .fold((0.0, 0.0), |(re, im), (x, (c, s))| (re + x * c, im - x * s));
                *cell = (re * re + im * im).sqrt() as f32;
            }

            let max = row.iter().cloned().fold(0.0f32, f32::max);
            if max > 0.0 {
                for cell in row.iter_mut() {
                    *cell /= max;
                }
            }
        }
    }

    Ok(Spectrogram {
        frames: params.frames,
        bands: params.bands,
        band_hz,
        values,
    })
}

fn validate(sample_rate: u32, params: &SpectrogramParams) -> AudioResult<()> {
    if sample_rate == 0 {
        return Err(AudioError::InvalidParams("sample rate is zero".to_string()));
    }
    if params.frames == 0 || params.bands == 0 {
        return Err(AudioError::InvalidParams(format!(
            "grid must be non-empty, got {}x{}",
            params.frames, params.bands
        )));
    }
    if params.window_size < 2 {
        return Err(AudioError::InvalidParams(format!(
            "window size {} too small",
            params.window_size
        )));
    }
    let nyquist = sample_rate as f32 / 2.0;
    if !(params.floor_hz > 0.0 && params.floor_hz < nyquist) {
        return Err(AudioError::InvalidParams(format!(
            "floor {} Hz must be above 0 and below Nyquist {} Hz",
            params.floor_hz, nyquist
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, sample_rate: u32, secs: f64) -> Vec<f32> {
        let n = (sample_rate as f64 * secs) as usize;
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f64 / sample_rate as f64).sin() as f32)
            .collect()
    }

    fn strongest_band(row: &[f32]) -> usize {
        row.iter()
            .enumerate()
            .fold((0, f32::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
            .0
    }

    #[test]
    fn test_band_frequencies() {
        let linear = band_frequencies(4, 0.0, 800.0, BandScale::Linear);
        assert_eq!(linear, vec![100.0, 300.0, 500.0, 700.0]);

        let log = band_frequencies(2, 100.0, 10_000.0, BandScale::Log);
        assert!((log[0] - 316.227_77).abs() < 0.01);
        assert!((log[1] - 3162.2776).abs() < 0.1);
    }

    #[test]
    fn test_sine_peaks_in_matching_band() {
        let params = SpectrogramParams {
            frames: 8,
            bands: 8,
            floor_hz: 100.0,
            window_size: 1024,
            scale: BandScale::Linear,
        };
        // linear centres: 100 + 3900 * (b + 0.5) / 8 -> band 4 is ~2293 Hz
        let samples = sine(2293.75, 8000, 1.0);
        let spec = compute_spectrogram(&samples, 8000, &params).unwrap();

        assert_eq!(spec.values().len(), 64);
        for frame in 0..spec.frames {
            let row = spec.frame(frame).unwrap();
            assert_eq!(strongest_band(row), 4);
            assert!((row[4] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_silence_stays_zero() {
        let spec = compute_spectrogram(&vec![0.0; 4000], 8000, &SpectrogramParams::default()).unwrap();
        assert!(spec.values().iter().all(|&v| v == 0.0));

        let empty = compute_spectrogram(&[], 8000, &SpectrogramParams::default()).unwrap();
        assert_eq!(empty.values().len(), 512 * 48);
    }

    #[test]
    fn test_invalid_params() {
        let mut params = SpectrogramParams::default();
        params.floor_hz = 4000.0;
        assert!(matches!(
            compute_spectrogram(&[0.1], 8000, &params),
            Err(AudioError::InvalidParams(_))
        ));

        let params = SpectrogramParams {
            frames: 0,
            ..SpectrogramParams::default()
        };
        assert!(matches!(
            compute_spectrogram(&[0.1], 8000, &params),
            Err(AudioError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_accessors() {
        let spec = compute_spectrogram(&[0.5; 100], 8000, &SpectrogramParams {
            frames: 2,
            bands: 3,
            ..SpectrogramParams::default()
        })
        .unwrap();
        assert!(spec.frame(1).is_some());
        assert!(spec.frame(2).is_none());
        assert!(spec.value(0, 3).is_none());
    }
}
