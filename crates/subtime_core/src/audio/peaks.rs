//! Peak envelope for waveform drawing.

/// Max absolute amplitude per output pixel.
///
/// Each of the `width` pixels covers `floor(len / width)` consecutive samples
/// (at least one). When there are fewer samples than pixels the trailing
/// pixels stay zero.
pub fn compute_peaks(samples: &[f32], width: usize) -> Vec<f32> {
    let mut peaks = vec![0.0; width];
    if width == 0 || samples.is_empty() {
        return peaks;
    }

    let window = (samples.len() / width).max(1);
    for (chunk, peak) in samples.chunks(window).zip(peaks.iter_mut()) {
        *peak = chunk.iter().fold(0.0f32, |max, s| max.max(s.abs()));
    }
    peaks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peaks_per_window() {
        let samples = [0.1, -0.5, 0.2, 0.3, -0.9, 0.0, 0.4, 0.4];
        assert_eq!(compute_peaks(&samples, 4), vec![0.5, 0.3, 0.9, 0.4]);
        assert_eq!(compute_peaks(&samples, 2), vec![0.5, 0.9]);
    }

    #[test]
    fn test_remainder_samples_are_dropped() {
        // window = floor(5 / 2) = 2, the fifth sample falls outside
        let samples = [0.1, 0.2, 0.3, 0.4, 1.0];
        assert_eq!(compute_peaks(&samples, 2), vec![0.2, 0.4]);
    }

    #[test]
    fn test_fewer_samples_than_pixels() {
        let peaks = compute_peaks(&[0.5, -0.7], 4);
        assert_eq!(peaks, vec![0.5, 0.7, 0.0, 0.0]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(compute_peaks(&[], 3), vec![0.0; 3]);
        assert!(compute_peaks(&[1.0], 0).is_empty());
    }
}
