//! Time ↔ pixel mapping.

use serde::{Deserialize, Serialize};

use crate::subtitles::Millis;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 50.0;
const ZOOM_STEP: f64 = 1.25;

/// Horizontal scale of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    /// Pixels per second at zoom 1.
    pub px_per_second_base: f64,
    pub zoom: f64,
}

impl Default for TimeScale {
    fn default() -> Self {
        Self {
            px_per_second_base: 100.0,
            zoom: 1.0,
        }
    }
}

impl TimeScale {
    pub fn new(px_per_second_base: f64, zoom: f64) -> Self {
        Self {
            px_per_second_base,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    pub fn pixels_per_ms(&self) -> f64 {
        self.px_per_second_base * self.zoom / 1000.0
    }

    pub fn time_to_px(&self, time_ms: Millis) -> f64 {
        time_ms as f64 * self.pixels_per_ms()
    }

    /// Time under a pixel, rounded to the nearest millisecond and clamped at 0.
    pub fn px_to_time(&self, px: f64) -> Millis {
        self.px_delta_to_ms(px).max(0)
    }

    /// Signed duration covered by a pixel distance.
    pub fn px_delta_to_ms(&self, dx: f64) -> Millis {
        let ppm = self.pixels_per_ms();
        if ppm <= 0.0 || !dx.is_finite() {
            return 0;
        }
        (dx / ppm).round() as Millis
    }

    /// Scrollable width: the media at this scale, never narrower than the viewport.
    pub fn total_width(&self, viewport_width: f64, duration_ms: Millis) -> f64 {
        viewport_width.max(self.time_to_px(duration_ms))
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / ZOOM_STEP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let scale = TimeScale::new(100.0, 2.0);
        assert!((scale.pixels_per_ms() - 0.2).abs() < 1e-12);
        assert!((scale.time_to_px(1500) - 300.0).abs() < 1e-9);
        assert_eq!(scale.px_to_time(300.0), 1500);
        assert_eq!(scale.px_to_time(300.14), 1501);
        assert_eq!(scale.px_to_time(-20.0), 0);
        assert_eq!(scale.px_delta_to_ms(-20.0), -100);
    }

    #[test]
    fn test_total_width() {
        let scale = TimeScale::new(100.0, 1.0);
        assert!((scale.total_width(800.0, 60_000) - 6000.0).abs() < 1e-6);
        assert_eq!(scale.total_width(800.0, 1000), 800.0);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut scale = TimeScale::default();
        scale.set_zoom(1000.0);
        assert_eq!(scale.zoom, MAX_ZOOM);
        scale.zoom_in();
        assert_eq!(scale.zoom, MAX_ZOOM);
        scale.set_zoom(0.0);
        assert_eq!(scale.zoom, MIN_ZOOM);
        scale.zoom_out();
        assert_eq!(scale.zoom, MIN_ZOOM);
    }
}
