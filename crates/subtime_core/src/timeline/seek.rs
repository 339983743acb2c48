//! Playback position plumbing.
//!
//! The player itself lives outside this crate; it pushes its position into a
//! [`MediaClock`] and accepts seeks through [`MediaPlayer`].

use std::path::{Path, PathBuf};

use crate::subtitles::Millis;

/// Seek target for timeline clicks.
pub trait MediaPlayer {
    fn seek_to(&mut self, time_ms: Millis);
}

/// Last known playback state of the current media.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaClock {
    media_path: Option<PathBuf>,
    position_ms: Millis,
    duration_ms: Option<Millis>,
}

impl MediaClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to new media, resetting position and duration.
    pub fn set_media(&mut self, path: Option<PathBuf>) {
        self.media_path = path;
        self.position_ms = 0;
        self.duration_ms = None;
    }

    pub fn media_path(&self) -> Option<&Path> {
        self.media_path.as_deref()
    }

    /// Position reported by the player, clamped to the known duration.
    pub fn update_position(&mut self, position_ms: Millis) {
        let mut position = position_ms.max(0);
        if let Some(duration) = self.duration_ms {
            position = position.min(duration);
        }
        self.position_ms = position;
    }

    pub fn set_duration(&mut self, duration_ms: Option<Millis>) {
        self.duration_ms = duration_ms.filter(|d| *d > 0);
        self.update_position(self.position_ms);
    }

    pub fn position_ms(&self) -> Millis {
        self.position_ms
    }

    pub fn duration_ms(&self) -> Option<Millis> {
        self.duration_ms
    }

    /// Fraction played, when the duration is known.
    pub fn progress(&self) -> Option<f64> {
        self.duration_ms
            .map(|duration| self.position_ms as f64 / duration as f64)
    }
}
