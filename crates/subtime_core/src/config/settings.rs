//! Settings struct with TOML-based sections.
//!
//! Each section maps to one TOML table and can be written back on its own.

use serde::{Deserialize, Serialize};

use crate::audio::{AnalysisOptions, BandScale, SpectrogramParams, DEFAULT_DECODE_SAMPLE_RATE};
use crate::logging::LogLevel;
use crate::qc::QcThresholds;
use crate::subtitles::Millis;
use crate::timeline::{TimeScale, DEFAULT_EDGE_HANDLE_PX, DEFAULT_MIN_ENTRY_DURATION_MS};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Quality-control thresholds.
    #[serde(default)]
    pub qc: QcSettings,

    /// Timeline geometry and drag limits.
    #[serde(default)]
    pub timeline: TimelineSettings,

    /// Waveform and spectrogram analysis.
    #[serde(default)]
    pub audio: AudioSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Readability and timing limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QcSettings {
    /// Maximum characters per second.
    #[serde(default = "default_max_cps")]
    pub max_cps: f64,

    /// Maximum words per minute.
    #[serde(default = "default_max_wpm")]
    pub max_wpm: f64,

    /// Maximum characters per line.
    #[serde(default = "default_max_cpl")]
    pub max_cpl: usize,

    #[serde(default = "default_min_duration_ms")]
    pub min_duration_ms: Millis,

    #[serde(default = "default_max_duration_ms")]
    pub max_duration_ms: Millis,

    /// Minimum gap between consecutive entries.
    #[serde(default = "default_min_gap_ms")]
    pub min_gap_ms: Millis,
}

fn default_max_cps() -> f64 {
    17.0
}

fn default_max_wpm() -> f64 {
    180.0
}

fn default_max_cpl() -> usize {
    42
}

fn default_min_duration_ms() -> Millis {
    1000
}

fn default_max_duration_ms() -> Millis {
    7000
}

fn default_min_gap_ms() -> Millis {
    80
}

impl Default for QcSettings {
    fn default() -> Self {
        Self {
            max_cps: default_max_cps(),
            max_wpm: default_max_wpm(),
            max_cpl: default_max_cpl(),
            min_duration_ms: default_min_duration_ms(),
            max_duration_ms: default_max_duration_ms(),
            min_gap_ms: default_min_gap_ms(),
        }
    }
}

impl QcSettings {
    pub fn thresholds(&self) -> QcThresholds {
        QcThresholds {
            max_cps: self.max_cps,
            max_wpm: self.max_wpm,
            max_cpl: self.max_cpl,
            min_duration_ms: self.min_duration_ms,
            max_duration_ms: self.max_duration_ms,
            min_gap_ms: self.min_gap_ms,
        }
    }
}

/// Timeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSettings {
    /// Pixels per second at zoom 1.
    #[serde(default = "default_px_per_second")]
    pub px_per_second_base: f64,

    /// Shortest length a drag may leave an entry.
    #[serde(default = "default_min_entry_duration")]
    pub min_entry_duration_ms: Millis,

    /// Grab width of an entry's edges.
    #[serde(default = "default_edge_handle_px")]
    pub edge_handle_px: f64,
}

fn default_px_per_second() -> f64 {
    TimeScale::default().px_per_second_base
}

fn default_min_entry_duration() -> Millis {
    DEFAULT_MIN_ENTRY_DURATION_MS
}

fn default_edge_handle_px() -> f64 {
    DEFAULT_EDGE_HANDLE_PX
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            px_per_second_base: default_px_per_second(),
            min_entry_duration_ms: default_min_entry_duration(),
            edge_handle_px: default_edge_handle_px(),
        }
    }
}

impl TimelineSettings {
    pub fn scale(&self) -> TimeScale {
        TimeScale::new(self.px_per_second_base, 1.0)
    }
}

/// Audio analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Sample rate FFmpeg resamples to.
    #[serde(default = "default_decode_sample_rate")]
    pub decode_sample_rate: u32,

    /// Peak envelope resolution across the whole media.
    #[serde(default = "default_peak_width")]
    pub peak_width: usize,

    #[serde(default = "default_spectrogram_frames")]
    pub spectrogram_frames: usize,

    #[serde(default = "default_spectrogram_bands")]
    pub spectrogram_bands: usize,

    /// Lowest spectrogram band edge in Hz.
    #[serde(default = "default_floor_hz")]
    pub floor_hz: f32,

    /// Spectrogram window length in samples.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    #[serde(default)]
    pub band_scale: BandScale,
}

fn default_decode_sample_rate() -> u32 {
    DEFAULT_DECODE_SAMPLE_RATE
}

fn default_peak_width() -> usize {
    AnalysisOptions::default().peak_width
}

fn default_spectrogram_frames() -> usize {
    SpectrogramParams::default().frames
}

fn default_spectrogram_bands() -> usize {
    SpectrogramParams::default().bands
}

fn default_floor_hz() -> f32 {
    SpectrogramParams::default().floor_hz
}

fn default_window_size() -> usize {
    SpectrogramParams::default().window_size
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            decode_sample_rate: default_decode_sample_rate(),
            peak_width: default_peak_width(),
            spectrogram_frames: default_spectrogram_frames(),
            spectrogram_bands: default_spectrogram_bands(),
            floor_hz: default_floor_hz(),
            window_size: default_window_size(),
            band_scale: BandScale::default(),
        }
    }
}

impl AudioSettings {
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            sample_rate: self.decode_sample_rate,
            peak_width: self.peak_width,
            spectrogram: SpectrogramParams {
                frames: self.spectrogram_frames,
                bands: self.spectrogram_bands,
                floor_hz: self.floor_hz,
                window_size: self.window_size,
                scale: self.band_scale,
            },
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Level used when `RUST_LOG` is not set.
    #[serde(default)]
    pub level: LogLevel,
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Qc,
    Timeline,
    Audio,
    Logging,
}

impl ConfigSection {
    pub const ALL: [ConfigSection; 4] = [
        ConfigSection::Qc,
        ConfigSection::Timeline,
        ConfigSection::Audio,
        ConfigSection::Logging,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Qc => "qc",
            ConfigSection::Timeline => "timeline",
            ConfigSection::Audio => "audio",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the table in generated files.
    pub(crate) fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Qc => "Quality-control thresholds",
            ConfigSection::Timeline => "Timeline geometry and drag limits",
            ConfigSection::Audio => "Waveform and spectrogram analysis",
            ConfigSection::Logging => "Logging configuration",
        }
    }
}
