//! Configuration management.
//!
//! This module provides:
//! - TOML-based configuration with one table per concern
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only the changed table is rewritten)
//!
//! # Example
//!
//! ```no_run
//! use subtime_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new(".config/settings.toml");
//! config.load_or_create().unwrap();
//!
//! let thresholds = config.settings().qc.thresholds();
//! println!("Max CPS: {}", thresholds.max_cps);
//!
//! config.settings_mut().qc.max_cpl = 37;
//! config.update_section(ConfigSection::Qc).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    AudioSettings, ConfigSection, LoggingSettings, QcSettings, Settings, TimelineSettings,
};
