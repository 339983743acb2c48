//! Subtime Core - subtitle timing and quality-control engine.
//!
//! This crate contains the editing logic with zero UI dependencies:
//! subtitle codecs, QC evaluation, auto-fixes, the undoable document store,
//! audio analysis for the timeline, and timeline pointer handling.

pub mod audio;
pub mod config;
pub mod document;
pub mod fixes;
pub mod logging;
pub mod qc;
pub mod subtitles;
pub mod timeline;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
