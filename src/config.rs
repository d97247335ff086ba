//! Persisted timeline settings (lives in the OS config directory).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, TimelineError};
use crate::timeline::{Granularity, InverseMapping};

/// Upper bound for `years_back` and `years_forward`.
pub const MAX_YEARS: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    /// Pixel width of every time column, whatever it represents.
    pub column_width: f32,
    /// Bars are never drawn narrower than this.
    pub min_bar_width: f32,
    pub default_granularity: Granularity,
    pub years_back: u32,
    pub years_forward: u32,
    /// Where "today" lands after autoscroll, as a fraction of viewport width.
    pub today_scroll_fraction: f32,
    pub autoscroll_delay_secs: f64,
    /// Unplaced epics preview as ±this many days around the pointer.
    pub placement_half_span_days: i64,
    pub default_duration_days: i64,
    pub inverse_mapping: InverseMapping,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            column_width: 200.0,
            min_bar_width: 50.0,
            default_granularity: Granularity::Months,
            years_back: 1,
            years_forward: 2,
            today_scroll_fraction: 1.0 / 6.0,
            autoscroll_delay_secs: 0.1,
            placement_half_span_days: 10,
            default_duration_days: 14,
            inverse_mapping: InverseMapping::Linear,
        }
    }
}

impl TimelineSettings {
    /// `settings.json` under the platform config dir.
    pub fn default_path() -> Result<PathBuf> {
        directories::ProjectDirs::from("", "", "RustTimelineApp")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or(TimelineError::NoConfigDir)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Load settings, falling back to defaults when the file is missing or
    /// unreadable. Also returns the path to save back to.
    pub fn load_or_default() -> (Self, PathBuf) {
        let path = Self::default_path().unwrap_or_else(|e| {
            warn!("{e}; using ./settings.json");
            PathBuf::from("settings.json")
        });
        let settings = match Self::load_from(&path) {
            Ok(settings) => {
                info!(path = %path.display(), "loaded settings");
                settings
            }
            Err(TimelineError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(e) => {
                warn!(path = %path.display(), "ignoring unreadable settings: {e}");
                Self::default()
            }
        };
        (settings.sanitized(), path)
    }

    /// Clamp values that would break the grid math.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.column_width.is_finite() && self.column_width > 0.0) {
            self.column_width = defaults.column_width;
        }
        if !(self.min_bar_width.is_finite() && self.min_bar_width >= 0.0) {
            self.min_bar_width = defaults.min_bar_width;
        }
        if !self.today_scroll_fraction.is_finite() {
            self.today_scroll_fraction = defaults.today_scroll_fraction;
        }
        self.today_scroll_fraction = self.today_scroll_fraction.clamp(0.0, 1.0);
        if !(self.autoscroll_delay_secs.is_finite() && self.autoscroll_delay_secs >= 0.0) {
            self.autoscroll_delay_secs = defaults.autoscroll_delay_secs;
        }
        self.placement_half_span_days = self.placement_half_span_days.max(0);
        self.default_duration_days = self.default_duration_days.max(0);
        self.years_back = self.years_back.min(MAX_YEARS);
        self.years_forward = self.years_forward.min(MAX_YEARS);
        self
    }
}
