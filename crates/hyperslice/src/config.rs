//! Slice / traversal configuration.

use serde::{Deserialize, Serialize};

/// Steps between full recomputations of a cursor's payload.
pub const DEFAULT_REFRESH_INTERVAL: u64 = 65_536;

/// Relative slack used when locating points on the grid.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Tunables shared by a slice and the cursors walking it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceConfig {
    /// A cursor recomputes its point or cube from the grid index every
    /// `refresh_interval` steps instead of applying an incremental update.
    /// This bounds floating-point drift to that many incremental steps.
    pub refresh_interval: u64,

    /// Slack, in units of one axis stride, when fitting sub-resolutions and
    /// locating points.
    pub tolerance: f64,
}

impl Default for SliceConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl SliceConfig {
    /// Read `HYPERSLICE_REFRESH_INTERVAL` and `HYPERSLICE_TOLERANCE`,
    /// falling back to the defaults for missing or unparsable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            refresh_interval: std::env::var("HYPERSLICE_REFRESH_INTERVAL")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n: &u64| n > 0)
                .unwrap_or(defaults.refresh_interval),
            tolerance: std::env::var("HYPERSLICE_TOLERANCE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|t: &f64| t.is_finite() && *t >= 0.0)
                .unwrap_or(defaults.tolerance),
        }
    }

    /// Same config with a different refresh interval (minimum 1).
    pub fn with_refresh_interval(mut self, refresh_interval: u64) -> Self {
        self.refresh_interval = refresh_interval.max(1);
        self
    }
}
