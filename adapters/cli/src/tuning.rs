//! Optional tuning file loaded alongside the command line.

use std::{path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;

/// Tuning values read from a toml file, all optional with defaults.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Board dimensions.
    pub board: BoardTuning,
    /// Wanderer cadence and population.
    pub wanderers: WandererTuning,
}

/// Board dimension tuning.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct BoardTuning {
    /// Number of plot columns.
    pub columns: u32,
    /// Number of plot rows.
    pub rows: u32,
}

impl Default for BoardTuning {
    fn default() -> Self {
        Self {
            columns: 4,
            rows: 4,
        }
    }
}

/// Wanderer population and timing tuning.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct WandererTuning {
    /// Number of wanderers spawned at scene start.
    pub count: u32,
    /// Shortest walk duration in milliseconds.
    pub travel_min_ms: u64,
    /// Longest walk duration in milliseconds.
    pub travel_max_ms: u64,
    /// Shortest rest duration in milliseconds.
    pub dwell_min_ms: u64,
    /// Longest rest duration in milliseconds.
    pub dwell_max_ms: u64,
}

impl Default for WandererTuning {
    fn default() -> Self {
        Self {
            count: 3,
            travel_min_ms: 1_500,
            travel_max_ms: 4_000,
            dwell_min_ms: 800,
            dwell_max_ms: 2_500,
        }
    }
}

impl WandererTuning {
    /// Walk duration range as durations.
    #[must_use]
    pub const fn travel_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.travel_min_ms),
            Duration::from_millis(self.travel_max_ms),
        )
    }

    /// Rest duration range as durations.
    #[must_use]
    pub const fn dwell_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.dwell_min_ms),
            Duration::from_millis(self.dwell_max_ms),
        )
    }
}

/// Reads a tuning file from disk.
pub fn load(path: &Path) -> anyhow::Result<Tuning> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file {}", path.display()))?;
    toml::from_str(&contents).context("failed to parse tuning toml contents")
}
