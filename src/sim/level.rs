//! Level table
//!
//! Ordered, read-only list of timed levels. Levels are numbered from 1.

use serde::{Deserialize, Serialize};

use super::wave::{INTERVAL_JITTER, MAX_WAVE_ENTRIES};
use crate::settings::SettingsError;

/// One timed level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Display name ("Morning Rush")
    #[serde(default)]
    pub name: String,
    /// Flavor line shown on level change
    #[serde(default)]
    pub time_label: String,
    /// Level length in milliseconds
    pub duration_ms: f32,
    /// Nominal gap between spawns (jittered by the wave generator)
    pub spawn_interval_ms: f32,
    /// Enemy speed multiplier over the base speed
    pub speed_multiplier: f32,
}

impl LevelConfig {
    pub fn new(duration_ms: f32, spawn_interval_ms: f32, speed_multiplier: f32) -> Self {
        Self {
            name: String::new(),
            time_label: String::new(),
            duration_ms,
            spawn_interval_ms,
            speed_multiplier,
        }
    }

    pub fn named(mut self, name: &str, time_label: &str) -> Self {
        self.name = name.to_string();
        self.time_label = time_label.to_string();
        self
    }

    /// Most spawns a wave for this level can hold (every gap at its shortest)
    pub fn max_spawns(&self) -> f64 {
        let min_gap = f64::from(self.spawn_interval_ms) * f64::from(INTERVAL_JITTER.0);
        (f64::from(self.duration_ms) / min_gap).ceil()
    }
}

/// Validated, non-empty level sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTable {
    levels: Vec<LevelConfig>,
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::reference()
    }
}

impl LevelTable {
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self, SettingsError> {
        Self::validate(&levels)?;
        Ok(Self { levels })
    }

    /// The shipped three-level day
    pub fn reference() -> Self {
        Self {
            levels: vec![
                LevelConfig::new(60_000.0, 2000.0, 1.0)
                    .named("Morning Rush", "07:00 AM - Family pressure"),
                LevelConfig::new(60_000.0, 1500.0, 1.3)
                    .named("The Grind", "09:00 AM - Office inferno"),
                LevelConfig::new(60_000.0, 1000.0, 1.6)
                    .named("The Void", "23:00 PM - Facing yourself"),
            ],
        }
    }

    pub fn validate(levels: &[LevelConfig]) -> Result<(), SettingsError> {
        if levels.is_empty() {
            return Err(SettingsError::Invalid("level table is empty".into()));
        }
        for (i, level) in levels.iter().enumerate() {
            let n = i + 1;
            if !(level.duration_ms.is_finite() && level.duration_ms >= 0.0) {
                return Err(SettingsError::Invalid(format!(
                    "level {n}: duration_ms must be finite and non-negative"
                )));
            }
            if !(level.spawn_interval_ms > 0.0) {
                return Err(SettingsError::Invalid(format!(
                    "level {n}: spawn_interval_ms must be positive"
                )));
            }
            if level.max_spawns() > MAX_WAVE_ENTRIES as f64 {
                return Err(SettingsError::Invalid(format!(
                    "level {n}: up to {} spawns exceeds the limit of {MAX_WAVE_ENTRIES}",
                    level.max_spawns()
                )));
            }
            if !(level.speed_multiplier > 0.0) {
                return Err(SettingsError::Invalid(format!(
                    "level {n}: speed_multiplier must be positive"
                )));
            }
        }
        Ok(())
    }

    /// Config for a 1-based level number
    pub fn get(&self, level: u32) -> Option<&LevelConfig> {
        let index = usize::try_from(level).ok()?.checked_sub(1)?;
        self.levels.get(index)
    }

    /// Number of the final level
    pub fn last_level(&self) -> u32 {
        self.levels.len() as u32
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn into_levels(self) -> Vec<LevelConfig> {
        self.levels
    }
}
