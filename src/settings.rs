//! Game settings and tuning
//!
//! Loaded from a JSON file on native; every field falls back to the
//! built-in defaults so partial files are fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{LevelConfig, LevelTable, Mask};

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Gameplay tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    /// How far outside the visible edge enemies appear
    pub spawn_margin: f32,

    // === Collision ===
    /// Mask check radius around the arena center
    pub zone_radius: f32,
    /// Enemies closer than this to the center are removed outright
    pub reach_epsilon: f32,

    // === Enemies ===
    /// Base speed in pixels per second, before level multiplier and jitter
    pub enemy_base_speed: f32,
    /// First level at which enemies zigzag
    pub zigzag_from_level: u32,
    /// Retime window for zigzag velocity changes (ms, [min, max))
    pub zigzag_interval_ms: (f32, f32),
    /// Lateral amplitude window, fixed per enemy at spawn ([min, max))
    pub zigzag_amplitude: (f32, f32),

    // === Scoring ===
    pub max_hp: u32,
    pub damage_per_hit: u32,
    pub score_per_hit: u64,
    /// Consecutive blocks per combo multiplier step
    pub combo_step: u32,
    /// Multiplier gained per step (0.1 = +10%)
    pub combo_bonus: f32,

    // === Feedback ===
    /// How long the screen shake flag stays raised after a failed block
    pub shake_duration_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            spawn_margin: SPAWN_MARGIN,

            zone_radius: ZONE_RADIUS,
            reach_epsilon: REACH_EPSILON,

            enemy_base_speed: ENEMY_BASE_SPEED,
            zigzag_from_level: ZIGZAG_FROM_LEVEL,
            zigzag_interval_ms: (ZIGZAG_INTERVAL_MIN_MS, ZIGZAG_INTERVAL_MAX_MS),
            zigzag_amplitude: (ZIGZAG_AMPLITUDE_MIN, ZIGZAG_AMPLITUDE_MAX),

            max_hp: MAX_HP,
            damage_per_hit: DAMAGE_PER_HIT,
            score_per_hit: SCORE_PER_HIT,
            combo_step: COMBO_STEP,
            combo_bonus: COMBO_BONUS,

            shake_duration_ms: SHAKE_DURATION_MS,
        }
    }
}

impl Tuning {
    /// `combo_bonus` as whole percent, the unit scoring works in
    pub fn combo_bonus_percent(&self) -> u64 {
        (self.combo_bonus.max(0.0) * 100.0).round() as u64
    }
}

/// Keyboard bindings, stored as key names (`"Q"`, `"Space"`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub work: String,
    pub family: String,
    pub social: String,
    pub start: String,
    pub pause: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            work: "Q".to_string(),
            family: "W".to_string(),
            social: "E".to_string(),
            start: "Space".to_string(),
            pause: "Escape".to_string(),
        }
    }
}

impl KeyBindings {
    /// Mask bound to `key`, if any (case-insensitive)
    pub fn mask_for(&self, key: &str) -> Option<Mask> {
        if key.eq_ignore_ascii_case(&self.work) {
            Some(Mask::Work)
        } else if key.eq_ignore_ascii_case(&self.family) {
            Some(Mask::Family)
        } else if key.eq_ignore_ascii_case(&self.social) {
            Some(Mask::Social)
        } else {
            None
        }
    }

    /// Key name bound to a mask (Neutral has no key)
    pub fn key_for(&self, mask: Mask) -> Option<&str> {
        match mask {
            Mask::Neutral => None,
            Mask::Work => Some(&self.work),
            Mask::Family => Some(&self.family),
            Mask::Social => Some(&self.social),
        }
    }

    pub fn is_start(&self, key: &str) -> bool {
        key.eq_ignore_ascii_case(&self.start)
    }

    pub fn is_pause(&self, key: &str) -> bool {
        key.eq_ignore_ascii_case(&self.pause)
    }
}

/// Complete game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ordered level table (level 1 first)
    pub levels: Vec<LevelConfig>,
    pub tuning: Tuning,
    pub keys: KeyBindings,
    /// Fixed RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            levels: LevelTable::reference().into_levels(),
            tuning: Tuning::default(),
            keys: KeyBindings::default(),
            seed: None,
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Same settings with a fixed seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the level table these settings describe
    pub fn level_table(&self) -> Result<LevelTable, SettingsError> {
        LevelTable::new(self.levels.clone())
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        LevelTable::validate(&self.levels)?;

        let t = &self.tuning;
        if t.max_hp == 0 {
            return Err(SettingsError::Invalid("max_hp must be positive".into()));
        }
        if !(t.arena_width > 0.0 && t.arena_height > 0.0) {
            return Err(SettingsError::Invalid("arena size must be positive".into()));
        }
        if !(t.enemy_base_speed > 0.0) {
            return Err(SettingsError::Invalid(
                "enemy_base_speed must be positive".into(),
            ));
        }
        if !(t.reach_epsilon >= 0.0 && t.zone_radius > t.reach_epsilon) {
            return Err(SettingsError::Invalid(format!(
                "zone_radius ({}) must exceed reach_epsilon ({})",
                t.zone_radius, t.reach_epsilon
            )));
        }
        let (lo, hi) = t.zigzag_interval_ms;
        if !(lo > 0.0 && hi >= lo) {
            return Err(SettingsError::Invalid(format!(
                "zigzag_interval_ms must be a positive range, got ({lo}, {hi})"
            )));
        }
        let (lo, hi) = t.zigzag_amplitude;
        if !(lo >= 0.0 && hi >= lo) {
            return Err(SettingsError::Invalid(format!(
                "zigzag_amplitude must be a non-negative range, got ({lo}, {hi})"
            )));
        }
        if t.combo_step == 0 {
            return Err(SettingsError::Invalid("combo_step must be positive".into()));
        }
        if !(t.combo_bonus.is_finite() && t.combo_bonus >= 0.0) {
            return Err(SettingsError::Invalid(format!(
                "combo_bonus must be finite and non-negative, got {}",
                t.combo_bonus
            )));
        }
        if t.shake_duration_ms < 0.0 {
            return Err(SettingsError::Invalid(
                "shake_duration_ms must not be negative".into(),
            ));
        }
        Ok(())
    }
}
