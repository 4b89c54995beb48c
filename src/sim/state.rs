//! Game state and core simulation types
//!
//! `GameState` is the single authoritative snapshot. Only the reducer
//! produces new values of it.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Tuning;

/// The player's defensive stance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mask {
    /// No mask held; blocks nothing
    #[default]
    Neutral,
    Work,
    Family,
    Social,
}

impl Mask {
    /// Masks an enemy can carry (and a player can hold)
    pub const WARDS: [Mask; 3] = [Mask::Work, Mask::Family, Mask::Social];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mask::Neutral => "Neutral",
            Mask::Work => "Work",
            Mask::Family => "Family",
            Mask::Social => "Social",
        }
    }

    /// HUD label
    pub fn label(&self) -> &'static str {
        match self {
            Mask::Neutral => "Self",
            other => other.as_str(),
        }
    }

    pub fn is_ward(&self) -> bool {
        *self != Mask::Neutral
    }
}

/// Coarse phase derived from the state flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen, nothing running
    Ready,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Health ran out
    GameOver,
    /// All levels cleared
    Victory,
}

/// Complete game state as seen by HUD, audio and renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub hp: u32,
    pub max_hp: u32,
    pub score: u64,
    /// Consecutive successful blocks since the last miss
    pub combo: u32,
    /// Current level (1-based)
    pub level: u32,
    /// Display copy of the player's mask
    pub current_mask: Mask,
    pub is_playing: bool,
    pub is_game_over: bool,
    pub is_victory: bool,
    pub is_paused: bool,
    /// Cosmetic; cleared by an outside timer
    pub screen_shake: bool,
    /// Consecutive blocks per multiplier step
    pub combo_step: u32,
    /// Multiplier gained per step, in percent
    pub combo_bonus_percent: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(MAX_HP)
    }
}

impl GameState {
    /// Initial state with the given health pool
    pub fn new(max_hp: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            score: 0,
            combo: 0,
            level: 1,
            current_mask: Mask::Neutral,
            is_playing: false,
            is_game_over: false,
            is_victory: false,
            is_paused: false,
            screen_shake: false,
            combo_step: COMBO_STEP,
            combo_bonus_percent: COMBO_BONUS_PERCENT,
        }
    }

    /// Initial state for the given tuning
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.max_hp).with_combo(tuning.combo_step, tuning.combo_bonus_percent())
    }

    /// Same state with a different combo curve; a zero step is treated as 1
    pub fn with_combo(mut self, step: u32, bonus_percent: u64) -> Self {
        self.combo_step = step.max(1);
        self.combo_bonus_percent = bonus_percent;
        self
    }

    /// Same health pool and combo curve, everything else back to the start
    pub fn initial(&self) -> Self {
        Self::new(self.max_hp).with_combo(self.combo_step, self.combo_bonus_percent)
    }

    pub fn phase(&self) -> GamePhase {
        if self.is_game_over {
            GamePhase::GameOver
        } else if self.is_victory {
            GamePhase::Victory
        } else if self.is_paused {
            GamePhase::Paused
        } else if self.is_playing {
            GamePhase::Playing
        } else {
            GamePhase::Ready
        }
    }

    /// Game over or victory
    pub fn is_finished(&self) -> bool {
        self.is_game_over || self.is_victory
    }

    /// Score multiplier in percent for the current combo:
    /// +`combo_bonus_percent` for every `combo_step` consecutive blocks
    pub fn combo_multiplier_percent(&self) -> u64 {
        let steps = u64::from(self.combo / self.combo_step.max(1));
        steps.saturating_mul(self.combo_bonus_percent).saturating_add(100)
    }

    /// Score multiplier for the HUD (1.0, 1.1, ...)
    pub fn combo_multiplier(&self) -> f64 {
        self.combo_multiplier_percent() as f64 / 100.0
    }

    /// Health as a fraction of the pool
    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.hp as f32 / self.max_hp as f32
        }
    }
}
