//! Mask Ward - an arcade survival game core
//!
//! Pressures stream in from the arena edges toward the player. Holding the
//! matching mask wards them off for score and combo; the wrong mask costs
//! health. Three timed levels, then victory.
//!
//! Core modules:
//! - `sim`: Simulation (waves, enemies, player mask, reducer, level control)
//! - `settings`: Data-driven tuning, level table and key bindings

pub mod settings;
pub mod sim;

pub use settings::{KeyBindings, Settings, SettingsError, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    /// Enemies spawn this far outside the visible edge
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Distance from center at which an enemy's mask is checked
    pub const ZONE_RADIUS: f32 = 80.0;
    /// Distance from center at which an enemy is considered arrived
    pub const REACH_EPSILON: f32 = 10.0;

    /// Enemy base speed (pixels/s), scaled per level
    pub const ENEMY_BASE_SPEED: f32 = 100.0;

    /// Gameplay
    pub const MAX_HP: u32 = 100;
    pub const DAMAGE_PER_HIT: u32 = 10;
    pub const SCORE_PER_HIT: u64 = 10;
    /// Every `COMBO_STEP` consecutive hits add `COMBO_BONUS` to the multiplier
    pub const COMBO_STEP: u32 = 5;
    pub const COMBO_BONUS: f32 = 0.1;
    pub const COMBO_BONUS_PERCENT: u64 = 10;

    /// Screen shake lifetime after a failed block
    pub const SHAKE_DURATION_MS: f32 = 300.0;

    /// Zigzag movement (unpredictable levels)
    pub const ZIGZAG_FROM_LEVEL: u32 = 3;
    pub const ZIGZAG_INTERVAL_MIN_MS: f32 = 150.0;
    pub const ZIGZAG_INTERVAL_MAX_MS: f32 = 400.0;
    pub const ZIGZAG_AMPLITUDE_MIN: f32 = 80.0;
    pub const ZIGZAG_AMPLITUDE_MAX: f32 = 140.0;
}

/// Unit vector perpendicular to `dir` (rotated 90° counter-clockwise)
#[inline]
pub fn perpendicular(dir: Vec2) -> Vec2 {
    Vec2::new(-dir.y, dir.x)
}

/// Center of an arena of the given size
#[inline]
pub fn arena_center(width: f32, height: f32) -> Vec2 {
    Vec2::new(width / 2.0, height / 2.0)
}
