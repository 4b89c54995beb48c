//! Procedural wave generation
//!
//! A wave is the full spawn schedule for one level, built eagerly when the
//! level starts.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::level::LevelConfig;
use super::rng::uniform;
use super::state::Mask;

/// Speed jitter applied to every spawn ([min, max))
const SPEED_JITTER: (f32, f32) = (0.8, 1.2);
/// Spawn gap jitter as a fraction of the nominal interval
pub(crate) const INTERVAL_JITTER: (f32, f32) = (0.7, 1.3);
/// Upper bound on the entries of a single wave
pub const MAX_WAVE_ENTRIES: usize = 100_000;

/// One scheduled spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveEntry {
    /// Milliseconds since level start
    pub time_offset_ms: f32,
    /// Always one of `Mask::WARDS`
    pub mask: Mask,
    /// Pixels per second
    pub speed: f32,
}

/// Build the spawn schedule for one level.
///
/// Entries are in non-decreasing time order and all fall in
/// `[0, duration_ms)`. A zero-length level yields an empty wave, and no
/// wave grows past `MAX_WAVE_ENTRIES`.
pub fn generate_wave<R: Rng>(
    config: &LevelConfig,
    base_speed: f32,
    rng: &mut R,
) -> Vec<WaveEntry> {
    let mut wave = Vec::new();
    if !(config.spawn_interval_ms > 0.0) {
        log::warn!(
            "Level '{}' has non-positive spawn interval ({}), generating empty wave",
            config.name,
            config.spawn_interval_ms
        );
        return wave;
    }

    let duration = f64::from(config.duration_ms);
    let interval = f64::from(config.spawn_interval_ms);
    let mut time = 0.0_f64;
    while time < duration {
        let time_offset_ms = time as f32;
        if time_offset_ms >= config.duration_ms {
            break;
        }
        if wave.len() >= MAX_WAVE_ENTRIES {
            log::warn!(
                "Level '{}' wave truncated at {} spawns",
                config.name,
                MAX_WAVE_ENTRIES
            );
            break;
        }

        let mask = Mask::WARDS[rng.random_range(0..Mask::WARDS.len())];
        let speed =
            base_speed * config.speed_multiplier * uniform(rng, SPEED_JITTER.0, SPEED_JITTER.1);

        wave.push(WaveEntry {
            time_offset_ms,
            mask,
            speed,
        });

        time += interval * f64::from(uniform(rng, INTERVAL_JITTER.0, INTERVAL_JITTER.1));
    }

    log::debug!(
        "Generated wave for '{}': {} spawns over {}ms",
        config.name,
        wave.len(),
        config.duration_ms
    );
    wave
}
