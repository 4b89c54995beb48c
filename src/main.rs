//! Mask Ward headless runner
//!
//! Plays one session at a fixed 60 Hz frame rate with an autopilot that holds
//! the nearest enemy's mask, logging every notification. Prints the final
//! state as JSON.
//!
//! Usage: `mask-ward [settings.json]`

use mask_ward::sim::{
    EventSink, GameAction, GameState, InputEvent, Mask, Outcome, SimEvent, Simulation,
    is_notification,
};
use mask_ward::{Settings, SettingsError};

/// One frame at 60 Hz
const FRAME_MS: f32 = 1000.0 / 60.0;
/// Give up after five simulated minutes
const MAX_FRAMES: u32 = 60 * 60 * 5;

/// Sink standing in for the renderer/audio layer
struct LogSink;

impl EventSink for LogSink {
    fn on_event(&mut self, event: &SimEvent, state: &GameState) {
        if !is_notification(event) {
            return;
        }
        match event {
            SimEvent::LevelChanged {
                level,
                name,
                time_label,
            } => log::info!("== Level {}: {} [{}]", level, name, time_label),
            SimEvent::EnemyResolved {
                id,
                mask,
                outcome: Outcome::Success,
                ..
            } => log::debug!(
                "Blocked enemy {} ({}) - score {} combo {}",
                id,
                mask.as_str(),
                state.score,
                state.combo
            ),
            SimEvent::EnemyResolved {
                id,
                mask,
                outcome: Outcome::Fail,
                ..
            } => log::info!("Enemy {} ({}) broke through - hp {}", id, mask.as_str(), state.hp),
            SimEvent::Action(GameAction::SetMask(mask)) => log::trace!("Mask: {}", mask.label()),
            SimEvent::Action(GameAction::Victory) => log::info!("Identity preserved!"),
            SimEvent::Action(GameAction::GameOver) => log::info!("Mask shattered"),
            other => log::trace!("{:?}", other),
        }
    }
}

fn run() -> Result<GameState, SettingsError> {
    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path)?,
        None => {
            log::info!("Using default settings");
            Settings::default()
        }
    };

    let mut sim = Simulation::new(settings, LogSink)?;
    sim.handle_input(InputEvent::Start);

    let mut held = Mask::Neutral;
    for _ in 0..MAX_FRAMES {
        let wanted = sim.suggested_mask();
        if wanted != held {
            if held.is_ward() {
                sim.handle_input(InputEvent::MaskUp(held));
            }
            if wanted.is_ward() {
                sim.handle_input(InputEvent::MaskDown(wanted));
            }
            held = wanted;
        }

        sim.tick(FRAME_MS);
        if sim.state().is_finished() {
            break;
        }
    }

    log::info!("Session ended in phase {:?} (seed {})", sim.state().phase(), sim.seed());
    Ok(sim.state().clone())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Mask Ward (headless) starting...");

    match run() {
        Ok(state) => match serde_json::to_string_pretty(&state) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize final state: {e}"),
        },
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The headless runner is native-only; wasm builds use the library
}
