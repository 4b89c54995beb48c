//! Simulation root
//!
//! `Simulation` is the explicit context object for one game session. It owns
//! the player, the level controller, the RNG, the event queue and the
//! authoritative `GameState`, and is driven by two stimulus sources only:
//! discrete input events and the per-frame tick. Both are applied
//! synchronously and never interleave.

use super::context::StepContext;
use super::events::{EventQueue, EventSink, SimEvent};
use super::player::Player;
use super::reducer::{GameAction, reduce};
use super::rng::{RngState, SimRng};
use super::spawner::LevelController;
use super::state::{GameState, Mask};
use crate::settings::{Settings, SettingsError, Tuning};

/// Discrete input from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    MaskDown(Mask),
    MaskUp(Mask),
    Start,
    Restart,
    Pause,
    Resume,
}

pub struct Simulation<S: EventSink> {
    tuning: Tuning,
    rng_state: RngState,
    rng: SimRng,
    state: GameState,
    player: Player,
    spawner: LevelController,
    events: EventQueue,
    /// Time left before the screen shake flag is cleared
    shake_timer_ms: Option<f32>,
    sink: S,
}

impl<S: EventSink> Simulation<S> {
    /// New session on the start screen
    pub fn new(settings: Settings, sink: S) -> Result<Self, SettingsError> {
        settings.validate()?;
        let levels = settings.level_table()?;

        let rng_state = settings.seed.map_or_else(RngState::from_entropy, RngState::new);
        let mut rng = rng_state.to_rng();
        let mut events = EventQueue::new();
        let tuning = settings.tuning;

        let spawner = {
            let mut ctx = StepContext::new(&mut rng, &tuning, &mut events, None);
            LevelController::new(levels, &mut ctx)
        };
        log::info!(
            "Simulation initialized with seed {} ({} levels)",
            rng_state.seed,
            spawner.levels().len()
        );

        Ok(Self {
            state: GameState::from_tuning(&tuning),
            tuning,
            rng_state,
            rng,
            player: Player::new(),
            spawner,
            events,
            shake_timer_ms: None,
            sink,
        })
    }

    /// Latest authoritative state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn spawner(&self) -> &LevelController {
        &self.spawner
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Apply one input event between ticks
    pub fn handle_input(&mut self, input: InputEvent) {
        match input {
            InputEvent::MaskDown(mask) => self.player.hold(mask, &mut self.events),
            InputEvent::MaskUp(mask) => self.player.release(mask, &mut self.events),
            InputEvent::Start => {
                if self.state.is_playing || self.state.is_finished() {
                    log::warn!("Start ignored in phase {:?}", self.state.phase());
                } else {
                    log::info!("Game started");
                    self.begin_run(GameAction::StartGame);
                }
            }
            InputEvent::Restart => {
                log::info!("Game restarted from phase {:?}", self.state.phase());
                self.begin_run(GameAction::RestartGame);
            }
            InputEvent::Pause => {
                if self.state.is_playing && !self.state.is_paused {
                    log::info!("Paused");
                    self.spawner.stop();
                    self.events.dispatch(GameAction::PauseGame);
                } else {
                    log::warn!("Pause ignored in phase {:?}", self.state.phase());
                }
            }
            InputEvent::Resume => {
                if self.state.is_paused {
                    log::info!("Resumed");
                    self.spawner.resume();
                    self.events.dispatch(GameAction::ResumeGame);
                } else {
                    log::warn!("Resume ignored in phase {:?}", self.state.phase());
                }
            }
        }
        self.flush();
    }

    /// Advance the simulation by one frame
    pub fn tick(&mut self, delta_ms: f32) {
        let delta_ms = if delta_ms.is_finite() { delta_ms.max(0.0) } else { 0.0 };

        self.tick_shake(delta_ms);

        if !self.state.is_playing || self.state.is_paused {
            log::debug!("Tick ignored in phase {:?}", self.state.phase());
            self.flush();
            return;
        }

        {
            let mut ctx = StepContext::new(
                &mut self.rng,
                &self.tuning,
                &mut self.events,
                Some(&self.player),
            );
            self.spawner.update(delta_ms, &mut ctx);
        }
        self.flush();
        // Victory on the level clock freezes the field
        if self.state.is_finished() {
            return;
        }

        {
            let mut ctx = StepContext::new(
                &mut self.rng,
                &self.tuning,
                &mut self.events,
                Some(&self.player),
            );
            self.spawner.update_enemies(delta_ms, &mut ctx);
        }
        self.flush();
    }

    /// Nearest unresolved enemy's mask; what a perfect player would hold
    pub fn suggested_mask(&self) -> Mask {
        self.spawner
            .enemies()
            .iter()
            .filter(|e| !e.resolved)
            .min_by(|a, b| {
                a.distance_to_target()
                    .partial_cmp(&b.distance_to_target())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map_or(Mask::Neutral, |e| e.mask)
    }

    /// Reset everything and start from level 1
    fn begin_run(&mut self, action: GameAction) {
        self.events.dispatch(action);
        self.shake_timer_ms = None;
        self.spawner.stop();
        self.spawner.clear_enemies();
        self.player.reset(&mut self.events);

        let mut ctx = StepContext::new(&mut self.rng, &self.tuning, &mut self.events, None);
        self.spawner.reset(&mut ctx);
        self.spawner.start(&mut ctx);
    }

    /// Run the screen shake clear timer
    fn tick_shake(&mut self, delta_ms: f32) {
        if let Some(remaining) = self.shake_timer_ms.as_mut() {
            *remaining -= delta_ms;
            if *remaining <= 0.0 {
                self.shake_timer_ms = None;
                self.events.dispatch(GameAction::ClearShake);
            }
        }
    }

    /// Reduce queued events in order, notify the sink, react to end states.
    ///
    /// Once the run ends, only the rest of the fatal enemy's resolution is
    /// still delivered; everything queued after it is dropped.
    fn flush(&mut self) {
        let mut ended = false;
        let mut closing = false;
        let mut dropped = 0usize;

        for event in self.events.drain() {
            if ended {
                if !closing {
                    dropped += 1;
                    continue;
                }
                closing = !matches!(event, SimEvent::EnemyResolved { .. });
            }
            let was_finished = self.state.is_finished();

            if let Some(action) = event.action() {
                self.state = reduce(&self.state, action);
                if matches!(action, GameAction::TakeDamage(_) | GameAction::TriggerShake)
                    && self.state.screen_shake
                {
                    self.shake_timer_ms = Some(self.tuning.shake_duration_ms);
                }
            }

            self.sink.on_event(&event, &self.state);

            if !was_finished && self.state.is_finished() {
                ended = true;
                closing = matches!(event.action(), Some(GameAction::TakeDamage(_)));
                self.spawner.stop();
                if self.state.is_game_over {
                    log::info!("Game over: score {}, level {}", self.state.score, self.state.level);
                } else {
                    log::info!("Victory: score {}, hp {}", self.state.score, self.state.hp);
                }
            }
        }

        if dropped > 0 {
            log::debug!("Dropped {} events queued after the run ended", dropped);
        }
    }
}

impl<S: EventSink> std::fmt::Debug for Simulation<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("seed", &self.rng_state.seed)
            .field("state", &self.state)
            .field("level", &self.spawner.level())
            .field("enemies", &self.spawner.enemies().len())
            .finish()
    }
}

/// Whether an event should be surfaced to outside collaborators as a
/// notification rather than a plain state change
pub fn is_notification(event: &SimEvent) -> bool {
    match event {
        SimEvent::Action(action) => matches!(
            action,
            GameAction::SetMask(_) | GameAction::Victory | GameAction::GameOver
        ),
        _ => true,
    }
}
