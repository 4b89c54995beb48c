//! Event bridge between the entity layer and the reducer
//!
//! Entities never touch `GameState`. They append `SimEvent`s to an
//! `EventQueue`; the simulation drains the queue in order at the end of each
//! step, feeds the state-changing ones to the reducer and hands every event to
//! the injected `EventSink`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::reducer::GameAction;
use super::state::{GameState, Mask};

/// How an enemy's mask check went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Player held the matching mask
    Success,
    /// Wrong mask (or none)
    Fail,
}

/// Something that happened during a simulation step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Direct state transition
    Action(GameAction),
    /// A new level began (also sets the level on the state)
    LevelChanged {
        level: u32,
        name: String,
        time_label: String,
    },
    EnemySpawned { id: u32, mask: Mask, pos: Vec2 },
    /// Mask check finished at `pos`; the enemy is gone
    EnemyResolved {
        id: u32,
        mask: Mask,
        outcome: Outcome,
        pos: Vec2,
    },
    /// Enemy reached the center without a mask check
    EnemyExpired { id: u32, pos: Vec2 },
}

impl SimEvent {
    /// Reducer transition carried by this event, if any
    pub fn action(&self) -> Option<GameAction> {
        match self {
            SimEvent::Action(action) => Some(*action),
            SimEvent::LevelChanged { level, .. } => Some(GameAction::SetLevel(*level)),
            _ => None,
        }
    }
}

/// Ordered outbox for one simulation step
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<SimEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn dispatch(&mut self, action: GameAction) {
        self.events.push(SimEvent::Action(action));
    }

    /// Take all queued events in emission order
    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

/// Observer for rendering, audio and HUD collaborators.
///
/// Called once per event, after the reducer has applied it, with the
/// resulting state.
pub trait EventSink {
    fn on_event(&mut self, event: &SimEvent, state: &GameState);
}

/// Discards everything
impl EventSink for () {
    fn on_event(&mut self, _event: &SimEvent, _state: &GameState) {}
}

/// Records every event; replaying its actions reproduces the state
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub events: Vec<SimEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// State transitions in the order they were applied
    pub fn actions(&self) -> impl Iterator<Item = GameAction> + '_ {
        self.events.iter().filter_map(SimEvent::action)
    }

    /// Resolutions with the given outcome
    pub fn resolutions(&self, outcome: Outcome) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SimEvent::EnemyResolved { outcome: o, .. } if *o == outcome))
            .count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for EventLog {
    fn on_event(&mut self, event: &SimEvent, _state: &GameState) {
        self.events.push(event.clone());
    }
}
