//! Per-step simulation context
//!
//! Threaded through every entity call in place of global game access.

use super::events::EventQueue;
use super::player::Player;
use super::rng::SimRng;
use crate::settings::Tuning;

pub struct StepContext<'a> {
    pub rng: &'a mut SimRng,
    pub tuning: &'a Tuning,
    pub events: &'a mut EventQueue,
    /// Absent only when no player has been attached to the session
    pub player: Option<&'a Player>,
}

impl<'a> StepContext<'a> {
    pub fn new(
        rng: &'a mut SimRng,
        tuning: &'a Tuning,
        events: &'a mut EventQueue,
        player: Option<&'a Player>,
    ) -> Self {
        Self {
            rng,
            tuning,
            events,
            player,
        }
    }
}
