//! Player mask state
//!
//! The mask is driven purely by hold/release input. When several mask keys
//! are held the most recently pressed one wins; releasing it falls back to
//! the next most recent key still down, or Neutral.

use serde::{Deserialize, Serialize};

use super::events::EventQueue;
use super::reducer::GameAction;
use super::state::Mask;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Player {
    mask: Mask,
    /// Held mask keys, oldest first
    held: Vec<Mask>,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mask used for collision checks
    pub fn mask(&self) -> Mask {
        self.mask
    }

    pub fn held(&self) -> &[Mask] {
        &self.held
    }

    /// Mask key pressed (or auto-repeated)
    pub fn hold(&mut self, mask: Mask, events: &mut EventQueue) {
        if !mask.is_ward() {
            log::debug!("Ignoring hold of {:?}", mask);
            return;
        }
        self.held.retain(|m| *m != mask);
        self.held.push(mask);
        self.set_mask(mask, events);
    }

    /// Mask key released
    pub fn release(&mut self, mask: Mask, events: &mut EventQueue) {
        self.held.retain(|m| *m != mask);
        if self.mask == mask {
            let fallback = self.held.last().copied().unwrap_or(Mask::Neutral);
            self.set_mask(fallback, events);
        }
    }

    /// Drop all held keys and go back to Neutral
    pub fn reset(&mut self, events: &mut EventQueue) {
        self.held.clear();
        self.set_mask(Mask::Neutral, events);
    }

    /// Change the mask, notifying only on an actual change
    fn set_mask(&mut self, mask: Mask, events: &mut EventQueue) {
        if self.mask == mask {
            return;
        }
        self.mask = mask;
        events.dispatch(GameAction::SetMask(mask));
    }
}
