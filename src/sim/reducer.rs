//! Game state machine
//!
//! `reduce` is the only way a `GameState` changes: `(state, action) -> state`.

use serde::{Deserialize, Serialize};

use super::state::{GameState, Mask};

/// Named state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    SetMask(Mask),
    TakeDamage(u32),
    /// Base points; the combo multiplier is applied on reduce
    AddScore(u64),
    IncrementCombo,
    ResetCombo,
    SetLevel(u32),
    StartGame,
    PauseGame,
    ResumeGame,
    GameOver,
    Victory,
    RestartGame,
    TriggerShake,
    ClearShake,
}

impl GameAction {
    /// Actions that only make sense while a run is still undecided
    fn is_gameplay(&self) -> bool {
        matches!(
            self,
            GameAction::TakeDamage(_)
                | GameAction::AddScore(_)
                | GameAction::IncrementCombo
                | GameAction::ResetCombo
                | GameAction::SetLevel(_)
                | GameAction::GameOver
                | GameAction::Victory
        )
    }
}

/// Apply one action, producing the next state.
///
/// Once the run is finished (game over or victory) gameplay actions are
/// ignored until `StartGame`/`RestartGame`, so the two end states never
/// overlap and `hp == 0` stays equivalent to `is_game_over`.
pub fn reduce(state: &GameState, action: GameAction) -> GameState {
    if state.is_finished() && action.is_gameplay() {
        return state.clone();
    }

    let mut next = state.clone();
    match action {
        GameAction::SetMask(mask) => {
            next.current_mask = mask;
        }

        GameAction::TakeDamage(amount) => {
            next.hp = state.hp.min(state.max_hp).saturating_sub(amount);
            next.combo = 0;
            next.screen_shake = true;
            if next.hp == 0 {
                next.is_game_over = true;
                next.is_playing = false;
                next.is_paused = false;
            }
        }

        GameAction::AddScore(points) => {
            let gained = points.saturating_mul(state.combo_multiplier_percent()) / 100;
            next.score = state.score.saturating_add(gained);
        }

        GameAction::IncrementCombo => {
            next.combo = state.combo.saturating_add(1);
        }

        GameAction::ResetCombo => {
            next.combo = 0;
        }

        GameAction::SetLevel(level) => {
            next.level = level.max(1);
        }

        GameAction::StartGame | GameAction::RestartGame => {
            next = state.initial();
            next.is_playing = true;
        }

        GameAction::PauseGame => {
            if state.is_playing {
                next.is_paused = true;
            }
        }

        GameAction::ResumeGame => {
            next.is_paused = false;
        }

        GameAction::GameOver => {
            next.hp = 0;
            next.is_game_over = true;
            next.is_playing = false;
            next.is_paused = false;
        }

        GameAction::Victory => {
            next.is_victory = true;
            next.is_playing = false;
            next.is_paused = false;
        }

        GameAction::TriggerShake => {
            next.screen_shake = true;
        }

        GameAction::ClearShake => {
            next.screen_shake = false;
        }
    }
    next
}

/// Fold a sequence of actions over a state
pub fn replay<I>(state: &GameState, actions: I) -> GameState
where
    I: IntoIterator<Item = GameAction>,
{
    actions
        .into_iter()
        .fold(state.clone(), |state, action| reduce(&state, action))
}
