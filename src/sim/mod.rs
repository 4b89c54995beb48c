//! Gameplay simulation module
//!
//! All gameplay logic lives here. No rendering, audio or platform code:
//! - Millisecond frame deltas in, events and state snapshots out
//! - Explicit seeded RNG only
//! - State changes only through the reducer

pub mod context;
pub mod enemy;
pub mod events;
pub mod level;
pub mod player;
pub mod reducer;
pub mod rng;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod wave;

pub use context::StepContext;
pub use enemy::{Actor, Enemy, Fate, Movement, Zigzag};
pub use events::{EventLog, EventQueue, EventSink, Outcome, SimEvent};
pub use level::{LevelConfig, LevelTable};
pub use player::Player;
pub use reducer::{GameAction, reduce, replay};
pub use rng::{RngState, SimRng};
pub use spawner::LevelController;
pub use state::{GamePhase, GameState, Mask};
pub use tick::{InputEvent, Simulation, is_notification};
pub use wave::{WaveEntry, generate_wave};
