//! Entity simulation
//!
//! All gameplay logic lives here. Nothing in this module owns a loop or a
//! clock: every operation runs inside a scheduler callback or an input
//! event and takes the `Session` explicitly.

pub mod motion;
pub mod player;
pub mod session;
pub mod spawner;
pub mod state;
pub mod store;

pub use motion::{Contact, advance_bonus, advance_obstacle, check_bonus, check_obstacle};
pub use session::{StickRun, game_over, score, start};
pub use spawner::{move_period, spawn_bonus, spawn_obstacle};
pub use state::{Bonus, JumpState, Obstacle, Player, Session, SessionPhase, Spawners, Task};
pub use store::{SlotId, Slots, Sprite};
