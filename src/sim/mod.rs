//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in from the driver, never from a clock
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod motion;
pub mod player;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::{Rect, check_all, collides};
pub use motion::{MotionReport, advance};
pub use player::{LaneDirection, Player, jump, move_lane};
pub use snapshot::{ObstacleView, Snapshot};
pub use spawner::maybe_spawn;
pub use state::{GameEvent, GamePhase, GameState, Obstacle, ObstacleSize};
pub use tick::{TickInput, game_over, start_game, tick, toggle_pause};
pub use timers::{TimerKind, TimerToken, Timers};
