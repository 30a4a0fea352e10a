//! Lane Runner - A three-lane endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (obstacles, collisions, game state machine)
//! - `session`: Frame driver that owns the sim and the persisted high score
//! - `platform`: Browser/native storage abstraction
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod platform;
pub mod session;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use session::Session;
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Minimum time between two spawns (ms)
    pub const SPAWN_INTERVAL_MS: f64 = 2000.0;
    /// Last obstacle must have travelled this far from the right edge before the next spawn
    pub const MIN_OBSTACLE_DISTANCE: f32 = 200.0;
    /// Obstacle height range (width is 80% of height)
    pub const MIN_OBSTACLE_SIZE: f32 = 40.0;
    pub const MAX_OBSTACLE_SIZE: f32 = 80.0;
    pub const OBSTACLE_WIDTH_RATIO: f32 = 0.8;
    /// Cap on active obstacles
    pub const MAX_OBSTACLES: usize = 10;

    /// Scroll speed (units per tick), fixed for the whole run
    pub const BASE_SPEED: f32 = 5.0;
    /// Points per passed obstacle
    pub const SCORE_INCREMENT: u64 = 10;
    /// Obstacles are dropped once their right edge is this far past the left edge
    pub const REMOVAL_MARGIN: f32 = 100.0;
    /// Rectangle shrink applied on every side before overlap testing
    pub const COLLISION_TOLERANCE: f32 = 10.0;

    /// Jump window (ms); also the cooldown before the next jump
    pub const JUMP_DURATION_MS: f64 = 600.0;
    /// How far a jump lifts the player (clears the tallest obstacle)
    pub const JUMP_HEIGHT: f32 = 150.0;

    /// Countdown shows 3, 2, 1 before play starts
    pub const COUNTDOWN_STEPS: u32 = 3;
    pub const COUNTDOWN_STEP_MS: f64 = 1000.0;
    /// Grace period after the countdown with no spawning, motion or collisions (ms)
    pub const INITIAL_DELAY_MS: f64 = 2000.0;

    /// Arena layout
    pub const LANE_COUNT: u32 = 3;
    pub const LANE_HEIGHT: f32 = 200.0;
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_SIZE: f32 = 50.0;

    /// Nominal frame length for headless drivers (ms)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}
