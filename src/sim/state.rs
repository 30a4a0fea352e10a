//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameState`]; the state machine in
//! `tick` is the only thing that mutates it.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::player::Player;
use super::timers::Timers;
use crate::tuning::{Tuning, TuningError};

/// Current phase of the game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a start command (shows last score and high score)
    Menu,
    /// 3-2-1 before play
    Countdown,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended (folds straight into Menu)
    GameOver,
}

impl GamePhase {
    /// True while a run is in progress (jump input instead of start)
    pub fn in_run(&self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::Paused)
    }
}

/// Obstacle footprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSize {
    pub width: f32,
    pub height: f32,
}

/// An obstacle scrolling toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub lane: u32,
    /// Left edge, decreasing every playing tick
    pub position: f32,
    /// Set once, when the obstacle slips behind the player
    pub passed: bool,
    pub size: ObstacleSize,
}

impl Obstacle {
    pub fn new(id: u32, lane: u32, position: f32, height: f32, tuning: &Tuning) -> Self {
        Self {
            id,
            lane,
            position,
            passed: false,
            size: ObstacleSize {
                width: height * tuning.obstacle_width_ratio,
                height,
            },
        }
    }

    /// Trailing edge
    pub fn right(&self) -> f32 {
        self.position + self.size.width
    }

    /// Bounding box standing on the lane floor
    pub fn rect(&self, tuning: &Tuning) -> Rect {
        let floor = tuning.lane_floor(self.lane);
        Rect::new(
            self.position,
            floor - self.size.height,
            self.size.width,
            self.size.height,
        )
    }
}

/// Things the outside world should react to (HUD, sounds, persistence)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    /// Countdown value to display
    Countdown(u32),
    Spawned { id: u32, lane: u32 },
    Passed { id: u32, score: u64 },
    Removed { id: u32 },
    Jumped,
    Landed,
    GameOver { score: u64, new_high_score: bool },
    MenuShown { final_score: u64, high_score: u64 },
}

/// Complete game state for the session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    /// Scroll speed, fixed for the run
    pub speed: f32,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// When the last obstacle spawned (None until the first spawn of a run)
    pub last_spawn_ms: Option<f64>,
    /// Countdown value on screen (0 outside the countdown)
    pub countdown: u32,
    /// When the current run entered Playing
    pub started_at_ms: f64,
    pub player: Player,
    pub timers: Timers,
    /// Logic ticks run this session (grace-period and paused ticks excluded)
    pub time_ticks: u64,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// Create a game state with custom tuning, rejecting values the sim can't run with
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            score: 0,
            high_score: 0,
            speed: tuning.base_speed,
            obstacles: Vec::new(),
            last_spawn_ms: None,
            countdown: 0,
            started_at_ms: 0.0,
            player: Player::new(tuning.center_lane()),
            timers: Timers::default(),
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Move to another phase and report it
    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {:?} -> {:?}", from, to);
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Clear everything left over from the previous run
    pub fn reset_run(&mut self) {
        self.obstacles.clear();
        self.score = 0;
        self.speed = self.tuning.base_speed;
        self.last_spawn_ms = None;
        self.countdown = 0;
        self.player = Player::new(self.tuning.center_lane());
    }

    /// Take the pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
