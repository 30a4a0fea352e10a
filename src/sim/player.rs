//! Player controller: lane changes and the timed jump

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::state::{GameEvent, GamePhase, GameState};
use super::timers::{TimerKind, TimerToken};
use crate::tuning::Tuning;

/// Lane change direction (lane 0 is the top of the screen)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneDirection {
    Up,
    Down,
}

/// The player's runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub lane: u32,
    pub is_jumping: bool,
    /// False from jump start until the jump reset timer fires
    pub can_jump: bool,
    /// Reset timer of the jump in progress
    #[serde(skip)]
    pub jump_timer: Option<TimerToken>,
}

impl Player {
    pub fn new(lane: u32) -> Self {
        Self {
            lane,
            is_jumping: false,
            can_jump: true,
            jump_timer: None,
        }
    }

    /// Bounding box; a jump lifts it off the lane floor
    pub fn rect(&self, tuning: &Tuning) -> Rect {
        let lift = if self.is_jumping { tuning.jump_height } else { 0.0 };
        let top = tuning.lane_floor(self.lane) - tuning.player_size - lift;
        Rect::new(tuning.player_x, top, tuning.player_size, tuning.player_size)
    }
}

/// Start a jump. No-op unless the player is grounded, ready, and the game is playing.
///
/// Returns true if the jump started.
pub fn jump(state: &mut GameState, now_ms: f64) -> bool {
    let player = &mut state.player;
    if !player.can_jump || player.is_jumping || state.phase != GamePhase::Playing {
        return false;
    }

    player.is_jumping = true;
    player.can_jump = false;
    // Replaces any reset still pending
    let token = state
        .timers
        .schedule(TimerKind::JumpReset, now_ms + state.tuning.jump_duration_ms);
    state.player.jump_timer = Some(token);
    state.events.push(GameEvent::Jumped);
    true
}

/// Jump reset timer callback
pub fn land(state: &mut GameState) {
    state.player.jump_timer = None;
    state.player.is_jumping = false;
    state.player.can_jump = true;
    state.events.push(GameEvent::Landed);
}

/// Shift one lane, clamped to the arena. No-op mid-jump, while paused, or outside a run.
///
/// Returns true if the lane changed.
pub fn move_lane(state: &mut GameState, direction: LaneDirection) -> bool {
    if state.player.is_jumping {
        return false;
    }
    match state.phase {
        GamePhase::Countdown | GamePhase::Playing => {}
        GamePhase::Paused | GamePhase::Menu | GamePhase::GameOver => return false,
    }

    let max_lane = state.tuning.lane_count.saturating_sub(1);
    let current = state.player.lane.min(max_lane);
    let target = match direction {
        LaneDirection::Up => current.saturating_sub(1),
        LaneDirection::Down => (current + 1).min(max_lane),
    };

    let changed = target != state.player.lane;
    state.player.lane = target;
    changed
}
