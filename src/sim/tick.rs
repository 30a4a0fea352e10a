//! Per-frame simulation tick
//!
//! Game flow state machine: Menu -> Countdown -> Playing <-> Paused ->
//! GameOver -> Menu. Once the grace period after the countdown has passed,
//! every playing tick runs motion, then spawning, then collision checks.

use super::collision::check_all;
use super::motion::advance;
use super::player::{self, LaneDirection};
use super::spawner::maybe_spawn;
use super::state::{GameEvent, GamePhase, GameState};
use super::timers::{Timer, TimerKind};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Primary action (click/tap/space): start a run, or jump while playing
    pub primary: bool,
    /// Pause toggle
    pub pause: bool,
    /// Lane change request
    pub move_lane: Option<LaneDirection>,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game by one frame at wall-clock time `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    // Timers run regardless of phase so a jump started before a pause still lands
    fire_due_timers(state, now_ms);

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    let input = &input;

    if input.pause {
        toggle_pause(state);
    }

    if input.primary {
        match state.phase {
            GamePhase::Menu | GamePhase::GameOver | GamePhase::Countdown => {
                start_game(state, now_ms);
            }
            GamePhase::Playing => {
                player::jump(state, now_ms);
            }
            GamePhase::Paused => {}
        }
    }

    if let Some(direction) = input.move_lane {
        player::move_lane(state, direction);
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    // Grace period: keep ticking, nothing moves yet
    if now_ms - state.started_at_ms < state.tuning.initial_delay_ms {
        return;
    }

    state.time_ticks += 1;

    let speed = state.speed;
    advance(state, speed);
    maybe_spawn(now_ms, state);
    if check_all(state) {
        game_over(state);
    }
}

/// Begin a new run: cancel everything pending, reset, and count down
pub fn start_game(state: &mut GameState, now_ms: f64) {
    state.timers.cancel_all();
    state.reset_run();
    state.set_phase(GamePhase::Countdown);

    let steps = state.tuning.countdown_steps;
    if steps == 0 {
        begin_playing(state, now_ms);
        return;
    }

    state.countdown = steps;
    state.events.push(GameEvent::Countdown(steps));
    state
        .timers
        .schedule(TimerKind::CountdownStep, now_ms + state.tuning.countdown_step_ms);
}

/// Pause toggle; only Playing and Paused respond
pub fn toggle_pause(state: &mut GameState) {
    match state.phase {
        GamePhase::Playing => state.set_phase(GamePhase::Paused),
        GamePhase::Paused => state.set_phase(GamePhase::Playing),
        _ => {}
    }
}

/// End the run, record a new high score, and fall back to the menu
pub fn game_over(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.set_phase(GamePhase::GameOver);
    state.timers.cancel_all();

    let score = state.score;
    let new_high_score = score > state.high_score;
    if new_high_score {
        state.high_score = score;
        log::info!("New high score: {}", score);
    }
    log::info!("Game over with score {}", score);
    state.events.push(GameEvent::GameOver {
        score,
        new_high_score,
    });

    show_menu(state, score);
}

fn show_menu(state: &mut GameState, final_score: u64) {
    state.set_phase(GamePhase::Menu);
    state.events.push(GameEvent::MenuShown {
        final_score,
        high_score: state.high_score,
    });
}

fn begin_playing(state: &mut GameState, now_ms: f64) {
    state.countdown = 0;
    state.started_at_ms = now_ms;
    state.set_phase(GamePhase::Playing);
}

fn fire_due_timers(state: &mut GameState, now_ms: f64) {
    while let Some(timer) = state.timers.pop_due(now_ms) {
        fire(state, timer, now_ms);
    }
}

fn fire(state: &mut GameState, timer: Timer, now_ms: f64) {
    match timer.kind {
        TimerKind::JumpReset => {
            // Only the reset belonging to the current jump lands the player
            if state.player.jump_timer == Some(timer.token) {
                player::land(state);
            }
        }
        TimerKind::CountdownStep => {
            state.countdown = state.countdown.saturating_sub(1);
            if state.countdown > 0 {
                state.events.push(GameEvent::Countdown(state.countdown));
                // Chain off the due time so late frames don't stretch the countdown
                state.timers.schedule(
                    TimerKind::CountdownStep,
                    timer.due_ms + state.tuning.countdown_step_ms,
                );
            } else {
                begin_playing(state, now_ms);
            }
        }
    }
}

/// Distance from the player's front edge to the nearest unpassed obstacle in `lane`.
///
/// Negative while an obstacle overlaps the player horizontally.
fn nearest_gap(state: &GameState, lane: u32) -> Option<f32> {
    let player_rect = state.player.rect(&state.tuning);
    state
        .obstacles
        .iter()
        .filter(|o| o.lane == lane && !o.passed && o.right() >= player_rect.left())
        .map(|o| o.position - player_rect.right())
        .min_by(|a, b| a.total_cmp(b))
}

/// Idle/demo mode: start runs, sidestep obstacles when a neighbour lane is clear, jump otherwise
fn autopilot(state: &GameState, input: &mut TickInput) {
    match state.phase {
        GamePhase::Menu | GamePhase::GameOver => input.primary = true,
        GamePhase::Playing => {
            let speed = state.speed;
            // Obstacles this close get jumped; a bit further out we try to change lanes
            let jump_gap = speed * 3.0;
            let dodge_gap = speed * 30.0;

            let lane = state.player.lane;
            let Some(gap) = nearest_gap(state, lane) else {
                return;
            };

            if gap <= jump_gap {
                input.primary = true;
            } else if gap <= dodge_gap && !state.player.is_jumping {
                let lane_clear = |l: u32| nearest_gap(state, l).is_none_or(|g| g > dodge_gap);
                if lane > 0 && lane_clear(lane - 1) {
                    input.move_lane = Some(LaneDirection::Up);
                } else if lane + 1 < state.tuning.lane_count && lane_clear(lane + 1) {
                    input.move_lane = Some(LaneDirection::Down);
                }
            }
        }
        _ => {}
    }
}
