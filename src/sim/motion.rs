//! Obstacle motion, scoring and off-screen removal

use super::state::{GameEvent, GameState};

/// What one motion step did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionReport {
    pub passed: u32,
    pub removed: u32,
}

/// Scroll every obstacle left by `speed`, then score and cull using the new positions.
///
/// An obstacle scores once, the first tick its trailing edge is strictly left of
/// the player's left edge. It is removed once its trailing edge is more than the
/// removal margin past the left edge of the screen.
pub fn advance(state: &mut GameState, speed: f32) -> MotionReport {
    let mut report = MotionReport::default();
    let player_left = state.player.rect(&state.tuning).left();
    let cull_line = -state.tuning.removal_margin;
    let increment = state.tuning.score_increment;

    for obstacle in state.obstacles.iter_mut() {
        obstacle.position -= speed;

        if !obstacle.passed && obstacle.right() < player_left {
            obstacle.passed = true;
            state.score += increment;
            report.passed += 1;
            state.events.push(GameEvent::Passed {
                id: obstacle.id,
                score: state.score,
            });
        }
    }

    let events = &mut state.events;
    state.obstacles.retain(|obstacle| {
        let keep = obstacle.right() >= cull_line;
        if !keep {
            log::debug!("Removed obstacle {} at {:.0}", obstacle.id, obstacle.position);
            events.push(GameEvent::Removed { id: obstacle.id });
            report.removed += 1;
        }
        keep
    });

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::Obstacle;
    use proptest::prelude::*;

    fn state_with(positions: &[f32]) -> GameState {
        let mut state = GameState::new(5);
        for &pos in positions {
            let id = state.next_entity_id();
            let obstacle = Obstacle::new(id, 0, pos, 50.0, &state.tuning);
            state.obstacles.push(obstacle);
        }
        state
    }

    #[test]
    fn test_fresh_obstacle_moves_by_speed() {
        let mut state = state_with(&[VIEWPORT_WIDTH]);
        let report = advance(&mut state, BASE_SPEED);
        assert_eq!(report, MotionReport::default());
        assert_eq!(state.obstacles[0].position, VIEWPORT_WIDTH - 5.0);
        assert!(!state.obstacles[0].passed);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_pass_scores_exactly_once() {
        // Width 40: trailing edge at PLAYER_X + 2, crosses after one tick
        let mut state = state_with(&[PLAYER_X - 38.0]);
        let report = advance(&mut state, BASE_SPEED);
        assert_eq!(report.passed, 1);
        assert!(state.obstacles[0].passed);
        assert_eq!(state.score, SCORE_INCREMENT);

        for _ in 0..5 {
            assert_eq!(advance(&mut state, BASE_SPEED).passed, 0);
        }
        assert_eq!(state.score, SCORE_INCREMENT);
    }

    #[test]
    fn test_touching_edge_is_not_a_pass() {
        // Trailing edge lands exactly on the player's left edge
        let mut state = state_with(&[PLAYER_X - 40.0 + 5.0]);
        advance(&mut state, BASE_SPEED);
        assert!(!state.obstacles[0].passed);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_removed_past_margin() {
        // Width 40: trailing edge goes from -98 to -103
        let mut state = state_with(&[-138.0, 400.0]);
        state.obstacles[0].passed = true;
        let first_id = state.obstacles[0].id;

        let report = advance(&mut state, BASE_SPEED);
        assert_eq!(report.removed, 1);
        assert_eq!(state.obstacles.len(), 1);
        assert!(state.events.contains(&GameEvent::Removed { id: first_id }));

        advance(&mut state, BASE_SPEED);
        assert!(state.obstacles.iter().all(|o| o.id != first_id));
    }

    #[test]
    fn test_exactly_at_margin_is_kept() {
        // Trailing edge lands on -100 exactly
        let mut state = state_with(&[-135.0]);
        state.obstacles[0].passed = true;
        advance(&mut state, BASE_SPEED);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_fast_obstacle_scores_before_removal() {
        // Jumps from in front of the player straight past the cull line
        let mut state = state_with(&[200.0]);
        let report = advance(&mut state, 500.0);
        assert_eq!(report, MotionReport { passed: 1, removed: 1 });
        assert_eq!(state.score, SCORE_INCREMENT);
        assert!(state.obstacles.is_empty());
    }

    proptest! {
        #[test]
        fn prop_score_is_ten_per_obstacle(
            positions in prop::collection::vec(-200.0f32..900.0, 0..10),
            ticks in 1usize..300,
        ) {
            let mut state = state_with(&positions);
            let mut passes = 0u64;
            for _ in 0..ticks {
                passes += advance(&mut state, BASE_SPEED).passed as u64;
                prop_assert_eq!(state.score % SCORE_INCREMENT, 0);
            }
            prop_assert_eq!(state.score, passes * SCORE_INCREMENT);
            prop_assert!(passes <= positions.len() as u64);
        }
    }
}
