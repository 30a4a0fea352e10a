//! Obstacle spawning policy

use rand::Rng;

use super::state::{GameEvent, GameState, Obstacle};

/// Spawn an obstacle off the right edge if the spacing rules allow it.
///
/// All must hold: the spawn interval has elapsed since the last spawn, the
/// newest obstacle has moved at least the minimum distance in from the right
/// edge, and the obstacle cap isn't reached. Returns the spawned obstacle.
pub fn maybe_spawn(now_ms: f64, state: &mut GameState) -> Option<Obstacle> {
    let tuning = &state.tuning;

    let interval_ok = state
        .last_spawn_ms
        .is_none_or(|last| now_ms - last > tuning.spawn_interval_ms);

    let distance_ok = state
        .obstacles
        .last()
        .is_none_or(|o| o.position < tuning.viewport_width - tuning.min_obstacle_distance);

    let room_ok = state.obstacles.len() < tuning.max_obstacles;

    if !(interval_ok && distance_ok && room_ok) {
        return None;
    }

    let lane = state.rng.random_range(0..tuning.lane_count);
    let height = state
        .rng
        .random_range(tuning.min_obstacle_size..=tuning.max_obstacle_size);
    let position = tuning.viewport_width;

    let id = state.next_entity_id();
    let obstacle = Obstacle::new(id, lane, position, height, &state.tuning);
    log::debug!(
        "Spawned obstacle {} in lane {} ({:.0}x{:.0})",
        id,
        lane,
        obstacle.size.width,
        obstacle.size.height
    );

    state.obstacles.push(obstacle.clone());
    state.last_spawn_ms = Some(now_ms);
    state.events.push(GameEvent::Spawned { id, lane });
    Some(obstacle)
}
