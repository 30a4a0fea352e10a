//! Frame driver
//!
//! Owns the simulation, the pending input for the next frame, and the
//! persisted high score. Platform code feeds it input events and calls
//! [`Session::frame`] once per animation frame.

use crate::highscores::HighScore;
use crate::platform::Storage;
use crate::sim::{GameEvent, GameState, LaneDirection, Snapshot, TickInput, tick};
use crate::tuning::{Tuning, TuningError};

pub struct Session<S: Storage> {
    state: GameState,
    storage: S,
    high_score: HighScore,
    /// Input collected since the last frame
    input: TickInput,
}

impl<S: Storage> Session<S> {
    /// Create a session, reading the stored high score
    pub fn new(seed: u64, tuning: Tuning, storage: S) -> Result<Self, TuningError> {
        let mut state = GameState::with_tuning(seed, tuning)?;
        let high_score = HighScore::load(&storage);
        state.high_score = high_score.value();
        log::info!("Session created with seed {}", seed);
        Ok(Self {
            state,
            storage,
            high_score,
            input: TickInput::default(),
        })
    }

    /// Primary action (tap/click/space)
    pub fn press_primary(&mut self) {
        self.input.primary = true;
    }

    pub fn press_pause(&mut self) {
        self.input.pause = true;
    }

    pub fn request_move(&mut self, direction: LaneDirection) {
        self.input.move_lane = Some(direction);
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        if self.input.idle_mode != idle {
            log::info!("Idle mode: {}", idle);
        }
        self.input.idle_mode = idle;
    }

    pub fn idle_mode(&self) -> bool {
        self.input.idle_mode
    }

    /// Run one tick at `now_ms` and return what happened
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        tick(&mut self.state, &self.input, now_ms);

        // Clear one-shot inputs after processing
        self.input.primary = false;
        self.input.pause = false;
        self.input.move_lane = None;

        let events = self.state.drain_events();
        for event in &events {
            if let GameEvent::GameOver {
                score,
                new_high_score: true,
            } = *event
            {
                self.persist_high_score(score);
            }
        }
        events
    }

    fn persist_high_score(&mut self, score: u64) {
        if !self.high_score.submit(score) {
            return;
        }
        if let Err(e) = self.high_score.save(&mut self.storage) {
            log::warn!("Could not save high score: {}", e);
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::platform::{MemoryStorage, StorageError};
    use crate::sim::{GamePhase, Obstacle};

    fn storage_with(value: &str) -> MemoryStorage {
        let mut storage = MemoryStorage::new();
        storage.set_item(HighScore::STORAGE_KEY, value).unwrap();
        storage
    }

    /// Start a run and tick until the grace period is over
    fn run_to_live_play(session: &mut Session<impl Storage>, mut now: f64) -> f64 {
        session.press_primary();
        session.frame(now);
        while session.state().phase != GamePhase::Playing {
            now += FRAME_MS;
            session.frame(now);
        }
        now + INITIAL_DELAY_MS + 1.0
    }

    /// Score `score` points and crash into an obstacle on the next frame
    fn crash_with_score(session: &mut Session<impl Storage>, score: u64, now: f64) -> Vec<GameEvent> {
        let state = session.state_mut();
        state.score = score;
        let lane = state.player.lane;
        let id = state.next_entity_id();
        let x = state.tuning.player_x + state.speed;
        let obstacle = Obstacle::new(id, lane, x, 80.0, &state.tuning);
        state.obstacles.push(obstacle);
        session.frame(now)
    }

    #[test]
    fn test_loads_stored_high_score() {
        let session = Session::new(1, Tuning::default(), storage_with("120")).unwrap();
        assert_eq!(session.high_score(), 120);
        assert_eq!(session.state().high_score, 120);
    }

    #[test]
    fn test_corrupt_high_score_reads_zero() {
        let session = Session::new(1, Tuning::default(), storage_with("lots")).unwrap();
        assert_eq!(session.high_score(), 0);
    }

    #[test]
    fn test_new_high_score_is_persisted() {
        let mut session = Session::new(1, Tuning::default(), storage_with("50")).unwrap();
        let now = run_to_live_play(&mut session, 0.0);
        let events = crash_with_score(&mut session, 70, now);

        assert!(events.contains(&GameEvent::GameOver {
            score: 70,
            new_high_score: true
        }));
        assert_eq!(session.state().phase, GamePhase::Menu);
        assert_eq!(session.high_score(), 70);
        assert_eq!(
            session.storage().get_item(HighScore::STORAGE_KEY).as_deref(),
            Some("70")
        );
    }

    #[test]
    fn test_high_score_never_drops_across_runs() {
        let mut session = Session::new(1, Tuning::default(), MemoryStorage::new()).unwrap();
        let mut now = 0.0;
        let mut best = 0;
        for score in [30, 90, 40, 90, 120, 0] {
            now = run_to_live_play(&mut session, now + 10.0);
            crash_with_score(&mut session, score, now);
            best = best.max(score);
            assert_eq!(session.high_score(), best);
            assert_eq!(session.state().high_score, best);
        }
        assert_eq!(
            session.storage().get_item(HighScore::STORAGE_KEY).as_deref(),
            Some("120")
        );
    }

    #[test]
    fn test_one_shot_inputs_clear_after_frame() {
        let mut session = Session::new(1, Tuning::default(), MemoryStorage::new()).unwrap();
        session.press_primary();
        session.frame(0.0);
        assert_eq!(session.state().phase, GamePhase::Countdown);
        assert_eq!(session.state().countdown, 3);

        // A second frame without input must not restart the countdown
        session.frame(1000.0);
        assert_eq!(session.state().countdown, 2);
    }

    #[test]
    fn test_rejects_invalid_tuning() {
        let tuning = Tuning {
            lane_count: 0,
            ..Default::default()
        };
        let err = Session::new(1, tuning, MemoryStorage::new()).err().unwrap();
        assert!(matches!(err, TuningError::Invalid { field: "lane_count", .. }));
    }

    #[test]
    fn test_plays_with_custom_tuning() {
        let tuning = Tuning {
            lane_count: 5,
            base_speed: 8.0,
            ..Default::default()
        };
        let mut session = Session::new(1, tuning, MemoryStorage::new()).unwrap();
        let mut now = run_to_live_play(&mut session, 0.0);
        for _ in 0..60 {
            session.frame(now);
            now += FRAME_MS;
        }
        let state = session.state();
        assert!(!state.obstacles.is_empty());
        assert!(state.obstacles.iter().all(|o| o.lane < 5));
    }

    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        fn get_item(&self, _key: &str) -> Option<String> {
            None
        }

        fn set_item(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write {
                key: key.to_string(),
                reason: "read-only".to_string(),
            })
        }
    }

    #[test]
    fn test_storage_failure_keeps_playing() {
        let mut session = Session::new(1, Tuning::default(), ReadOnlyStorage).unwrap();
        let now = run_to_live_play(&mut session, 0.0);
        crash_with_score(&mut session, 20, now);
        assert_eq!(session.high_score(), 20);
        assert_eq!(session.state().phase, GamePhase::Menu);
    }
}
