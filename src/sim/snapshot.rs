//! Per-frame view of the game for renderers and the HUD

use serde::Serialize;

use super::collision::Rect;
use super::player::Player;
use super::state::{GamePhase, GameState, ObstacleSize};

/// One obstacle as a renderer needs it
#[derive(Debug, Clone, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    pub lane: u32,
    pub position: f32,
    pub size: ObstacleSize,
    pub rect: Rect,
}

/// Everything drawn for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    /// 0 outside the countdown
    pub countdown: u32,
    pub player: Player,
    pub player_rect: Rect,
    pub obstacles: Vec<ObstacleView>,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            high_score: self.high_score,
            countdown: self.countdown,
            player: self.player,
            player_rect: self.player.rect(&self.tuning),
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    lane: o.lane,
                    position: o.position,
                    size: o.size,
                    rect: o.rect(&self.tuning),
                })
                .collect(),
        }
    }
}
