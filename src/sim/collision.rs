//! Collision detection for axis-aligned rectangles
//!
//! Screen coordinates: x grows right, y grows down. A tolerance shrinks both
//! rectangles on every side so grazing contacts don't end the run.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::GameState;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(left, top),
            max: Vec2::new(left + width, top + height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Check whether two rectangles overlap once each is shrunk by `tolerance`.
///
/// They collide unless separated along at least one axis.
pub fn collides(a: Rect, b: Rect, tolerance: f32) -> bool {
    let separated = a.right() - tolerance < b.left() + tolerance
        || a.left() + tolerance > b.right() - tolerance
        || a.bottom() - tolerance < b.top() + tolerance
        || a.top() + tolerance > b.bottom() - tolerance;
    !separated
}

/// Check the player against every obstacle in spawn order.
///
/// Stops at the first hit; returns true when the run is over.
pub fn check_all(state: &GameState) -> bool {
    let player_rect = state.player.rect(&state.tuning);
    let tolerance = state.tuning.collision_tolerance;

    state
        .obstacles
        .iter()
        .any(|obstacle| collides(player_rect, obstacle.rect(&state.tuning), tolerance))
}
