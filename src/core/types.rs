//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Game frame counter (simulation time unit)
pub type Tick = u64;

/// Horizontal direction an entity faces or moves in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// -1.0 for left, +1.0 for right
    pub fn sign(self) -> f64 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    /// Facing derived from an x-velocity sign; zero counts as right
    pub fn from_x_velocity(xv: f64) -> Self {
        if xv >= 0.0 {
            Facing::Right
        } else {
            Facing::Left
        }
    }
}

/// One of the two combatants in a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSide {
    P0,
    P1,
}

impl PlayerSide {
    pub fn index(self) -> usize {
        match self {
            PlayerSide::P0 => 0,
            PlayerSide::P1 => 1,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            PlayerSide::P0 => PlayerSide::P1,
            PlayerSide::P1 => PlayerSide::P0,
        }
    }
}

/// Axis-aligned collision rectangle, relative to an entity's origin
/// (upper-left corner of its sprite cell)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl HitBox {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// The same box reflected across the vertical centerline of a sprite
    /// cell of the given width. Width, height, and y do not change.
    pub fn mirrored(&self, cell_width: f64) -> Self {
        let box_center = self.x + self.w / 2.0;
        let translation = 2.0 * (cell_width / 2.0 - box_center);
        Self { x: self.x + translation, ..*self }
    }
}

/// Discrete action state an entity is in for one frame.
///
/// Cast states are one-per-spell because each spell has its own wind-up
/// animation section on the sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Spawn,
    Move,
    Collide,
    Idle,
    Jump,
    Die,
    CastFireball,
    CastIceshock,
    CastRockfall,
    CastDarkedge,
    CastArcsurge,
}

pub const ACTION_COUNT: usize = 11;

impl Action {
    pub fn index(self) -> usize {
        match self {
            Action::Spawn => 0,
            Action::Move => 1,
            Action::Collide => 2,
            Action::Idle => 3,
            Action::Jump => 4,
            Action::Die => 5,
            Action::CastFireball => 6,
            Action::CastIceshock => 7,
            Action::CastRockfall => 8,
            Action::CastDarkedge => 9,
            Action::CastArcsurge => 10,
        }
    }

    pub fn is_cast(self) -> bool {
        matches!(
            self,
            Action::CastFireball
                | Action::CastIceshock
                | Action::CastRockfall
                | Action::CastDarkedge
                | Action::CastArcsurge
        )
    }
}
