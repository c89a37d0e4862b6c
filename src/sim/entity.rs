//! Live entity state
//!
//! An entity is one simulated object: a player character, a spell
//! projectile, or a decorative particle. Immutable per-kind stats live in
//! `meta::kinds`; everything here is per-instance and mutated every frame.

use crate::core::config::Tuning;
use crate::core::types::{Action, Facing, HitBox};
use crate::meta::kinds::{Category, KindId, KindInfo};
use crate::meta::spells::{SpellId, SPELL_COUNT};

/// Generation-checked reference to a registry slot
///
/// Stays valid until the entity in the slot is removed; a handle to a
/// removed entity simply stops resolving instead of aliasing a newcomer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// A currently live simulated object
#[derive(Debug, Clone)]
pub struct Entity {
    pub kind: KindId,

    // Kinematics
    pub x: f64,
    pub y: f64,
    pub xv: f64,
    pub yv: f64,
    pub facing: Facing,
    /// Render-only rotation in degrees
    pub angle: f64,

    // Lifecycle
    pub health: i32,
    /// Frames remaining in the entry animation
    pub spawning: u32,
    /// Frames remaining in hit-stun / impact animation
    pub colliding: u32,
    /// Frames remaining in a spell wind-up
    pub casting: u32,
    /// Hard expiry in frames; 0 = unbounded
    pub lifetime: u32,
    /// Per-spell cooldowns; empty for non-humanoids
    pub cooldowns: Vec<u32>,
    /// Spell currently winding up (meaningful while `casting > 0`)
    pub active_spell: SpellId,

    // Animation
    pub action: Action,
    pub action_changed: bool,
    /// Fractional sheet frame, advanced by sub-integer increments
    pub frame: f64,
}

impl Entity {
    pub fn center_x(&self, info: &KindInfo) -> f64 {
        self.x + info.width / 2.0
    }

    pub fn center_y(&self, info: &KindInfo) -> f64 {
        self.y + info.height / 2.0
    }

    /// Narrow-phase hitboxes for the direction currently faced
    pub fn bounds<'a>(&self, info: &'a KindInfo) -> &'a [HitBox] {
        info.bounds(self.facing)
    }

    pub fn is_humanoid(&self, info: &KindInfo) -> bool {
        info.category == Category::Humanoid
    }

    /// Clamped damage application; repeated hits at zero health are no-ops
    pub fn apply_damage(&mut self, power: i32) {
        self.health = (self.health - power).max(0);
    }

    pub fn stop(&mut self) {
        self.xv = 0.0;
        self.yv = 0.0;
    }

    /// Whether this entity should be unloaded this frame.
    ///
    /// Death is observed on the *final* frame of the collision or lifetime
    /// countdown (value 1, before the decrement to 0), so the impact
    /// animation always plays out.
    pub fn is_dead(&self, tuning: &Tuning) -> bool {
        // Far enough off the arena counts as dead
        if self.x < -tuning.despawn_margin_x
            || self.x > tuning.arena_width + tuning.despawn_margin_x
            || self.y <= -tuning.despawn_margin_top
            || self.y >= tuning.arena_height + tuning.despawn_margin_bottom
        {
            return true;
        }

        if self.health == 0 && self.colliding == 1 {
            return true;
        }

        self.lifetime == 1
    }

    /// Count down every active timer by one frame
    pub fn advance_timers(&mut self) {
        if self.casting > 0 {
            self.casting -= 1;
        }
        if self.spawning > 0 {
            self.spawning -= 1;
        }
        for cd in &mut self.cooldowns {
            if *cd > 0 {
                *cd -= 1;
            }
        }
        if self.colliding > 0 {
            self.colliding -= 1;
        }
        if self.lifetime > 0 {
            self.lifetime -= 1;
        }
    }
}

/// Everything needed to construct an entity, queued by physics and spell
/// launches and flushed into the registry between passes
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    pub kind: KindId,
    pub x: f64,
    pub y: f64,
    pub xv: f64,
    pub yv: f64,
    pub facing: Facing,
    pub angle: f64,
    pub spawning: u32,
    pub lifetime: u32,
}

impl SpawnRequest {
    /// Request with no entry animation, no expiry, and no rotation
    pub fn simple(kind: KindId, x: f64, y: f64, xv: f64, yv: f64, facing: Facing) -> Self {
        Self { kind, x, y, xv, yv, facing, angle: 0.0, spawning: 0, lifetime: 0 }
    }

    pub fn build(self, info: &KindInfo) -> Entity {
        debug_assert_eq!(info.id, self.kind);
        let cooldowns = match info.category {
            Category::Humanoid => vec![0; SPELL_COUNT],
            _ => Vec::new(),
        };
        Entity {
            kind: self.kind,
            x: self.x,
            y: self.y,
            xv: self.xv,
            yv: self.yv,
            facing: self.facing,
            angle: self.angle,
            health: info.max_health,
            spawning: self.spawning,
            colliding: 0,
            casting: 0,
            lifetime: self.lifetime,
            cooldowns,
            active_spell: SpellId::Fireball,
            action: Action::Spawn,
            action_changed: false,
            frame: info.frames.get(Action::Spawn).start as f64,
        }
    }
}
