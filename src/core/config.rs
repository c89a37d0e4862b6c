//! Simulation tuning with documented constants
//!
//! One consistent table of gameplay constants with documentation of how
//! the values interact. All gameplay-relevant magic numbers live here,
//! overridable from TOML.

use serde::Deserialize;

use crate::core::error::{DuelError, Result};

/// Tuning table for the simulation core
///
/// Changing these affects match pacing and feel; `validate` only rejects
/// combinations that break simulation invariants outright.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    // === ARENA ===
    /// Arena width in pixels; walls and despawn margins key off this
    pub arena_width: f64,
    /// Arena height in pixels
    pub arena_height: f64,

    /// Entities farther than this beyond the left/right arena edges are
    /// unloaded as dead
    pub despawn_margin_x: f64,
    /// Despawn margin above the arena (projectiles arc high)
    pub despawn_margin_top: f64,
    /// Despawn margin below the arena (short - there is nothing down there)
    pub despawn_margin_bottom: f64,

    // === HUMANOID MOVEMENT ===
    /// Downward acceleration per frame for gravity-affected kinds
    pub gravity: f64,
    /// Fall speed cap in units/frame
    ///
    /// Reached after terminal_velocity / gravity frames of free fall and
    /// never exceeded.
    pub terminal_velocity: f64,
    /// Walk acceleration per frame while grounded
    pub walk_accel_ground: f64,
    /// Walk acceleration per frame while airborne (less midair control)
    pub walk_accel_air: f64,
    /// Horizontal speed cap from walking
    pub walk_top_speed: f64,
    /// Per-frame horizontal velocity decay toward zero
    pub drag: f64,
    /// Below this speed the horizontal velocity snaps to exactly zero,
    /// so drag cannot oscillate around the origin
    pub drag_deadband: f64,
    /// Instantaneous upward velocity change on jump (negative is up)
    pub jump_impulse: f64,

    // === COLLISION RESPONSE ===
    /// Frames a humanoid spends in hit-stun after an entity collision
    pub impact_stun: u32,
    /// Horizontal knockback speed applied to a hit humanoid
    pub knockback_x: f64,
    /// Upward knockback speed applied to a hit humanoid
    pub knockback_y: f64,
    /// Frames a spell projectile spends in its impact animation
    pub spell_impact_stun: u32,
    /// Velocity multiplier when a spell impacts (near-stop, not reversal)
    pub spell_impact_damping: f64,
    /// Frames a particle lingers after touching terrain
    pub particle_impact_stun: u32,

    // === ANIMATION ===
    /// Base animation-frame increment per simulated frame
    ///
    /// State-specific multipliers (walk, airborne, impact, cast) scale
    /// this up; at 0.1 an un-scaled animation advances one sheet frame
    /// every ten simulated frames.
    pub base_frame_increment: f64,

    // === DEBUG ===
    /// Collapse every spell cooldown to zero at table-build time.
    /// A configuration switch, not a runtime branch.
    pub no_cooldowns: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: 1024.0,
            arena_height: 768.0,
            despawn_margin_x: 500.0,
            despawn_margin_top: 500.0,
            despawn_margin_bottom: 100.0,

            gravity: 0.5,
            terminal_velocity: 50.0,
            walk_accel_ground: 0.45,
            walk_accel_air: 0.35,
            walk_top_speed: 4.5,
            drag: 0.15,
            drag_deadband: 0.3,
            jump_impulse: -10.1,

            impact_stun: 20,
            knockback_x: 5.0,
            knockback_y: 3.0,
            spell_impact_stun: 20,
            spell_impact_damping: 0.05,
            particle_impact_stun: 2,

            base_frame_increment: 0.1,

            no_cooldowns: false,
        }
    }
}

impl Tuning {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a tuning table from TOML; unset keys fall back to defaults
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let tuning: Tuning = toml::from_str(s)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Validate the table for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.arena_width <= 0.0 || self.arena_height <= 0.0 {
            return Err(DuelError::InvalidTuning(
                "arena dimensions must be positive".into(),
            ));
        }

        // Gravity must pull down and terminal velocity must be reachable
        if self.gravity <= 0.0 || self.terminal_velocity < self.gravity {
            return Err(DuelError::InvalidTuning(format!(
                "gravity ({}) must be positive and <= terminal_velocity ({})",
                self.gravity, self.terminal_velocity
            )));
        }

        // The deadband must exceed one frame of drag or a humanoid can
        // straddle zero forever
        if self.drag_deadband < self.drag {
            return Err(DuelError::InvalidTuning(format!(
                "drag_deadband ({}) must be >= drag ({})",
                self.drag_deadband, self.drag
            )));
        }

        if self.jump_impulse >= 0.0 {
            return Err(DuelError::InvalidTuning(
                "jump_impulse must be negative (up is -y)".into(),
            ));
        }

        if self.walk_top_speed <= 0.0 || self.walk_accel_ground <= 0.0 {
            return Err(DuelError::InvalidTuning(
                "walk acceleration and top speed must be positive".into(),
            ));
        }

        if self.base_frame_increment <= 0.0 {
            return Err(DuelError::InvalidTuning(
                "base_frame_increment must be positive".into(),
            ));
        }

        // A death is only observable while the collision timer runs
        if self.impact_stun == 0 || self.spell_impact_stun == 0 || self.particle_impact_stun == 0 {
            return Err(DuelError::InvalidTuning(
                "impact stun durations must be at least one frame".into(),
            ));
        }

        Ok(())
    }
}
