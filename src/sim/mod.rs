//! The per-frame simulation pipeline
//!
//! One fixed time-step per call, fully synchronous: physics, terrain
//! contact, entity collisions, spell launches, timers, unload, animation.

pub mod action;
pub mod ai;
pub mod collision;
pub mod entity;
pub mod physics;
pub mod registry;
pub mod spells;
pub mod terrain;
pub mod world;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::Tuning;
use crate::sim::entity::SpawnRequest;

/// Shared side-effect channel for per-entity passes
///
/// Physics, terrain response, and spell launches may roll the RNG and
/// request new entities, but never touch other live entities directly;
/// queued spawns are flushed into the registry between passes.
pub struct EffectCtx<'a> {
    pub tuning: &'a Tuning,
    pub rng: &'a mut ChaCha8Rng,
    pub spawns: &'a mut Vec<SpawnRequest>,
}

impl EffectCtx<'_> {
    /// Uniform sample in [0, 1)
    pub fn roll(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    pub fn queue(&mut self, request: SpawnRequest) {
        self.spawns.push(request);
    }
}
