//! Terrain collision - platforms, walls, and the ground
//!
//! Stage geometry is consumed as input: a platform list (index 0 is the
//! ground by convention) and a wall list. Contact response differs per
//! entity category: humanoids stop and snap, spells detonate, particles
//! die on the spot.

use crate::meta::kinds::{Category, KindInfo};
use crate::sim::entity::Entity;
use crate::sim::{spells, EffectCtx};

/// Horizontal surface an entity can land on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    /// Surface height
    pub y: f64,
    pub x_left: f64,
    pub x_right: f64,
}

/// Vertical barrier entities cannot pass through
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub x: f64,
    pub y_top: f64,
    pub y_bottom: f64,
}

/// Stage geometry for one arena
#[derive(Debug, Clone, Default)]
pub struct Terrain {
    /// `platforms[0]` is the ground
    pub platforms: Vec<Platform>,
    pub walls: Vec<Wall>,
}

impl Terrain {
    pub fn ground(&self) -> Option<&Platform> {
        self.platforms.first()
    }
}

/// Corrected x-position if the entity overlaps any wall, pushed out on
/// the nearer side
pub fn touching_wall(e: &Entity, info: &KindInfo, terrain: &Terrain) -> Option<f64> {
    for wall in &terrain.walls {
        let overlaps_x = wall.x < e.x + info.width && wall.x > e.x;
        let overlaps_y = wall.y_top < e.y + info.height && wall.y_bottom > e.y;
        if overlaps_x && overlaps_y {
            let corrected = if (wall.x - e.x).abs() < (wall.x - (e.x + info.width)).abs() {
                wall.x
            } else {
                wall.x - info.width
            };
            return Some(corrected);
        }
    }
    None
}

/// Snapped y-position if the entity is landing on any platform this
/// frame: falling (or resting), foot within one frame's fall distance of
/// the surface, and horizontal center inside the span
pub fn on_platform(e: &Entity, info: &KindInfo, terrain: &Terrain) -> Option<f64> {
    let middle = e.center_x(info);
    let foot = e.y + info.height;
    for p in &terrain.platforms {
        if e.yv >= 0.0
            && (p.y - foot).abs() <= e.yv.abs()
            && middle > p.x_left
            && middle < p.x_right
        {
            return Some(p.y - info.height);
        }
    }
    None
}

/// Simpler resting test against the ground only, with no velocity gate.
/// Used by spells and particles, which detonate rather than land.
pub fn on_ground(e: &Entity, info: &KindInfo, terrain: &Terrain) -> bool {
    let Some(ground) = terrain.ground() else {
        return false;
    };
    let middle = e.center_x(info);
    e.y + info.height >= ground.y && middle > ground.x_left && middle < ground.x_right
}

/// Resolve one entity's terrain contact for this frame
pub fn resolve(e: &mut Entity, info: &KindInfo, terrain: &Terrain, ctx: &mut EffectCtx) {
    let wall = touching_wall(e, info, terrain);

    match info.category {
        Category::Humanoid => {
            if let Some(x) = wall {
                e.xv = 0.0;
                e.x = x;
            }
            if let Some(y) = on_platform(e, info, terrain) {
                e.yv = 0.0;
                e.y = y;
            }
        }

        Category::Spell => {
            // First contact only: an impacting or still-spawning spell
            // does not re-trigger
            if e.colliding == 0
                && e.spawning == 0
                && (on_ground(e, info, terrain) || wall.is_some())
            {
                spells::impact(e, info, ctx);
            }
        }

        Category::Particle => {
            if e.colliding == 0 && (on_ground(e, info, terrain) || wall.is_some()) {
                e.health = 0;
                e.colliding = ctx.tuning.particle_impact_stun;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Tuning;
    use crate::core::types::Facing;
    use crate::meta::kinds::{KindId, KindTable};
    use crate::sim::entity::SpawnRequest;
    use crate::sim::physics;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn flat_ground() -> Terrain {
        Terrain {
            platforms: vec![Platform { y: 660.0, x_left: 0.0, x_right: 1024.0 }],
            walls: vec![
                Wall { x: 60.0, y_top: 0.0, y_bottom: 768.0 },
                Wall { x: 964.0, y_top: 0.0, y_bottom: 768.0 },
            ],
        }
    }

    fn entity(kind: KindId, x: f64, y: f64) -> Entity {
        let kinds = KindTable::load();
        SpawnRequest::simple(kind, x, y, 0.0, 0.0, Facing::Right).build(kinds.get(kind))
    }

    fn resolve_once(e: &mut Entity, terrain: &Terrain) {
        let kinds = KindTable::load();
        let tuning = Tuning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut spawns = Vec::new();
        let mut ctx = EffectCtx { tuning: &tuning, rng: &mut rng, spawns: &mut spawns };
        let info = kinds.get(e.kind).clone();
        resolve(e, &info, terrain, &mut ctx);
    }

    #[test]
    fn test_resting_on_platform_has_no_drift() {
        let terrain = flat_ground();
        let kinds = KindTable::load();
        let tuning = Tuning::default();
        let guy_h = kinds.get(KindId::Guy).height;

        // Standing exactly on the ground with zero vertical velocity
        let mut e = entity(KindId::Guy, 500.0, 660.0 - guy_h);
        let rest_y = e.y;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut spawns = Vec::new();
        let info = kinds.get(KindId::Guy).clone();
        for _ in 0..10 {
            let mut ctx = EffectCtx { tuning: &tuning, rng: &mut rng, spawns: &mut spawns };
            physics::integrate(&mut e, &mut ctx);
            resolve(&mut e, &info, &terrain, &mut ctx);
        }
        assert_eq!(e.y, rest_y);
        assert_eq!(e.yv, 0.0);
    }

    #[test]
    fn test_falling_guy_lands_and_snaps() {
        let terrain = flat_ground();
        let kinds = KindTable::load();
        let guy_h = kinds.get(KindId::Guy).height;
        let mut e = entity(KindId::Guy, 500.0, 660.0 - guy_h - 3.0);
        e.yv = 5.0;
        resolve_once(&mut e, &terrain);
        assert_eq!(e.y, 660.0 - guy_h);
        assert_eq!(e.yv, 0.0);
    }

    #[test]
    fn test_rising_guy_passes_through_platform() {
        let terrain = flat_ground();
        let kinds = KindTable::load();
        let guy_h = kinds.get(KindId::Guy).height;
        let mut e = entity(KindId::Guy, 500.0, 660.0 - guy_h - 3.0);
        e.yv = -8.0;
        resolve_once(&mut e, &terrain);
        assert_eq!(e.yv, -8.0);
    }

    #[test]
    fn test_wall_pushes_to_nearer_side() {
        let terrain = flat_ground();
        // Guy barely overlapping the left wall from the right: pushed
        // flush to the wall face
        let mut e = entity(KindId::Guy, 55.0, 300.0);
        e.xv = -2.0;
        resolve_once(&mut e, &terrain);
        assert_eq!(e.x, 60.0);
        assert_eq!(e.xv, 0.0);

        // Approaching from the left: pushed back by own width
        let mut e = entity(KindId::Guy, 945.0, 300.0);
        e.xv = 2.0;
        resolve_once(&mut e, &terrain);
        assert_eq!(e.x, 964.0 - 28.0);
        assert_eq!(e.xv, 0.0);
    }

    #[test]
    fn test_spell_detonates_on_ground_contact() {
        let terrain = flat_ground();
        let tuning = Tuning::default();
        let mut e = entity(KindId::Fireball, 500.0, 655.0);
        e.xv = 4.0;
        resolve_once(&mut e, &terrain);
        assert_eq!(e.health, 0);
        assert_eq!(e.colliding, tuning.spell_impact_stun);
        assert!((e.xv - 4.0 * tuning.spell_impact_damping).abs() < 1e-9);

        // Second resolve is a no-op while the impact plays out
        let xv = e.xv;
        resolve_once(&mut e, &terrain);
        assert_eq!(e.xv, xv);
    }

    #[test]
    fn test_spawning_spell_ignores_terrain() {
        let terrain = flat_ground();
        let mut e = entity(KindId::Rockfall, 500.0, 640.0);
        e.spawning = 20;
        resolve_once(&mut e, &terrain);
        assert_eq!(e.health, 1);
        assert_eq!(e.colliding, 0);
    }

    #[test]
    fn test_particle_dies_on_terrain_contact() {
        let terrain = flat_ground();
        let tuning = Tuning::default();
        let mut e = entity(KindId::FireballTrail, 500.0, 658.0);
        resolve_once(&mut e, &terrain);
        assert_eq!(e.health, 0);
        assert_eq!(e.colliding, tuning.particle_impact_stun);
    }

    #[test]
    fn test_center_outside_platform_span_falls() {
        let terrain = Terrain {
            platforms: vec![Platform { y: 250.0, x_left: 300.0, x_right: 400.0 }],
            walls: Vec::new(),
        };
        let kinds = KindTable::load();
        let guy_h = kinds.get(KindId::Guy).height;
        let mut e = entity(KindId::Guy, 100.0, 250.0 - guy_h);
        e.yv = 1.0;
        resolve_once(&mut e, &terrain);
        assert_eq!(e.yv, 1.0);
    }
}
