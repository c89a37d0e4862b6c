//! Inter-entity collision detection and response
//!
//! Two phases per pair: a cheap bounding-circle rejection, then the full
//! hitbox-array AABB test. Hits are collected against the frame's starting
//! state and applied afterwards, so the outcome never depends on slot
//! order; an entity already in hit-stun when its turn comes is skipped,
//! matching the eligibility rule used during detection.

use crate::core::types::Facing;
use crate::meta::kinds::{Category, KindId, KindInfo, KindTable};
use crate::sim::entity::{Entity, EntityHandle};
use crate::sim::registry::Registry;
use crate::sim::{spells, EffectCtx};

/// What the victim needs to know about whatever hit it
#[derive(Debug, Clone, Copy)]
struct HitSource {
    kind: KindId,
    power: i32,
    center_x: f64,
    facing: Facing,
}

fn eligible(e: &Entity, info: &KindInfo) -> bool {
    info.category != Category::Particle && e.colliding == 0 && e.spawning == 0
}

/// Broad phase: bounding circles around the sprite cells
fn circles_overlap(a: &Entity, ai: &KindInfo, b: &Entity, bi: &KindInfo) -> bool {
    let dx = a.center_x(ai) - b.center_x(bi);
    let dy = a.center_y(ai) - b.center_y(bi);
    let rad_sum = ai.radius + bi.radius;
    dx * dx + dy * dy < rad_sum * rad_sum
}

/// Narrow phase: every hitbox of one against every hitbox of the other,
/// each offset to its owner's position
fn boxes_overlap(a: &Entity, ai: &KindInfo, b: &Entity, bi: &KindInfo) -> bool {
    for box_a in a.bounds(ai) {
        let ax = box_a.x + a.x;
        let ay = box_a.y + a.y;
        for box_b in b.bounds(bi) {
            let bx = box_b.x + b.x;
            let by = box_b.y + b.y;
            if ax < bx + box_b.w && ax + box_a.w > bx && ay < by + box_b.h && ay + box_a.h > by {
                return true;
            }
        }
    }
    false
}

/// Detect and apply every entity-vs-entity collision for this frame
pub fn resolve(registry: &mut Registry, kinds: &KindTable, ctx: &mut EffectCtx) {
    let handles = registry.handles();

    // Detection against the pre-pass state
    let mut hits: Vec<(EntityHandle, EntityHandle)> = Vec::new();
    for (i, &ha) in handles.iter().enumerate() {
        let Some(a) = registry.get(ha) else { continue };
        let ai = kinds.get(a.kind);
        if !eligible(a, ai) {
            continue;
        }
        for &hb in &handles[i + 1..] {
            let Some(b) = registry.get(hb) else { continue };
            let bi = kinds.get(b.kind);
            if !eligible(b, bi) {
                continue;
            }
            // Players pass through each other
            if ai.category == Category::Humanoid && bi.category == Category::Humanoid {
                continue;
            }
            if circles_overlap(a, ai, b, bi) && boxes_overlap(a, ai, b, bi) {
                hits.push((ha, hb));
            }
        }
    }

    for (ha, hb) in hits {
        // An earlier hit this frame may have stunned either party
        let still_live = |registry: &Registry, h: EntityHandle| {
            registry.get(h).is_some_and(|e| eligible(e, kinds.get(e.kind)))
        };
        if !still_live(registry, ha) || !still_live(registry, hb) {
            continue;
        }

        let source_of = |registry: &Registry, h: EntityHandle| {
            registry.get(h).map(|e| {
                let info = kinds.get(e.kind);
                HitSource {
                    kind: e.kind,
                    power: info.power,
                    center_x: e.center_x(info),
                    facing: e.facing,
                }
            })
        };
        let (Some(src_a), Some(src_b)) = (source_of(registry, ha), source_of(registry, hb))
        else {
            continue;
        };

        tracing::trace!(a = ?src_a.kind, b = ?src_b.kind, "collision");
        if let Some(e) = registry.get_mut(ha) {
            apply_hit(e, kinds, src_b, ctx);
        }
        if let Some(e) = registry.get_mut(hb) {
            apply_hit(e, kinds, src_a, ctx);
        }
    }
}

/// Apply one side of a collision: damage always, then knockback and cast
/// interruption for humanoids or the impact handler for spells
fn apply_hit(e: &mut Entity, kinds: &KindTable, src: HitSource, ctx: &mut EffectCtx) {
    let info = kinds.get(e.kind);
    e.apply_damage(src.power);

    match info.category {
        Category::Humanoid => {
            // Knocked away from the hit. The discharge is the exception:
            // it always throws the victim in the direction it was cast.
            let direction = if src.kind == KindId::Arcsurge {
                -src.facing.sign()
            } else if src.center_x >= e.center_x(info) {
                1.0
            } else {
                -1.0
            };
            e.colliding = ctx.tuning.impact_stun;
            e.xv = -ctx.tuning.knockback_x * direction;
            e.yv = -ctx.tuning.knockback_y;
            e.casting = 0;
        }
        Category::Spell => spells::impact(e, info, ctx),
        Category::Particle => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Tuning;
    use crate::core::types::PlayerSide;
    use crate::sim::entity::SpawnRequest;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup() -> (Registry, KindTable, Tuning) {
        (Registry::new(), KindTable::load(), Tuning::default())
    }

    fn spawn(
        reg: &mut Registry,
        kinds: &KindTable,
        kind: KindId,
        x: f64,
        y: f64,
    ) -> EntityHandle {
        reg.spawn(kinds, SpawnRequest::simple(kind, x, y, 0.0, 0.0, Facing::Right))
    }

    fn run_resolve(reg: &mut Registry, kinds: &KindTable, tuning: &Tuning) {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut spawns = Vec::new();
        let mut ctx = EffectCtx { tuning, rng: &mut rng, spawns: &mut spawns };
        resolve(reg, kinds, &mut ctx);
    }

    #[test]
    fn test_fireball_hits_guy_both_ways() {
        let (mut reg, kinds, tuning) = setup();
        let guy = spawn(&mut reg, &kinds, KindId::Guy, 100.0, 190.0);
        // Overlapping the guy's torso hitbox
        let fb = spawn(&mut reg, &kinds, KindId::Fireball, 105.0, 220.0);
        run_resolve(&mut reg, &kinds, &tuning);

        let g = reg.get(guy).unwrap();
        assert_eq!(g.health, 100 - kinds.get(KindId::Fireball).power);
        assert_eq!(g.colliding, tuning.impact_stun);
        assert_eq!(g.yv, -tuning.knockback_y);

        // The fireball dies in its impact animation
        let f = reg.get(fb).unwrap();
        assert_eq!(f.health, 0);
        assert_eq!(f.colliding, tuning.spell_impact_stun);
    }

    #[test]
    fn test_knockback_pushes_away_from_hit() {
        let (mut reg, kinds, tuning) = setup();
        let guy = spawn(&mut reg, &kinds, KindId::Guy, 100.0, 190.0);
        // Projectile centered to the guy's right
        spawn(&mut reg, &kinds, KindId::Fireball, 110.0, 220.0);
        run_resolve(&mut reg, &kinds, &tuning);
        assert_eq!(reg.get(guy).unwrap().xv, -tuning.knockback_x);

        // And from the left, pushed right
        let (mut reg, kinds, tuning) = setup();
        let guy = spawn(&mut reg, &kinds, KindId::Guy, 100.0, 190.0);
        spawn(&mut reg, &kinds, KindId::Fireball, 95.0, 220.0);
        run_resolve(&mut reg, &kinds, &tuning);
        assert_eq!(reg.get(guy).unwrap().xv, tuning.knockback_x);
    }

    #[test]
    fn test_arcsurge_knockback_follows_cast_direction() {
        let (mut reg, kinds, tuning) = setup();
        let guy = spawn(&mut reg, &kinds, KindId::Guy, 100.0, 190.0);
        // Discharge cast rightwards from the guy's left: overlap puts its
        // center left of the guy, but the victim still flies right
        let surge = reg.spawn(
            &kinds,
            SpawnRequest::simple(KindId::Arcsurge, 20.0, 200.0, 0.0, 0.0, Facing::Right),
        );
        run_resolve(&mut reg, &kinds, &tuning);

        assert_eq!(reg.get(guy).unwrap().xv, tuning.knockback_x);
        // The discharge itself shrugs the contact off
        assert_eq!(reg.get(surge).unwrap().colliding, 0);
    }

    #[test]
    fn test_hit_interrupts_cast() {
        let (mut reg, kinds, tuning) = setup();
        let guy = spawn(&mut reg, &kinds, KindId::Guy, 100.0, 190.0);
        reg.get_mut(guy).unwrap().casting = 25;
        spawn(&mut reg, &kinds, KindId::Fireball, 105.0, 220.0);
        run_resolve(&mut reg, &kinds, &tuning);
        assert_eq!(reg.get(guy).unwrap().casting, 0);
    }

    #[test]
    fn test_humanoids_pass_through_each_other() {
        let (mut reg, kinds, tuning) = setup();
        let a = spawn(&mut reg, &kinds, KindId::Guy, 100.0, 190.0);
        let b = spawn(&mut reg, &kinds, KindId::Guy, 102.0, 190.0);
        run_resolve(&mut reg, &kinds, &tuning);
        assert_eq!(reg.get(a).unwrap().health, 100);
        assert_eq!(reg.get(b).unwrap().health, 100);
        assert_eq!(reg.player(PlayerSide::P0), Some(a));
    }

    #[test]
    fn test_particles_never_interact() {
        let (mut reg, kinds, tuning) = setup();
        let guy = spawn(&mut reg, &kinds, KindId::Guy, 100.0, 190.0);
        spawn(&mut reg, &kinds, KindId::FireballTrail, 105.0, 220.0);
        run_resolve(&mut reg, &kinds, &tuning);
        assert_eq!(reg.get(guy).unwrap().health, 100);
        assert_eq!(reg.get(guy).unwrap().colliding, 0);
    }

    #[test]
    fn test_spawning_and_stunned_entities_are_immune() {
        let (mut reg, kinds, tuning) = setup();
        let guy = spawn(&mut reg, &kinds, KindId::Guy, 100.0, 190.0);
        let fb = spawn(&mut reg, &kinds, KindId::Fireball, 105.0, 220.0);
        reg.get_mut(fb).unwrap().spawning = 10;
        run_resolve(&mut reg, &kinds, &tuning);
        assert_eq!(reg.get(guy).unwrap().health, 100);

        reg.get_mut(fb).unwrap().spawning = 0;
        reg.get_mut(guy).unwrap().colliding = 5;
        run_resolve(&mut reg, &kinds, &tuning);
        assert_eq!(reg.get(guy).unwrap().health, 100);
        assert_eq!(reg.get(fb).unwrap().health, 1);
    }

    #[test]
    fn test_one_hit_per_frame() {
        let (mut reg, kinds, tuning) = setup();
        let guy = spawn(&mut reg, &kinds, KindId::Guy, 100.0, 190.0);
        // Two projectiles overlapping the same guy: the first hit stuns
        // him, so the second pair is dropped at apply time
        spawn(&mut reg, &kinds, KindId::Fireball, 105.0, 220.0);
        let other = spawn(&mut reg, &kinds, KindId::Fireball, 107.0, 222.0);
        run_resolve(&mut reg, &kinds, &tuning);

        let g = reg.get(guy).unwrap();
        assert_eq!(g.health, 100 - kinds.get(KindId::Fireball).power);
        // The second projectile flies on
        assert_eq!(reg.get(other).unwrap().health, 1);
    }

    #[test]
    fn test_distant_entities_do_not_interact() {
        let (mut reg, kinds, tuning) = setup();
        let guy = spawn(&mut reg, &kinds, KindId::Guy, 100.0, 190.0);
        spawn(&mut reg, &kinds, KindId::Fireball, 600.0, 220.0);
        run_resolve(&mut reg, &kinds, &tuning);
        assert_eq!(reg.get(guy).unwrap().health, 100);
    }

    #[test]
    fn test_circle_overlap_is_symmetric() {
        let (_, kinds, _) = setup();
        let a = SpawnRequest::simple(KindId::Guy, 100.0, 190.0, 0.0, 0.0, Facing::Right)
            .build(kinds.get(KindId::Guy));
        let b = SpawnRequest::simple(KindId::Fireball, 110.0, 200.0, 0.0, 0.0, Facing::Right)
            .build(kinds.get(KindId::Fireball));
        let ai = kinds.get(KindId::Guy);
        let bi = kinds.get(KindId::Fireball);
        assert_eq!(circles_overlap(&a, ai, &b, bi), circles_overlap(&b, bi, &a, ai));
    }
}
