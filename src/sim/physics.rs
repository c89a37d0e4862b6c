//! Physics and motion integration
//!
//! One call per entity per frame: position advances by velocity, then the
//! kind-specific velocity/orientation profile applies. The pass reads and
//! writes only its own entity; trail particles go through the deferred
//! spawn queue, never into the registry directly.

use crate::core::types::Facing;
use crate::meta::kinds::KindId;
use crate::sim::entity::{Entity, SpawnRequest};
use crate::sim::EffectCtx;

// Per-kind motion profiles. These are identity constants of each spell,
// not match tuning; the shared humanoid values live in `Tuning`.
const FIREBALL_ACCEL: f64 = 0.15;
const FIREBALL_TRAIL_RATE: f64 = 0.05;
const ARC_GRAVITY: f64 = 0.3;
const ARC_AIR_RESISTANCE: f64 = 0.03;
const ROCKFALL_ACCEL: f64 = 1.2;
const ROCKFALL_SPIN: f64 = 2.0;
const DEBRIS_SPIN: f64 = 5.0;
const DARKEDGE_ACCEL_X: f64 = 0.4;
const DARKEDGE_ACCEL_Y: f64 = 0.1;
const DARKEDGE_TRAIL_RATE: f64 = 0.1;
const SPARK_TURN_CHANCE: f64 = 0.2;
const SPARK_DECAY: f64 = 0.1;

/// Unit step toward zero for a decaying velocity
fn toward_zero(v: f64) -> f64 {
    if v < 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Unit step away from zero for an accelerating velocity
fn away_from_zero(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Render angle in degrees from a velocity vector. Skipped entirely at
/// zero horizontal velocity so a degenerate division can never produce a
/// garbage angle.
fn velocity_angle(e: &mut Entity) {
    if e.xv != 0.0 {
        e.angle = (e.yv / e.xv).atan().to_degrees();
    }
}

/// Integrate one entity for one frame
pub fn integrate(e: &mut Entity, ctx: &mut EffectCtx) {
    e.x += e.xv;
    e.y += e.yv;

    match e.kind {
        KindId::Guy => {
            // Drag with a deadband snap so the walk cannot jitter around
            // zero, then gravity up to terminal velocity
            if e.xv.abs() <= ctx.tuning.drag_deadband {
                e.xv = 0.0;
            } else {
                e.xv += toward_zero(e.xv) * ctx.tuning.drag;
            }
            e.yv = (e.yv + ctx.tuning.gravity).min(ctx.tuning.terminal_velocity);
        }

        KindId::Fireball => {
            // Accelerates in its direction of travel and sheds a trail
            // proportional to speed, until it impacts
            if e.colliding == 0 {
                e.xv += away_from_zero(e.xv) * FIREBALL_ACCEL;

                if ctx.roll() <= e.xv.abs() * FIREBALL_TRAIL_RATE {
                    let x = e.x + if e.facing == Facing::Left { 15.0 } else { 0.0 };
                    let y = e.y + ctx.roll() * 8.0;
                    let mut xv =
                        e.facing.sign() * (e.xv - e.facing.sign() * 0.7).abs().min(5.0);
                    xv += ctx.roll() - 0.5;
                    let yv = ctx.roll() - 0.5;
                    let mut trail =
                        SpawnRequest::simple(KindId::FireballTrail, x, y, xv, yv, Facing::Right);
                    trail.lifetime = 10;
                    ctx.queue(trail);
                }
            }
            e.facing = Facing::from_x_velocity(e.xv);
        }

        KindId::Iceshock | KindId::IceshockShard => {
            // Ballistic arc with light air resistance; points along its
            // velocity vector
            if e.colliding == 0 {
                e.yv += ARC_GRAVITY;
            }
            e.xv += toward_zero(e.xv) * ARC_AIR_RESISTANCE;
            e.facing = Facing::from_x_velocity(e.xv);
            velocity_angle(e);
        }

        KindId::Rockfall => {
            // Drops only once its entry animation is done, spinning until
            // it hits something
            if e.colliding == 0 && e.spawning == 0 {
                e.yv += ROCKFALL_ACCEL;
            }
            e.facing = Facing::from_x_velocity(e.xv);
            e.angle += ROCKFALL_SPIN;
            if e.colliding > 0 {
                e.angle = 0.0;
            }
        }

        KindId::RockChunk | KindId::RockDust => {
            e.facing = Facing::from_x_velocity(e.xv);
            e.angle += DEBRIS_SPIN;
            e.yv += ARC_GRAVITY;
        }

        KindId::Darkedge => {
            // Slow hover during spawn, then accelerating flight with a
            // shadow trail
            if e.colliding == 0 && e.spawning == 0 {
                e.xv += away_from_zero(e.xv) * DARKEDGE_ACCEL_X;
                e.yv += DARKEDGE_ACCEL_Y;

                if ctx.roll() <= e.xv.abs() * DARKEDGE_TRAIL_RATE {
                    let x = e.x + if e.facing == Facing::Left { 60.0 } else { 0.0 };
                    let y = e.y + (ctx.roll() - 0.2) * 20.0;
                    let xv = 0.5 * e.xv + (ctx.roll() - 0.5) / 2.0;
                    let yv = 0.5 * e.yv + (ctx.roll() - 0.5) / 2.0;
                    let mut trail =
                        SpawnRequest::simple(KindId::DarkedgeTrail, x, y, xv, yv, Facing::Right);
                    trail.lifetime = 10;
                    ctx.queue(trail);
                }
            }
            e.facing = Facing::from_x_velocity(e.xv);
            velocity_angle(e);
        }

        KindId::DarkedgeTrail => {
            // Occasional random re-aim, otherwise coasts
            if ctx.roll() <= 0.05 {
                e.xv = (ctx.roll() - 0.5) / 2.0;
                e.yv = (ctx.roll() - 0.5) / 2.0;
            }
        }

        // The discharge holds its position; fireball trails keep their
        // spawn velocity
        KindId::Arcsurge | KindId::FireballTrail => {}

        KindId::ArcsurgeSpark => {
            // Sparks zigzag: occasionally swap their velocity axes, and
            // always bleed speed without falling
            if ctx.roll() <= SPARK_TURN_CHANCE {
                let flip = if ctx.roll() - 0.5 > 0.0 { 1.0 } else { -1.0 };
                let tmp = e.xv.abs() * flip;
                e.xv = e.yv;
                e.yv = tmp;
                e.xv += (ctx.roll() - 0.5) * 3.0;
            }
            e.xv += toward_zero(e.xv) * SPARK_DECAY;
            e.yv += toward_zero(e.yv) * SPARK_DECAY;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Tuning;
    use crate::meta::kinds::KindTable;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn run(e: &mut Entity, tuning: &Tuning, frames: u32) -> Vec<SpawnRequest> {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut spawns = Vec::new();
        for _ in 0..frames {
            let mut ctx = EffectCtx { tuning, rng: &mut rng, spawns: &mut spawns };
            integrate(e, &mut ctx);
        }
        spawns
    }

    fn entity(kind: KindId, xv: f64, yv: f64) -> Entity {
        let kinds = KindTable::load();
        SpawnRequest::simple(kind, 100.0, 100.0, xv, yv, Facing::Right).build(kinds.get(kind))
    }

    #[test]
    fn test_guy_reaches_terminal_velocity_and_stays() {
        let tuning = Tuning::default();
        let mut e = entity(KindId::Guy, 0.0, 0.0);
        run(&mut e, &tuning, 200);
        assert_eq!(e.yv, tuning.terminal_velocity);
        // One more frame never exceeds the cap
        run(&mut e, &tuning, 1);
        assert_eq!(e.yv, tuning.terminal_velocity);
    }

    #[test]
    fn test_guy_drag_snaps_to_zero_in_deadband() {
        let tuning = Tuning::default();
        let mut e = entity(KindId::Guy, 0.25, 0.0);
        run(&mut e, &tuning, 1);
        assert_eq!(e.xv, 0.0);

        // Above the deadband, drag decays without snapping
        let mut e = entity(KindId::Guy, 2.0, 0.0);
        run(&mut e, &tuning, 1);
        assert!((e.xv - 1.85).abs() < 1e-9);
    }

    #[test]
    fn test_position_advances_by_velocity() {
        let tuning = Tuning::default();
        let mut e = entity(KindId::FireballTrail, 2.0, -1.0);
        run(&mut e, &tuning, 1);
        assert_eq!(e.x, 102.0);
        assert_eq!(e.y, 99.0);
    }

    #[test]
    fn test_fireball_accelerates_and_faces_travel() {
        let tuning = Tuning::default();
        let mut e = entity(KindId::Fireball, -1.2, 0.0);
        e.facing = Facing::Left;
        run(&mut e, &tuning, 1);
        assert!((e.xv - -1.35).abs() < 1e-9);
        assert_eq!(e.facing, Facing::Left);
    }

    #[test]
    fn test_fireball_stops_accelerating_while_impacting() {
        let tuning = Tuning::default();
        let mut e = entity(KindId::Fireball, 1.2, 0.0);
        e.colliding = 20;
        let spawns = run(&mut e, &tuning, 5);
        assert_eq!(e.xv, 1.2);
        assert!(spawns.is_empty());
    }

    #[test]
    fn test_fireball_sheds_trail_particles() {
        let tuning = Tuning::default();
        let mut e = entity(KindId::Fireball, 6.0, 0.0);
        // Fast fireball: trail chance is |xv| * 0.05 per frame
        let spawns = run(&mut e, &tuning, 100);
        assert!(!spawns.is_empty());
        assert!(spawns.iter().all(|s| s.kind == KindId::FireballTrail && s.lifetime == 10));
    }

    #[test]
    fn test_rockfall_waits_for_spawn_animation() {
        let tuning = Tuning::default();
        let mut e = entity(KindId::Rockfall, 0.0, -1.0);
        e.spawning = 20;
        run(&mut e, &tuning, 1);
        assert_eq!(e.yv, -1.0);

        e.spawning = 0;
        run(&mut e, &tuning, 1);
        assert!((e.yv - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_rockfall_spins_until_impact() {
        let tuning = Tuning::default();
        let mut e = entity(KindId::Rockfall, 0.0, 0.0);
        run(&mut e, &tuning, 3);
        assert_eq!(e.angle, 6.0);
        e.colliding = 20;
        run(&mut e, &tuning, 1);
        assert_eq!(e.angle, 0.0);
    }

    #[test]
    fn test_arc_angle_guard_at_zero_x_velocity() {
        let tuning = Tuning::default();
        let mut e = entity(KindId::Iceshock, 0.03, 2.0);
        e.angle = 45.0;
        // One frame of air resistance brings xv exactly to zero; the
        // angle must hold rather than become NaN
        run(&mut e, &tuning, 1);
        assert_eq!(e.xv, 0.0);
        assert_eq!(e.angle, 45.0);
    }

    #[test]
    fn test_iceshock_arcs_downward() {
        let tuning = Tuning::default();
        let mut e = entity(KindId::Iceshock, 8.0, -4.0);
        run(&mut e, &tuning, 30);
        assert!(e.yv > 0.0);
        assert!(e.angle.is_finite());
    }
}
