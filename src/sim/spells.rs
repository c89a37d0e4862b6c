//! Spell launches and spell impacts
//!
//! A cast winds up on the caster (`casting` counts down); when the
//! countdown reaches the spell's launch frame the projectile pattern
//! actually spawns and the cooldown starts. Impacts are the other end of
//! a projectile's life: what happens when it hits terrain or a player.

use crate::core::types::{Facing, PlayerSide};
use crate::meta::kinds::{KindId, KindInfo, KindTable};
use crate::meta::spells::{SpellId, SpellTable};
use crate::sim::entity::{Entity, SpawnRequest};
use crate::sim::registry::Registry;
use crate::sim::EffectCtx;

// The rock drops from this far above its target
const ROCKFALL_DROP_HEIGHT: f64 = 250.0;
// Spawn x is clamped so the rock cannot appear inside the forest stage's
// tree columns
const ROCKFALL_MIN_X: f64 = 60.0;
const ROCKFALL_MAX_X: f64 = 964.0;
const ARCSURGE_RECOIL: f64 = 6.0;

/// Launch every spell whose wind-up has reached its launch frame.
/// Projectiles go through the deferred queue; the only direct entity
/// mutations are the caster's own cooldown and recoil.
pub fn launch_pending(
    registry: &mut Registry,
    kinds: &KindTable,
    spells: &SpellTable,
    ctx: &mut EffectCtx,
) {
    for side in [PlayerSide::P0, PlayerSide::P1] {
        let Some(handle) = registry.player(side) else { continue };

        // Opponent position snapshot, for targeted spells
        let target = registry
            .player(side.opponent())
            .and_then(|h| registry.get(h))
            .map(|o| (o.center_x(kinds.get(o.kind)), o.y));

        let Some(caster) = registry.get_mut(handle) else { continue };
        if caster.casting == 0 {
            continue;
        }
        let spell = *spells.get(caster.active_spell);
        if caster.casting != spell.launch_frame {
            continue;
        }

        caster.cooldowns[spell.id.index()] = spell.cooldown;
        tracing::debug!(?side, spell = ?spell.id, "spell launched");
        match spell.id {
            SpellId::Fireball => launch_fireball(caster, kinds, ctx),
            SpellId::Iceshock => launch_iceshock(caster, kinds, ctx),
            SpellId::Rockfall => launch_rockfall(kinds, target, ctx),
            SpellId::Darkedge => launch_darkedge(caster, ctx),
            SpellId::Arcsurge => launch_arcsurge(caster, kinds, ctx),
        }
    }
}

/// One projectile, fired level from hand height on the side faced
fn launch_fireball(caster: &Entity, kinds: &KindTable, ctx: &mut EffectCtx) {
    let caster_info = kinds.get(caster.kind);
    let fireball = kinds.get(KindId::Fireball);

    let x = match caster.facing {
        Facing::Right => caster.x + caster_info.width - 4.0,
        Facing::Left => caster.x - (fireball.width - 4.0),
    };
    let y = caster.y + 28.0;
    let xv = caster.facing.sign() * 1.2;
    ctx.queue(SpawnRequest::simple(KindId::Fireball, x, y, xv, 0.0, caster.facing));
}

/// Three missiles per direction at staggered heights and arcs, each with
/// four shard particles scattered around it
fn launch_iceshock(caster: &Entity, kinds: &KindTable, ctx: &mut EffectCtx) {
    let caster_info = kinds.get(caster.kind);
    for dir in [Facing::Left, Facing::Right] {
        for (x_dist, y_dist, x_speed, y_speed) in
            [(20.0, 0.0, 8.0, -4.0), (10.0, 10.0, 5.0, -5.0), (5.0, 20.0, 2.0, -6.0)]
        {
            let side = dir.sign();
            let angle = (y_speed / (side * x_speed)).atan().to_degrees();
            let x = side * x_dist + caster.x + caster_info.width / 4.0 - 3.0;
            let y = caster.y - y_dist;

            let mut missile =
                SpawnRequest::simple(KindId::Iceshock, x, y, side * x_speed, y_speed, dir);
            missile.angle = angle;
            ctx.queue(missile);

            for _ in 0..4 {
                let px = x + (ctx.roll() - 0.5) * 10.0;
                let py = y + (ctx.roll() - 0.5) * 10.0;
                let pxv = side * (x_speed * ctx.roll() + 2.0);
                let pyv = y_speed * ctx.roll() - x_speed;
                ctx.queue(SpawnRequest::simple(KindId::IceshockShard, px, py, pxv, pyv, dir));
            }
        }
    }
}

/// The rock materializes above the opponent's current position and hangs
/// there for its entry animation before dropping
fn launch_rockfall(kinds: &KindTable, target: Option<(f64, f64)>, ctx: &mut EffectCtx) {
    let Some((target_cx, target_y)) = target else { return };
    let rock = kinds.get(KindId::Rockfall);

    let x = (target_cx - rock.width / 2.0).clamp(ROCKFALL_MIN_X, ROCKFALL_MAX_X - rock.width);
    let y = target_y - ROCKFALL_DROP_HEIGHT;

    let mut request = SpawnRequest::simple(KindId::Rockfall, x, y, 0.0, -1.0, Facing::Right);
    request.spawning = 20;
    ctx.queue(request);
}

/// Four spears stacked above the caster, all creeping forward until their
/// entry animation ends and they accelerate
fn launch_darkedge(caster: &Entity, ctx: &mut EffectCtx) {
    let x = match caster.facing {
        Facing::Right => caster.x,
        Facing::Left => caster.x - 33.0,
    };
    let y = caster.y - 45.0;
    let xv = 0.1 * caster.facing.sign();
    let yv = 0.025;
    let angle = (yv / xv).atan().to_degrees();

    for i in 0..4 {
        let mut spear =
            SpawnRequest::simple(KindId::Darkedge, x, y - i as f64 * 45.0, xv, yv, caster.facing);
        spear.angle = angle;
        spear.spawning = 33;
        ctx.queue(spear);
    }
}

/// A stationary discharge flush against the caster's front, a burst of
/// thirty sparks out of its far edge, and recoil on the caster
fn launch_arcsurge(caster: &mut Entity, kinds: &KindTable, ctx: &mut EffectCtx) {
    let caster_info = kinds.get(caster.kind);
    let surge = kinds.get(KindId::Arcsurge);

    let x = match caster.facing {
        Facing::Right => caster.x + caster_info.width - 6.0,
        Facing::Left => caster.x - (surge.width - 6.0),
    };
    let y = caster.y - 1.0;

    caster.xv = -ARCSURGE_RECOIL * caster.facing.sign();

    let mut bolt = SpawnRequest::simple(KindId::Arcsurge, x, y, 0.0, 0.0, caster.facing);
    bolt.lifetime = 20;
    ctx.queue(bolt);

    let px = x + if caster.facing == Facing::Right { surge.width } else { 0.0 };
    let py = y + surge.height / 2.0;
    for _ in 0..30 {
        let top_speed = 5.0;
        let pxv = (1.0 + ctx.roll()) * 3.5 * caster.facing.sign();
        let pyv = (top_speed - pxv.abs()) * ((ctx.roll() - 0.5) * 2.0);
        let mut spark = SpawnRequest::simple(KindId::ArcsurgeSpark, px, py, pxv, pyv, caster.facing);
        spark.lifetime = (10.0 + ctx.roll() * 20.0) as u32;
        ctx.queue(spark);
    }
}

/// A spell hit something. Every spell dies in a damped impact animation;
/// the rock additionally bursts into debris, and the discharge ignores
/// contact entirely (it expires on its lifetime).
pub fn impact(e: &mut Entity, info: &KindInfo, ctx: &mut EffectCtx) {
    match e.kind {
        KindId::Arcsurge => {}
        KindId::Rockfall => {
            impact_generic(e, ctx);
            spawn_rock_debris(e, info, ctx);
        }
        _ => impact_generic(e, ctx),
    }
}

fn impact_generic(e: &mut Entity, ctx: &mut EffectCtx) {
    e.colliding = ctx.tuning.spell_impact_stun;
    e.health = 0;
    e.xv *= ctx.tuning.spell_impact_damping;
    e.yv *= ctx.tuning.spell_impact_damping;
}

/// Eight bursts of debris, half thrown left and half right, each one
/// large chunk plus two dust motes
fn spawn_rock_debris(e: &Entity, info: &KindInfo, ctx: &mut EffectCtx) {
    let cx = e.center_x(info);
    let cy = e.center_y(info);
    for i in 0..8 {
        let x_dir = if i < 4 { 1.0 } else { -1.0 };
        let xv = x_dir * e.yv;
        let yv = e.yv * -2.0;
        for kind in [KindId::RockChunk, KindId::RockDust, KindId::RockDust] {
            let x = cx + (ctx.roll() - 0.5) * 40.0;
            let spawn_xv = xv + x_dir * 5.0 * ctx.roll();
            let spawn_yv = yv - 7.0 * ctx.roll();
            ctx.queue(SpawnRequest::simple(
                kind,
                x,
                cy,
                spawn_xv,
                spawn_yv,
                Facing::Right,
            ));
        }
    }
}
