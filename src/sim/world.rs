//! Match state and the per-frame pipeline
//!
//! `World` owns the tables, the registry, the RNG, and the deferred spawn
//! queue, and drives one fixed-step frame per `step` call. Player input
//! arrives as intents (`walk`, `jump`, `cast`) before the step; each
//! returns whether it was accepted.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::Tuning;
use crate::core::error::Result;
use crate::core::types::{Action, Facing, PlayerSide, Tick};
use crate::meta::kinds::{KindId, KindTable};
use crate::meta::spells::{SpellId, SpellTable, SPELL_COUNT};
use crate::sim::entity::{EntityHandle, SpawnRequest};
use crate::sim::registry::{MatchSignal, Registry};
use crate::sim::terrain::Terrain;
use crate::sim::{action, collision, physics, spells, terrain, EffectCtx};
use crate::stage::Stage;

/// Everything the renderer needs to draw one entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Sheet row y-offset and integral cell index
    pub sheet_row: u32,
    pub frame: u32,
    pub angle: f64,
    pub facing: Facing,
}

/// One running match
pub struct World {
    tuning: Tuning,
    kinds: KindTable,
    spells: SpellTable,
    registry: Registry,
    rng: ChaCha8Rng,
    spawn_queue: Vec<SpawnRequest>,
    frame: Tick,
}

impl World {
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self> {
        tuning.validate()?;
        let spells = SpellTable::load(&tuning);
        Ok(Self {
            kinds: KindTable::load(),
            spells,
            registry: Registry::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            spawn_queue: Vec::new(),
            frame: 0,
            tuning,
        })
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn kinds(&self) -> &KindTable {
        &self.kinds
    }

    pub fn spells(&self) -> &SpellTable {
        &self.spells
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn frame(&self) -> Tick {
        self.frame
    }

    pub(crate) fn roll(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    pub fn spawn(&mut self, request: SpawnRequest) -> EntityHandle {
        self.registry.spawn(&self.kinds, request)
    }

    /// Put both combatants at a stage's starting positions, facing each
    /// other
    pub fn spawn_players(&mut self, stage: &Stage) {
        for (i, start) in stage.starts.iter().enumerate() {
            let facing = if i == 0 { Facing::Right } else { Facing::Left };
            self.spawn(SpawnRequest::simple(KindId::Guy, start.x, start.y, 0.0, 0.0, facing));
        }
    }

    /// Restore one combatant to a fresh match state at the given position
    pub fn reset_player(&mut self, side: PlayerSide, x: f64, y: f64) {
        let Some(handle) = self.registry.player(side) else { return };
        let max_health = self.kinds.get(KindId::Guy).max_health;
        let Some(guy) = self.registry.get_mut(handle) else { return };
        guy.health = max_health;
        guy.cooldowns.iter_mut().for_each(|cd| *cd = 0);
        guy.casting = 0;
        guy.colliding = 0;
        guy.x = x;
        guy.y = y;
        guy.stop();
        guy.facing = if side == PlayerSide::P0 { Facing::Right } else { Facing::Left };
    }

    /// Restore both combatants to a stage's starting positions for a
    /// rematch
    pub fn reset_players(&mut self, stage: &Stage) {
        for (i, start) in stage.starts.iter().enumerate() {
            let side = if i == 0 { PlayerSide::P0 } else { PlayerSide::P1 };
            self.reset_player(side, start.x, start.y);
        }
    }

    /// Advance the match by one frame
    pub fn step(&mut self, terrain: &Terrain) -> MatchSignal {
        let handles = self.registry.handles();

        // Physics
        {
            let mut ctx = EffectCtx {
                tuning: &self.tuning,
                rng: &mut self.rng,
                spawns: &mut self.spawn_queue,
            };
            for &h in &handles {
                if let Some(e) = self.registry.get_mut(h) {
                    physics::integrate(e, &mut ctx);
                }
            }
        }
        self.flush_spawns();

        // Terrain contact
        {
            let mut ctx = EffectCtx {
                tuning: &self.tuning,
                rng: &mut self.rng,
                spawns: &mut self.spawn_queue,
            };
            for &h in &handles {
                if let Some(e) = self.registry.get_mut(h) {
                    let info = self.kinds.get(e.kind);
                    terrain::resolve(e, info, terrain, &mut ctx);
                }
            }
        }
        self.flush_spawns();

        // Entity-vs-entity collisions
        {
            let mut ctx = EffectCtx {
                tuning: &self.tuning,
                rng: &mut self.rng,
                spawns: &mut self.spawn_queue,
            };
            collision::resolve(&mut self.registry, &self.kinds, &mut ctx);
        }
        self.flush_spawns();

        // Spell launches
        {
            let mut ctx = EffectCtx {
                tuning: &self.tuning,
                rng: &mut self.rng,
                spawns: &mut self.spawn_queue,
            };
            spells::launch_pending(&mut self.registry, &self.kinds, &self.spells, &mut ctx);
        }
        self.flush_spawns();

        // Timers, unload, animation
        for &h in &self.registry.handles() {
            if let Some(e) = self.registry.get_mut(h) {
                e.advance_timers();
            }
        }
        let signal = self.registry.unload(&self.tuning);
        for &h in &self.registry.handles() {
            if let Some(e) = self.registry.get_mut(h) {
                let info = self.kinds.get(e.kind);
                action::update(e, info, &self.spells, &self.tuning);
            }
        }

        self.frame += 1;
        signal
    }

    fn flush_spawns(&mut self) {
        for request in std::mem::take(&mut self.spawn_queue) {
            self.registry.spawn(&self.kinds, request);
        }
    }

    /// Attempt to walk one combatant. Rejected mid-cast or in hit-stun;
    /// air control is allowed at a reduced rate.
    pub fn walk(&mut self, side: PlayerSide, direction: Facing) -> bool {
        let Some(handle) = self.registry.player(side) else { return false };
        let accel_ground = self.tuning.walk_accel_ground;
        let accel_air = self.tuning.walk_accel_air;
        let top = self.tuning.walk_top_speed;

        let Some(guy) = self.registry.get_mut(handle) else { return false };
        if guy.casting > 0 || guy.colliding > 0 {
            return false;
        }
        let accel = if guy.yv != 0.0 { accel_air } else { accel_ground };
        match direction {
            Facing::Left => guy.xv = (guy.xv - accel).max(-top),
            Facing::Right => guy.xv = (guy.xv + accel).min(top),
        }
        guy.facing = direction;
        true
    }

    /// Attempt to jump. Rejected mid-cast, in hit-stun, or already
    /// airborne.
    pub fn jump(&mut self, side: PlayerSide) -> bool {
        let Some(handle) = self.registry.player(side) else { return false };
        let impulse = self.tuning.jump_impulse;
        let Some(guy) = self.registry.get_mut(handle) else { return false };
        if guy.casting > 0 || guy.colliding > 0 || guy.action == Action::Jump {
            return false;
        }
        guy.yv += impulse;
        true
    }

    /// Attempt to start a spell cast. Rejected mid-cast, in hit-stun,
    /// airborne, or while the spell is on cooldown.
    pub fn cast(&mut self, side: PlayerSide, spell: SpellId) -> bool {
        let Some(handle) = self.registry.player(side) else { return false };
        let opponent_x = self
            .registry
            .player(side.opponent())
            .and_then(|h| self.registry.get(h))
            .map(|o| o.x);
        let cast_duration = self.spells.get(spell).cast_duration;

        let Some(guy) = self.registry.get_mut(handle) else { return false };
        if guy.casting > 0
            || guy.colliding > 0
            || guy.action == Action::Jump
            || guy.cooldowns[spell.index()] > 0
        {
            return false;
        }
        guy.casting = cast_duration;
        guy.active_spell = spell;

        // The drop targets the opponent, so the caster turns toward them
        if spell == SpellId::Rockfall {
            if let Some(ox) = opponent_x {
                guy.facing = if guy.x <= ox { Facing::Right } else { Facing::Left };
            }
        }
        tracing::debug!(?side, ?spell, "cast started");
        true
    }

    /// Remaining health of one combatant; 0 before they spawn
    pub fn health(&self, side: PlayerSide) -> i32 {
        self.registry
            .player(side)
            .and_then(|h| self.registry.get(h))
            .map_or(0, |guy| guy.health)
    }

    /// Remaining cooldown of each spell as a fraction of its full
    /// duration, for interface bars
    pub fn cooldown_fractions(&self, side: PlayerSide) -> [f64; SPELL_COUNT] {
        let mut fractions = [0.0; SPELL_COUNT];
        let Some(guy) = self.registry.player(side).and_then(|h| self.registry.get(h)) else {
            return fractions;
        };
        for spell in SpellId::ALL {
            let full = self.spells.get(spell).cooldown;
            if full > 0 {
                fractions[spell.index()] = guy.cooldowns[spell.index()] as f64 / full as f64;
            }
        }
        fractions
    }

    /// Draw list for the current frame, in slot order
    pub fn sprite_frames(&self) -> Vec<SpriteFrame> {
        self.registry
            .iter()
            .map(|(_, e)| {
                let info = self.kinds.get(e.kind);
                SpriteFrame {
                    x: e.x,
                    y: e.y,
                    width: info.width,
                    height: info.height,
                    sheet_row: info.sheet_row,
                    frame: e.frame as u32,
                    angle: e.angle,
                    facing: e.facing,
                }
            })
            .collect()
    }
}
