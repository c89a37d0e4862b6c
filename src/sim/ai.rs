//! Computer-controlled opponent
//!
//! The CPU uses the same intent interface a human does: close to within
//! a comfortable distance, face the opponent while idle, and
//! occasionally jump or throw out a random spell.

use crate::core::types::{Action, Facing, PlayerSide};
use crate::meta::spells::{SpellId, SPELL_COUNT};
use crate::sim::world::World;

/// Minimum separation the CPU tries to keep closing
const ENGAGE_DISTANCE: f64 = 150.0;
const JUMP_CHANCE: f64 = 0.003;
const CAST_CHANCE: f64 = 0.015;

/// Decide and issue one side's intents for this frame
pub fn take_cpu_action(world: &mut World, cpu: PlayerSide) {
    let player = cpu.opponent();

    let positions = world.registry().player(player).zip(world.registry().player(cpu));
    let Some((player_handle, cpu_handle)) = positions else { return };
    let Some(player_x) = world.registry().get(player_handle).map(|e| e.x) else { return };
    let Some((cpu_x, cpu_action)) =
        world.registry().get(cpu_handle).map(|e| (e.x, e.action))
    else {
        return;
    };

    let towards_player = if cpu_x < player_x { Facing::Right } else { Facing::Left };

    // Close the gap, but keep some spacing
    if (cpu_x - player_x).abs() >= ENGAGE_DISTANCE {
        world.walk(cpu, towards_player);
    }

    // Face the player while standing around
    if cpu_action == Action::Idle {
        if let Some(guy) = world.registry_mut().get_mut(cpu_handle) {
            guy.facing = towards_player;
        }
    }

    if world.roll() <= JUMP_CHANCE {
        world.jump(cpu);
    }

    if world.roll() <= CAST_CHANCE {
        let spell = SpellId::from_index((world.roll() * SPELL_COUNT as f64) as usize);
        world.cast(cpu, spell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Tuning;
    use crate::stage::{Stage, StageId};

    fn forest_world() -> (World, Stage) {
        let stage = Stage::load(StageId::Forest);
        let mut world = World::new(Tuning::default(), 9).unwrap();
        world.spawn_players(&stage);
        (world, stage)
    }

    #[test]
    fn test_cpu_closes_distance() {
        let (mut world, stage) = forest_world();
        for _ in 0..120 {
            world.step(&stage.terrain);
        }

        let start_x = world.registry().get(world.registry().player(PlayerSide::P1).unwrap())
            .unwrap()
            .x;
        for _ in 0..120 {
            take_cpu_action(&mut world, PlayerSide::P1);
            world.step(&stage.terrain);
        }
        let end_x = world
            .registry()
            .get(world.registry().player(PlayerSide::P1).unwrap())
            .unwrap()
            .x;
        // P0 spawns to the left; the CPU walks toward them
        assert!(end_x < start_x);
    }

    #[test]
    fn test_cpu_approaches_engage_distance() {
        let (mut world, stage) = forest_world();
        for _ in 0..120 {
            world.step(&stage.terrain);
        }

        // A long session never sees the CPU hug the player
        let mut min_gap = f64::MAX;
        for _ in 0..2000 {
            take_cpu_action(&mut world, PlayerSide::P1);
            world.step(&stage.terrain);
            let p0 = world.registry().get(world.registry().player(PlayerSide::P0).unwrap());
            let p1 = world.registry().get(world.registry().player(PlayerSide::P1).unwrap());
            if let (Some(a), Some(b)) = (p0, p1) {
                min_gap = min_gap.min((a.x - b.x).abs());
            }
        }
        // Knockback and jumps can push inside the engage distance, but
        // the walk logic never drives further in
        assert!(min_gap < ENGAGE_DISTANCE + 60.0);
    }

    #[test]
    fn test_cpu_without_players_is_a_no_op() {
        let mut world = World::new(Tuning::default(), 9).unwrap();
        take_cpu_action(&mut world, PlayerSide::P1);
        assert!(world.registry().is_empty());
    }
}
