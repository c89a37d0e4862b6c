//! Action classification and animation stepping
//!
//! The action state is derived, never stored authority: each frame it is
//! recomputed from the entity's timers and velocities, and the animation
//! frame counter advances through that action's sheet section at a rate
//! scaled per state.

use crate::core::config::Tuning;
use crate::core::types::Action;
use crate::meta::kinds::{Category, KindId, KindInfo};
use crate::meta::spells::SpellTable;
use crate::sim::entity::Entity;

/// Derive the action an entity is in this frame. Priority runs death,
/// then entry animation, then hit-stun, then cast wind-up, then the
/// humanoid stance states, with plain movement as the fallback.
pub fn classify(e: &Entity, info: &KindInfo, spells: &SpellTable) -> Action {
    let humanoid = info.category == Category::Humanoid;
    if humanoid && e.health == 0 {
        Action::Die
    } else if e.spawning > 0 {
        Action::Spawn
    } else if e.colliding > 0 {
        Action::Collide
    } else if e.casting > 0 {
        spells.get(e.active_spell).cast_action
    } else if humanoid && e.xv == 0.0 && e.yv == 0.0 {
        Action::Idle
    } else if humanoid && e.yv != 0.0 {
        Action::Jump
    } else {
        Action::Move
    }
}

/// Reclassify and advance one entity's animation frame
pub fn update(e: &mut Entity, info: &KindInfo, spells: &SpellTable, tuning: &Tuning) {
    let action = classify(e, info, spells);
    if e.action != action {
        e.action_changed = true;
    }
    e.action = action;

    // Some states animate faster than the base rate
    let mut increment = tuning.base_frame_increment;
    if action == Action::Move && e.kind == KindId::Guy {
        increment *= 2.0;
    }
    if matches!(action, Action::Jump | Action::Collide | Action::Spawn)
        || e.kind == KindId::Arcsurge
    {
        increment *= 1.5;
    }
    if action.is_cast() {
        increment *= 2.5;
    }
    e.frame += increment;

    let range = info.frames.get(action);
    if e.action_changed {
        e.frame = range.start as f64;
        // The player walk cycle's first cell is a standing pose; start
        // one frame in so the walk reads as motion immediately
        if action == Action::Move && e.kind == KindId::Guy {
            e.frame += 1.0;
        }
    }
    e.action_changed = false;

    if action == Action::Die {
        // One-shot: hold the final death frame
        let last = range.end.saturating_sub(1).max(range.start) as f64;
        if e.frame >= last {
            e.frame = last;
        }
    } else if e.frame >= range.end as f64 {
        e.frame = range.start as f64;
    }
}
