//! Spell metadata tables
//!
//! Timing descriptors for the five castable spells. Launch and impact
//! behavior is dispatched by a closed match in `sim::spells`, not stored
//! here; this keeps the table plain data.

use crate::core::config::Tuning;
use crate::core::types::Action;

/// Every castable spell, in toolbar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpellId {
    Fireball,
    Iceshock,
    Rockfall,
    Darkedge,
    Arcsurge,
}

pub const SPELL_COUNT: usize = 5;

impl SpellId {
    pub const ALL: [SpellId; SPELL_COUNT] = [
        SpellId::Fireball,
        SpellId::Iceshock,
        SpellId::Rockfall,
        SpellId::Darkedge,
        SpellId::Arcsurge,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Spell for a toolbar slot index. Panics on an out-of-range index:
    /// that is a caller contract violation, not a runtime condition.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index]
    }
}

/// Immutable timing descriptor for one spell
#[derive(Debug, Clone, Copy)]
pub struct SpellInfo {
    pub id: SpellId,
    /// Action state the caster is in during the wind-up
    pub cast_action: Action,
    /// Total wind-up length in frames
    pub cast_duration: u32,
    /// Remaining-wind-up value at which the projectile actually spawns
    pub launch_frame: u32,
    /// Frames before the spell can be cast again
    pub cooldown: u32,
}

/// The load-once table of all spell descriptors, indexed by `SpellId`
#[derive(Debug)]
pub struct SpellTable {
    spells: [SpellInfo; SPELL_COUNT],
}

impl SpellTable {
    pub fn load(tuning: &Tuning) -> Self {
        let spell = |id, cast_action, cast_duration, launch_frame, cooldown: u32| SpellInfo {
            id,
            cast_action,
            cast_duration,
            launch_frame,
            // Debug switch collapses cooldowns at build time
            cooldown: if tuning.no_cooldowns { 0 } else { cooldown },
        };

        Self {
            spells: [
                spell(SpellId::Fireball, Action::CastFireball, 32, 8, 120),
                spell(SpellId::Iceshock, Action::CastIceshock, 32, 8, 240),
                spell(SpellId::Rockfall, Action::CastRockfall, 40, 40, 420),
                spell(SpellId::Darkedge, Action::CastDarkedge, 44, 24, 420),
                spell(SpellId::Arcsurge, Action::CastArcsurge, 52, 40, 600),
            ],
        }
    }

    pub fn get(&self, id: SpellId) -> &SpellInfo {
        &self.spells[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpellInfo> {
        self.spells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_frame_within_cast() {
        let table = SpellTable::load(&Tuning::default());
        for spell in table.iter() {
            assert!(spell.launch_frame <= spell.cast_duration, "{:?}", spell.id);
            assert!(spell.launch_frame > 0, "{:?}", spell.id);
        }
    }

    #[test]
    fn test_cast_action_matches_spell() {
        let table = SpellTable::load(&Tuning::default());
        assert_eq!(table.get(SpellId::Fireball).cast_action, Action::CastFireball);
        assert_eq!(table.get(SpellId::Arcsurge).cast_action, Action::CastArcsurge);
        for spell in table.iter() {
            assert!(spell.cast_action.is_cast());
        }
    }

    #[test]
    fn test_no_cooldowns_switch() {
        let mut tuning = Tuning::default();
        tuning.no_cooldowns = true;
        let table = SpellTable::load(&tuning);
        for spell in table.iter() {
            assert_eq!(spell.cooldown, 0);
        }
        // And the normal table keeps real cooldowns
        let normal = SpellTable::load(&Tuning::default());
        assert_eq!(normal.get(SpellId::Fireball).cooldown, 120);
        assert_eq!(normal.get(SpellId::Arcsurge).cooldown, 600);
    }

    #[test]
    fn test_from_index_roundtrip() {
        for spell in SpellId::ALL {
            assert_eq!(SpellId::from_index(spell.index()), spell);
        }
    }
}
