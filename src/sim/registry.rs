//! Entity registry - owns every live entity for one simulation
//!
//! Arena storage: entities live in slots addressed by index + generation
//! handles. Removal frees the slot and bumps its generation, so stale
//! handles stop resolving instead of aliasing whatever spawns next.
//! Player characters are permanent: defeat hides them off-arena rather
//! than removing them.

use crate::core::config::Tuning;
use crate::core::types::PlayerSide;
use crate::meta::kinds::{Category, KindTable};
use crate::sim::entity::{Entity, EntityHandle, SpawnRequest};

/// Match-end signal produced by `unload`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSignal {
    None,
    Defeated(PlayerSide),
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

/// The active-entity collection
#[derive(Debug, Default)]
pub struct Registry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    players: [Option<EntityHandle>; 2],
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate and insert a new entity. The first two humanoid spawns
    /// are remembered as the permanent player references.
    pub fn spawn(&mut self, kinds: &KindTable, request: SpawnRequest) -> EntityHandle {
        let info = kinds.get(request.kind);
        let entity = request.build(info);

        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entity = Some(entity);
                EntityHandle { index, generation: slot.generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, entity: Some(entity) });
                EntityHandle { index, generation: 0 }
            }
        };

        if info.category == Category::Humanoid {
            if let Some(slot) = self.players.iter_mut().find(|p| p.is_none()) {
                *slot = Some(handle);
            }
        }

        tracing::trace!(kind = ?info.id, index = handle.index, "spawned entity");
        handle
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&Entity> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entity.as_ref()
    }

    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entity.as_mut()
    }

    /// Remove a live entity, invalidating all handles to it
    pub fn remove(&mut self, handle: EntityHandle) -> Option<Entity> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let entity = slot.entity.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        Some(entity)
    }

    /// Handles of all live entities, in slot order
    pub fn handles(&self) -> Vec<EntityHandle> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.entity.is_some())
            .map(|(i, s)| EntityHandle { index: i as u32, generation: s.generation })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityHandle, &Entity)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.entity
                .as_ref()
                .map(|e| (EntityHandle { index: i as u32, generation: s.generation }, e))
        })
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.entity.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Permanent handle for one combatant, if they have spawned
    pub fn player(&self, side: PlayerSide) -> Option<EntityHandle> {
        self.players[side.index()]
    }

    /// Which combatant a handle refers to, if either
    pub fn player_side(&self, handle: EntityHandle) -> Option<PlayerSide> {
        if self.players[0] == Some(handle) {
            Some(PlayerSide::P0)
        } else if self.players[1] == Some(handle) {
            Some(PlayerSide::P1)
        } else {
            None
        }
    }

    /// Park a defeated player just outside the visible arena with no
    /// velocity and a health floor of 1, so they survive future unloads
    fn hide_player(&mut self, side: PlayerSide, tuning: &Tuning) {
        let handle = self.players[side.index()].expect("hide_player before player spawn");
        let player = self.get_mut(handle).expect("player handle went stale");
        player.x = tuning.arena_width + 20.0;
        player.y = 0.0;
        player.stop();
        player.health = 1;
    }

    /// Remove every dead non-player entity and hide dead players,
    /// reporting a defeat if one occurred. Safe to call every frame;
    /// a no-op when nothing is dead.
    ///
    /// If both players die in the same frame, the lower-indexed side is
    /// reported.
    pub fn unload(&mut self, tuning: &Tuning) -> MatchSignal {
        let dead: Vec<EntityHandle> = self
            .iter()
            .filter(|(_, e)| e.is_dead(tuning))
            .map(|(h, _)| h)
            .collect();

        let mut signal = MatchSignal::None;
        for handle in dead {
            match self.player_side(handle) {
                Some(side) => {
                    self.hide_player(side, tuning);
                    if signal == MatchSignal::None || side == PlayerSide::P0 {
                        signal = MatchSignal::Defeated(side);
                    }
                    tracing::info!(?side, "player defeated");
                }
                None => {
                    self.remove(handle);
                }
            }
        }
        signal
    }
}
