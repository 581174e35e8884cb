//! Entity Store
//!
//! Fixed-capacity pool of entity slots addressed by generational handles.
//! Slots are recycled: despawning bumps the slot generation so handles
//! into the old occupant go stale instead of silently aliasing whatever
//! spawns there next.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::vec2::Vec2;

use super::entity::{Entity, EntityKind};
use super::shapes::ShapeId;

/// Default pool capacity.
pub const ENTITY_CAPACITY: usize = 2048;

/// Errors raised when spawning into the pool.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpawnError {
    /// Every slot is occupied.
    #[error("entity pool exhausted ({capacity} slots)")]
    CapacityExhausted {
        /// Pool capacity
        capacity: usize,
    },
}

/// Stable reference to a pooled entity.
///
/// Holds the slot index plus the generation the slot had at spawn time.
/// Lookups through a handle whose generation no longer matches return
/// `None`, so a handle can outlive its entity safely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityHandle {
    index: u32,
    generation: u32,
}

impl EntityHandle {
    /// Slot index, for diagnostics.
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

/// Fixed-capacity entity pool.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntityStore {
    slots: Vec<Slot>,
    live: usize,
}

impl EntityStore {
    /// Pool with `capacity` slots. The capacity never changes afterwards.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![
                Slot {
                    generation: 0,
                    entity: None,
                };
                capacity
            ],
            live: 0,
        }
    }

    /// Pool capacity in slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the pool has no live entities.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Spawn an entity of `kind` at `position`, assembling the capability
    /// set the kind calls for. Takes the first free slot.
    pub fn spawn(
        &mut self,
        kind: EntityKind,
        shape: ShapeId,
        position: Vec2,
    ) -> Result<EntityHandle, SpawnError> {
        let capacity = self.slots.len();
        let index = self
            .slots
            .iter()
            .position(|slot| slot.entity.is_none())
            .ok_or(SpawnError::CapacityExhausted { capacity })?;

        let slot = &mut self.slots[index];
        slot.entity = Some(Entity::new(kind, shape, position));
        self.live += 1;

        Ok(EntityHandle {
            index: index as u32,
            generation: slot.generation,
        })
    }

    /// Despawn the entity behind `handle`.
    ///
    /// Bumps the slot generation so the handle (and any copies of it) go
    /// stale. Idempotent: despawning through a stale handle is a no-op
    /// and returns `false`.
    pub fn despawn(&mut self, handle: EntityHandle) -> bool {
        match self.slots.get_mut(handle.index()) {
            Some(slot) if slot.generation == handle.generation && slot.entity.is_some() => {
                slot.entity = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.live -= 1;
                true
            }
            _ => false,
        }
    }

    /// Shared access to the entity behind `handle`, or `None` if stale.
    pub fn get(&self, handle: EntityHandle) -> Option<&Entity> {
        self.slots
            .get(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entity.as_ref())
    }

    /// Mutable access to the entity behind `handle`, or `None` if stale.
    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.slots
            .get_mut(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entity.as_mut())
    }

    /// Iterate live entities with their handles, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityHandle, &Entity)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entity.as_ref().map(|entity| {
                (
                    EntityHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    entity,
                )
            })
        })
    }

    /// Iterate live entities mutably with their handles, in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityHandle, &mut Entity)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| {
                let generation = slot.generation;
                slot.entity.as_mut().map(move |entity| {
                    (
                        EntityHandle {
                            index: index as u32,
                            generation,
                        },
                        entity,
                    )
                })
            })
    }

    /// Handles of all live entities, in slot order.
    pub fn handles(&self) -> Vec<EntityHandle> {
        self.iter().map(|(handle, _)| handle).collect()
    }

    /// Despawn everything and reset the live count. Generations keep
    /// advancing so pre-clear handles stay stale.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            if slot.entity.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.live = 0;
    }
}

// =============================================================================
// TESTS
// =============================================================================
