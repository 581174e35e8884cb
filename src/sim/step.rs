//! Frame Step
//!
//! The ordered phases that advance the world by one frame, and the draw
//! list handed to the rendering collaborator. Phase order is load-bearing:
//! input writes velocities, gravity and AI adjust them, integration moves
//! everything once, grid resolution corrects the result, entity contacts
//! react to the corrected positions, and the transform rebuild caches what
//! rendering will draw.

use tracing::debug;

use crate::geom::{circle_rect, rect_rect};
use crate::map::{snap_to_cell, EdgeFlags};
use crate::math::mtx33::Mtx33;
use crate::math::vec2::Vec2;

use super::ai;
use super::entity::EntityKind;
use super::events::SimEvent;
use super::input::InputState;
use super::shapes::ShapeId;
use super::store::EntityHandle;
use super::world::World;

/// Advance the world by `dt` seconds.
///
/// One call per frame. The input snapshot applies for the whole frame;
/// events produced along the way queue on the world until drained with
/// [`World::take_events`].
pub fn step(world: &mut World, input: InputState, dt: f32) {
    let tuning = world.tuning;

    // 1. Hero input: horizontal velocity from held keys, jump off a
    //    fresh press while grounded.
    if let Some(handle) = world.hero {
        let grid = &world.grid;
        if let Some(hero) = world.store.get_mut(handle) {
            if let (Some(physics), Some(contact)) =
                (hero.physics.as_mut(), hero.contact.as_mut())
            {
                physics.velocity.x = if input.left {
                    -tuning.hero_speed
                } else if input.right {
                    tuning.hero_speed
                } else {
                    0.0
                };

                // Refresh the contact flags, keeping the bits from the
                // last resolution pass: at the snapped rest height the
                // bottom probes sit exactly on the cell boundary and
                // truncate into the hero's own open row.
                let pose = hero.transform;
                let fresh = grid.classify_box(pose.position, pose.scale.x, pose.scale.y);
                contact.flags = fresh | contact.flags;

                if input.jump && contact.flags.contains(EdgeFlags::BOTTOM) {
                    physics.velocity.y = tuning.jump_velocity;
                }
            }
        }
    }

    // 2. Gravity on every dynamic entity, then the patrol machines.
    //    Coins carry physics records too but stay parked; only dynamic
    //    kinds accelerate and move.
    {
        let grid = &world.grid;
        for (_, entity) in world.store.iter_mut() {
            if !entity.kind.is_dynamic() {
                continue;
            }
            let Some(physics) = entity.physics.as_mut() else {
                continue;
            };
            physics.velocity.y += tuning.gravity * dt;

            if let Some(patrol) = entity.patrol.as_mut() {
                let pose = entity.transform;
                let stored = entity
                    .contact
                    .map(|c| c.flags)
                    .unwrap_or(EdgeFlags::NONE);
                let flags =
                    grid.classify_box(pose.position, pose.scale.x, pose.scale.y) | stored;
                ai::tick(
                    patrol,
                    &mut entity.transform,
                    physics,
                    flags,
                    grid,
                    tuning.enemy_speed,
                    tuning.enemy_idle_time,
                    dt,
                );
            }
        }
    }

    // 3. Forward Euler integration, dynamic kinds only.
    for (_, entity) in world.store.iter_mut() {
        if !entity.kind.is_dynamic() {
            continue;
        }
        if let Some(physics) = entity.physics.as_ref() {
            entity.transform.position = physics
                .velocity
                .scale_add(dt, entity.transform.position);
        }
    }

    // 4. Grid resolution: classify each contact-carrying entity against
    //    the grid, zero the blocked velocity axis and snap that axis back
    //    to the cell center.
    {
        let grid = &world.grid;
        for (_, entity) in world.store.iter_mut() {
            let Some(contact) = entity.contact.as_mut() else {
                continue;
            };
            let pose = entity.transform;
            let flags = grid.classify_box(pose.position, pose.scale.x, pose.scale.y);
            contact.flags = flags;

            if let Some(physics) = entity.physics.as_mut() {
                if flags.intersects(EdgeFlags::LEFT | EdgeFlags::RIGHT) {
                    physics.velocity.x = 0.0;
                    entity.transform.position.x = snap_to_cell(pose.position.x);
                }
                if flags.intersects(EdgeFlags::TOP | EdgeFlags::BOTTOM) {
                    physics.velocity.y = 0.0;
                    entity.transform.position.y = snap_to_cell(pose.position.y);
                }
            }
        }
    }

    // 5. Entity contacts against the hero.
    resolve_hero_contacts(world);

    // 6. Rebuild the cached world transforms.
    for (_, entity) in world.store.iter_mut() {
        let pose = entity.transform;
        entity.transform.world = Mtx33::trs(pose.position, pose.angle, pose.scale);
    }
}

/// Hero versus enemies and coins, using post-resolution positions.
///
/// Overlaps are collected first, then applied: despawning and the hero
/// respawn both mutate the pool, which must not happen mid-iteration.
/// At most one enemy hit lands per frame; the respawn teleports the hero,
/// so further overlaps recorded this frame are against a stale position.
fn resolve_hero_contacts(world: &mut World) {
    let Some(hero_handle) = world.hero else {
        return;
    };
    let Some(hero) = world.store.get(hero_handle) else {
        return;
    };
    let hero_pos = hero.transform.position;
    let hero_scale = hero.transform.scale;

    let mut coin_hits: Vec<EntityHandle> = Vec::new();
    let mut enemy_hit = false;
    for (handle, entity) in world.store.iter() {
        let pos = entity.transform.position;
        let scale = entity.transform.scale;
        match entity.kind {
            EntityKind::Enemy => {
                if rect_rect(
                    pos, scale.x, scale.y, hero_pos, hero_scale.x, hero_scale.y,
                ) {
                    enemy_hit = true;
                }
            }
            EntityKind::Coin => {
                if circle_rect(pos, scale.x / 2.0, hero_pos, hero_scale.x, hero_scale.y) {
                    coin_hits.push(handle);
                }
            }
            _ => {}
        }
    }

    for handle in coin_hits {
        if world.store.despawn(handle) {
            world.coins_remaining = world.coins_remaining.saturating_sub(1);
            world.coins_collected += 1;
            let remaining = world.coins_remaining;
            debug!(remaining, "coin collected");
            world.push_event(SimEvent::coin_collected(remaining));
        }
    }

    if enemy_hit {
        world.lives = world.lives.saturating_sub(1);
        let spawn = world.hero_spawn();
        if let Some(hero) = world.store.get_mut(hero_handle) {
            hero.transform.position = spawn;
            if let Some(physics) = hero.physics.as_mut() {
                physics.velocity = Vec2::ZERO;
            }
            if let Some(contact) = hero.contact.as_mut() {
                contact.flags = EdgeFlags::NONE;
            }
        }
        let event = if world.lives == 0 {
            debug!("hero died");
            SimEvent::hero_died()
        } else {
            debug!(lives = world.lives, "hero hit");
            SimEvent::hero_hit(world.lives)
        };
        world.push_event(event);
    }
}

/// Draw list for the current frame: one `(transform, shape)` pair per
/// live entity, in pool order. The rendering collaborator resolves each
/// [`ShapeId`] against whatever it built from the catalog at load time.
pub fn render(world: &World) -> impl Iterator<Item = (Mtx33, ShapeId)> + '_ {
    world
        .store
        .iter()
        .map(|(_, entity)| (entity.transform.world, entity.sprite.shape))
}

// =============================================================================
// TESTS
// =============================================================================
