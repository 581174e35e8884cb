//! World State
//!
//! Owns everything one level needs to simulate: the immutable occupancy
//! grid, the shape catalog, the entity pool, hero bookkeeping and the
//! pending event queue. Construction populates the pool straight from
//! the grid's tile codes.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::map::{OccupancyGrid, TileCode};
use crate::math::vec2::Vec2;

use super::entity::EntityKind;
use super::events::SimEvent;
use super::shapes::{ShapeCatalog, ShapeDef, ShapeId};
use super::store::{EntityHandle, EntityStore, ENTITY_CAPACITY};

// =============================================================================
// TUNING
// =============================================================================

/// Gameplay constants. Defaults are balanced for a 60 Hz frame step.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Tuning {
    /// Gravity acceleration, tile units per second squared (negative is down).
    pub gravity: f32,
    /// Vertical velocity applied on a jump.
    pub jump_velocity: f32,
    /// Hero horizontal walk speed.
    pub hero_speed: f32,
    /// Enemy patrol walk speed.
    pub enemy_speed: f32,
    /// Seconds an enemy idles at an obstruction before turning around.
    pub enemy_idle_time: f32,
    /// Lives the hero starts with.
    pub hero_lives: u32,
    /// Entity pool capacity.
    pub entity_capacity: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: -20.0,
            jump_velocity: 11.0,
            hero_speed: 4.0,
            enemy_speed: 7.5,
            enemy_idle_time: 2.0,
            hero_lives: 3,
            entity_capacity: ENTITY_CAPACITY,
        }
    }
}

// =============================================================================
// WORLD
// =============================================================================

/// Shape handles registered for the built-in entity kinds.
#[derive(Clone, Copy, Debug)]
struct KindShapes {
    empty: ShapeId,
    wall: ShapeId,
    hero: ShapeId,
    enemy: ShapeId,
    coin: ShapeId,
}

/// One level's worth of simulation state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct World {
    /// Level collision grid, immutable after construction.
    pub grid: OccupancyGrid,
    /// Shape catalog, immutable after construction.
    pub shapes: ShapeCatalog,
    /// Entity pool.
    pub store: EntityStore,
    /// Gameplay constants.
    pub tuning: Tuning,
    /// The hero, if one spawned. Stays `Some` across respawns.
    pub hero: Option<EntityHandle>,
    /// Lives left.
    pub lives: u32,
    /// Coins not yet collected.
    pub coins_remaining: u32,
    /// Coins collected so far.
    pub coins_collected: u32,
    hero_spawn: Vec2,
    events: Vec<SimEvent>,
}

impl World {
    /// Build and populate a world from a loaded grid.
    ///
    /// Spawns one static tile entity per cell, the hero at the first
    /// hero-spawn marker (extra markers are ignored with a warning),
    /// and an enemy or coin per matching marker. Cells that do not fit
    /// in the pool are skipped with a warning; the level still runs.
    pub fn new(grid: OccupancyGrid, tuning: Tuning) -> Self {
        let mut shapes = ShapeCatalog::new();
        let kind_shapes = register_kind_shapes(&mut shapes);

        let mut world = Self {
            grid,
            shapes,
            store: EntityStore::new(tuning.entity_capacity),
            tuning,
            hero: None,
            lives: tuning.hero_lives,
            coins_remaining: 0,
            coins_collected: 0,
            hero_spawn: Vec2::ZERO,
            events: Vec::new(),
        };
        world.populate(kind_shapes);
        world
    }

    fn populate(&mut self, shapes: KindShapes) {
        for (x, y, code) in self.grid.cells().collect::<Vec<_>>() {
            let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);

            // Every cell gets a static tile entity so the level draws
            // fully; markers sit on non-blocking ground.
            let tile_kind = if code.blocks() {
                EntityKind::WallTile
            } else {
                EntityKind::EmptyTile
            };
            let tile_shape = if code.blocks() { shapes.wall } else { shapes.empty };
            self.spawn_logged(tile_kind, tile_shape, center);

            match code {
                TileCode::HeroSpawn => {
                    if self.hero.is_some() {
                        warn!(x, y, "extra hero spawn marker ignored");
                    } else if let Some(handle) =
                        self.spawn_logged(EntityKind::Hero, shapes.hero, center)
                    {
                        self.hero = Some(handle);
                        self.hero_spawn = center;
                    }
                }
                TileCode::EnemySpawn => {
                    self.spawn_logged(EntityKind::Enemy, shapes.enemy, center);
                }
                TileCode::CoinSpawn => {
                    if self.spawn_logged(EntityKind::Coin, shapes.coin, center).is_some() {
                        self.coins_remaining += 1;
                    }
                }
                _ => {}
            }
        }

        info!(
            entities = self.store.len(),
            coins = self.coins_remaining,
            hero = self.hero.is_some(),
            "populated world"
        );
    }

    fn spawn_logged(
        &mut self,
        kind: EntityKind,
        shape: ShapeId,
        position: Vec2,
    ) -> Option<EntityHandle> {
        match self.store.spawn(kind, shape, position) {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!(?kind, %position, %err, "skipping spawn");
                None
            }
        }
    }

    /// Position the hero respawns at after an enemy hit.
    #[inline]
    pub fn hero_spawn(&self) -> Vec2 {
        self.hero_spawn
    }

    /// Tear the level down: despawn every entity and reset the hero
    /// bookkeeping and counters. The grid and catalog stay loaded, so
    /// the same level can be repopulated by building a fresh world.
    pub fn clear(&mut self) {
        self.store.clear();
        self.hero = None;
        self.hero_spawn = Vec2::ZERO;
        self.lives = self.tuning.hero_lives;
        self.coins_remaining = 0;
        self.coins_collected = 0;
        self.events.clear();
    }

    /// Queue an event for the game-state collaborator.
    pub fn push_event(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Drain all pending events, oldest first.
    pub fn take_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

fn register_kind_shapes(catalog: &mut ShapeCatalog) -> KindShapes {
    // Five registrations into a fresh catalog never hit the cap.
    let mut register = |kind| {
        catalog
            .register(ShapeDef { kind })
            .unwrap_or(ShapeId::from_index(0))
    };
    KindShapes {
        empty: register(EntityKind::EmptyTile),
        wall: register(EntityKind::WallTile),
        hero: register(EntityKind::Hero),
        enemy: register(EntityKind::Enemy),
        coin: register(EntityKind::Coin),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = "\
Width 5
Height 3
0 0 4 0 0
2 0 3 0 4
1 1 1 1 1
";

    fn level_world() -> World {
        let grid = OccupancyGrid::load(LEVEL.as_bytes()).unwrap();
        World::new(grid, Tuning::default())
    }

    #[test]
    fn test_populate_counts() {
        let world = level_world();

        // 15 static tiles + hero + enemy + 2 coins
        assert_eq!(world.store.len(), 19);
        assert_eq!(world.coins_remaining, 2);
        assert_eq!(world.coins_collected, 0);
        assert_eq!(world.lives, 3);
    }

    #[test]
    fn test_hero_spawn_at_marker_center() {
        let world = level_world();
        let hero = world.hero.expect("hero marker present");
        let entity = world.store.get(hero).unwrap();
        assert_eq!(entity.kind, EntityKind::Hero);
        assert_eq!(entity.transform.position, Vec2::new(0.5, 1.5));
        assert_eq!(world.hero_spawn(), Vec2::new(0.5, 1.5));
    }

    #[test]
    fn test_first_hero_marker_wins() {
        let grid =
            OccupancyGrid::load("Width 3\nHeight 2\n0 0 2\n2 0 1\n".as_bytes()).unwrap();
        let world = World::new(grid, Tuning::default());
        let hero = world.hero.unwrap();
        // Bottom row scans first
        assert_eq!(
            world.store.get(hero).unwrap().transform.position,
            Vec2::new(0.5, 0.5)
        );
    }

    #[test]
    fn test_populate_skips_when_pool_full() {
        let grid = OccupancyGrid::load("Width 3\nHeight 1\n2 3 4\n".as_bytes()).unwrap();
        let tuning = Tuning {
            entity_capacity: 3,
            ..Tuning::default()
        };
        let world = World::new(grid, tuning);
        // Three static tiles fill the pool; markers are skipped.
        assert_eq!(world.store.len(), 3);
        assert_eq!(world.coins_remaining, 0);
    }

    #[test]
    fn test_clear_tears_the_level_down() {
        let mut world = level_world();
        let hero = world.hero.unwrap();
        world.push_event(SimEvent::coin_collected(1));
        world.coins_collected = 1;

        world.clear();

        assert!(world.store.is_empty());
        assert!(world.hero.is_none());
        assert!(world.store.get(hero).is_none());
        assert_eq!(world.lives, world.tuning.hero_lives);
        assert_eq!(world.coins_remaining, 0);
        assert_eq!(world.coins_collected, 0);
        assert!(world.take_events().is_empty());
    }

    #[test]
    fn test_event_queue_drains() {
        let mut world = level_world();
        world.push_event(SimEvent::coin_collected(1));
        world.push_event(SimEvent::hero_hit(2));

        let events = world.take_events();
        assert_eq!(
            events,
            vec![SimEvent::coin_collected(1), SimEvent::hero_hit(2)]
        );
        assert!(world.take_events().is_empty());
    }
}
