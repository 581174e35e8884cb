//! Entity Kinds and Capabilities
//!
//! An entity is a slot in the pool carrying a fixed set of capability
//! records decided by its kind at spawn time. Capabilities are plain data;
//! all behavior lives in the frame step and the patrol machine.
//!
//! | Kind      | Sprite | Transform | Physics | Patrol | MapContact |
//! |-----------|--------|-----------|---------|--------|------------|
//! | EmptyTile | yes    | yes       |         |        |            |
//! | WallTile  | yes    | yes       |         |        |            |
//! | Hero      | yes    | yes       | yes     |        | yes        |
//! | Enemy     | yes    | yes       | yes     | yes    | yes        |
//! | Coin      | yes    | yes       | yes     |        | yes        |
//!
//! Coins carry physics and contact records but never integrate: gravity
//! and movement apply to dynamic kinds only.

use serde::{Deserialize, Serialize};

use crate::map::EdgeFlags;
use crate::math::mtx33::Mtx33;
use crate::math::vec2::Vec2;

use super::ai::PatrolState;
use super::shapes::ShapeId;

/// What an entity is. Fixed at spawn; drives which capabilities it gets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Static scenery tile with no collision role.
    EmptyTile,
    /// Static blocking tile. Collision comes from the grid, not from
    /// this entity; the entity only exists so the tile is drawn.
    WallTile,
    /// The player character.
    Hero,
    /// A patrolling enemy.
    Enemy,
    /// A collectible coin.
    Coin,
}

impl EntityKind {
    /// Whether entities of this kind move and respond to gravity.
    #[inline]
    pub fn is_dynamic(self) -> bool {
        matches!(self, EntityKind::Hero | EntityKind::Enemy)
    }

    /// Whether entities of this kind carry physics and map-contact
    /// records. A superset of the dynamic kinds: coins carry both while
    /// staying parked on their spawn tile.
    #[inline]
    pub fn has_body(self) -> bool {
        matches!(self, EntityKind::Hero | EntityKind::Enemy | EntityKind::Coin)
    }
}

/// Spatial pose plus the cached world transform rebuilt each frame.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Transform {
    /// Center position in tile units.
    pub position: Vec2,
    /// Orientation in radians.
    pub angle: f32,
    /// Non-uniform scale; also the entity's collision extents.
    pub scale: Vec2,
    /// Cached `translation * rotation * scale`, refreshed by the
    /// transform phase of the frame step.
    pub world: Mtx33,
}

impl Transform {
    /// Unit-scaled, unrotated transform at `position`.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            angle: 0.0,
            scale: Vec2::new(1.0, 1.0),
            world: Mtx33::IDENTITY,
        }
    }
}

/// Which catalog shape to draw for this entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
    /// Catalog handle
    pub shape: ShapeId,
}

/// Linear velocity, tile units per second.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Physics {
    /// Current velocity
    pub velocity: Vec2,
}

/// Edge flags from the most recent grid-resolution pass.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct MapContact {
    /// Which box edges touched blocking tiles
    pub flags: EdgeFlags,
}

/// One live entity: kind plus its capability records.
///
/// `physics`, `patrol` and `contact` are `None` for kinds that do not
/// carry them; the step phases skip entities missing the capability
/// they operate on.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entity {
    /// What this entity is
    pub kind: EntityKind,
    /// Pose and cached world transform
    pub transform: Transform,
    /// Shape to draw
    pub sprite: Sprite,
    /// Velocity, dynamic kinds only
    pub physics: Option<Physics>,
    /// Patrol machine, enemies only
    pub patrol: Option<PatrolState>,
    /// Grid contact flags, dynamic kinds only
    pub contact: Option<MapContact>,
}

impl Entity {
    /// Assemble an entity with the capability set its kind calls for.
    pub fn new(kind: EntityKind, shape: ShapeId, position: Vec2) -> Self {
        let body = kind.has_body();
        Self {
            kind,
            transform: Transform::at(position),
            sprite: Sprite { shape },
            physics: body.then(Physics::default),
            patrol: (kind == EntityKind::Enemy).then(PatrolState::default),
            contact: body.then(MapContact::default),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
