//! Shape Catalog
//!
//! Fixed-capacity registry of visual templates. The simulation never
//! interprets a shape's contents; it only hands `(transform, shape)` pairs
//! to the rendering collaborator, which maps each [`ShapeId`] to whatever
//! mesh or texture it built at load time.

use serde::{Deserialize, Serialize};

use super::entity::EntityKind;

/// Most shapes a catalog will hold.
pub const SHAPE_CAPACITY: usize = 32;

/// Opaque handle into the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeId(u32);

impl ShapeId {
    /// Handle for a known catalog index. Mostly useful in tests.
    #[inline]
    pub fn from_index(index: u32) -> Self {
        Self(index)
    }

    /// Catalog index this handle refers to.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One registered template.
///
/// Carries the entity kind it was authored for so level population can
/// look shapes up by kind. Nothing downstream infers behavior from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeDef {
    /// Kind this template draws
    pub kind: EntityKind,
}

/// Registry of shape templates, immutable once the level is loaded.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ShapeCatalog {
    shapes: Vec<ShapeDef>,
}

impl ShapeCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template. Returns `None` when the catalog is full.
    pub fn register(&mut self, def: ShapeDef) -> Option<ShapeId> {
        if self.shapes.len() >= SHAPE_CAPACITY {
            return None;
        }
        let id = ShapeId(self.shapes.len() as u32);
        self.shapes.push(def);
        Some(id)
    }

    /// Look up a registered template.
    pub fn get(&self, id: ShapeId) -> Option<&ShapeDef> {
        self.shapes.get(id.index())
    }

    /// First template registered for `kind`, if any.
    pub fn shape_for_kind(&self, kind: EntityKind) -> Option<ShapeId> {
        self.shapes
            .iter()
            .position(|def| def.kind == kind)
            .map(|i| ShapeId(i as u32))
    }

    /// Number of registered templates.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
