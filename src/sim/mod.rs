//! Simulation Module
//!
//! The entity pool and everything that runs over it each frame.
//!
//! ## Module Structure
//!
//! - `entity`: entity kinds and per-entity capability records
//! - `store`: fixed-capacity pool with generational handles
//! - `shapes`: read-only catalog of visual templates
//! - `input`: per-frame input snapshot from the polling collaborator
//! - `ai`: enemy patrol state machine
//! - `events`: events surfaced to the game-state collaborator
//! - `world`: level population and the owned simulation context
//! - `step`: ordered per-frame update phases and the render list

pub mod ai;
pub mod entity;
pub mod events;
pub mod input;
pub mod shapes;
pub mod step;
pub mod store;
pub mod world;

// Re-export key types
pub use entity::{Entity, EntityKind, MapContact, Physics, Sprite, Transform};
pub use events::SimEvent;
pub use input::InputState;
pub use shapes::{ShapeCatalog, ShapeId};
pub use store::{EntityHandle, EntityStore, SpawnError};
pub use world::{Tuning, World};
