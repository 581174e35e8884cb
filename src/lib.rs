//! # Gridbound
//!
//! Headless runtime core for a tile-based 2D platformer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        GRIDBOUND                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  math/           - Simulation math primitives               │
//! │  ├── vec2.rs     - 2D vector                                │
//! │  └── mtx33.rs    - 2D affine transform (3x3)                │
//! │                                                             │
//! │  geom.rs         - Stateless intersection predicates        │
//! │  map.rs          - Binary occupancy grid + edge classifier  │
//! │                                                             │
//! │  sim/            - Entity pool and frame stepping           │
//! │  ├── entity.rs   - Entity kinds and capability records      │
//! │  ├── store.rs    - Fixed-capacity entity pool               │
//! │  ├── shapes.rs   - Read-only shape catalog                  │
//! │  ├── input.rs    - Per-frame input snapshot                 │
//! │  ├── ai.rs       - Enemy patrol state machine               │
//! │  ├── events.rs   - Simulation events for outer layers       │
//! │  ├── world.rs    - Level population and owned state         │
//! │  └── step.rs     - Ordered per-frame update phases          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Scope
//!
//! Window management, input polling, rendering and the level-authoring
//! pipeline are external collaborators. The crate consumes an already-open
//! map source, an [`InputState`] snapshot per frame, and produces a draw
//! list of `(transform, shape)` pairs via [`sim::step::render`].
//!
//! Everything here is single-threaded and frame-stepped: one
//! [`sim::step::step`] call per frame mutates the [`World`] synchronously
//! and returns. The occupancy grid and shape catalog are immutable after
//! level load.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod geom;
pub mod map;
pub mod math;
pub mod sim;

// Re-export commonly used types
pub use map::{EdgeFlags, MapError, OccupancyGrid, TileCode};
pub use math::mtx33::Mtx33;
pub use math::vec2::Vec2;
pub use sim::entity::EntityKind;
pub use sim::events::SimEvent;
pub use sim::input::InputState;
pub use sim::store::{EntityHandle, EntityStore, SpawnError};
pub use sim::world::{Tuning, World};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nominal frame rate the default tuning is balanced for (Hz).
/// The step function itself accepts any `dt`.
pub const NOMINAL_FRAME_RATE: u32 = 60;
