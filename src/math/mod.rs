//! Simulation math primitives.
//!
//! Shared by every other component: the grid classifier works in tile
//! coordinates derived from [`Vec2`] positions, and the per-frame transform
//! rebuild composes [`Mtx33`] matrices.

pub mod mtx33;
pub mod vec2;

// Re-export core types
pub use mtx33::Mtx33;
pub use vec2::Vec2;
