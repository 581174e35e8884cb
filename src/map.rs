//! Binary Occupancy Grid
//!
//! Owns the imported tile grid for a level and answers the two collision
//! questions the simulation asks every frame: is a cell blocking, and
//! which edges of a moving box are in contact with blocking tiles.
//!
//! ## Coordinate convention
//!
//! `x` is the column (checked against the grid width), `y` is the row
//! (checked against the grid height). Row 0 is the bottom of the map; the
//! map file lists rows top-first, so the loader fills rows from
//! `height - 1` down to `0`. A tile's center sits at `(x + 0.5, y + 0.5)`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::ops::BitOr;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::math::vec2::Vec2;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors raised while importing a map. All are fatal to level load.
#[derive(Debug, Error)]
pub enum MapError {
    /// Map source could not be opened or read.
    #[error("failed to read map source: {0}")]
    Io(#[from] std::io::Error),

    /// Header declared non-positive dimensions.
    #[error("map header must declare positive dimensions, got {width}x{height}")]
    BadHeader {
        /// Declared width
        width: i32,
        /// Declared height
        height: i32,
    },

    /// A header or cell token was not an integer.
    #[error("unparseable map token {token:?}")]
    BadToken {
        /// The offending token
        token: String,
    },

    /// The stream ended before width x height cells were read.
    #[error("map data ended early: expected {expected} cells, found {found}")]
    Truncated {
        /// Cells required by the header
        expected: usize,
        /// Cells actually present
        found: usize,
    },
}

// =============================================================================
// TILE CODES
// =============================================================================

/// Raw tile-type code from the map file.
///
/// Code `1` is the only code that blocks movement; codes `2`-`4` are spawn
/// markers sitting on non-blocking ground. Unknown codes are preserved and
/// treated as empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileCode {
    /// Empty, non-blocking cell (code 0)
    Empty,
    /// Blocking wall/platform cell (code 1)
    Wall,
    /// Hero spawn marker (code 2)
    HeroSpawn,
    /// Enemy spawn marker (code 3)
    EnemySpawn,
    /// Coin spawn marker (code 4)
    CoinSpawn,
    /// Any other code, kept verbatim
    Other(i32),
}

impl TileCode {
    /// Decode a raw integer from the map file.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => TileCode::Empty,
            1 => TileCode::Wall,
            2 => TileCode::HeroSpawn,
            3 => TileCode::EnemySpawn,
            4 => TileCode::CoinSpawn,
            other => TileCode::Other(other),
        }
    }

    /// The raw integer this code was read from.
    pub fn raw(self) -> i32 {
        match self {
            TileCode::Empty => 0,
            TileCode::Wall => 1,
            TileCode::HeroSpawn => 2,
            TileCode::EnemySpawn => 3,
            TileCode::CoinSpawn => 4,
            TileCode::Other(other) => other,
        }
    }

    /// Whether this code marks a collision tile.
    #[inline]
    pub fn blocks(self) -> bool {
        matches!(self, TileCode::Wall)
    }
}

// =============================================================================
// EDGE FLAGS
// =============================================================================

/// 4-bit field describing which sides of a box touch blocking tiles.
///
/// Corners can set two bits at once. Tests go through [`EdgeFlags::contains`]
/// so every check compares the masked bit against zero explicitly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeFlags(u8);

impl EdgeFlags {
    /// No contact.
    pub const NONE: Self = Self(0);
    /// Left edge in contact.
    pub const LEFT: Self = Self(0x01);
    /// Right edge in contact.
    pub const RIGHT: Self = Self(0x02);
    /// Top edge in contact.
    pub const TOP: Self = Self(0x04);
    /// Bottom edge in contact.
    pub const BOTTOM: Self = Self(0x08);

    /// True if every bit of `other` is set in `self`.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if any bit of `other` is set in `self`.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Set the bits of `other`.
    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// True if no bit is set.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw bit value.
    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for EdgeFlags {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

// =============================================================================
// OCCUPANCY GRID
// =============================================================================

/// Immutable tile grid for one level.
///
/// Holds the raw tile codes and a derived blocking mask of the same
/// dimensions. Built once at level load, never mutated during simulation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OccupancyGrid {
    width: i32,
    height: i32,
    /// Raw codes, indexed `y * width + x`.
    cells: Vec<TileCode>,
    /// `true` iff the raw code at the same index blocks movement.
    blocking: Vec<bool>,
}

impl OccupancyGrid {
    /// Import a map from a reader.
    ///
    /// Format: two header lines `<label> <integer>` giving width then
    /// height, followed by `width * height` whitespace-separated integers,
    /// rows listed top-first.
    pub fn load(mut source: impl Read) -> Result<Self, MapError> {
        let mut text = String::new();
        source.read_to_string(&mut text)?;

        let mut tokens = text.split_whitespace();
        let width = read_header_value(&mut tokens)?;
        let height = read_header_value(&mut tokens)?;
        if width <= 0 || height <= 0 {
            return Err(MapError::BadHeader { width, height });
        }

        let expected = (width as usize) * (height as usize);
        let mut cells = vec![TileCode::Empty; expected];
        let mut found = 0usize;

        // File rows are listed top-first; fill y = height-1 down to 0.
        for y in (0..height).rev() {
            for x in 0..width {
                let token = tokens
                    .next()
                    .ok_or(MapError::Truncated { expected, found })?;
                let raw: i32 = token.parse().map_err(|_| MapError::BadToken {
                    token: token.to_string(),
                })?;
                cells[(y * width + x) as usize] = TileCode::from_raw(raw);
                found += 1;
            }
        }

        let blocking = cells.iter().map(|code| code.blocks()).collect();
        debug!(width, height, "imported occupancy grid");

        Ok(Self {
            width,
            height,
            cells,
            blocking,
        })
    }

    /// Import a map from a file on disk.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let file = File::open(path.as_ref())?;
        Self::load(BufReader::new(file))
    }

    /// Grid width in tiles.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in tiles.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Raw tile code at `(x, y)`, or `None` outside the grid.
    pub fn tile(&self, x: i32, y: i32) -> Option<TileCode> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[(y * self.width + x) as usize])
    }

    /// Whether the cell at `(x, y)` blocks movement.
    ///
    /// Out-of-bounds queries return `false` by definition: entities outside
    /// the map never collide with phantom walls. `x` is bounds-checked
    /// against the width and `y` against the height.
    #[inline]
    pub fn is_blocking(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        self.blocking[(y * self.width + x) as usize]
    }

    /// Classify a box against the grid, one flag per contacting edge.
    ///
    /// Samples two probe points per edge - at half-extent out along the
    /// edge normal, offset by a quarter extent along the edge - truncates
    /// each probe to tile coordinates and ORs the results. This is a cheap
    /// approximate classifier, not a swept test: it can miss tiles thinner
    /// than a quarter extent and is tuned for unit-scaled boxes.
    pub fn classify_box(&self, pos: Vec2, width: f32, height: f32) -> EdgeFlags {
        let half_w = width / 2.0;
        let quarter_w = half_w / 2.0;
        let half_h = height / 2.0;
        let quarter_h = half_h / 2.0;

        let mut flags = EdgeFlags::NONE;

        if self.probe(pos.x - quarter_w, pos.y + half_h)
            || self.probe(pos.x + quarter_w, pos.y + half_h)
        {
            flags.insert(EdgeFlags::TOP);
        }
        if self.probe(pos.x + half_w, pos.y + quarter_h)
            || self.probe(pos.x + half_w, pos.y - quarter_h)
        {
            flags.insert(EdgeFlags::RIGHT);
        }
        if self.probe(pos.x - half_w, pos.y + quarter_h)
            || self.probe(pos.x - half_w, pos.y - quarter_h)
        {
            flags.insert(EdgeFlags::LEFT);
        }
        if self.probe(pos.x - quarter_w, pos.y - half_h)
            || self.probe(pos.x + quarter_w, pos.y - half_h)
        {
            flags.insert(EdgeFlags::BOTTOM);
        }

        flags
    }

    /// Iterate all cells as `(x, y, code)`, row by row from the bottom.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, TileCode)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, code)| (i as i32 % width, i as i32 / width, *code))
    }

    #[inline]
    fn probe(&self, x: f32, y: f32) -> bool {
        // Truncation matches the probe math: probes only go negative off
        // the map edge, where the query is non-blocking anyway.
        self.is_blocking(x as i32, y as i32)
    }
}

/// Snap a coordinate to the center of its tile: `floor(v) + 0.5`.
///
/// Idempotent: snapping a snapped value is a no-op.
#[inline]
pub fn snap_to_cell(v: f32) -> f32 {
    v.floor() + 0.5
}

fn read_header_value<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<i32, MapError> {
    // Header line shape: "<label> <integer>"
    let _label = tokens.next().ok_or(MapError::Truncated {
        expected: 1,
        found: 0,
    })?;
    let token = tokens.next().ok_or(MapError::Truncated {
        expected: 1,
        found: 0,
    })?;
    token.parse().map_err(|_| MapError::BadToken {
        token: token.to_string(),
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// 5x3 map: solid floor, walls at both ends of the middle row.
    const CORRIDOR: &str = "\
Width 5
Height 3
0 0 0 0 0
1 0 0 0 1
1 1 1 1 1
";

    fn corridor() -> OccupancyGrid {
        OccupancyGrid::load(CORRIDOR.as_bytes()).unwrap()
    }

    #[test]
    fn test_load_dimensions_and_codes() {
        let grid = corridor();
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 3);

        // Bottom row is the last file row
        assert_eq!(grid.tile(0, 0), Some(TileCode::Wall));
        assert_eq!(grid.tile(2, 0), Some(TileCode::Wall));
        // Middle row walls at the ends only
        assert!(grid.is_blocking(0, 1));
        assert!(!grid.is_blocking(2, 1));
        assert!(grid.is_blocking(4, 1));
        // Top row open
        assert!(!grid.is_blocking(2, 2));
    }

    #[test]
    fn test_load_rejects_bad_header() {
        let err = OccupancyGrid::load("Width 0\nHeight 3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MapError::BadHeader { width: 0, height: 3 }));

        let err = OccupancyGrid::load("Width -2\nHeight 3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MapError::BadHeader { .. }));
    }

    #[test]
    fn test_load_rejects_truncated_data() {
        let err = OccupancyGrid::load("Width 2\nHeight 2\n1 0 1".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            MapError::Truncated {
                expected: 4,
                found: 3
            }
        ));
    }

    #[test]
    fn test_load_rejects_bad_token() {
        let err = OccupancyGrid::load("Width 2\nHeight 1\n1 x".as_bytes()).unwrap_err();
        assert!(matches!(err, MapError::BadToken { .. }));
    }

    #[test]
    fn test_spawn_markers_do_not_block() {
        let grid =
            OccupancyGrid::load("Width 4\nHeight 2\n2 3 4 0\n1 1 1 1\n".as_bytes()).unwrap();
        assert_eq!(grid.tile(0, 1), Some(TileCode::HeroSpawn));
        assert_eq!(grid.tile(1, 1), Some(TileCode::EnemySpawn));
        assert_eq!(grid.tile(2, 1), Some(TileCode::CoinSpawn));
        assert!(!grid.is_blocking(0, 1));
        assert!(!grid.is_blocking(1, 1));
        assert!(!grid.is_blocking(2, 1));
    }

    #[test]
    fn test_classify_box_settled_into_floor() {
        let grid = corridor();
        // Unit box one gravity step below cell center: bottom probes land
        // in row 0 (solid), side probes stay in row 1 (open).
        let flags = grid.classify_box(Vec2::new(2.5, 1.45), 1.0, 1.0);
        assert_eq!(flags, EdgeFlags::BOTTOM);
    }

    #[test]
    fn test_classify_box_at_exact_cell_center_reports_no_contact() {
        let grid = corridor();
        // At the snapped center the bottom probes sit exactly on the cell
        // boundary, which truncates into the box's own open row.
        let flags = grid.classify_box(Vec2::new(2.5, 1.5), 1.0, 1.0);
        assert!(flags.is_empty());
    }

    #[test]
    fn test_classify_box_corner_sets_two_bits() {
        let grid = corridor();
        // Pushed into the left wall while settled into the floor.
        let flags = grid.classify_box(Vec2::new(1.4, 1.45), 1.0, 1.0);
        assert!(flags.contains(EdgeFlags::BOTTOM));
        assert!(flags.contains(EdgeFlags::LEFT));
        assert!(!flags.intersects(EdgeFlags::RIGHT | EdgeFlags::TOP));
    }

    #[test]
    fn test_classify_box_free_air() {
        let grid = corridor();
        let flags = grid.classify_box(Vec2::new(2.5, 2.5), 1.0, 1.0);
        assert!(flags.is_empty());
    }

    #[test]
    fn test_edge_flags_explicit_masking() {
        let flags = EdgeFlags::LEFT | EdgeFlags::BOTTOM;
        assert!(flags.contains(EdgeFlags::LEFT));
        assert!(flags.contains(EdgeFlags::BOTTOM));
        assert!(!flags.contains(EdgeFlags::RIGHT));
        assert!(flags.intersects(EdgeFlags::LEFT | EdgeFlags::RIGHT));
        assert_eq!(flags.bits(), 0x09);
    }

    #[test]
    fn test_snap_to_cell() {
        assert_eq!(snap_to_cell(3.2), 3.5);
        assert_eq!(snap_to_cell(3.9), 3.5);
        assert_eq!(snap_to_cell(-0.25), -0.5);
    }

    proptest! {
        #[test]
        fn prop_out_of_bounds_never_blocks(x in -1000i32..1000, y in -1000i32..1000) {
            let grid = corridor();
            if x < 0 || y < 0 || x >= grid.width() || y >= grid.height() {
                prop_assert!(!grid.is_blocking(x, y));
            }
        }

        #[test]
        fn prop_classify_box_deterministic(x in -10.0f32..15.0, y in -10.0f32..13.0) {
            let grid = corridor();
            let pos = Vec2::new(x, y);
            prop_assert_eq!(
                grid.classify_box(pos, 1.0, 1.0),
                grid.classify_box(pos, 1.0, 1.0)
            );
        }

        #[test]
        fn prop_snap_idempotent(v in -1000.0f32..1000.0) {
            prop_assert_eq!(snap_to_cell(snap_to_cell(v)), snap_to_cell(v));
        }
    }
}
