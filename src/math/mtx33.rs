//! 2D Affine Transform
//!
//! Row-major 3x3 matrix for composing scale, rotation and translation.
//! Points transform as column vectors: `p' = M * [x, y, 1]ᵀ`.

use serde::{Deserialize, Serialize};

use super::vec2::Vec2;

/// Row-major 3x3 matrix.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mtx33 {
    /// Rows of the matrix, `m[row][col]`.
    pub m: [[f32; 3]; 3],
}

impl Mtx33 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Scaling matrix.
    #[inline]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self {
            m: [[sx, 0.0, 0.0], [0.0, sy, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Rotation matrix (counter-clockwise, radians).
    #[inline]
    pub fn rotation(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Self {
            m: [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Translation matrix.
    #[inline]
    pub const fn translation(tx: f32, ty: f32) -> Self {
        Self {
            m: [[1.0, 0.0, tx], [0.0, 1.0, ty], [0.0, 0.0, 1.0]],
        }
    }

    /// Matrix product `self * other` (apply `other` first).
    pub fn concat(&self, other: &Self) -> Self {
        let mut out = [[0.0f32; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = self.m[r][0] * other.m[0][c]
                    + self.m[r][1] * other.m[1][c]
                    + self.m[r][2] * other.m[2][c];
            }
        }
        Self { m: out }
    }

    /// Transform a point (w = 1).
    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        Vec2 {
            x: self.m[0][0] * p.x + self.m[0][1] * p.y + self.m[0][2],
            y: self.m[1][0] * p.x + self.m[1][1] * p.y + self.m[1][2],
        }
    }

    /// Build the local transform of an entity:
    /// translation ∘ rotation ∘ scale, in that composition order.
    pub fn trs(position: Vec2, angle: f32, scale: Vec2) -> Self {
        Self::translation(position.x, position.y)
            .concat(&Self::rotation(angle))
            .concat(&Self::scale(scale.x, scale.y))
    }
}

impl Default for Mtx33 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_eq(a: Vec2, b: Vec2) {
        assert!((a.x - b.x).abs() < 1e-5, "{a:?} != {b:?}");
        assert!((a.y - b.y).abs() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn test_identity() {
        let p = Vec2::new(3.0, -2.0);
        assert_vec_eq(Mtx33::IDENTITY.transform_point(p), p);
    }

    #[test]
    fn test_translation() {
        let t = Mtx33::translation(2.0, 3.0);
        assert_vec_eq(t.transform_point(Vec2::new(1.0, 1.0)), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_rotation_quarter_turn() {
        let r = Mtx33::rotation(std::f32::consts::FRAC_PI_2);
        assert_vec_eq(r.transform_point(Vec2::new(1.0, 0.0)), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_scale() {
        let s = Mtx33::scale(2.0, 3.0);
        assert_vec_eq(s.transform_point(Vec2::new(1.0, 1.0)), Vec2::new(2.0, 3.0));
    }

    #[test]
    fn test_trs_applies_scale_first() {
        // Scale by 2, rotate 90°, then translate by (1, 0):
        // (1, 0) -> (2, 0) -> (0, 2) -> (1, 2)
        let m = Mtx33::trs(Vec2::new(1.0, 0.0), std::f32::consts::FRAC_PI_2, Vec2::new(2.0, 2.0));
        assert_vec_eq(m.transform_point(Vec2::new(1.0, 0.0)), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_concat_order() {
        let t = Mtx33::translation(1.0, 0.0);
        let s = Mtx33::scale(2.0, 2.0);

        // t * s: scale first, then translate
        let ts = t.concat(&s);
        assert_vec_eq(ts.transform_point(Vec2::new(1.0, 1.0)), Vec2::new(3.0, 2.0));

        // s * t: translate first, then scale
        let st = s.concat(&t);
        assert_vec_eq(st.transform_point(Vec2::new(1.0, 1.0)), Vec2::new(4.0, 2.0));
    }
}
