// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Mul;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Vec2};

use crate::error::SingularTransform;

/// Determinants with an absolute value below this are treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-9;

/// A 2D affine map from world space to screen space.
///
/// Coefficients follow the Kurbo layout `[a, b, c, d, e, f]`:
///
/// ```text
/// x' = a*x + c*y + e
/// y' = b*x + d*y + f
/// ```
///
/// The perspective row of the equivalent 3×3 matrix is always `[0, 0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform(Affine);

impl AffineTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self(Affine::IDENTITY);

    /// Creates a transform from its six affine coefficients `[a, b, c, d, e, f]`.
    #[must_use]
    pub const fn new(coeffs: [f64; 6]) -> Self {
        Self(Affine::new(coeffs))
    }

    /// Wraps an existing Kurbo transform.
    #[must_use]
    pub const fn from_affine(affine: Affine) -> Self {
        Self(affine)
    }

    /// Returns the underlying Kurbo transform, for renderers that consume one.
    #[must_use]
    pub const fn to_affine(self) -> Affine {
        self.0
    }

    /// Returns the six affine coefficients `[a, b, c, d, e, f]`.
    #[must_use]
    pub fn coeffs(self) -> [f64; 6] {
        self.0.as_coeffs()
    }

    /// Creates a transform from a row-major 3×3 matrix.
    ///
    /// The layout is `[scale_x, skew_x, trans_x, skew_y, scale_y, trans_y, p0, p1, p2]`.
    /// Returns `None` unless the perspective row is exactly `[0, 0, 1]`.
    #[must_use]
    pub fn from_matrix3(m: [f64; 9]) -> Option<Self> {
        if m[6] != 0.0 || m[7] != 0.0 || m[8] != 1.0 {
            return None;
        }
        Some(Self::new([m[0], m[3], m[1], m[4], m[2], m[5]]))
    }

    /// Returns the row-major 3×3 matrix form (see [`AffineTransform::from_matrix3`]).
    #[must_use]
    pub fn to_matrix3(self) -> [f64; 9] {
        let [a, b, c, d, e, f] = self.coeffs();
        [a, c, e, b, d, f, 0.0, 0.0, 1.0]
    }

    /// A pure translation.
    #[must_use]
    pub fn translate(delta: impl Into<Vec2>) -> Self {
        Self(Affine::translate(delta))
    }

    /// A uniform scale about the origin.
    #[must_use]
    pub fn scale_uniform(s: f64) -> Self {
        Self(Affine::scale(s))
    }

    /// A rotation about the origin by `theta` radians.
    ///
    /// In the y-down screen convention positive angles turn clockwise.
    #[must_use]
    pub fn rotate(theta: f64) -> Self {
        Self(Affine::rotate(theta))
    }

    /// Returns the transform that applies `other` first and then `self`.
    #[must_use]
    pub fn compose(self, other: Self) -> Self {
        Self(self.0 * other.0)
    }

    /// Appends a screen-space translation: `translate(delta) ∘ self`.
    #[must_use]
    pub fn then_translate(self, delta: Vec2) -> Self {
        Self::translate(delta).compose(self)
    }

    /// Applies `linear` about a world-space `pivot` before `self`.
    ///
    /// Computes `self ∘ translate(pivot) ∘ linear ∘ translate(-pivot)`. The
    /// pivot is a fixed point of the inserted operation, so
    /// `result.apply(pivot) == self.apply(pivot)`.
    #[must_use]
    pub fn transform_about(self, pivot: Point, linear: Self) -> Self {
        let p = pivot.to_vec2();
        self.compose(Self::translate(p))
            .compose(linear)
            .compose(Self::translate(-p))
    }

    /// Uniformly scales by `s` about a world-space `pivot`.
    #[must_use]
    pub fn scale_about(self, s: f64, pivot: Point) -> Self {
        self.transform_about(pivot, Self::scale_uniform(s))
    }

    /// Rotates by `theta` radians about a world-space `pivot`.
    #[must_use]
    pub fn rotate_about(self, theta: f64, pivot: Point) -> Self {
        self.transform_about(pivot, Self::rotate(theta))
    }

    /// Determinant of the linear part.
    #[must_use]
    pub fn determinant(self) -> f64 {
        self.0.determinant()
    }

    /// Whether [`AffineTransform::invert`] would succeed.
    #[must_use]
    pub fn is_invertible(self) -> bool {
        let det = self.determinant();
        det.is_finite() && det.abs() >= SINGULAR_EPSILON
    }

    /// The uniform scale factor this transform applies to areas, as a length ratio.
    ///
    /// For a similarity transform (rotation + uniform scale + translation)
    /// this is exactly its zoom factor.
    #[must_use]
    pub fn uniform_scale(self) -> f64 {
        self.determinant().abs().sqrt()
    }

    /// Returns the inverse transform (screen → world).
    ///
    /// # Errors
    ///
    /// Returns [`SingularTransform`] when the determinant of the linear part is
    /// not finite or its absolute value is below [`SINGULAR_EPSILON`].
    pub fn invert(self) -> Result<Self, SingularTransform> {
        let determinant = self.determinant();
        if !determinant.is_finite() || determinant.abs() < SINGULAR_EPSILON {
            return Err(SingularTransform { determinant });
        }
        Ok(Self(self.0.inverse()))
    }

    /// Maps a point through the full 2×3 transform.
    #[must_use]
    pub fn apply(self, pt: Point) -> Point {
        let [a, b, c, d, e, f] = self.coeffs();
        Point::new(a * pt.x + c * pt.y + e, b * pt.x + d * pt.y + f)
    }

    /// Whether all coefficients are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.coeffs().iter().all(|c| c.is_finite())
    }

    /// Coefficient-wise comparison with an absolute tolerance.
    #[must_use]
    pub fn approx_eq(self, other: Self, epsilon: f64) -> bool {
        self.coeffs()
            .iter()
            .zip(other.coeffs().iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Affine> for AffineTransform {
    fn from(affine: Affine) -> Self {
        Self(affine)
    }
}

impl From<AffineTransform> for Affine {
    fn from(t: AffineTransform) -> Self {
        t.0
    }
}

impl Mul for AffineTransform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.compose(rhs)
    }
}

impl Mul<Point> for AffineTransform {
    type Output = Point;

    fn mul(self, rhs: Point) -> Point {
        self.apply(rhs)
    }
}
