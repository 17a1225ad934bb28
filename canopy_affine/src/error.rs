// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Error returned when inverting a transform whose linear part is singular.
///
/// A transform is treated as singular when the absolute value of its
/// determinant is below [`SINGULAR_EPSILON`](crate::SINGULAR_EPSILON), or when
/// the determinant is not finite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SingularTransform {
    /// Determinant of the linear part at the time inversion was requested.
    pub determinant: f64,
}

impl fmt::Display for SingularTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transform is not invertible (determinant {:e})",
            self.determinant
        )
    }
}

impl core::error::Error for SingularTransform {}
