// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Affine: the 2D affine transform value type shared by every Canopy crate.
//!
//! [`AffineTransform`] maps **world** coordinates (where scene entities live)
//! to **screen** coordinates (where input arrives and rendering happens). Its
//! inverse maps the other way and is what hit testing uses.
//!
//! The type is a small `Copy` value wrapping a [`kurbo::Affine`]. It is
//! replaced wholesale on every update; nothing mutates a transform in place.
//! What it adds over the raw Kurbo type:
//! - Checked inversion: [`AffineTransform::invert`] refuses transforms whose
//!   linear part has a negligible determinant and reports [`SingularTransform`].
//! - Pivot-relative scale and rotation, the primitive every zoom and rotate
//!   gesture is built on: `self ∘ translate(pivot) ∘ L ∘ translate(-pivot)`.
//! - The 9-coefficient row-major matrix form used by renderers, with the
//!   perspective row fixed at `[0, 0, 1]`.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use canopy_affine::AffineTransform;
//!
//! // Zoom 2x about the world point (50, 50).
//! let t = AffineTransform::IDENTITY.scale_about(2.0, Point::new(50.0, 50.0));
//!
//! // The pivot stays where it was on screen.
//! assert!(t.apply(Point::new(50.0, 50.0)).distance(Point::new(50.0, 50.0)) < 1e-9);
//! // Everything else moves away from it.
//! assert!(t.apply(Point::ZERO).distance(Point::new(-50.0, -50.0)) < 1e-9);
//!
//! // Screen -> world for hit testing.
//! let inv = t.invert().unwrap();
//! assert!(inv.apply(Point::new(-50.0, -50.0)).distance(Point::ZERO) < 1e-9);
//! ```
//!
//! ## Composition order
//!
//! [`AffineTransform::compose`] follows matrix multiplication: `a.compose(b)`
//! applies `b` first, then `a`. Pan deltas arrive in screen space and are
//! therefore applied *after* the current transform
//! ([`AffineTransform::then_translate`]); pivot-relative operations take a
//! world-space pivot and are applied *before* it.
//!
//! This crate is `no_std`.

#![no_std]

mod error;
mod transform;

pub use error::SingularTransform;
pub use transform::{AffineTransform, SINGULAR_EPSILON};
