// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in spatial backends.
//!
//! - [`quadtree`]: point-region quadtree. Each internal node splits its square
//!   at a stored midpoint into four quadrants; leaves hold up to
//!   `max_leaf` entries before splitting. The root doubles toward points that
//!   fall outside it, so there is no fixed world extent to configure.
//! - [`flatvec`]: a plain vector scanned linearly.

pub mod flatvec;
pub mod quadtree;
