// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use core::fmt;

/// Rejected structural edit of a [`SceneStore`](crate::SceneStore).
///
/// Only adding entities and edges can fail. Gesture-facing mutations
/// (moving, selecting) treat unknown ids as a no-op instead.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneError {
    /// An entity or edge with this id already exists.
    DuplicateId(String),
    /// An edge endpoint names an entity that does not exist.
    UnknownEntity(String),
    /// The entity's position has a NaN or infinite coordinate.
    NonFinitePosition(String),
    /// The entity's radius is negative, NaN, or infinite.
    InvalidRadius {
        /// Entity id.
        id: String,
        /// Offending radius.
        radius: f64,
    },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate id `{id}`"),
            Self::UnknownEntity(id) => write!(f, "unknown entity `{id}`"),
            Self::NonFinitePosition(id) => write!(f, "entity `{id}` has a non-finite position"),
            Self::InvalidRadius { id, radius } => {
                write!(f, "entity `{id}` has invalid radius {radius}")
            }
        }
    }
}

impl core::error::Error for SceneError {}
