// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use kurbo::{Circle, Point, Rect, Shape};
use peniko::Color;

/// A positioned, round scene node.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    /// Identifier, unique within a scene.
    pub id: String,
    /// Center in world units.
    pub position: Point,
    /// Radius in world units; never negative.
    pub radius: f64,
    /// Whether the entity is selected. Maintained by the store.
    pub selected: bool,
    /// Fill color for renderers.
    pub color: Color,
}

impl Entity {
    /// Creates an unselected white entity.
    #[must_use]
    pub fn new(id: impl Into<String>, position: impl Into<Point>, radius: f64) -> Self {
        Self {
            id: id.into(),
            position: position.into(),
            radius,
            selected: false,
            color: Color::WHITE,
        }
    }

    /// Sets the color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Marks the entity as initially selected.
    #[must_use]
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// The entity's disk.
    #[must_use]
    pub fn circle(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }

    /// World-space bounding box, radius included.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.circle().bounding_box()
    }
}

/// A connection between two entities. Edges are not spatially indexed.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    /// Identifier, unique among the scene's edges.
    pub id: String,
    /// Id of the source entity.
    pub source: String,
    /// Id of the target entity.
    pub target: String,
    /// Stroke width in world units.
    pub width: f64,
    /// Whether the edge is selected. Maintained by the store.
    pub selected: bool,
    /// Stroke color for renderers.
    pub color: Color,
}

impl Edge {
    /// Creates an unselected edge of width 1.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            width: 1.0,
            selected: false,
            color: Color::WHITE,
        }
    }

    /// Sets the stroke width.
    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Sets the color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Marks the edge as initially selected.
    #[must_use]
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}
