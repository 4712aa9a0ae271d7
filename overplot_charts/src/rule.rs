// Copyright 2025 the Overplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rule mark generation.
//!
//! A "rule" is a straight line segment. The chart layer uses dashed rules
//! for the first-model-period marker and for caller-supplied horizontal
//! reference values.

extern crate alloc;

use kurbo::BezPath;
use overplot_core::{Dash, Mark, MarkId, PathMark};
use peniko::Brush;
use smallvec::smallvec;

use crate::z_order;

/// The dash pattern shared by all reference rules.
pub fn reference_dash() -> Dash {
    smallvec![4.0, 3.0]
}

/// A rule mark spec (a stroked line segment).
#[derive(Clone, Debug)]
pub struct RuleMarkSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// Start point x in scene coordinates.
    pub x0: f64,
    /// Start point y in scene coordinates.
    pub y0: f64,
    /// End point x in scene coordinates.
    pub x1: f64,
    /// End point y in scene coordinates.
    pub y1: f64,
    /// Stroke paint.
    pub stroke: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
    /// Dash pattern; empty means solid.
    pub dash: Dash,
    /// Rendering order hint.
    pub z_index: i32,
}

impl RuleMarkSpec {
    /// Creates a new rule between two points.
    pub fn new(id: MarkId, x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            id,
            x0,
            y0,
            x1,
            y1,
            stroke: Brush::default(),
            stroke_width: 1.0,
            dash: Dash::new(),
            z_index: z_order::REFERENCE_RULES,
        }
    }

    /// Creates a horizontal rule.
    pub fn horizontal(id: MarkId, y: f64, x0: f64, x1: f64) -> Self {
        Self::new(id, x0, y, x1, y)
    }

    /// Creates a vertical rule.
    pub fn vertical(id: MarkId, x: f64, y0: f64, y1: f64) -> Self {
        Self::new(id, x, y0, x, y1)
    }

    /// Sets stroke paint and width.
    pub fn with_stroke(mut self, stroke: impl Into<Brush>, stroke_width: f64) -> Self {
        self.stroke = stroke.into();
        self.stroke_width = stroke_width;
        self
    }

    /// Applies the shared reference dash pattern.
    pub fn dashed(mut self) -> Self {
        self.dash = reference_dash();
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Generates the rule mark.
    pub fn mark(&self) -> Mark {
        let mut p = BezPath::new();
        p.move_to((self.x0, self.y0));
        p.line_to((self.x1, self.y1));
        Mark::new(
            self.id,
            self.z_index,
            PathMark::new(p)
                .with_stroke(self.stroke.clone(), self.stroke_width)
                .with_dash(self.dash.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use overplot_core::MarkKind;

    use super::*;

    #[test]
    fn dashed_rule_carries_the_reference_pattern() {
        let mark = RuleMarkSpec::vertical(MarkId::from_raw(7), 10.0, 0.0, 50.0)
            .dashed()
            .mark();
        let MarkKind::Path(path) = mark.kind else {
            panic!("rule must be a path mark");
        };
        assert_eq!(path.dash.as_slice(), reference_dash().as_slice());
    }
}
