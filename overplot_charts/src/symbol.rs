// Copyright 2025 the Overplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Symbol helpers for point-like marks.

use kurbo::{BezPath, Circle, Shape};

/// A small set of symbol shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A circle, drawn filled.
    Circle,
    /// A "+" cross, drawn stroked (it has no fillable area).
    Plus,
}

impl Symbol {
    /// Returns a path for this symbol centered at `cx, cy`, using `size` as the diameter/extent.
    pub fn path(self, cx: f64, cy: f64, size: f64) -> BezPath {
        match self {
            Self::Circle => circle_path(cx, cy, size),
            Self::Plus => plus_path(cx, cy, size),
        }
    }

    /// Returns `true` when the symbol must be stroked rather than filled.
    pub fn is_stroked(self) -> bool {
        matches!(self, Self::Plus)
    }
}

fn circle_path(cx: f64, cy: f64, size: f64) -> BezPath {
    let r = size * 0.5;
    let circle = Circle::new((cx, cy), r);
    // In real renderers the flattening tolerance is usually based on the
    // target device/pixel size.
    let tolerance = 0.1;
    circle.path_elements(tolerance).collect()
}

fn plus_path(cx: f64, cy: f64, size: f64) -> BezPath {
    let half = size * 0.5;
    let mut p = BezPath::new();
    p.move_to((cx - half, cy));
    p.line_to((cx + half, cy));
    p.move_to((cx, cy - half));
    p.line_to((cx, cy + half));
    p
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn plus_symbol_is_stroked() {
        assert!(Symbol::Plus.is_stroked());
        assert!(!Symbol::Circle.is_stroked());
    }

    #[test]
    fn plus_path_spans_the_requested_extent() {
        let p = Symbol::Plus.path(10.0, 20.0, 4.0);
        let b = p.bounding_box();
        assert!((b.x0 - 8.0).abs() < 1e-9);
        assert!((b.x1 - 12.0).abs() < 1e-9);
        assert!((b.y0 - 18.0).abs() < 1e-9);
        assert!((b.y1 - 22.0).abs() < 1e-9);
    }
}
