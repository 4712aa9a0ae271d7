// Copyright 2025 the Overplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Figure artifacts.
//!
//! A [`Figure`] is the renderable result: an outer view box plus marks. The
//! composite legend path produces a [`CompositeFigure`] instead, which keeps
//! the plot body and the pre-rendered legend row as separate figures; the
//! handle is returned as data and never forces display.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::Rect;
use overplot_core::Mark;

/// A renderable figure: a view box and the marks inside it.
#[derive(Clone, Debug, Default)]
pub struct Figure {
    /// Outer bounds of the figure.
    pub view: Rect,
    /// All marks, in generation order.
    pub marks: Vec<Mark>,
}

impl Figure {
    /// Creates an empty figure with the given view box.
    pub fn new(view: Rect) -> Self {
        Self {
            view,
            marks: Vec::new(),
        }
    }

    /// Appends marks.
    pub fn extend(&mut self, marks: impl IntoIterator<Item = Mark>) {
        self.marks.extend(marks);
    }

    /// Sorts marks into paint order: `(z_index, MarkId)`.
    pub fn sort_marks(&mut self) {
        self.marks.sort_by_key(|m| (m.z_index, m.id));
    }
}

/// One panel of the composite legend row.
#[derive(Clone, Debug)]
pub struct LegendPanel {
    /// Horizontal share of the legend row, in `(0, 1]`.
    pub share: f64,
    /// The independently rendered legend box.
    pub figure: Figure,
}

/// A plot body stacked above a pre-rendered composite legend row.
#[derive(Clone, Debug)]
pub struct CompositeFigure {
    /// The plot body, with its own legend hidden.
    pub plot: Figure,
    /// Legend panels left to right; shares sum to 1 (within rounding).
    pub legend_row: Vec<LegendPanel>,
    /// Relative heights of `(plot, legend_row)`.
    pub heights: (f64, f64),
}

/// The result of composing a chart: one unified figure, or a composite handle.
#[derive(Clone, Debug)]
pub enum FigureArtifact {
    /// A single figure with the legend attached.
    Unified(Figure),
    /// A plot body plus an independently rendered legend row.
    Composite(CompositeFigure),
}

impl FigureArtifact {
    /// Returns the unified figure, if this artifact is one.
    pub fn as_unified(&self) -> Option<&Figure> {
        match self {
            Self::Unified(figure) => Some(figure),
            Self::Composite(_) => None,
        }
    }

    /// Returns the composite handle, if this artifact is one.
    pub fn as_composite(&self) -> Option<&CompositeFigure> {
        match self {
            Self::Unified(_) => None,
            Self::Composite(composite) => Some(composite),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use overplot_core::{MarkId, RectMark};
    use peniko::color::palette::css;

    use super::*;

    #[test]
    fn sort_orders_by_z_then_id() {
        let mut figure = Figure::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let rect = |id: u64, z: i32| {
            Mark::new(
                MarkId::from_raw(id),
                z,
                RectMark::new(0.0, 0.0, 1.0, 1.0, css::BLACK),
            )
        };
        figure.extend([rect(2, 5), rect(1, 5), rect(3, -1)]);
        figure.sort_marks();
        let ids: Vec<u64> = figure.marks.iter().map(|m| m.id.0).collect();
        assert_eq!(ids, [3, 1, 2]);
    }
}
