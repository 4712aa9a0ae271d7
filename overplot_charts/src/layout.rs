// Copyright 2025 the Overplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tiny measure/arrange layout helper for the composed figure.
//!
//! - **Measure**: axis margins, strip heights, and the unified legend size
//!   are computed first (the legend via the injected text measurer).
//! - **Arrange**: panel data rectangles are placed on a grid, with the
//!   legend reserved at the right edge when present.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::Rect;

/// A width/height pair used by figure layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    /// Width in chart coordinate units.
    pub width: f64,
    /// Height in chart coordinate units.
    pub height: f64,
}

/// Layout inputs for the composed figure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FigureLayoutSpec {
    /// Outer figure bounds.
    pub view_size: Size,
    /// Padding around the whole figure.
    pub outer_padding: f64,
    /// Left-axis margin thickness inside each panel cell.
    pub axis_left: f64,
    /// Bottom-axis margin thickness inside each panel cell.
    pub axis_bottom: f64,
    /// Facet strip height above each panel; zero when unfaceted.
    pub strip_height: f64,
    /// Gap between panel cells.
    pub panel_gap: f64,
    /// Grid shape as `(rows, columns)`.
    pub grid: (usize, usize),
    /// Desired size of a right-hand legend, if one is attached.
    pub legend: Option<Size>,
    /// Gap between the panel grid and the legend.
    pub legend_gap: f64,
}

impl Default for FigureLayoutSpec {
    fn default() -> Self {
        Self {
            view_size: Size {
                width: 640.0,
                height: 480.0,
            },
            outer_padding: 10.0,
            axis_left: 36.0,
            axis_bottom: 24.0,
            strip_height: 0.0,
            panel_gap: 12.0,
            grid: (1, 1),
            legend: None,
            legend_gap: 18.0,
        }
    }
}

/// Output of the arrange pass.
#[derive(Clone, Debug, PartialEq)]
pub struct FigureLayout {
    /// Outer figure bounds.
    pub view: Rect,
    /// Panel data rectangles, row-major.
    pub panels: Vec<Rect>,
    /// Facet strip rectangles, aligned with `panels`; empty when unfaceted.
    pub strips: Vec<Rect>,
    /// Reserved legend rectangle, if any.
    pub legend: Option<Rect>,
}

impl FigureLayout {
    /// Computes a layout from the provided specification.
    pub fn arrange(spec: &FigureLayoutSpec) -> Self {
        let pad = spec.outer_padding.max(0.0);
        let (rows, cols) = (spec.grid.0.max(1), spec.grid.1.max(1));
        let gap = spec.panel_gap.max(0.0);

        let legend_w = spec
            .legend
            .map_or(0.0, |s| s.width.max(0.0) + spec.legend_gap.max(0.0));

        let view = Rect::new(0.0, 0.0, spec.view_size.width, spec.view_size.height);
        let content = Rect::new(
            pad,
            pad,
            (view.x1 - pad - legend_w).max(pad),
            view.y1 - pad,
        );

        let cell_w = ((content.width() - gap * (cols - 1) as f64) / cols as f64).max(0.0);
        let cell_h = ((content.height() - gap * (rows - 1) as f64) / rows as f64).max(0.0);
        let strip_h = spec.strip_height.max(0.0).min(cell_h);

        let mut panels = Vec::with_capacity(rows * cols);
        let mut strips = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                let x0 = content.x0 + col as f64 * (cell_w + gap);
                let y0 = content.y0 + row as f64 * (cell_h + gap);
                let strip = Rect::new(x0 + spec.axis_left, y0, x0 + cell_w, y0 + strip_h);
                let data = Rect::new(
                    x0 + spec.axis_left,
                    y0 + strip_h,
                    x0 + cell_w,
                    (y0 + cell_h - spec.axis_bottom).max(y0 + strip_h),
                );
                panels.push(data);
                if strip_h > 0.0 {
                    strips.push(strip);
                }
            }
        }

        let legend = spec.legend.map(|s| {
            Rect::new(
                content.x1 + spec.legend_gap.max(0.0),
                content.y0,
                content.x1 + spec.legend_gap.max(0.0) + s.width.max(0.0),
                content.y0 + s.height.max(0.0),
            )
        });

        Self {
            view,
            panels,
            strips,
            legend,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn legend_reserves_space_at_the_right() {
        let spec = FigureLayoutSpec {
            legend: Some(Size {
                width: 120.0,
                height: 80.0,
            }),
            ..FigureLayoutSpec::default()
        };
        let layout = FigureLayout::arrange(&spec);
        let legend = layout.legend.expect("missing legend rect");
        assert!(legend.x0 > layout.panels[0].x1);
        assert!(legend.x1 <= layout.view.x1);
    }

    #[test]
    fn grid_produces_row_major_panels() {
        let spec = FigureLayoutSpec {
            grid: (2, 2),
            strip_height: 14.0,
            ..FigureLayoutSpec::default()
        };
        let layout = FigureLayout::arrange(&spec);
        assert_eq!(layout.panels.len(), 4);
        assert_eq!(layout.strips.len(), 4);
        assert!(layout.panels[0].x1 <= layout.panels[1].x0);
        assert!(layout.panels[0].y1 <= layout.panels[2].y0);
        assert!((layout.strips[0].y1 - layout.panels[0].y0).abs() < 1e-9);
    }
}
