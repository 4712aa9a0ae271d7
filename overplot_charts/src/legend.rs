// Copyright 2025 the Overplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend mark generation.
//!
//! A [`LegendBlock`] is one titled list of glyph + label rows (the unified
//! legend overlays up to four of them; the composite legend renders one per
//! category). Glyphs are deliberately independent of the rendered marker
//! sizes: the layer's zero-size seed passes exist precisely so a legend
//! glyph and its on-plot marker can differ.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::BezPath;
use overplot_core::{Dash, Mark, MarkId, PathMark, RectMark, TextAnchor, TextBaseline, TextMark};
use peniko::{Brush, Color};
use peniko::color::palette::css;

use crate::layout::Size;
use crate::measure::TextMeasurer;
use crate::palette::PROJECTION_GRAY;
use crate::symbol::Symbol;
use crate::z_order;

/// The glyph drawn next to a legend label.
#[derive(Clone, Debug, PartialEq)]
pub enum LegendGlyph {
    /// A filled color swatch.
    Swatch,
    /// A line sample; the dash pattern mirrors the series linetype.
    Line(Dash),
    /// A "+" marker sample.
    Plus,
    /// A neutral-gray swatch at a fade level (aggregated projections).
    Fade(f32),
}

/// A single legend row.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendItem {
    /// The label string shown next to the glyph.
    pub label: String,
    /// The glyph color (ignored for [`LegendGlyph::Fade`]).
    pub color: Color,
    /// The glyph shape.
    pub glyph: LegendGlyph,
}

impl LegendItem {
    /// A solid color swatch row.
    pub fn swatch(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            color,
            glyph: LegendGlyph::Swatch,
        }
    }

    /// A solid line-sample row.
    pub fn line(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            color,
            glyph: LegendGlyph::Line(Dash::new()),
        }
    }

    /// A dashed line-sample row.
    pub fn dashed_line(label: impl Into<String>, color: Color, dash: Dash) -> Self {
        Self {
            label: label.into(),
            color,
            glyph: LegendGlyph::Line(dash),
        }
    }

    /// A "+"-marker row.
    pub fn plus(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            color,
            glyph: LegendGlyph::Plus,
        }
    }

    /// A gray fade row for aggregated projections.
    pub fn fade(label: impl Into<String>, alpha: f32) -> Self {
        Self {
            label: label.into(),
            color: PROJECTION_GRAY,
            glyph: LegendGlyph::Fade(alpha),
        }
    }
}

/// Truncates a label to a character budget.
pub fn truncate_label(label: &str, budget: usize) -> String {
    label.chars().take(budget).collect()
}

/// A titled legend block: glyph + label rows laid out into columns.
///
/// Items are laid out top-to-bottom, then left-to-right into columns.
#[derive(Clone, Debug)]
pub struct LegendBlock {
    /// Stable-id base; each generated mark uses a deterministic offset from this base.
    pub id_base: u64,
    /// Block title; empty suppresses the title row.
    pub title: String,
    /// Items in display order.
    pub items: Vec<LegendItem>,
    /// Number of columns.
    pub columns: usize,
    /// Label font size.
    pub font_size: f64,
    /// Title font size.
    pub title_font_size: f64,
    /// Glyph cell size.
    pub swatch_size: f64,
    /// Vertical gap between rows.
    pub row_gap: f64,
    /// Horizontal gap between glyph and label.
    pub label_dx: f64,
    /// Horizontal gap between columns.
    pub column_gap: f64,
    /// Label color.
    pub text_fill: Brush,
}

impl LegendBlock {
    /// Creates a legend block with defaults.
    pub fn new(id_base: u64, title: impl Into<String>, items: Vec<LegendItem>) -> Self {
        Self {
            id_base,
            title: title.into(),
            items,
            columns: 1,
            font_size: 10.0,
            title_font_size: 11.0,
            swatch_size: 10.0,
            row_gap: 6.0,
            label_dx: 6.0,
            column_gap: 12.0,
            text_fill: css::BLACK.into(),
        }
    }

    /// Sets the number of columns.
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(1);
        self
    }

    /// Sets label and title font sizes from the figure text size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self.title_font_size = font_size + 1.0;
        self
    }

    /// Returns a copy with every label truncated to `budget` characters.
    pub fn truncated(&self, budget: usize) -> Self {
        let mut out = self.clone();
        for item in &mut out.items {
            item.label = truncate_label(&item.label, budget);
        }
        out
    }

    /// Returns the widest measured label, title included.
    pub fn max_label_width(&self, measurer: &dyn TextMeasurer) -> f64 {
        let mut max_w = if self.title.is_empty() {
            0.0
        } else {
            measurer.measure(&self.title, self.title_font_size).0
        };
        for item in &self.items {
            let (w, _h) = measurer.measure(&item.label, self.font_size);
            max_w = max_w.max(w);
        }
        max_w
    }

    fn row_height(&self) -> f64 {
        self.swatch_size.max(self.font_size)
    }

    fn title_height(&self) -> f64 {
        if self.title.is_empty() {
            0.0
        } else {
            self.title_font_size + 4.0
        }
    }

    fn column_width(&self, measurer: &dyn TextMeasurer) -> f64 {
        let mut label_w = 0.0_f64;
        for item in &self.items {
            let (w, _h) = measurer.measure(&item.label, self.font_size);
            label_w = label_w.max(w);
        }
        self.swatch_size + self.label_dx + label_w
    }

    /// Measures the desired block size.
    pub fn measure(&self, measurer: &dyn TextMeasurer) -> Size {
        let columns = self.columns.max(1).min(self.items.len().max(1));
        let rows_per_col = self.items.len().div_ceil(columns);
        let width = (columns as f64 * (self.column_width(measurer) + self.column_gap)
            - self.column_gap)
            .max(self.max_label_width(measurer));
        let height = self.title_height()
            + rows_per_col as f64 * (self.row_height() + self.row_gap)
            - if rows_per_col > 0 { self.row_gap } else { 0.0 };
        Size { width, height }
    }

    /// Generates the block's marks with its top-left corner at `(x, y)`.
    pub fn marks(&self, x: f64, y: f64, measurer: &dyn TextMeasurer) -> Vec<Mark> {
        let mut out = Vec::new();

        if !self.title.is_empty() {
            out.push(Mark::new(
                MarkId::from_raw(self.id_base),
                z_order::LEGEND_LABELS,
                TextMark::new(x, y + self.title_font_size * 0.5, self.title.clone())
                    .with_font_size(self.title_font_size)
                    .with_fill(self.text_fill.clone()),
            ));
        }

        let columns = self.columns.max(1).min(self.items.len().max(1));
        let rows_per_col = self.items.len().div_ceil(columns);
        let row_height = self.row_height();
        let column_width = self.column_width(measurer);
        let top = y + self.title_height();

        for (i, item) in self.items.iter().enumerate() {
            let col = i / rows_per_col;
            let row = i % rows_per_col;
            let cx = x + col as f64 * (column_width + self.column_gap);
            let cy = top + row as f64 * (row_height + self.row_gap);
            let glyph_y = cy + (row_height - self.swatch_size) * 0.5;
            let label_y = cy + row_height * 0.5;

            out.push(self.glyph_mark(i, item, cx, glyph_y));
            out.push(Mark::new(
                MarkId::from_raw(self.id_base + 1000 + i as u64),
                z_order::LEGEND_LABELS,
                TextMark::new(cx + self.swatch_size + self.label_dx, label_y, item.label.clone())
                    .with_font_size(self.font_size)
                    .with_fill(self.text_fill.clone()),
            ));
        }
        out
    }

    fn glyph_mark(&self, i: usize, item: &LegendItem, x: f64, y: f64) -> Mark {
        let id = MarkId::from_raw(self.id_base + 1 + i as u64);
        let s = self.swatch_size;
        match &item.glyph {
            LegendGlyph::Swatch => Mark::new(
                id,
                z_order::LEGEND_SWATCHES,
                RectMark::new(x, y, s, s, item.color),
            ),
            LegendGlyph::Line(dash) => {
                let mut p = BezPath::new();
                p.move_to((x, y + s * 0.5));
                p.line_to((x + s, y + s * 0.5));
                Mark::new(
                    id,
                    z_order::LEGEND_SWATCHES,
                    PathMark::new(p)
                        .with_stroke(item.color, 1.5)
                        .with_dash(dash.clone()),
                )
            }
            LegendGlyph::Plus => Mark::new(
                id,
                z_order::LEGEND_SWATCHES,
                PathMark::new(Symbol::Plus.path(x + s * 0.5, y + s * 0.5, s))
                    .with_stroke(item.color, 1.2),
            ),
            LegendGlyph::Fade(alpha) => Mark::new(
                id,
                z_order::LEGEND_SWATCHES,
                RectMark::new(x, y, s, s, item.color.with_alpha(*alpha)),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::measure::HeuristicTextMeasurer;

    fn block() -> LegendBlock {
        LegendBlock::new(
            1,
            "Historical data",
            vec![
                LegendItem::plus("ceds", css::BLACK),
                LegendItem::plus("iea-long-name", css::BLACK),
            ],
        )
    }

    #[test]
    fn measure_accounts_for_columns() {
        let measurer = HeuristicTextMeasurer;
        let one_col = block().with_columns(1);
        let two_col = block().with_columns(2);
        let s1 = one_col.measure(&measurer);
        let s2 = two_col.measure(&measurer);
        assert!(s2.width > s1.width);
        assert!(s2.height < s1.height);
    }

    #[test]
    fn truncation_respects_the_character_budget() {
        let cut = block().truncated(4);
        assert_eq!(cut.items[1].label, "iea-");
        assert_eq!(cut.title, "Historical data");
    }

    #[test]
    fn marks_include_title_glyphs_and_labels() {
        let measurer = HeuristicTextMeasurer;
        let marks = block().marks(0.0, 0.0, &measurer);
        assert_eq!(marks.len(), 1 + 2 * 2);
    }

    #[test]
    fn max_label_width_includes_the_title() {
        let measurer = HeuristicTextMeasurer;
        let b = LegendBlock::new(1, "Other projections", vec![LegendItem::fade("m", 0.5)]);
        let w = b.max_label_width(&measurer);
        let (title_w, _) = measurer.measure("Other projections", b.title_font_size);
        assert!((w - title_w).abs() < 1e-9);
    }
}
