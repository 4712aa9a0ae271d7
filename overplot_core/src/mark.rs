// Copyright 2025 the Overplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolved geometric marks.
//!
//! A mark is the smallest unit a renderer executes: one path, rect, or text
//! run, with an explicit z-index for paint order. Renderers should sort by
//! `(z_index, MarkId)` for a deterministic tie-break.

extern crate alloc;

use alloc::string::String;

use kurbo::BezPath;
use peniko::{Brush, Color};
use smallvec::SmallVec;

/// A stable mark identity.
///
/// Ids are deterministic per invocation: guide marks use fixed offsets from a
/// spec's `id_base`, series marks derive from the source row key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkId(pub u64);

impl MarkId {
    /// Creates a mark id from a raw value.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Derives a mark id for a data row, stable in `(base, row_key)`.
    pub fn for_row(base: u64, row_key: u64) -> Self {
        Self(base.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(row_key))
    }
}

/// Horizontal text anchoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// Anchor at the start (left for LTR text).
    Start,
    /// Anchor at the horizontal center.
    Middle,
    /// Anchor at the end (right for LTR text).
    End,
}

/// Vertical text baseline placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// Center the text vertically on the y coordinate.
    Middle,
    /// Place the alphabetic baseline on the y coordinate.
    Alphabetic,
    /// Hang the text below the y coordinate.
    Hanging,
    /// Place the ideographic baseline on the y coordinate.
    Ideographic,
}

/// A stroke dash pattern in scene units; empty means a solid stroke.
pub type Dash = SmallVec<[f64; 4]>;

/// A stroked/filled path mark.
#[derive(Clone, Debug)]
pub struct PathMark {
    /// Path geometry in scene coordinates.
    pub path: BezPath,
    /// Fill paint.
    pub fill: Brush,
    /// Stroke paint.
    pub stroke: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
    /// Dash pattern; empty means solid.
    pub dash: Dash,
}

impl PathMark {
    /// Creates a path mark with a transparent fill and a black unit stroke.
    pub fn new(path: BezPath) -> Self {
        Self {
            path,
            fill: Brush::Solid(Color::TRANSPARENT),
            stroke: Brush::default(),
            stroke_width: 1.0,
            dash: Dash::new(),
        }
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Sets stroke paint and width.
    pub fn with_stroke(mut self, stroke: impl Into<Brush>, stroke_width: f64) -> Self {
        self.stroke = stroke.into();
        self.stroke_width = stroke_width;
        self
    }

    /// Sets the dash pattern.
    pub fn with_dash(mut self, dash: Dash) -> Self {
        self.dash = dash;
        self
    }
}

/// An axis-aligned filled rectangle mark.
#[derive(Clone, Debug)]
pub struct RectMark {
    /// Left edge in scene coordinates.
    pub x: f64,
    /// Top edge in scene coordinates.
    pub y: f64,
    /// Width in scene coordinates.
    pub w: f64,
    /// Height in scene coordinates.
    pub h: f64,
    /// Fill paint.
    pub fill: Brush,
}

impl RectMark {
    /// Creates a rect mark.
    pub fn new(x: f64, y: f64, w: f64, h: f64, fill: impl Into<Brush>) -> Self {
        Self {
            x,
            y,
            w,
            h,
            fill: fill.into(),
        }
    }
}

/// An unshaped text mark.
#[derive(Clone, Debug)]
pub struct TextMark {
    /// Anchor x position in scene coordinates.
    pub x: f64,
    /// Anchor y position in scene coordinates.
    pub y: f64,
    /// Text content (a single unshaped line).
    pub text: String,
    /// Font size in scene coordinates.
    pub font_size: f64,
    /// Fill paint.
    pub fill: Brush,
    /// Horizontal anchoring relative to `x`.
    pub anchor: TextAnchor,
    /// Vertical baseline relative to `y`.
    pub baseline: TextBaseline,
    /// Rotation angle in degrees around the anchor point.
    pub angle: f64,
}

impl TextMark {
    /// Creates a text mark with default styling (10px, black, start/middle).
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            font_size: 10.0,
            fill: Brush::default(),
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Middle,
            angle: 0.0,
        }
    }

    /// Sets the font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Sets the horizontal anchor.
    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Sets the vertical baseline.
    pub fn with_baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }
}

/// The geometric payload of a mark.
#[derive(Clone, Debug)]
pub enum MarkKind {
    /// A stroked/filled path.
    Path(PathMark),
    /// A filled rectangle.
    Rect(RectMark),
    /// A text run.
    Text(TextMark),
}

impl From<PathMark> for MarkKind {
    fn from(value: PathMark) -> Self {
        Self::Path(value)
    }
}

impl From<RectMark> for MarkKind {
    fn from(value: RectMark) -> Self {
        Self::Rect(value)
    }
}

impl From<TextMark> for MarkKind {
    fn from(value: TextMark) -> Self {
        Self::Text(value)
    }
}

/// One renderable primitive with identity and paint order.
#[derive(Clone, Debug)]
pub struct Mark {
    /// Stable mark id.
    pub id: MarkId,
    /// Rendering order hint; higher is painted later.
    pub z_index: i32,
    /// Geometric payload.
    pub kind: MarkKind,
}

impl Mark {
    /// Creates a mark.
    pub fn new(id: MarkId, z_index: i32, kind: impl Into<MarkKind>) -> Self {
        Self {
            id,
            z_index,
            kind: kind.into(),
        }
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn row_ids_are_stable_and_distinct() {
        let a = MarkId::for_row(1, 0);
        let b = MarkId::for_row(1, 1);
        let c = MarkId::for_row(2, 0);
        assert_eq!(a, MarkId::for_row(1, 0));
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn path_mark_defaults_to_transparent_fill() {
        let mark = PathMark::new(BezPath::new());
        assert_eq!(mark.fill, Brush::Solid(Color::TRANSPARENT));
        assert!(mark.dash.is_empty());
    }
}
