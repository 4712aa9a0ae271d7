// Copyright 2025 the Overplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Facet partitioning.
//!
//! Faceting splits the working set into a grid of sub-panels by one series
//! dimension (typically the region). Panels share scales according to the
//! caller's [`ScaleSharing`] policy.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use overplot_core::{Mark, MarkId, RectMark, TextAnchor, TextBaseline, TextMark};
use peniko::color::palette::css;

use crate::category::SeriesDim;
use crate::normalize::WorkingSet;
use crate::z_order;

/// Scale-sharing policy across facet panels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScaleSharing {
    /// Both axes shared across panels.
    #[default]
    Fixed,
    /// Each panel resolves its own x domain.
    FreeX,
    /// Each panel resolves its own y domain.
    FreeY,
    /// Each panel resolves both domains.
    Free,
}

impl ScaleSharing {
    /// Returns `true` when panels resolve their own x domain.
    pub fn free_x(self) -> bool {
        matches!(self, Self::FreeX | Self::Free)
    }

    /// Returns `true` when panels resolve their own y domain.
    pub fn free_y(self) -> bool {
        matches!(self, Self::FreeY | Self::Free)
    }
}

/// Facet configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct FacetSpec {
    /// Dimension whose distinct values become panels.
    pub dim: SeriesDim,
    /// Number of grid columns.
    pub columns: usize,
    /// Scale-sharing policy.
    pub sharing: ScaleSharing,
    /// Whether strips get a background fill; paper style suppresses it.
    pub strip_background: bool,
}

impl FacetSpec {
    /// Creates a facet spec over a dimension with two columns, fixed scales,
    /// and shaded strips.
    pub fn new(dim: SeriesDim) -> Self {
        Self {
            dim,
            columns: 2,
            sharing: ScaleSharing::Fixed,
            strip_background: true,
        }
    }

    /// Sets the column count.
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(1);
        self
    }

    /// Sets the scale-sharing policy.
    pub fn with_sharing(mut self, sharing: ScaleSharing) -> Self {
        self.sharing = sharing;
        self
    }

    /// Suppresses the strip background fill.
    pub fn without_strip_background(mut self) -> Self {
        self.strip_background = false;
        self
    }

    /// Returns the grid shape `(rows, columns)` for `n` panels.
    pub fn grid(&self, n: usize) -> (usize, usize) {
        let columns = self.columns.min(n.max(1));
        (n.div_ceil(columns.max(1)), columns.max(1))
    }
}

/// One facet panel: a label plus the indices of its working rows.
#[derive(Clone, Debug, PartialEq)]
pub struct FacetPanel {
    /// Panel label; `None` for the single unfaceted panel.
    pub label: Option<String>,
    /// Indices into the working set's row vector.
    pub row_indices: Vec<usize>,
}

/// Partitions the working set into panels.
///
/// Without a facet spec this returns one unlabeled panel holding every row.
/// Panels are ordered by label.
pub fn partition(set: &WorkingSet, facet: Option<&FacetSpec>) -> Vec<FacetPanel> {
    let Some(facet) = facet else {
        return alloc::vec![FacetPanel {
            label: None,
            row_indices: (0..set.rows.len()).collect(),
        }];
    };

    let mut labels: Vec<&str> = set.rows.iter().map(|r| r.dim(facet.dim)).collect();
    labels.sort_unstable();
    labels.dedup();

    labels
        .iter()
        .map(|&label| FacetPanel {
            label: Some(String::from(label)),
            row_indices: set
                .rows
                .iter()
                .enumerate()
                .filter(|(_, r)| r.dim(facet.dim) == label)
                .map(|(i, _)| i)
                .collect(),
        })
        .collect()
}

/// Generates the strip marks (background + label) above one panel.
pub fn strip_marks(
    id_base: u64,
    strip: Rect,
    label: &str,
    with_background: bool,
    font_size: f64,
) -> Vec<Mark> {
    let mut out = Vec::new();
    if with_background {
        out.push(Mark::new(
            MarkId::from_raw(id_base),
            z_order::FACET_STRIPS,
            RectMark::new(
                strip.x0,
                strip.y0,
                strip.width(),
                strip.height(),
                css::GAINSBORO,
            ),
        ));
    }
    out.push(Mark::new(
        MarkId::from_raw(id_base + 1),
        z_order::FACET_STRIP_LABELS,
        TextMark::new(0.5 * (strip.x0 + strip.x1), 0.5 * (strip.y0 + strip.y1), label)
            .with_font_size(font_size)
            .with_anchor(TextAnchor::Middle)
            .with_baseline(TextBaseline::Middle),
    ));
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use overplot_core::{SeriesFrame, SeriesRecord};

    use super::*;

    fn set_with_regions() -> WorkingSet {
        let frame = SeriesFrame::from_records(vec![
            SeriesRecord::new("m", "a", "EUR", 2010.0, "v", 1.0),
            SeriesRecord::new("m", "a", "ASIA", 2010.0, "v", 2.0),
            SeriesRecord::new("m", "a", "EUR", 2020.0, "v", 3.0),
        ]);
        WorkingSet::normalize(&frame, None, SeriesDim::Identifier).unwrap()
    }

    #[test]
    fn unfaceted_partition_is_one_panel() {
        let set = set_with_regions();
        let panels = partition(&set, None);
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].label, None);
        assert_eq!(panels[0].row_indices.len(), 3);
    }

    #[test]
    fn panels_are_sorted_by_label() {
        let set = set_with_regions();
        let facet = FacetSpec::new(SeriesDim::Region);
        let panels = partition(&set, Some(&facet));
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0].label.as_deref(), Some("ASIA"));
        assert_eq!(panels[1].label.as_deref(), Some("EUR"));
        assert_eq!(panels[1].row_indices.len(), 2);
    }

    #[test]
    fn grid_never_exceeds_panel_count() {
        let facet = FacetSpec::new(SeriesDim::Region).with_columns(4);
        assert_eq!(facet.grid(2), (1, 2));
        assert_eq!(facet.grid(5), (2, 4));
    }

    #[test]
    fn paper_style_suppresses_strip_background() {
        let strip = Rect::new(0.0, 0.0, 50.0, 14.0);
        let shaded = strip_marks(1, strip, "EUR", true, 9.0);
        let paper = strip_marks(1, strip, "EUR", false, 9.0);
        assert_eq!(shaded.len(), 2);
        assert_eq!(paper.len(), 1);
    }
}
