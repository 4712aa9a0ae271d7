// Copyright 2025 the Overplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw categories and per-category encoding rules.
//!
//! Every working row is tagged with exactly one [`DrawCategory`]; the tag
//! drives paint order, color-key selection, and legend partitioning. The
//! per-category visual encodings live here as a small dispatch table instead
//! of being scattered through the layer generators.

extern crate alloc;

use alloc::string::String;

use crate::error::ConfigError;

/// Scenario value that marks a secondary row as observed reference data.
pub const HISTORICAL_SCENARIO: &str = "historical";

/// Classification of a series for rendering and legend purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawCategory {
    /// The primary dataset being analyzed.
    Current,
    /// Observed reference data (scenario equals [`HISTORICAL_SCENARIO`]).
    Historical,
    /// Externally supplied scenario data that is not historical.
    Projected,
}

impl DrawCategory {
    /// All categories, in the fixed key-concatenation order used by the
    /// palette assigner.
    pub const ALL: [Self; 3] = [Self::Current, Self::Historical, Self::Projected];

    /// The legend title used for this category's block.
    pub fn legend_title(self, color_dimension: &str) -> String {
        match self {
            Self::Current => String::from(color_dimension),
            Self::Historical => String::from("Historical data"),
            Self::Projected => String::from("Other projections"),
        }
    }
}

/// A column of the working set usable as a color, linetype, or facet key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SeriesDim {
    /// The model field.
    Model,
    /// The scenario field.
    Scenario,
    /// The region (facet) field.
    Region,
    /// The variable field.
    Variable,
    /// The derived model+scenario identifier.
    Identifier,
}

impl SeriesDim {
    /// The display name of this dimension, used for legend titles.
    pub fn label(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Scenario => "scenario",
            Self::Region => "region",
            Self::Variable => "variable",
            Self::Identifier => "identifier",
        }
    }
}

/// Caller-chosen paint order over the three draw categories.
///
/// Categories are drawn in *reverse* of this list, so the first entry ends up
/// painted last and therefore topmost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderPriority([DrawCategory; 3]);

impl Default for RenderPriority {
    fn default() -> Self {
        Self([
            DrawCategory::Current,
            DrawCategory::Historical,
            DrawCategory::Projected,
        ])
    }
}

impl RenderPriority {
    /// Creates a priority from an ordered triple.
    ///
    /// Fails with [`ConfigError::InvalidPriority`] unless the triple is a
    /// permutation of the three categories.
    pub fn new(order: [DrawCategory; 3]) -> Result<Self, ConfigError> {
        for (i, cat) in order.iter().enumerate() {
            if order[..i].contains(cat) {
                return Err(ConfigError::InvalidPriority { duplicate: *cat });
            }
        }
        Ok(Self(order))
    }

    /// The priority order as supplied (first = most prominent).
    pub fn order(&self) -> [DrawCategory; 3] {
        self.0
    }

    /// Categories in paint order: the last priority entry is drawn first
    /// (bottom), the first entry last (top).
    pub fn draw_order(&self) -> [DrawCategory; 3] {
        [self.0[2], self.0[1], self.0[0]]
    }

    /// Zero-based paint slot of a category (0 = bottom).
    pub fn draw_slot(&self, category: DrawCategory) -> usize {
        self.draw_order()
            .iter()
            .position(|&c| c == category)
            .unwrap_or(0)
    }

    /// Returns `true` when historical data paints over current data.
    ///
    /// The historical marker escalates to its emphasis size in this case.
    pub fn historical_over_current(&self) -> bool {
        self.draw_slot(DrawCategory::Historical) > self.draw_slot(DrawCategory::Current)
    }
}

/// Marker sizing policy for the historical layer.
///
/// The source behavior shrinks historical markers when they sit under current
/// data; the escalation stays configurable because the intent beyond visual
/// de-emphasis is unclear.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerEmphasis {
    /// Marker size when historical sits under current data.
    pub baseline: f64,
    /// Marker size when historical paints over current data.
    pub emphasized: f64,
}

impl Default for MarkerEmphasis {
    fn default() -> Self {
        Self {
            baseline: 2.0,
            emphasized: 4.0,
        }
    }
}

impl MarkerEmphasis {
    /// Resolves the historical marker size for a given priority.
    pub fn size_for(&self, priority: &RenderPriority) -> f64 {
        if priority.historical_over_current() {
            self.emphasized
        } else {
            self.baseline
        }
    }
}

/// Per-category visual encoding rules.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryEncoding {
    /// Line alpha for this category.
    pub line_alpha: f32,
    /// Line width in scene units.
    pub line_width: f64,
    /// How the category's point markers are drawn.
    pub marker: MarkerPolicy,
}

/// Marker handling per category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerPolicy {
    /// Plain dots at each observation when dot display is enabled.
    Dots,
    /// A zero-size legend-seed pass plus a legend-suppressed plus-glyph pass.
    SeededPlus,
    /// No markers for this category.
    None,
}

impl CategoryEncoding {
    /// The encoding rules for a category.
    ///
    /// `detailed_projection` switches projected series from the aggregated
    /// gray fade to per-identifier coloring at moderate alpha.
    pub fn for_category(category: DrawCategory, detailed_projection: bool) -> Self {
        match category {
            DrawCategory::Current => Self {
                line_alpha: 1.0,
                line_width: 1.2,
                marker: MarkerPolicy::Dots,
            },
            DrawCategory::Historical => Self {
                line_alpha: 0.3,
                line_width: 1.0,
                marker: MarkerPolicy::SeededPlus,
            },
            DrawCategory::Projected => Self {
                line_alpha: if detailed_projection { 0.7 } else { 1.0 },
                line_width: 0.9,
                marker: MarkerPolicy::None,
            },
        }
    }

    /// The color key dimension for a category.
    ///
    /// Current rows use the caller's active color dimension; historical and
    /// projected rows key on the model, except that detailed projection mode
    /// keys projected rows on the identifier.
    pub fn color_dimension(
        category: DrawCategory,
        active: SeriesDim,
        detailed_projection: bool,
    ) -> SeriesDim {
        match category {
            DrawCategory::Current => active,
            DrawCategory::Historical => SeriesDim::Model,
            DrawCategory::Projected => {
                if detailed_projection {
                    SeriesDim::Identifier
                } else {
                    SeriesDim::Model
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn default_priority_draws_current_last() {
        let priority = RenderPriority::default();
        assert_eq!(
            priority.draw_order(),
            [
                DrawCategory::Projected,
                DrawCategory::Historical,
                DrawCategory::Current,
            ]
        );
        assert!(!priority.historical_over_current());
    }

    #[test]
    fn duplicate_category_is_rejected() {
        let err = RenderPriority::new([
            DrawCategory::Current,
            DrawCategory::Current,
            DrawCategory::Projected,
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidPriority {
                duplicate: DrawCategory::Current
            }
        );
    }

    #[test]
    fn historical_first_priority_escalates_marker() {
        let priority = RenderPriority::new([
            DrawCategory::Historical,
            DrawCategory::Current,
            DrawCategory::Projected,
        ])
        .unwrap();
        assert!(priority.historical_over_current());
        let marker = MarkerEmphasis::default();
        assert_eq!(marker.size_for(&priority), marker.emphasized);
        assert_eq!(marker.size_for(&RenderPriority::default()), marker.baseline);
    }
}
