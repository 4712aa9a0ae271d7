// Copyright 2025 the Overplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Record normalization and category tagging.
//!
//! The normalizer turns the primary frame and the optional secondary
//! (historical/projected) frame into one combined working set:
//! - rows with a missing value are dropped,
//! - secondary rows are classified historical vs projected by the reserved
//!   scenario marker,
//! - every surviving row gets a canonical identifier, and
//! - the first primary period and the projection horizon are recorded for
//!   the reference rule and the projected-layer clamp.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use overplot_core::SeriesFrame;

use crate::category::{DrawCategory, HISTORICAL_SCENARIO, SeriesDim};
use crate::error::ConfigError;

/// Row keys from the secondary frame are offset into their own key space so
/// marks from the two inputs never collide.
const SECONDARY_KEY_OFFSET: u64 = 1 << 32;

/// One cleaned, category-tagged observation.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkingRow {
    /// Stable row key carried from the source frame.
    pub row_key: u64,
    /// Permanent draw-category tag.
    pub category: DrawCategory,
    /// Model that produced the value.
    pub model: String,
    /// Scenario the value belongs to.
    pub scenario: String,
    /// Facet dimension value, typically a region.
    pub region: String,
    /// Ordinal period, typically a year.
    pub period: f64,
    /// Reported variable name.
    pub variable: String,
    /// Observed value (always present after normalization).
    pub value: f64,
    /// Canonical series identifier.
    pub identifier: String,
}

impl WorkingRow {
    /// Returns the row's value for a series dimension.
    pub fn dim(&self, dim: SeriesDim) -> &str {
        match dim {
            SeriesDim::Model => &self.model,
            SeriesDim::Scenario => &self.scenario,
            SeriesDim::Region => &self.region,
            SeriesDim::Variable => &self.variable,
            SeriesDim::Identifier => &self.identifier,
        }
    }
}

/// The combined, category-tagged working set.
#[derive(Clone, Debug, Default)]
pub struct WorkingSet {
    /// All surviving rows, primary first, in source order.
    pub rows: Vec<WorkingRow>,
    /// The first period present in the primary data, if any.
    pub first_current_period: Option<f64>,
    /// The maximum period over current and historical rows; projected rows
    /// past this horizon are never drawn.
    pub horizon: Option<f64>,
}

/// Derives the canonical identifier for a model/scenario pair.
///
/// The derivation is unique and order-stable per pair; empty sides collapse
/// so the separator never dangles.
pub fn derive_identifier(model: &str, scenario: &str) -> String {
    match (model.is_empty(), scenario.is_empty()) {
        (false, false) => {
            let mut out = String::with_capacity(model.len() + scenario.len() + 1);
            out.push_str(model);
            out.push(' ');
            out.push_str(scenario);
            out
        }
        (false, true) => String::from(model),
        (true, _) => String::from(scenario),
    }
}

impl WorkingSet {
    /// Builds the working set from the primary frame and the optional
    /// secondary frame.
    ///
    /// Fails with [`ConfigError::ColorDimensionWithHistory`] when a
    /// non-default color dimension is requested while secondary rows
    /// survive cleaning; historical coloring is fixed to the model field.
    pub fn normalize(
        primary: &SeriesFrame,
        secondary: Option<&SeriesFrame>,
        color_dim: SeriesDim,
    ) -> Result<Self, ConfigError> {
        let mut rows = Vec::new();

        push_cleaned(&mut rows, primary, 0, |_| DrawCategory::Current);
        let primary_len = rows.len();

        if let Some(frame) = secondary {
            push_cleaned(&mut rows, frame, SECONDARY_KEY_OFFSET, |scenario| {
                if scenario == HISTORICAL_SCENARIO {
                    DrawCategory::Historical
                } else {
                    DrawCategory::Projected
                }
            });
        }

        let has_secondary = rows.len() > primary_len;
        if has_secondary && color_dim != SeriesDim::Identifier {
            return Err(ConfigError::ColorDimensionWithHistory {
                dimension: String::from(color_dim.label()),
            });
        }

        let first_current_period = fold_period(&rows, |cat| cat == DrawCategory::Current, f64::min);
        let horizon = fold_period(
            &rows,
            |cat| matches!(cat, DrawCategory::Current | DrawCategory::Historical),
            f64::max,
        );

        Ok(Self {
            rows,
            first_current_period,
            horizon,
        })
    }

    /// Iterates the rows tagged with a category.
    pub fn rows_in(&self, category: DrawCategory) -> impl Iterator<Item = &WorkingRow> {
        self.rows.iter().filter(move |r| r.category == category)
    }

    /// Returns `true` when any row carries the category.
    pub fn has_category(&self, category: DrawCategory) -> bool {
        self.rows.iter().any(|r| r.category == category)
    }

    /// Returns the sorted distinct values of a dimension within a category.
    pub fn distinct(&self, category: DrawCategory, dim: SeriesDim) -> Vec<&str> {
        let mut out: Vec<&str> = self.rows_in(category).map(|r| r.dim(dim)).collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Returns the number of distinct model+scenario pairs within a category.
    pub fn distinct_pair_count(&self, category: DrawCategory) -> usize {
        let mut pairs: Vec<(&str, &str)> = self
            .rows_in(category)
            .map(|r| (r.model.as_str(), r.scenario.as_str()))
            .collect();
        pairs.sort_unstable();
        pairs.dedup();
        pairs.len()
    }

    /// Returns `true` when a projected row would be drawn (inside the horizon).
    pub fn projected_visible(&self, row: &WorkingRow) -> bool {
        match self.horizon {
            Some(h) => row.period <= h,
            None => true,
        }
    }

    /// Iterates the rows that survive the projected-layer clamp.
    pub fn drawable_rows(&self) -> impl Iterator<Item = &WorkingRow> {
        self.rows
            .iter()
            .filter(|r| r.category != DrawCategory::Projected || self.projected_visible(r))
    }

    /// Returns the `(min, max)` period over all drawable rows.
    pub fn period_domain(&self) -> Option<(f64, f64)> {
        crate::scale::infer_domain(self.drawable_rows().map(|r| r.period))
    }

    /// Returns the `(min, max)` value over all drawable rows.
    pub fn value_domain(&self) -> Option<(f64, f64)> {
        crate::scale::infer_domain(self.drawable_rows().map(|r| r.value))
    }
}

fn push_cleaned(
    out: &mut Vec<WorkingRow>,
    frame: &SeriesFrame,
    key_offset: u64,
    classify: impl Fn(&str) -> DrawCategory,
) {
    for (row, &key) in frame.rows.iter().zip(&frame.row_keys) {
        let Some(value) = row.value else {
            continue;
        };
        if !value.is_finite() {
            continue;
        }
        let identifier = match &row.identifier {
            Some(id) => id.clone(),
            None => derive_identifier(&row.model, &row.scenario),
        };
        out.push(WorkingRow {
            row_key: key + key_offset,
            category: classify(&row.scenario),
            model: row.model.clone(),
            scenario: row.scenario.clone(),
            region: row.region.clone(),
            period: row.period,
            variable: row.variable.clone(),
            value,
            identifier,
        });
    }
}

fn fold_period(
    rows: &[WorkingRow],
    include: impl Fn(DrawCategory) -> bool,
    pick: impl Fn(f64, f64) -> f64,
) -> Option<f64> {
    rows.iter()
        .filter(|r| include(r.category))
        .map(|r| r.period)
        .reduce(pick)
}
