// Copyright 2025 the Overplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic color assignment.
//!
//! The assigner collects the distinct color keys of the three draw
//! categories, concatenates them in fixed category order (current,
//! historical, projected), asks a [`PaletteLookup`] for base colors, and
//! then applies the caller's manual overrides. The same key list always
//! yields the same table.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use peniko::Color;
use peniko::color::palette::css;

use crate::category::{CategoryEncoding, DrawCategory, SeriesDim};
use crate::error::ValidationError;
use crate::normalize::WorkingSet;

/// Neutral stroke color for aggregated projected series.
pub const PROJECTION_GRAY: Color = css::GRAY;

/// A deterministic palette service: maps a key list to display colors.
///
/// Implementations must be pure in the key list; the position of a key in
/// the list may affect its color, which is why the assigner concatenates
/// category key lists in a fixed order.
pub trait PaletteLookup {
    /// Returns one color per key, aligned by index.
    fn colors(&self, keys: &[&str]) -> Vec<Color>;
}

/// The default palette: a fixed color wheel indexed by key position.
///
/// Colors are taken from named CSS colors and repeat if the key count
/// exceeds the wheel length.
#[derive(Clone, Copy, Debug, Default)]
pub struct WheelPalette;

impl PaletteLookup for WheelPalette {
    fn colors(&self, keys: &[&str]) -> Vec<Color> {
        const WHEEL: [Color; 12] = [
            css::CORNFLOWER_BLUE,
            css::ORANGE,
            css::MEDIUM_SEA_GREEN,
            css::CRIMSON,
            css::GOLDENROD,
            css::SLATE_BLUE,
            css::DARK_CYAN,
            css::HOT_PINK,
            css::SADDLE_BROWN,
            css::STEEL_BLUE,
            css::DARK_OLIVE_GREEN,
            css::INDIAN_RED,
        ];
        (0..keys.len()).map(|i| WHEEL[i % WHEEL.len()]).collect()
    }
}

/// The per-invocation key → color table.
#[derive(Clone, Debug, Default)]
pub struct ColorTable {
    entries: HashMap<String, Color>,
}

impl ColorTable {
    /// Looks up the color assigned to a key.
    pub fn color(&self, key: &str) -> Option<Color> {
        self.entries.get(key).copied()
    }

    /// Returns the number of assigned keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no keys are assigned.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds the color table for a working set.
///
/// Current keys come from the active color dimension, historical keys from
/// the model field, projected keys from the model field (or the identifier
/// in detailed projection mode). Manual override vectors replace exactly
/// their targeted entries; a length mismatch fails with a
/// [`ValidationError`] naming both counts.
pub fn assign_colors(
    set: &WorkingSet,
    color_dim: SeriesDim,
    detailed_projection: bool,
    lookup: &dyn PaletteLookup,
    current_override: Option<&[Color]>,
    historical_override: Option<&[Color]>,
) -> Result<ColorTable, ValidationError> {
    let current_keys = set.distinct(DrawCategory::Current, color_dim);
    let historical_keys = set.distinct(DrawCategory::Historical, SeriesDim::Model);
    let projected_keys = set.distinct(
        DrawCategory::Projected,
        CategoryEncoding::color_dimension(DrawCategory::Projected, color_dim, detailed_projection),
    );

    // Fixed category order; a key seen in an earlier category keeps its slot.
    let mut combined: Vec<&str> = Vec::new();
    for key in current_keys
        .iter()
        .chain(historical_keys.iter())
        .chain(projected_keys.iter())
    {
        if !combined.contains(key) {
            combined.push(key);
        }
    }

    let base = lookup.colors(&combined);
    let mut entries = HashMap::with_capacity(combined.len());
    for (key, color) in combined.iter().zip(base) {
        entries.insert(String::from(*key), color);
    }

    if let Some(colors) = current_override {
        if colors.len() != current_keys.len() {
            return Err(ValidationError::CurrentOverrideLength {
                expected: current_keys.len(),
                got: colors.len(),
            });
        }
        for (key, color) in current_keys.iter().zip(colors) {
            entries.insert(String::from(*key), *color);
        }
    }

    if let Some(colors) = historical_override {
        if colors.len() != historical_keys.len() {
            return Err(ValidationError::HistoricalOverrideLength {
                expected: historical_keys.len(),
                got: colors.len(),
            });
        }
        for (key, color) in historical_keys.iter().zip(colors) {
            entries.insert(String::from(*key), *color);
        }
    }

    Ok(ColorTable { entries })
}

/// Returns the fade-alpha levels for `n` aggregated projected models.
///
/// Levels are evenly spaced and descend with model order so distinct models
/// stay visually separable without individual colors.
pub fn fade_levels(n: usize) -> Vec<f32> {
    const HIGH: f32 = 0.85;
    const LOW: f32 = 0.25;
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return alloc::vec![HIGH];
    }
    let step = (HIGH - LOW) / (n - 1) as f32;
    (0..n).map(|i| HIGH - step * i as f32).collect()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use overplot_core::{SeriesFrame, SeriesRecord};

    use super::*;
    use crate::category::HISTORICAL_SCENARIO;
    use crate::normalize::WorkingSet;

    fn working_set() -> WorkingSet {
        let primary = SeriesFrame::from_records(vec![
            SeriesRecord::new("remind", "base", "EUR", 2010.0, "emi", 1.0),
            SeriesRecord::new("remind", "policy", "EUR", 2010.0, "emi", 2.0),
        ]);
        let secondary = SeriesFrame::from_records(vec![
            SeriesRecord::new("ceds", HISTORICAL_SCENARIO, "EUR", 2000.0, "emi", 0.5),
            SeriesRecord::new("message", "sspA", "EUR", 2010.0, "emi", 3.0),
        ]);
        WorkingSet::normalize(&primary, Some(&secondary), SeriesDim::Identifier).unwrap()
    }

    #[test]
    fn same_keys_same_colors() {
        let set = working_set();
        let a = assign_colors(&set, SeriesDim::Identifier, false, &WheelPalette, None, None)
            .unwrap();
        let b = assign_colors(&set, SeriesDim::Identifier, false, &WheelPalette, None, None)
            .unwrap();
        assert_eq!(a.color("remind base"), b.color("remind base"));
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn override_replaces_only_current_keys() {
        let set = working_set();
        let plain =
            assign_colors(&set, SeriesDim::Identifier, false, &WheelPalette, None, None).unwrap();
        let colors = vec![css::BLACK, css::WHITE];
        let table = assign_colors(
            &set,
            SeriesDim::Identifier,
            false,
            &WheelPalette,
            Some(&colors),
            None,
        )
        .unwrap();
        assert_eq!(table.color("remind base"), Some(css::BLACK));
        assert_eq!(table.color("remind policy"), Some(css::WHITE));
        assert_eq!(table.color("ceds"), plain.color("ceds"));
    }

    #[test]
    fn wrong_override_length_is_rejected_with_counts() {
        let set = working_set();
        let colors = vec![css::BLACK];
        let err = assign_colors(
            &set,
            SeriesDim::Identifier,
            false,
            &WheelPalette,
            Some(&colors),
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::CurrentOverrideLength {
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn detailed_mode_keys_projected_by_identifier() {
        let set = working_set();
        let table =
            assign_colors(&set, SeriesDim::Identifier, true, &WheelPalette, None, None).unwrap();
        assert!(table.color("message sspA").is_some());
    }

    #[test]
    fn fade_levels_descend_and_stay_in_range() {
        let levels = fade_levels(4);
        assert_eq!(levels.len(), 4);
        assert!(levels.windows(2).all(|w| w[0] > w[1]));
        assert!(levels.iter().all(|&a| (0.25_f32..=0.85).contains(&a)));
        assert_eq!(fade_levels(1).len(), 1);
        assert!(fade_levels(0).is_empty());
    }
}
