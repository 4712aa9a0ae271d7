// Copyright 2025 the Overplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for guide layout.
//!
//! Guide layout (axis label thinning, legend space apportionment) is driven
//! by renderer text metrics, but shaping stays downstream. Guides accept a
//! measurer so the character-count heuristic can be swapped for the target
//! backend's actual text-measurement API.

/// A minimal text measurement interface used by guide generators.
///
/// This is used by axes and legends to estimate extents before marks are
/// generated. Callers can plug in a real text measurement backend (e.g.
/// based on shaping), or use [`HeuristicTextMeasurer`].
pub trait TextMeasurer {
    /// Returns `(width, height)` in the same coordinate system as the marks.
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64);
}

/// A tiny heuristic text measurer suitable for tests and early layout.
///
/// It assumes an average glyph width of ~0.6em and height of 1em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        let width = 0.6 * font_size * text.chars().count() as f64;
        (width, font_size)
    }
}
