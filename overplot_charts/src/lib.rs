// Copyright 2025 the Overplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Comparative scenario line charts over `overplot_core`.
//!
//! This crate composes time-series charts that overlay a primary scenario
//! dataset with historical observations and other models' projections:
//! - **Normalization** tags heterogeneous records with a draw category.
//! - **Palette assignment** maps series keys to deterministic colors, with
//!   validated manual overrides.
//! - **Layer rendering** paints the categories in priority-controlled
//!   z-order with per-category encodings.
//! - **Legend composition** attaches one unified multi-block legend, or
//!   pre-renders per-category legend boxes apportioned by label width.
//!
//! The output is a figure of `overplot_core` marks; rasterization and text
//! shaping stay downstream.

#![no_std]

extern crate alloc;

mod axis;
mod category;
mod chart;
mod compose;
#[cfg(test)]
mod composed_tests;
mod error;
mod facet;
mod figure;
#[cfg(not(feature = "std"))]
mod float;
mod layer;
mod layout;
mod legend;
mod measure;
mod normalize;
mod palette;
mod rule;
mod scale;
mod symbol;
mod z_order;

pub use axis::{
    AxisOrient, AxisStyle, StrokeStyle, XAxisSpec, YAxisSpec, YScaleMode, axis_marks, format_tick,
    thin_labels,
};
pub use category::{
    CategoryEncoding, DrawCategory, HISTORICAL_SCENARIO, MarkerEmphasis, MarkerPolicy,
    RenderPriority, SeriesDim,
};
pub use chart::ScenarioChartSpec;
pub use compose::{
    COMPOSITE_CHAR_BUDGET, COMPOSITE_HEIGHTS, ComposeContext, CompositeComposer, LegendColumns,
    LegendComposer, LegendShare, UnifiedComposer, category_block, category_items, legend_shares,
    unified_blocks, unified_size,
};
pub use error::{ChartError, ConfigError, ValidationError};
pub use facet::{FacetPanel, FacetSpec, ScaleSharing, partition, strip_marks};
pub use figure::{CompositeFigure, Figure, FigureArtifact, LegendPanel};
pub use layer::{
    LayerContext, LayerOptions, LegendRole, RenderPass, dash_pattern, reference_passes,
    render_layers,
};
pub use layout::{FigureLayout, FigureLayoutSpec, Size};
pub use legend::{LegendBlock, LegendGlyph, LegendItem, truncate_label};
pub use measure::{HeuristicTextMeasurer, TextMeasurer};
pub use normalize::{WorkingRow, WorkingSet, derive_identifier};
pub use palette::{
    ColorTable, PROJECTION_GRAY, PaletteLookup, WheelPalette, assign_colors, fade_levels,
};
pub use rule::{RuleMarkSpec, reference_dash};
pub use scale::{ScaleContinuous, ScaleLinear, ScaleLog, infer_domain};
pub use symbol::Symbol;
pub use z_order::*;
