// Copyright 2025 the Overplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend composition.
//!
//! Two mutually exclusive strategies implement [`LegendComposer`]:
//! - [`UnifiedComposer`] overlays up to four ordered legend blocks (color,
//!   historical fill, projection alpha, linetype) on the figure itself.
//! - [`CompositeComposer`] renders one minimal legend box per non-empty
//!   category, apportions the row's horizontal space by measured label
//!   width, and stacks the plot body above the legend row.
//!
//! Both strategies share the [`LegendShare`] computation.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::category::{CategoryEncoding, DrawCategory, SeriesDim};
use crate::error::ChartError;
use crate::figure::{CompositeFigure, Figure, FigureArtifact, LegendPanel};
use crate::layer::dash_pattern;
use crate::layout::Size;
use crate::legend::{LegendBlock, LegendItem};
use crate::measure::TextMeasurer;
use crate::normalize::WorkingSet;
use crate::palette::{ColorTable, fade_levels};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use peniko::color::palette::css;

/// Total character budget apportioned across composite sub-legends.
pub const COMPOSITE_CHAR_BUDGET: usize = 50;

/// Relative heights of the plot body and the composite legend row.
pub const COMPOSITE_HEIGHTS: (f64, f64) = (0.76, 0.24);

const UNIFIED_ID_BASE: u64 = 900_000_000;
const COMPOSITE_ID_BASE: u64 = 950_000_000;
const BLOCK_ID_STRIDE: u64 = 10_000;
const BLOCK_GAP: f64 = 10.0;

/// Per-block legend column counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegendColumns {
    /// Columns of the current (color) block.
    pub color: usize,
    /// Columns of the historical (fill) block.
    pub fill: usize,
    /// Columns of the projection (alpha) block.
    pub alpha: usize,
    /// Columns of the linetype block.
    pub linetype: usize,
}

impl Default for LegendColumns {
    fn default() -> Self {
        Self {
            color: 1,
            fill: 1,
            alpha: 1,
            linetype: 1,
        }
    }
}

/// Everything the composers need besides the plot body.
#[derive(Debug)]
pub struct ComposeContext<'a> {
    /// The normalized working set.
    pub set: &'a WorkingSet,
    /// The per-invocation color table.
    pub colors: &'a ColorTable,
    /// Active color dimension for current rows.
    pub color_dim: SeriesDim,
    /// Detailed vs aggregated projection legend.
    pub detailed_projection: bool,
    /// Optional linetype dimension for the fourth block.
    pub linetype_dim: Option<SeriesDim>,
    /// Per-block column counts.
    pub columns: LegendColumns,
    /// Figure text size driving legend fonts.
    pub text_size: f64,
}

/// Entry count and label extent of one non-empty category's legend.
///
/// Computed once after rendering and consumed only by the composite path.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendShare {
    /// The category this share belongs to.
    pub category: DrawCategory,
    /// Number of distinct legend entries.
    pub entries: usize,
    /// Widest measured label, the category's legend title included.
    pub max_label_width: f64,
    /// Normalized width share over the present categories.
    pub share: f64,
}

impl LegendShare {
    /// Converts this share into an integer character budget.
    pub fn char_budget(&self, total: usize) -> usize {
        let budget = (self.share * total as f64).ceil();
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "shares are in (0, 1] and the total budget is small"
        )]
        {
            budget as usize
        }
    }
}

/// Computes the width shares for every non-empty category.
///
/// Entry counts follow the composite rules: current and historical count
/// distinct model+scenario pairs, projected counts distinct models (or
/// identifiers in detailed mode). Categories with zero entries are omitted
/// and the remaining shares renormalize.
pub fn legend_shares(ctx: &ComposeContext<'_>, measurer: &dyn TextMeasurer) -> Vec<LegendShare> {
    let mut shares = Vec::new();

    for category in DrawCategory::ALL {
        let entries = match category {
            DrawCategory::Current | DrawCategory::Historical => {
                ctx.set.distinct_pair_count(category)
            }
            DrawCategory::Projected => {
                let dim = CategoryEncoding::color_dimension(
                    category,
                    ctx.color_dim,
                    ctx.detailed_projection,
                );
                ctx.set.distinct(category, dim).len()
            }
        };
        if entries == 0 {
            continue;
        }
        let block = category_block(ctx, category, 0);
        let max_label_width = block.max_label_width(measurer);
        shares.push(LegendShare {
            category,
            entries,
            max_label_width,
            share: 0.0,
        });
    }

    let total: f64 = shares.iter().map(|s| s.max_label_width).sum();
    if total > 0.0 {
        for s in &mut shares {
            s.share = s.max_label_width / total;
        }
    } else if !shares.is_empty() {
        let even = 1.0 / shares.len() as f64;
        for s in &mut shares {
            s.share = even;
        }
    }
    shares
}

/// Builds the legend items for one category.
pub fn category_items(ctx: &ComposeContext<'_>, category: DrawCategory) -> Vec<LegendItem> {
    match category {
        DrawCategory::Current => ctx
            .set
            .distinct(category, ctx.color_dim)
            .into_iter()
            .map(|key| {
                LegendItem::line(key, ctx.colors.color(key).unwrap_or(css::BLACK))
            })
            .collect(),
        DrawCategory::Historical => ctx
            .set
            .distinct(category, SeriesDim::Model)
            .into_iter()
            .map(|model| LegendItem::plus(model, ctx.colors.color(model).unwrap_or(css::BLACK)))
            .collect(),
        DrawCategory::Projected => {
            if ctx.detailed_projection {
                ctx.set
                    .distinct(category, SeriesDim::Identifier)
                    .into_iter()
                    .map(|id| LegendItem::line(id, ctx.colors.color(id).unwrap_or(css::BLACK)))
                    .collect()
            } else {
                let models = ctx.set.distinct(category, SeriesDim::Model);
                let fades = fade_levels(models.len());
                models
                    .into_iter()
                    .zip(fades)
                    .map(|(model, fade)| LegendItem::fade(model, fade))
                    .collect()
            }
        }
    }
}

fn block_columns(ctx: &ComposeContext<'_>, category: DrawCategory) -> usize {
    match category {
        DrawCategory::Current => ctx.columns.color,
        DrawCategory::Historical => ctx.columns.fill,
        DrawCategory::Projected => ctx.columns.alpha,
    }
}

/// Builds the titled legend block for one category.
pub fn category_block(
    ctx: &ComposeContext<'_>,
    category: DrawCategory,
    id_base: u64,
) -> LegendBlock {
    LegendBlock::new(
        id_base,
        category.legend_title(ctx.color_dim.label()),
        category_items(ctx, category),
    )
    .with_columns(block_columns(ctx, category))
    .with_font_size(ctx.text_size)
}

/// Builds the ordered unified blocks: color = 1, fill = 2, alpha = 3,
/// linetype = 4. Empty blocks are skipped.
pub fn unified_blocks(ctx: &ComposeContext<'_>) -> Vec<LegendBlock> {
    let mut out = Vec::new();
    let mut id_base = UNIFIED_ID_BASE;

    for category in DrawCategory::ALL {
        let block = category_block(ctx, category, id_base);
        if !block.items.is_empty() {
            out.push(block);
        }
        id_base += BLOCK_ID_STRIDE;
    }

    if let Some(dim) = ctx.linetype_dim {
        let values = ctx.set.distinct(DrawCategory::Current, dim);
        if !values.is_empty() {
            let items = values
                .into_iter()
                .enumerate()
                .map(|(i, v)| LegendItem::dashed_line(v, css::BLACK, dash_pattern(i)))
                .collect();
            out.push(
                LegendBlock::new(id_base, dim.label(), items)
                    .with_columns(ctx.columns.linetype)
                    .with_font_size(ctx.text_size),
            );
        }
    }

    out
}

/// Measures the stacked size of the unified blocks.
pub fn unified_size(blocks: &[LegendBlock], measurer: &dyn TextMeasurer) -> Size {
    let mut width = 0.0_f64;
    let mut height = 0.0_f64;
    for (i, block) in blocks.iter().enumerate() {
        let s = block.measure(measurer);
        width = width.max(s.width);
        height += s.height;
        if i + 1 < blocks.len() {
            height += BLOCK_GAP;
        }
    }
    Size { width, height }
}

/// A legend composition strategy.
pub trait LegendComposer {
    /// Attaches or assembles the legend, consuming the rendered plot body.
    fn compose(
        &self,
        body: Figure,
        legend_rect: Option<Rect>,
        ctx: &ComposeContext<'_>,
        measurer: &dyn TextMeasurer,
    ) -> Result<FigureArtifact, ChartError>;
}

/// Attaches one multi-block legend to the figure itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnifiedComposer;

impl LegendComposer for UnifiedComposer {
    fn compose(
        &self,
        mut body: Figure,
        legend_rect: Option<Rect>,
        ctx: &ComposeContext<'_>,
        measurer: &dyn TextMeasurer,
    ) -> Result<FigureArtifact, ChartError> {
        let blocks = unified_blocks(ctx);
        let origin = legend_rect.map_or((body.view.x1, body.view.y0), |r| (r.x0, r.y0));

        let mut y = origin.1;
        for block in &blocks {
            body.extend(block.marks(origin.0, y, measurer));
            y += block.measure(measurer).height + BLOCK_GAP;
        }
        body.sort_marks();
        Ok(FigureArtifact::Unified(body))
    }
}

/// Pre-renders per-category legend boxes and stacks them under the plot.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompositeComposer;

impl LegendComposer for CompositeComposer {
    fn compose(
        &self,
        mut body: Figure,
        _legend_rect: Option<Rect>,
        ctx: &ComposeContext<'_>,
        measurer: &dyn TextMeasurer,
    ) -> Result<FigureArtifact, ChartError> {
        let shares = legend_shares(ctx, measurer);

        let mut legend_row = Vec::with_capacity(shares.len());
        for (i, share) in shares.iter().enumerate() {
            let budget = share.char_budget(COMPOSITE_CHAR_BUDGET);
            let block = category_block(
                ctx,
                share.category,
                COMPOSITE_ID_BASE + i as u64 * BLOCK_ID_STRIDE,
            )
            .truncated(budget);

            let size = block.measure(measurer);
            let mut figure = Figure::new(Rect::new(0.0, 0.0, size.width, size.height));
            figure.extend(block.marks(0.0, 0.0, measurer));
            figure.sort_marks();
            legend_row.push(LegendPanel {
                share: share.share,
                figure,
            });
        }

        body.sort_marks();
        Ok(FigureArtifact::Composite(CompositeFigure {
            plot: body,
            legend_row,
            heights: COMPOSITE_HEIGHTS,
        }))
    }
}
