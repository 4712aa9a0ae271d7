// Copyright 2025 the Overplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layered series rendering.
//!
//! Each draw category becomes one or more [`RenderPass`]es of marks, painted
//! in the reverse of the caller's render priority so the first-priority
//! category ends up topmost. Legend bookkeeping rides on the passes:
//! a `Seed` pass exists only to seed a legend glyph (zero-size markers,
//! hairline lines), a `Suppressed` pass is visible but contributes no legend
//! entry. This keeps legend glyphs and on-plot markers independently sized
//! without duplicating entries.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::BezPath;
use overplot_core::{Dash, Mark, MarkId, PathMark, TextAnchor, TextMark};
use peniko::Color;
use peniko::color::palette::css;
use smallvec::smallvec;

use crate::category::{
    CategoryEncoding, DrawCategory, MarkerEmphasis, MarkerPolicy, RenderPriority, SeriesDim,
};
use crate::normalize::{WorkingRow, WorkingSet};
use crate::palette::{ColorTable, PROJECTION_GRAY, fade_levels};
use crate::rule::RuleMarkSpec;
use crate::scale::{ScaleContinuous, ScaleLinear};
use crate::symbol::Symbol;
use crate::z_order;

/// How a pass participates in legend composition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegendRole {
    /// Ordinary pass: drawn, and its category appears in the legend.
    Normal,
    /// Drawn at zero visual weight purely to seed a legend glyph.
    Seed,
    /// Drawn at full visual weight with the legend suppressed.
    Suppressed,
}

/// One ordered group of marks produced by the layer renderer.
#[derive(Clone, Debug)]
pub struct RenderPass {
    /// Owning category; `None` for annotation passes (reference rules).
    pub category: Option<DrawCategory>,
    /// Legend participation.
    pub role: LegendRole,
    /// The marks, ready for the backend.
    pub marks: Vec<Mark>,
}

/// Options controlling the layer renderer.
#[derive(Clone, Debug)]
pub struct LayerOptions {
    /// Color dimension for current rows.
    pub color_dim: SeriesDim,
    /// Optional linetype sub-split for current rows.
    pub linetype_dim: Option<SeriesDim>,
    /// Whether observation markers are drawn.
    pub show_dots: bool,
    /// Detailed (per-identifier) vs aggregated (gray fade) projections.
    pub detailed_projection: bool,
    /// Caller's render priority.
    pub priority: RenderPriority,
    /// Historical marker sizing policy.
    pub marker: MarkerEmphasis,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            color_dim: SeriesDim::Identifier,
            linetype_dim: None,
            show_dots: true,
            detailed_projection: false,
            priority: RenderPriority::default(),
            marker: MarkerEmphasis::default(),
        }
    }
}

/// Per-panel rendering context.
#[derive(Debug)]
pub struct LayerContext<'a> {
    /// The full working set (for the projection horizon).
    pub set: &'a WorkingSet,
    /// The per-invocation color table.
    pub colors: &'a ColorTable,
    /// Period scale for this panel.
    pub x_scale: ScaleLinear,
    /// Value scale for this panel.
    pub y_scale: ScaleContinuous,
    /// Mark-id namespace for this panel.
    pub id_base: u64,
}

/// Returns the dash pattern for a linetype slot; slot 0 is solid.
pub fn dash_pattern(index: usize) -> Dash {
    match index % 4 {
        1 => smallvec![4.0, 2.0],
        2 => smallvec![1.0, 2.0],
        3 => smallvec![6.0, 2.0, 1.0, 2.0],
        _ => Dash::new(),
    }
}

const LINE_ID_STRIDE: u64 = 100_000;
const POINT_ID_OFFSET: u64 = 50_000;
const SEED_ID_OFFSET: u64 = 60_000;
const SUPPRESSED_ID_OFFSET: u64 = 70_000;

/// Renders every category present in `rows` into ordered passes.
///
/// Passes are returned bottom-first; their mark z-indices already encode the
/// same order, so flattening keeps the paint order stable.
pub fn render_layers(
    ctx: &LayerContext<'_>,
    rows: &[&WorkingRow],
    opts: &LayerOptions,
) -> Vec<RenderPass> {
    let mut passes = Vec::new();

    for (slot, category) in opts.priority.draw_order().into_iter().enumerate() {
        let cat_rows: Vec<&WorkingRow> = rows
            .iter()
            .copied()
            .filter(|r| r.category == category)
            .filter(|r| category != DrawCategory::Projected || ctx.set.projected_visible(r))
            .collect();
        if cat_rows.is_empty() {
            continue;
        }
        let cat_base = ctx.id_base + (slot as u64 + 1) * LINE_ID_STRIDE;
        match category {
            DrawCategory::Current => {
                passes.extend(current_passes(ctx, &cat_rows, opts, slot, cat_base));
            }
            DrawCategory::Historical => {
                passes.extend(historical_passes(ctx, &cat_rows, opts, slot, cat_base));
            }
            DrawCategory::Projected => {
                passes.extend(projected_passes(ctx, &cat_rows, opts, slot, cat_base));
            }
        }
    }

    passes
}

/// Renders the dashed reference rules for one panel.
///
/// The vertical rule marks the first period of the primary data. Horizontal
/// rules come from the auxiliary value series; their labels sit at one
/// quarter of the visible period span from the right edge.
pub fn reference_passes(
    ctx: &LayerContext<'_>,
    panel: kurbo::Rect,
    first_current_period: Option<f64>,
    reference_values: &[(f64, Option<String>)],
    text_size: f64,
) -> Vec<RenderPass> {
    let mut marks = Vec::new();
    let rule_base = ctx.id_base + 9 * LINE_ID_STRIDE;

    if let Some(period) = first_current_period {
        let x = ctx.x_scale.map(period);
        marks.push(
            RuleMarkSpec::vertical(MarkId::from_raw(rule_base), x, panel.y0, panel.y1)
                .with_stroke(css::BLACK, 0.8)
                .dashed()
                .mark(),
        );
    }

    let (d0, d1) = (ctx.x_scale.domain_min(), ctx.x_scale.domain_max());
    let label_x = ctx.x_scale.map(d1 - (d1 - d0) * 0.25);
    for (i, (value, label)) in reference_values.iter().enumerate() {
        let y = ctx.y_scale.map(*value);
        marks.push(
            RuleMarkSpec::horizontal(
                MarkId::from_raw(rule_base + 1 + i as u64),
                y,
                panel.x0,
                panel.x1,
            )
            .with_stroke(css::BLACK, 0.8)
            .dashed()
            .mark(),
        );
        if let Some(label) = label {
            marks.push(Mark::new(
                MarkId::from_raw(rule_base + 1000 + i as u64),
                z_order::REFERENCE_LABELS,
                TextMark::new(label_x, y - text_size * 0.6, label.clone())
                    .with_font_size(text_size)
                    .with_anchor(TextAnchor::Middle),
            ));
        }
    }

    if marks.is_empty() {
        return Vec::new();
    }
    alloc::vec![RenderPass {
        category: None,
        role: LegendRole::Suppressed,
        marks,
    }]
}

fn current_passes(
    ctx: &LayerContext<'_>,
    rows: &[&WorkingRow],
    opts: &LayerOptions,
    slot: usize,
    id_base: u64,
) -> Vec<RenderPass> {
    let encoding = CategoryEncoding::for_category(DrawCategory::Current, opts.detailed_projection);
    let color_keys = distinct_values(rows, opts.color_dim);
    let line_keys = opts
        .linetype_dim
        .map(|dim| distinct_values(rows, dim))
        .unwrap_or_default();

    let mut line_marks = Vec::new();
    let mut point_marks = Vec::new();
    let mut line_index = 0_u64;

    for color_key in &color_keys {
        let color = ctx.colors.color(color_key).unwrap_or(css::BLACK);
        let splits: Vec<Option<&String>> = if line_keys.is_empty() {
            alloc::vec![None]
        } else {
            line_keys.iter().map(Some).collect()
        };
        for split in splits {
            let group: Vec<&WorkingRow> = rows
                .iter()
                .copied()
                .filter(|r| r.dim(opts.color_dim) == color_key.as_str())
                .filter(|r| match (split, opts.linetype_dim) {
                    (Some(v), Some(dim)) => r.dim(dim) == v.as_str(),
                    _ => true,
                })
                .collect();
            if group.is_empty() {
                continue;
            }
            let dash = split
                .map(|v| dash_pattern(line_keys.iter().position(|k| k == v).unwrap_or(0)))
                .unwrap_or_default();
            line_marks.push(
                line_mark(
                    MarkId::from_raw(id_base + line_index),
                    ctx,
                    &group,
                    color.with_alpha(encoding.line_alpha),
                    encoding.line_width,
                    dash,
                )
                .with_z_index(z_order::series_lines(slot)),
            );
            line_index += 1;

            if opts.show_dots {
                for row in &group {
                    point_marks.push(point_mark(
                        ctx,
                        id_base + POINT_ID_OFFSET,
                        row,
                        Symbol::Circle,
                        3.0,
                        color,
                        z_order::series_points(slot),
                    ));
                }
            }
        }
    }

    let mut out = alloc::vec![RenderPass {
        category: Some(DrawCategory::Current),
        role: LegendRole::Normal,
        marks: line_marks,
    }];
    if !point_marks.is_empty() {
        out.push(RenderPass {
            category: Some(DrawCategory::Current),
            role: LegendRole::Normal,
            marks: point_marks,
        });
    }
    out
}

fn historical_passes(
    ctx: &LayerContext<'_>,
    rows: &[&WorkingRow],
    opts: &LayerOptions,
    slot: usize,
    id_base: u64,
) -> Vec<RenderPass> {
    let encoding = CategoryEncoding::for_category(DrawCategory::Historical, false);
    let models = distinct_values(rows, SeriesDim::Model);

    let mut line_marks = Vec::new();
    for (i, model) in models.iter().enumerate() {
        let color = ctx.colors.color(model).unwrap_or(css::BLACK);
        let group: Vec<&WorkingRow> = rows
            .iter()
            .copied()
            .filter(|r| r.model == *model)
            .collect();
        line_marks.push(
            line_mark(
                MarkId::from_raw(id_base + i as u64),
                ctx,
                &group,
                color.with_alpha(encoding.line_alpha),
                encoding.line_width,
                Dash::new(),
            )
            .with_z_index(z_order::series_lines(slot)),
        );
    }

    let mut out = alloc::vec![RenderPass {
        category: Some(DrawCategory::Historical),
        role: LegendRole::Normal,
        marks: line_marks,
    }];

    if opts.show_dots && encoding.marker == MarkerPolicy::SeededPlus {
        // Zero-size pass: seeds the legend glyph without visible output.
        let mut seed_marks = Vec::new();
        let mut plus_marks = Vec::new();
        let size = opts.marker.size_for(&opts.priority);
        for row in rows {
            let color = ctx.colors.color(&row.model).unwrap_or(css::BLACK);
            seed_marks.push(point_mark(
                ctx,
                id_base + SEED_ID_OFFSET,
                row,
                Symbol::Circle,
                0.0,
                color,
                z_order::series_points(slot),
            ));
            plus_marks.push(point_mark(
                ctx,
                id_base + SUPPRESSED_ID_OFFSET,
                row,
                Symbol::Plus,
                size,
                color.with_alpha(encoding.line_alpha),
                z_order::series_points(slot),
            ));
        }
        out.push(RenderPass {
            category: Some(DrawCategory::Historical),
            role: LegendRole::Seed,
            marks: seed_marks,
        });
        out.push(RenderPass {
            category: Some(DrawCategory::Historical),
            role: LegendRole::Suppressed,
            marks: plus_marks,
        });
    }

    out
}

fn projected_passes(
    ctx: &LayerContext<'_>,
    rows: &[&WorkingRow],
    opts: &LayerOptions,
    slot: usize,
    id_base: u64,
) -> Vec<RenderPass> {
    let encoding =
        CategoryEncoding::for_category(DrawCategory::Projected, opts.detailed_projection);

    if opts.detailed_projection {
        let identifiers = distinct_values(rows, SeriesDim::Identifier);
        let mut seed_marks = Vec::new();
        let mut line_marks = Vec::new();
        for (i, identifier) in identifiers.iter().enumerate() {
            let color = ctx.colors.color(identifier).unwrap_or(PROJECTION_GRAY);
            let group: Vec<&WorkingRow> = rows
                .iter()
                .copied()
                .filter(|r| r.identifier == *identifier)
                .collect();
            // Hairline pass seeds the legend glyph at full opacity.
            seed_marks.push(
                line_mark(
                    MarkId::from_raw(id_base + POINT_ID_OFFSET + i as u64),
                    ctx,
                    &group,
                    color,
                    0.01,
                    Dash::new(),
                )
                .with_z_index(z_order::series_lines(slot)),
            );
            line_marks.push(
                line_mark(
                    MarkId::from_raw(id_base + i as u64),
                    ctx,
                    &group,
                    color.with_alpha(encoding.line_alpha),
                    encoding.line_width,
                    Dash::new(),
                )
                .with_z_index(z_order::series_lines(slot)),
            );
        }
        return alloc::vec![
            RenderPass {
                category: Some(DrawCategory::Projected),
                role: LegendRole::Seed,
                marks: seed_marks,
            },
            RenderPass {
                category: Some(DrawCategory::Projected),
                role: LegendRole::Suppressed,
                marks: line_marks,
            },
        ];
    }

    // Aggregated: one neutral-gray line per identifier, faded per model.
    let models = distinct_values(rows, SeriesDim::Model);
    let fades = fade_levels(models.len());
    let identifiers = distinct_values(rows, SeriesDim::Identifier);
    let mut line_marks = Vec::new();
    for (i, identifier) in identifiers.iter().enumerate() {
        let group: Vec<&WorkingRow> = rows
            .iter()
            .copied()
            .filter(|r| r.identifier == *identifier)
            .collect();
        let model = &group[0].model;
        let fade = models
            .iter()
            .position(|m| m == model)
            .map(|i| fades[i])
            .unwrap_or(1.0);
        line_marks.push(
            line_mark(
                MarkId::from_raw(id_base + i as u64),
                ctx,
                &group,
                PROJECTION_GRAY.with_alpha(fade),
                encoding.line_width,
                Dash::new(),
            )
            .with_z_index(z_order::series_lines(slot)),
        );
    }
    alloc::vec![RenderPass {
        category: Some(DrawCategory::Projected),
        role: LegendRole::Normal,
        marks: line_marks,
    }]
}

fn line_mark(
    id: MarkId,
    ctx: &LayerContext<'_>,
    group: &[&WorkingRow],
    color: Color,
    width: f64,
    dash: Dash,
) -> Mark {
    let mut ordered: Vec<&WorkingRow> = group.to_vec();
    ordered.sort_by(|a, b| a.period.partial_cmp(&b.period).unwrap_or(core::cmp::Ordering::Equal));

    let mut p = BezPath::new();
    for (i, row) in ordered.iter().enumerate() {
        let pt = (ctx.x_scale.map(row.period), ctx.y_scale.map(row.value));
        if i == 0 {
            p.move_to(pt);
        } else {
            p.line_to(pt);
        }
    }
    Mark::new(
        id,
        z_order::SERIES_BASE,
        PathMark::new(p).with_stroke(color, width).with_dash(dash),
    )
}

fn point_mark(
    ctx: &LayerContext<'_>,
    id_base: u64,
    row: &WorkingRow,
    symbol: Symbol,
    size: f64,
    color: Color,
    z_index: i32,
) -> Mark {
    let x = ctx.x_scale.map(row.period);
    let y = ctx.y_scale.map(row.value);
    let path = symbol.path(x, y, size);
    let kind = if symbol.is_stroked() {
        PathMark::new(path).with_stroke(color, 1.2)
    } else {
        PathMark::new(path).with_fill(color).with_stroke(color, 0.0)
    };
    Mark::new(MarkId::for_row(id_base, row.row_key), z_index, kind)
}

fn distinct_values(rows: &[&WorkingRow], dim: SeriesDim) -> Vec<String> {
    let mut out: Vec<String> = rows.iter().map(|r| String::from(r.dim(dim))).collect();
    out.sort_unstable();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use overplot_core::{SeriesFrame, SeriesRecord};

    use super::*;
    use crate::category::HISTORICAL_SCENARIO;
    use crate::palette::{WheelPalette, assign_colors};
    use crate::scale::ScaleLinear;

    fn working_set() -> WorkingSet {
        let primary = SeriesFrame::from_records(vec![
            SeriesRecord::new("remind", "base", "EUR", 2005.0, "emi", 1.0),
            SeriesRecord::new("remind", "base", "EUR", 2010.0, "emi", 2.0),
        ]);
        let secondary = SeriesFrame::from_records(vec![
            SeriesRecord::new("ceds", HISTORICAL_SCENARIO, "EUR", 2000.0, "emi", 0.5),
            SeriesRecord::new("ceds", HISTORICAL_SCENARIO, "EUR", 2008.0, "emi", 0.8),
            SeriesRecord::new("message", "sspA", "EUR", 2009.0, "emi", 3.0),
            SeriesRecord::new("message", "sspA", "EUR", 2050.0, "emi", 9.0),
        ]);
        WorkingSet::normalize(&primary, Some(&secondary), SeriesDim::Identifier).unwrap()
    }

    fn context<'a>(set: &'a WorkingSet, colors: &'a ColorTable) -> LayerContext<'a> {
        LayerContext {
            set,
            colors,
            x_scale: ScaleLinear::new((2000.0, 2010.0), (0.0, 100.0)),
            y_scale: ScaleLinear::new((0.0, 10.0), (100.0, 0.0)).into(),
            id_base: 0,
        }
    }

    fn max_z(pass: &RenderPass) -> i32 {
        pass.marks.iter().map(|m| m.z_index).max().unwrap_or(i32::MIN)
    }

    #[test]
    fn default_priority_orders_projected_under_historical_under_current() {
        let set = working_set();
        let colors =
            assign_colors(&set, SeriesDim::Identifier, false, &WheelPalette, None, None).unwrap();
        let ctx = context(&set, &colors);
        let rows: Vec<&WorkingRow> = set.rows.iter().collect();
        let passes = render_layers(&ctx, &rows, &LayerOptions::default());

        let z_of = |cat: DrawCategory| {
            passes
                .iter()
                .filter(|p| p.category == Some(cat))
                .map(max_z)
                .max()
                .unwrap()
        };
        assert!(z_of(DrawCategory::Projected) < z_of(DrawCategory::Historical));
        assert!(z_of(DrawCategory::Historical) < z_of(DrawCategory::Current));
    }

    #[test]
    fn projected_rows_past_the_horizon_are_never_drawn() {
        let set = working_set();
        let colors =
            assign_colors(&set, SeriesDim::Identifier, false, &WheelPalette, None, None).unwrap();
        let ctx = context(&set, &colors);
        let rows: Vec<&WorkingRow> = set.rows.iter().collect();
        let passes = render_layers(&ctx, &rows, &LayerOptions::default());

        // Horizon is 2010; the projected 2050 point maps to x=600 under the
        // test scale. No projected path may reach that far right.
        let limit = ctx.x_scale.map(2010.0);
        for pass in passes.iter().filter(|p| p.category == Some(DrawCategory::Projected)) {
            for mark in &pass.marks {
                let overplot_core::MarkKind::Path(path) = &mark.kind else {
                    continue;
                };
                let b = kurbo::Shape::bounding_box(&path.path);
                assert!(b.x1 <= limit + 1e-9, "projected mark beyond horizon");
            }
        }
    }

    #[test]
    fn historical_dots_emit_seed_and_suppressed_passes() {
        let set = working_set();
        let colors =
            assign_colors(&set, SeriesDim::Identifier, false, &WheelPalette, None, None).unwrap();
        let ctx = context(&set, &colors);
        let rows: Vec<&WorkingRow> = set.rows.iter().collect();
        let passes = render_layers(&ctx, &rows, &LayerOptions::default());

        let hist: Vec<_> = passes
            .iter()
            .filter(|p| p.category == Some(DrawCategory::Historical))
            .collect();
        assert!(hist.iter().any(|p| p.role == LegendRole::Seed));
        assert!(hist.iter().any(|p| p.role == LegendRole::Suppressed));
        assert!(hist.iter().any(|p| p.role == LegendRole::Normal));
    }

    #[test]
    fn detailed_projection_adds_a_hairline_seed_pass() {
        let set = working_set();
        let colors =
            assign_colors(&set, SeriesDim::Identifier, true, &WheelPalette, None, None).unwrap();
        let ctx = context(&set, &colors);
        let rows: Vec<&WorkingRow> = set.rows.iter().collect();
        let opts = LayerOptions {
            detailed_projection: true,
            ..LayerOptions::default()
        };
        let passes = render_layers(&ctx, &rows, &opts);
        let proj: Vec<_> = passes
            .iter()
            .filter(|p| p.category == Some(DrawCategory::Projected))
            .collect();
        assert!(proj.iter().any(|p| p.role == LegendRole::Seed));
        assert!(proj.iter().any(|p| p.role == LegendRole::Suppressed));
    }

    #[test]
    fn reference_passes_mark_first_period_and_label_position() {
        let set = working_set();
        let colors =
            assign_colors(&set, SeriesDim::Identifier, false, &WheelPalette, None, None).unwrap();
        let ctx = context(&set, &colors);
        let panel = kurbo::Rect::new(0.0, 0.0, 100.0, 100.0);
        let refs = vec![(5.0, Some(String::from("budget")))];
        let passes = reference_passes(&ctx, panel, set.first_current_period, &refs, 9.0);
        assert_eq!(passes.len(), 1);
        // Vertical rule + horizontal rule + label.
        assert_eq!(passes[0].marks.len(), 3);
        let label = passes[0]
            .marks
            .iter()
            .find_map(|m| match &m.kind {
                overplot_core::MarkKind::Text(t) => Some(t.x),
                _ => None,
            })
            .unwrap();
        // Quarter of the span from the right edge: 2007.5 -> x = 75.
        assert!((label - 75.0).abs() < 1e-9);
    }
}
