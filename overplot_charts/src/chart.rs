// Copyright 2025 the Overplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart composition.
//!
//! [`ScenarioChartSpec`] is the single entry point: it owns the input frames
//! and every rendering option, and `compose` runs the whole pipeline —
//! normalize, assign colors, render layers per facet panel, configure axes,
//! then hand the body to the selected legend composer. Each call is pure in
//! its inputs and produces a fresh artifact or fails synchronously.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use overplot_core::{Mark, MarkId, RectMark, SeriesFrame};
use peniko::Color;
use peniko::color::palette::css;

use crate::axis::{AxisOrient, AxisStyle, XAxisSpec, YAxisSpec, axis_marks};
use crate::category::{MarkerEmphasis, RenderPriority, SeriesDim};
use crate::compose::{
    ComposeContext, CompositeComposer, LegendColumns, LegendComposer, UnifiedComposer,
    unified_blocks, unified_size,
};
use crate::error::ChartError;
use crate::facet::{FacetSpec, partition, strip_marks};
use crate::figure::{Figure, FigureArtifact};
use crate::layer::{LayerContext, LayerOptions, render_layers, reference_passes};
use crate::layout::{FigureLayout, FigureLayoutSpec, Size};
use crate::measure::TextMeasurer;
use crate::normalize::{WorkingRow, WorkingSet};
use crate::palette::{PaletteLookup, assign_colors};
use crate::scale::ScaleContinuous;
use crate::z_order;

const PANEL_ID_STRIDE: u64 = 10_000_000;
const X_TICK_COUNT: usize = 6;
const Y_TICK_COUNT: usize = 5;

/// The full description of one comparative scenario chart.
#[derive(Clone, Debug)]
pub struct ScenarioChartSpec {
    /// Primary series table (the dataset being analyzed).
    pub primary: SeriesFrame,
    /// Optional historical/projected series table.
    pub secondary: Option<SeriesFrame>,
    /// Horizontal reference values with optional labels.
    pub reference_values: Vec<(f64, Option<String>)>,
    /// Color dimension for current rows.
    pub color_dim: SeriesDim,
    /// Optional linetype sub-split for current rows.
    pub linetype_dim: Option<SeriesDim>,
    /// Optional facet partition.
    pub facet: Option<FacetSpec>,
    /// Y-axis configuration.
    pub y_axis: YAxisSpec,
    /// X-axis configuration.
    pub x_axis: XAxisSpec,
    /// Base text size for axis and legend fonts.
    pub text_size: f64,
    /// Whether observation markers are drawn.
    pub show_dots: bool,
    /// Detailed (per-identifier) vs aggregated projection legend.
    pub detailed_projection: bool,
    /// Render priority over the three draw categories.
    pub priority: RenderPriority,
    /// Historical marker sizing policy.
    pub marker: MarkerEmphasis,
    /// Composite (pre-rendered) vs unified legend.
    pub composite_legend: bool,
    /// Paper style: suppresses facet strip background shading.
    pub paper_style: bool,
    /// Per-block legend column counts.
    pub legend_columns: LegendColumns,
    /// Manual color override for current keys.
    pub current_colors: Option<Vec<Color>>,
    /// Manual color override for historical keys.
    pub historical_colors: Option<Vec<Color>>,
    /// Outer figure size.
    pub view_size: Size,
}

impl ScenarioChartSpec {
    /// Creates a chart spec with defaults over a primary table.
    pub fn new(primary: SeriesFrame) -> Self {
        Self {
            primary,
            secondary: None,
            reference_values: Vec::new(),
            color_dim: SeriesDim::Identifier,
            linetype_dim: None,
            facet: None,
            y_axis: YAxisSpec::default(),
            x_axis: XAxisSpec::default(),
            text_size: 10.0,
            show_dots: true,
            detailed_projection: false,
            priority: RenderPriority::default(),
            marker: MarkerEmphasis::default(),
            composite_legend: false,
            paper_style: false,
            legend_columns: LegendColumns::default(),
            current_colors: None,
            historical_colors: None,
            view_size: Size {
                width: 640.0,
                height: 480.0,
            },
        }
    }

    /// Sets the historical/projected table.
    pub fn with_secondary(mut self, secondary: SeriesFrame) -> Self {
        self.secondary = Some(secondary);
        self
    }

    /// Sets horizontal reference values with optional labels.
    pub fn with_reference_values(mut self, values: Vec<(f64, Option<String>)>) -> Self {
        self.reference_values = values;
        self
    }

    /// Sets the color dimension for current rows.
    pub fn with_color_dim(mut self, dim: SeriesDim) -> Self {
        self.color_dim = dim;
        self
    }

    /// Sets the linetype dimension for current rows.
    pub fn with_linetype_dim(mut self, dim: SeriesDim) -> Self {
        self.linetype_dim = Some(dim);
        self
    }

    /// Sets the facet partition.
    pub fn with_facet(mut self, facet: FacetSpec) -> Self {
        self.facet = Some(facet);
        self
    }

    /// Sets the y-axis configuration.
    pub fn with_y_axis(mut self, y_axis: YAxisSpec) -> Self {
        self.y_axis = y_axis;
        self
    }

    /// Sets the x-axis configuration.
    pub fn with_x_axis(mut self, x_axis: XAxisSpec) -> Self {
        self.x_axis = x_axis;
        self
    }

    /// Sets the base text size.
    pub fn with_text_size(mut self, text_size: f64) -> Self {
        self.text_size = text_size;
        self
    }

    /// Enables or disables observation markers.
    pub fn with_dots(mut self, show_dots: bool) -> Self {
        self.show_dots = show_dots;
        self
    }

    /// Switches projections to the detailed per-identifier legend.
    pub fn with_detailed_projection_legend(mut self, detailed: bool) -> Self {
        self.detailed_projection = detailed;
        self
    }

    /// Sets the render priority.
    pub fn with_priority(mut self, priority: RenderPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the historical marker sizing policy.
    pub fn with_marker_emphasis(mut self, marker: MarkerEmphasis) -> Self {
        self.marker = marker;
        self
    }

    /// Selects the composite (pre-rendered) legend.
    pub fn with_composite_legend(mut self, composite: bool) -> Self {
        self.composite_legend = composite;
        self
    }

    /// Enables paper style (no facet strip shading).
    pub fn with_paper_style(mut self, paper_style: bool) -> Self {
        self.paper_style = paper_style;
        self
    }

    /// Sets per-block legend column counts.
    pub fn with_legend_columns(mut self, columns: LegendColumns) -> Self {
        self.legend_columns = columns;
        self
    }

    /// Sets the manual color override for current keys.
    pub fn with_current_colors(mut self, colors: Vec<Color>) -> Self {
        self.current_colors = Some(colors);
        self
    }

    /// Sets the manual color override for historical keys.
    pub fn with_historical_colors(mut self, colors: Vec<Color>) -> Self {
        self.historical_colors = Some(colors);
        self
    }

    /// Sets the outer figure size.
    pub fn with_view_size(mut self, view_size: Size) -> Self {
        self.view_size = view_size;
        self
    }

    /// Composes the figure.
    ///
    /// Returns the unified figure or the composite handle; fails
    /// synchronously on configuration or validation errors, producing no
    /// partial figure.
    pub fn compose(
        &self,
        measurer: &dyn TextMeasurer,
        palette: &dyn PaletteLookup,
    ) -> Result<FigureArtifact, ChartError> {
        let set = WorkingSet::normalize(&self.primary, self.secondary.as_ref(), self.color_dim)?;
        let colors = assign_colors(
            &set,
            self.color_dim,
            self.detailed_projection,
            palette,
            self.current_colors.as_deref(),
            self.historical_colors.as_deref(),
        )?;

        let cctx = ComposeContext {
            set: &set,
            colors: &colors,
            color_dim: self.color_dim,
            detailed_projection: self.detailed_projection,
            linetype_dim: self.linetype_dim,
            columns: self.legend_columns,
            text_size: self.text_size,
        };

        let panels = partition(&set, self.facet.as_ref());
        let grid = self
            .facet
            .as_ref()
            .map_or((1, 1), |f| f.grid(panels.len()));

        let legend_size = if self.composite_legend {
            None
        } else {
            let blocks = unified_blocks(&cctx);
            (!blocks.is_empty()).then(|| unified_size(&blocks, measurer))
        };

        let layout = FigureLayout::arrange(&FigureLayoutSpec {
            view_size: self.view_size,
            strip_height: if self.facet.is_some() {
                self.text_size + 6.0
            } else {
                0.0
            },
            grid,
            legend: legend_size,
            ..FigureLayoutSpec::default()
        });

        let global_x = set.period_domain().unwrap_or((0.0, 1.0));
        let global_y = set.value_domain().unwrap_or((0.0, 1.0));
        let sharing = self.facet.as_ref().map(|f| f.sharing).unwrap_or_default();
        let axis_style = AxisStyle::default().with_text_size(self.text_size);

        let mut body = Figure::new(layout.view);
        let layer_opts = LayerOptions {
            color_dim: self.color_dim,
            linetype_dim: self.linetype_dim,
            show_dots: self.show_dots,
            detailed_projection: self.detailed_projection,
            priority: self.priority,
            marker: self.marker,
        };

        for (i, panel) in panels.iter().enumerate() {
            let Some(&rect) = layout.panels.get(i) else {
                break;
            };
            let rows: Vec<&WorkingRow> =
                panel.row_indices.iter().map(|&j| &set.rows[j]).collect();

            let x_domain = if sharing.free_x() {
                crate::scale::infer_domain(
                    rows.iter()
                        .filter(|r| set.projected_visible(r))
                        .map(|r| r.period),
                )
                .unwrap_or(global_x)
            } else {
                global_x
            };
            let y_domain = if sharing.free_y() {
                crate::scale::infer_domain(
                    rows.iter()
                        .filter(|r| set.projected_visible(r))
                        .map(|r| r.value),
                )
                .unwrap_or(global_y)
            } else {
                global_y
            };

            let x_scale = self.x_axis.scale(x_domain, (rect.x0, rect.x1));
            let y_scale = self.y_axis.scale(y_domain, (rect.y1, rect.y0));

            let ctx = LayerContext {
                set: &set,
                colors: &colors,
                x_scale,
                y_scale,
                id_base: (i as u64 + 1) * PANEL_ID_STRIDE,
            };

            body.extend([Mark::new(
                MarkId::from_raw(ctx.id_base),
                z_order::PLOT_BACKGROUND,
                RectMark::new(rect.x0, rect.y0, rect.width(), rect.height(), css::WHITE),
            )]);

            for pass in render_layers(&ctx, &rows, &layer_opts) {
                body.extend(pass.marks);
            }
            for pass in reference_passes(
                &ctx,
                rect,
                set.first_current_period,
                &self.reference_values,
                self.text_size,
            ) {
                body.extend(pass.marks);
            }

            let x_ticks = x_scale.ticks(X_TICK_COUNT);
            body.extend(axis_marks(
                ctx.id_base + 1_000_000,
                AxisOrient::Bottom,
                &ScaleContinuous::from(x_scale),
                &x_ticks,
                rect,
                &axis_style,
                measurer,
            ));
            let y_ticks = self.y_axis.ticks(&y_scale, Y_TICK_COUNT);
            body.extend(axis_marks(
                ctx.id_base + 2_000_000,
                AxisOrient::Left,
                &y_scale,
                &y_ticks,
                rect,
                &axis_style,
                measurer,
            ));

            if let (Some(facet), Some(label), Some(&strip)) = (
                self.facet.as_ref(),
                panel.label.as_ref(),
                layout.strips.get(i),
            ) {
                body.extend(strip_marks(
                    ctx.id_base + 3_000_000,
                    strip,
                    label,
                    facet.strip_background && !self.paper_style,
                    self.text_size,
                ));
            }
        }

        let composer: &dyn LegendComposer = if self.composite_legend {
            &CompositeComposer
        } else {
            &UnifiedComposer
        };
        composer.compose(body, layout.legend, &cctx, measurer)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use overplot_core::SeriesRecord;

    use super::*;
    use crate::measure::HeuristicTextMeasurer;
    use crate::palette::WheelPalette;

    fn primary() -> SeriesFrame {
        SeriesFrame::from_records(vec![
            SeriesRecord::new("remind", "base", "EUR", 2005.0, "emi", 1.0),
            SeriesRecord::new("remind", "base", "EUR", 2010.0, "emi", 2.0),
            SeriesRecord::new("remind", "policy", "EUR", 2005.0, "emi", 1.5),
            SeriesRecord::new("remind", "policy", "EUR", 2010.0, "emi", 1.0),
        ])
    }

    #[test]
    fn unified_compose_returns_a_sorted_figure() {
        let artifact = ScenarioChartSpec::new(primary())
            .compose(&HeuristicTextMeasurer, &WheelPalette)
            .unwrap();
        let figure = artifact.as_unified().expect("unified mode is the default");
        assert!(!figure.marks.is_empty());
        assert!(
            figure
                .marks
                .windows(2)
                .all(|w| (w[0].z_index, w[0].id) <= (w[1].z_index, w[1].id)),
            "marks must be in paint order"
        );
    }

    #[test]
    fn wrong_override_length_produces_no_artifact() {
        let err = ScenarioChartSpec::new(primary())
            .with_current_colors(vec![css::BLACK])
            .compose(&HeuristicTextMeasurer, &WheelPalette)
            .unwrap_err();
        assert!(matches!(err, ChartError::Validation(_)));
    }
}
