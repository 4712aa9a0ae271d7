// Copyright 2025 the Overplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end composition scenarios.

extern crate std;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use overplot_core::{MarkKind, SeriesFrame, SeriesRecord};

use crate::{
    ComposeContext, DrawCategory, HISTORICAL_SCENARIO, HeuristicTextMeasurer, LegendColumns,
    ScenarioChartSpec, SeriesDim, WheelPalette, WorkingSet, YAxisSpec, assign_colors,
    legend_shares, unified_blocks,
};

fn two_scenario_primary() -> SeriesFrame {
    let mut rows = Vec::new();
    for scenario in ["base", "policy"] {
        for (i, period) in [2005.0, 2010.0, 2015.0].iter().enumerate() {
            rows.push(SeriesRecord::new(
                "remind",
                scenario,
                "EUR",
                *period,
                "emi",
                1.0 + i as f64,
            ));
        }
    }
    SeriesFrame::from_records(rows)
}

fn historical_only_secondary() -> SeriesFrame {
    SeriesFrame::from_records(vec![
        SeriesRecord::new("ceds", HISTORICAL_SCENARIO, "EUR", 2000.0, "emi", 0.5),
        SeriesRecord::new("iea", HISTORICAL_SCENARIO, "EUR", 2005.0, "emi", 0.8),
    ])
}

fn mixed_secondary() -> SeriesFrame {
    SeriesFrame::from_records(vec![
        SeriesRecord::new("ceds", HISTORICAL_SCENARIO, "EUR", 2000.0, "emi", 0.5),
        SeriesRecord::new("message", "scenarioA", "EUR", 2010.0, "emi", 3.0),
    ])
}

fn dashed_path_count(figure: &crate::Figure) -> usize {
    figure
        .marks
        .iter()
        .filter(|m| match &m.kind {
            MarkKind::Path(p) => !p.dash.is_empty(),
            _ => false,
        })
        .count()
}

#[test]
fn current_only_unified_has_color_legend_and_reference_rule() {
    // Scenario 1: 2 scenarios x 3 periods, no secondary data, unified mode.
    let artifact = ScenarioChartSpec::new(two_scenario_primary())
        .compose(&HeuristicTextMeasurer, &WheelPalette)
        .unwrap();
    let figure = artifact.as_unified().unwrap();

    let set = WorkingSet::normalize(&two_scenario_primary(), None, SeriesDim::Identifier).unwrap();
    let colors =
        assign_colors(&set, SeriesDim::Identifier, false, &WheelPalette, None, None).unwrap();
    let ctx = ComposeContext {
        set: &set,
        colors: &colors,
        color_dim: SeriesDim::Identifier,
        detailed_projection: false,
        linetype_dim: None,
        columns: LegendColumns::default(),
        text_size: 10.0,
    };
    let blocks = unified_blocks(&ctx);
    assert_eq!(blocks.len(), 1, "color legend only");
    assert_eq!(blocks[0].items.len(), 2);

    // Exactly one dashed path: the vertical rule at the first primary period.
    assert_eq!(dashed_path_count(figure), 1);
}

#[test]
fn current_only_composite_is_one_full_width_panel() {
    let artifact = ScenarioChartSpec::new(two_scenario_primary())
        .with_composite_legend(true)
        .compose(&HeuristicTextMeasurer, &WheelPalette)
        .unwrap();
    let composite = artifact.as_composite().unwrap();
    assert_eq!(composite.legend_row.len(), 1);
    assert!((composite.legend_row[0].share - 1.0).abs() < 1e-9);
}

#[test]
fn all_historical_secondary_attaches_the_fill_block() {
    // Scenario 2: every secondary row has the reserved scenario.
    let set = WorkingSet::normalize(
        &two_scenario_primary(),
        Some(&historical_only_secondary()),
        SeriesDim::Identifier,
    )
    .unwrap();
    assert!(set.has_category(DrawCategory::Historical));
    assert!(!set.has_category(DrawCategory::Projected));

    let colors =
        assign_colors(&set, SeriesDim::Identifier, false, &WheelPalette, None, None).unwrap();
    let ctx = ComposeContext {
        set: &set,
        colors: &colors,
        color_dim: SeriesDim::Identifier,
        detailed_projection: false,
        linetype_dim: None,
        columns: LegendColumns::default(),
        text_size: 10.0,
    };
    let blocks = unified_blocks(&ctx);
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[1].title, "Historical data");

    let artifact = ScenarioChartSpec::new(two_scenario_primary())
        .with_secondary(historical_only_secondary())
        .compose(&HeuristicTextMeasurer, &WheelPalette)
        .unwrap();
    assert!(artifact.as_unified().is_some());
}

#[test]
fn mixed_secondary_composite_has_three_width_apportioned_panels() {
    // Scenario 3: secondary rows split historical vs projected.
    let set = WorkingSet::normalize(
        &two_scenario_primary(),
        Some(&mixed_secondary()),
        SeriesDim::Identifier,
    )
    .unwrap();
    assert!(set.has_category(DrawCategory::Historical));
    assert!(set.has_category(DrawCategory::Projected));

    let colors =
        assign_colors(&set, SeriesDim::Identifier, false, &WheelPalette, None, None).unwrap();
    let ctx = ComposeContext {
        set: &set,
        colors: &colors,
        color_dim: SeriesDim::Identifier,
        detailed_projection: false,
        linetype_dim: None,
        columns: LegendColumns::default(),
        text_size: 10.0,
    };
    let shares = legend_shares(&ctx, &HeuristicTextMeasurer);

    let artifact = ScenarioChartSpec::new(two_scenario_primary())
        .with_secondary(mixed_secondary())
        .with_composite_legend(true)
        .compose(&HeuristicTextMeasurer, &WheelPalette)
        .unwrap();
    let composite = artifact.as_composite().unwrap();
    assert_eq!(composite.legend_row.len(), 3);
    for (panel, share) in composite.legend_row.iter().zip(&shares) {
        assert!((panel.share - share.share).abs() < 1e-9);
    }
}

#[test]
fn log_axis_with_limits_and_breaks_labels_the_breaks() {
    // Scenario 4: log y-axis, explicit limits, explicit breaks.
    let artifact = ScenarioChartSpec::new(two_scenario_primary())
        .with_y_axis(
            YAxisSpec::log()
                .with_limits((1.0, 1000.0))
                .with_breaks(vec![1.0, 10.0, 100.0]),
        )
        .compose(&HeuristicTextMeasurer, &WheelPalette)
        .unwrap();
    let figure = artifact.as_unified().unwrap();

    let texts: Vec<&String> = figure
        .marks
        .iter()
        .filter_map(|m| match &m.kind {
            MarkKind::Text(t) => Some(&t.text),
            _ => None,
        })
        .collect();
    for expected in ["1", "10", "100"] {
        assert!(
            texts.iter().any(|t| t.as_str() == expected),
            "missing break label {expected}"
        );
    }
}

#[test]
fn missing_values_never_reach_the_figure() {
    let mut primary = two_scenario_primary();
    primary.push(SeriesRecord::new("remind", "base", "EUR", 2020.0, "emi", None));

    let artifact = ScenarioChartSpec::new(primary)
        .compose(&HeuristicTextMeasurer, &WheelPalette)
        .unwrap();
    let figure = artifact.as_unified().unwrap();

    // With dots on, every surviving current row draws one circle at
    // series-points z for the topmost slot; the dropped row must not.
    let point_z = crate::series_points(2);
    let circles = figure
        .marks
        .iter()
        .filter(|m| m.z_index == point_z)
        .count();
    assert_eq!(circles, 6);
}

#[test]
fn facets_partition_panels_and_respect_paper_style() {
    let mut rows = Vec::new();
    for region in ["ASIA", "EUR"] {
        for period in [2005.0, 2010.0] {
            rows.push(SeriesRecord::new("remind", "base", region, period, "emi", 1.0));
        }
    }
    let spec = ScenarioChartSpec::new(SeriesFrame::from_records(rows))
        .with_facet(crate::FacetSpec::new(SeriesDim::Region))
        .with_paper_style(true);
    let artifact = spec.compose(&HeuristicTextMeasurer, &WheelPalette).unwrap();
    let figure = artifact.as_unified().unwrap();

    let strip_fills = figure
        .marks
        .iter()
        .filter(|m| m.z_index == crate::FACET_STRIPS)
        .count();
    assert_eq!(strip_fills, 0, "paper style suppresses strip shading");

    let strip_labels: Vec<&String> = figure
        .marks
        .iter()
        .filter(|m| m.z_index == crate::FACET_STRIP_LABELS)
        .filter_map(|m| match &m.kind {
            MarkKind::Text(t) => Some(&t.text),
            _ => None,
        })
        .collect();
    assert_eq!(strip_labels.len(), 2);
    assert!(strip_labels.iter().any(|t| t.as_str() == "EUR"));
}
