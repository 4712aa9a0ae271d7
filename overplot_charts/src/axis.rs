// Copyright 2025 the Overplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis configuration and mark generation.
//!
//! The y-axis is either linear (optionally with explicit break positions
//! and/or expanded limits) or base-10 logarithmic (optionally with a clamped
//! display range); the two modes are mutually exclusive per call. The x-axis
//! takes an optional limit pair and always thins tick labels that would
//! collide.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use kurbo::Rect;
use overplot_core::{Mark, MarkId, TextAnchor, TextBaseline, TextMark};
use peniko::Brush;
use peniko::color::palette::css;

use crate::measure::TextMeasurer;
use crate::rule::RuleMarkSpec;
use crate::scale::{ScaleContinuous, ScaleLinear, ScaleLog};
use crate::z_order;

/// A paint + width pair for stroked paths (domain lines, ticks, rules).
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
}

impl StrokeStyle {
    /// Convenience for a solid stroke.
    pub fn solid(brush: impl Into<Brush>, stroke_width: f64) -> Self {
        Self {
            brush: brush.into(),
            stroke_width,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::solid(css::BLACK, 1.0)
    }
}

/// Axis styling defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisStyle {
    /// Style for the axis domain line and tick marks.
    pub rule: StrokeStyle,
    /// Fill paint for tick labels.
    pub label_fill: Brush,
    /// Font size for tick labels.
    pub label_font_size: f64,
    /// Tick line length.
    pub tick_size: f64,
    /// Padding between the tick end and the tick label.
    pub tick_padding: f64,
}

impl Default for AxisStyle {
    fn default() -> Self {
        let rule = StrokeStyle::default();
        Self {
            label_fill: rule.brush.clone(),
            rule,
            label_font_size: 10.0,
            tick_size: 5.0,
            tick_padding: 4.0,
        }
    }
}

impl AxisStyle {
    /// Scales the label font to the figure-level text size.
    pub fn with_text_size(mut self, text_size: f64) -> Self {
        self.label_font_size = text_size;
        self
    }
}

/// Axis placement relative to the plot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// A horizontal axis placed below the plot area.
    Bottom,
    /// A vertical axis placed to the left of the plot area.
    Left,
}

/// Y-axis coordinate transform selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum YScaleMode {
    /// Identity transform.
    Linear,
    /// Base-10 log transform.
    Log,
}

/// Y-axis configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct YAxisSpec {
    /// Transform mode.
    pub mode: YScaleMode,
    /// Explicit tick positions; `None` picks ticks from the scale.
    pub breaks: Option<Vec<f64>>,
    /// Limit pair. Linear mode expands the data domain to include the
    /// limits; log mode clamps the display range to them.
    pub limits: Option<(f64, f64)>,
}

impl Default for YAxisSpec {
    fn default() -> Self {
        Self {
            mode: YScaleMode::Linear,
            breaks: None,
            limits: None,
        }
    }
}

impl YAxisSpec {
    /// Linear mode with no breaks or limits.
    pub fn linear() -> Self {
        Self::default()
    }

    /// Log mode with no limits.
    pub fn log() -> Self {
        Self {
            mode: YScaleMode::Log,
            breaks: None,
            limits: None,
        }
    }

    /// Sets explicit break positions.
    pub fn with_breaks(mut self, breaks: Vec<f64>) -> Self {
        self.breaks = Some(breaks);
        self
    }

    /// Sets the limit pair.
    pub fn with_limits(mut self, limits: (f64, f64)) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Instantiates the y scale for a data domain and output range.
    pub fn scale(&self, data_domain: (f64, f64), range: (f64, f64)) -> ScaleContinuous {
        match self.mode {
            YScaleMode::Linear => {
                let domain = match self.limits {
                    Some((lo, hi)) => (data_domain.0.min(lo), data_domain.1.max(hi)),
                    None => data_domain,
                };
                ScaleLinear::new(domain, range).into()
            }
            YScaleMode::Log => {
                let domain = self.limits.unwrap_or(data_domain);
                ScaleLog::new(domain, range).into()
            }
        }
    }

    /// Returns tick positions: the explicit breaks if set, else scale ticks.
    pub fn ticks(&self, scale: &ScaleContinuous, count: usize) -> Vec<f64> {
        match &self.breaks {
            Some(breaks) => breaks.clone(),
            None => scale.ticks(count),
        }
    }
}

/// X-axis configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct XAxisSpec {
    /// Explicit limit pair; replaces the data domain when set.
    pub limits: Option<(f64, f64)>,
}

impl XAxisSpec {
    /// Sets the limit pair.
    pub fn with_limits(mut self, limits: (f64, f64)) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Instantiates the x scale for a data domain and output range.
    pub fn scale(&self, data_domain: (f64, f64), range: (f64, f64)) -> ScaleLinear {
        ScaleLinear::new(self.limits.unwrap_or(data_domain), range)
    }
}

/// Formats a tick value; integral values render without decimals.
pub fn format_tick(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "integral by the guard above; periods and breaks are small"
        )]
        let i = v.round() as i64;
        alloc::format!("{i}")
    } else {
        alloc::format!("{v}")
    }
}

/// Computes a keep-mask that thins overlapping tick labels.
///
/// Labels are visited in position order; a label survives when its measured
/// extent clears the previous surviving label by `gap`.
pub fn thin_labels(
    positions: &[f64],
    labels: &[String],
    measurer: &dyn TextMeasurer,
    font_size: f64,
    gap: f64,
) -> Vec<bool> {
    let mut keep = Vec::with_capacity(labels.len());
    let mut last_end = f64::NEG_INFINITY;
    for (pos, label) in positions.iter().zip(labels) {
        let (w, _h) = measurer.measure(label, font_size);
        let start = pos - w * 0.5;
        if start >= last_end + gap {
            keep.push(true);
            last_end = pos + w * 0.5;
        } else {
            keep.push(false);
        }
    }
    keep
}

/// Generates the marks for one axis along the plot rectangle `data`.
///
/// Bottom-axis labels run through the collision thinning policy; left-axis
/// labels are kept as supplied.
pub fn axis_marks(
    id_base: u64,
    orient: AxisOrient,
    scale: &ScaleContinuous,
    ticks: &[f64],
    data: Rect,
    style: &AxisStyle,
    measurer: &dyn TextMeasurer,
) -> Vec<Mark> {
    let mut out = Vec::new();

    let domain = match orient {
        AxisOrient::Bottom => {
            RuleMarkSpec::horizontal(MarkId::from_raw(id_base), data.y1, data.x0, data.x1)
        }
        AxisOrient::Left => {
            RuleMarkSpec::vertical(MarkId::from_raw(id_base), data.x0, data.y0, data.y1)
        }
    };
    out.push(
        domain
            .with_stroke(style.rule.brush.clone(), style.rule.stroke_width)
            .with_z_index(z_order::AXIS_RULES)
            .mark(),
    );

    let labels: Vec<String> = ticks.iter().map(|&v| format_tick(v)).collect();
    let positions: Vec<f64> = ticks.iter().map(|&v| scale.map(v)).collect();
    let keep = match orient {
        AxisOrient::Bottom => thin_labels(
            &positions,
            &labels,
            measurer,
            style.label_font_size,
            style.label_font_size * 0.5,
        ),
        AxisOrient::Left => alloc::vec![true; labels.len()],
    };

    for (i, ((&pos, label), keep)) in positions.iter().zip(labels).zip(keep).enumerate() {
        let tick_id = MarkId::from_raw(id_base + 1 + i as u64);
        let label_id = MarkId::from_raw(id_base + 1000 + i as u64);
        match orient {
            AxisOrient::Bottom => {
                out.push(
                    RuleMarkSpec::vertical(tick_id, pos, data.y1, data.y1 + style.tick_size)
                        .with_stroke(style.rule.brush.clone(), style.rule.stroke_width)
                        .with_z_index(z_order::AXIS_RULES)
                        .mark(),
                );
                if keep {
                    out.push(Mark::new(
                        label_id,
                        z_order::AXIS_LABELS,
                        TextMark::new(pos, data.y1 + style.tick_size + style.tick_padding, label)
                            .with_font_size(style.label_font_size)
                            .with_fill(style.label_fill.clone())
                            .with_anchor(TextAnchor::Middle)
                            .with_baseline(TextBaseline::Hanging),
                    ));
                }
            }
            AxisOrient::Left => {
                out.push(
                    RuleMarkSpec::horizontal(tick_id, pos, data.x0 - style.tick_size, data.x0)
                        .with_stroke(style.rule.brush.clone(), style.rule.stroke_width)
                        .with_z_index(z_order::AXIS_RULES)
                        .mark(),
                );
                if keep {
                    out.push(Mark::new(
                        label_id,
                        z_order::AXIS_LABELS,
                        TextMark::new(
                            data.x0 - style.tick_size - style.tick_padding,
                            pos,
                            label,
                        )
                        .with_font_size(style.label_font_size)
                        .with_fill(style.label_fill.clone())
                        .with_anchor(TextAnchor::End)
                        .with_baseline(TextBaseline::Middle),
                    ));
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;
    use alloc::vec;

    use super::*;
    use crate::measure::HeuristicTextMeasurer;

    #[test]
    fn log_mode_with_limits_and_breaks_is_honored() {
        let spec = YAxisSpec::log()
            .with_limits((1.0, 1000.0))
            .with_breaks(vec![1.0, 10.0, 100.0]);
        let scale = spec.scale((3.0, 500.0), (100.0, 0.0));
        assert_eq!(scale.domain_min(), 1.0);
        assert_eq!(scale.domain_max(), 1000.0);
        assert!(matches!(scale, ScaleContinuous::Log(_)));
        assert_eq!(spec.ticks(&scale, 10), vec![1.0, 10.0, 100.0]);
    }

    #[test]
    fn linear_limits_expand_rather_than_clamp() {
        let spec = YAxisSpec::linear().with_limits((0.0, 5.0));
        let scale = spec.scale((2.0, 10.0), (0.0, 1.0));
        assert_eq!(scale.domain_min(), 0.0);
        assert_eq!(scale.domain_max(), 10.0);
    }

    #[test]
    fn crowded_labels_are_thinned_not_overlapped() {
        let measurer = HeuristicTextMeasurer;
        let positions: Vec<f64> = (0..10).map(|i| i as f64 * 8.0).collect();
        let labels: Vec<String> = (2000..2010).map(|y| y.to_string()).collect();
        let keep = thin_labels(&positions, &labels, &measurer, 10.0, 2.0);
        assert!(keep[0]);
        assert!(keep.iter().any(|k| !k), "8px apart cannot fit 24px labels");
        // No two surviving labels overlap.
        let mut last_end = f64::NEG_INFINITY;
        for (pos, k) in positions.iter().zip(&keep) {
            if *k {
                let (w, _) = measurer.measure("2000", 10.0);
                assert!(pos - w * 0.5 >= last_end);
                last_end = pos + w * 0.5;
            }
        }
    }

    #[test]
    fn integral_ticks_format_without_decimals() {
        assert_eq!(format_tick(2020.0), "2020");
        assert_eq!(format_tick(0.5), "0.5");
    }

    #[test]
    fn bottom_axis_emits_domain_ticks_and_labels() {
        let scale: ScaleContinuous = ScaleLinear::new((0.0, 10.0), (0.0, 100.0)).into();
        let marks = axis_marks(
            500,
            AxisOrient::Bottom,
            &scale,
            &[0.0, 5.0, 10.0],
            Rect::new(0.0, 0.0, 100.0, 50.0),
            &AxisStyle::default(),
            &HeuristicTextMeasurer,
        );
        // 1 domain rule + 3 ticks + up to 3 labels.
        assert!(marks.len() >= 4);
    }
}
