// Copyright 2025 the Overplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tiny scale utilities.
//!
//! These types provide the coordinate mapping behavior the layer and axis
//! generators need: a linear scale for periods and linear y-axes, and a
//! base-10 log scale for logarithmic y-axes.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// A continuous scale instance.
#[derive(Clone, Copy, Debug)]
pub enum ScaleContinuous {
    /// Linear scale.
    Linear(ScaleLinear),
    /// Log scale.
    Log(ScaleLog),
}

impl ScaleContinuous {
    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        match self {
            Self::Linear(s) => s.map(x),
            Self::Log(s) => s.map(x),
        }
    }

    /// Returns tick values.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        match self {
            Self::Linear(s) => s.ticks(count),
            Self::Log(s) => s.ticks(count),
        }
    }

    /// Returns the minimum of the configured domain (as authored).
    pub fn domain_min(&self) -> f64 {
        match self {
            Self::Linear(s) => s.domain_min(),
            Self::Log(s) => s.domain_min(),
        }
    }

    /// Returns the maximum of the configured domain (as authored).
    pub fn domain_max(&self) -> f64 {
        match self {
            Self::Linear(s) => s.domain_max(),
            Self::Log(s) => s.domain_max(),
        }
    }
}

impl From<ScaleLinear> for ScaleContinuous {
    fn from(value: ScaleLinear) -> Self {
        Self::Linear(value)
    }
}

impl From<ScaleLog> for ScaleContinuous {
    fn from(value: ScaleLog) -> Self {
        Self::Log(value)
    }
}

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Returns the minimum of the configured domain (as authored).
    pub fn domain_min(&self) -> f64 {
        self.domain.0
    }

    /// Returns the maximum of the configured domain (as authored).
    pub fn domain_max(&self) -> f64 {
        self.domain.1
    }

    /// Returns “nice-ish” tick values for the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let span = max - min;
    let step0 = span / count.max(1) as f64;
    let step = nice_step(step0);
    if step == 0.0 {
        return alloc::vec![min, max];
    }

    let start = (min / step).floor() * step;
    let stop = (max / step).ceil() * step;

    let n_f = ((stop - start) / step).round();
    let n = if n_f.is_finite() && n_f >= 0.0 {
        let n_f = n_f.min(10_000.0);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n_f as u64
        }
    } else {
        0
    };
    (0..=n).map(|i| start + step * i as f64).collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// A log-scale mapping from a positive domain to a range.
#[derive(Clone, Copy, Debug)]
pub struct ScaleLog {
    domain: (f64, f64),
    range: (f64, f64),
    base: f64,
}

impl ScaleLog {
    /// Creates a new base-10 log scale.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            base: 10.0,
        }
    }

    /// Sets the log base.
    pub fn with_base(mut self, base: f64) -> Self {
        self.base = if base.is_finite() && base > 0.0 && base != 1.0 {
            base
        } else {
            10.0
        };
        self
    }

    fn log_base(&self, x: f64) -> f64 {
        let denom = self.base.ln();
        if denom == 0.0 { x.ln() } else { x.ln() / denom }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if x <= 0.0 || d0 <= 0.0 || d1 <= 0.0 {
            return r0;
        }
        let ld0 = self.log_base(d0);
        let ld1 = self.log_base(d1);
        let denom = ld1 - ld0;
        if denom == 0.0 {
            return r0;
        }
        let t = (self.log_base(x) - ld0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Returns “nice-ish” tick values for a log domain.
    ///
    /// This returns powers of `base` that fall within the domain, capped by `count`.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (mut min, mut max) = self.domain;
        if min > max {
            core::mem::swap(&mut min, &mut max);
        }
        if min <= 0.0 || !min.is_finite() || !max.is_finite() {
            return Vec::new();
        }
        let min_e = {
            let e = self
                .log_base(min)
                .floor()
                .clamp(i32::MIN as f64, i32::MAX as f64);
            #[allow(clippy::cast_possible_truncation, reason = "clamped to the i32 range")]
            {
                e as i32
            }
        };
        let max_e = {
            let e = self
                .log_base(max)
                .ceil()
                .clamp(i32::MIN as f64, i32::MAX as f64);
            #[allow(clippy::cast_possible_truncation, reason = "clamped to the i32 range")]
            {
                e as i32
            }
        };
        let mut out = Vec::new();
        for e in min_e..=max_e {
            out.push(self.base.powi(e));
            if count != 0 && out.len() >= count {
                break;
            }
        }
        out
    }

    /// Returns the minimum of the configured domain (as authored).
    pub fn domain_min(&self) -> f64 {
        self.domain.0
    }

    /// Returns the maximum of the configured domain (as authored).
    pub fn domain_max(&self) -> f64 {
        self.domain.1
    }
}

/// Infer a `(min, max)` domain from an iterator of values.
///
/// Non-finite values are ignored. Returns `None` if no finite values are present.
pub fn infer_domain(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        if !v.is_finite() {
            continue;
        }
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() {
        Some((min, max))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn log_scale_maps_endpoints_to_range() {
        let s = ScaleLog::new((1.0, 100.0), (0.0, 10.0));
        assert!((s.map(1.0) - 0.0).abs() < 1e-9);
        assert!((s.map(100.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn linear_ticks_cover_domain() {
        let s = ScaleLinear::new((2005.0, 2050.0), (0.0, 100.0));
        let ticks = s.ticks(5);
        assert!(*ticks.first().unwrap() <= 2005.0);
        assert!(*ticks.last().unwrap() >= 2050.0);
    }

    #[test]
    fn infer_domain_skips_non_finite() {
        let d = infer_domain([1.0, f64::NAN, 3.0, f64::INFINITY].into_iter()).unwrap();
        assert_eq!(d, (1.0, 3.0));
    }
}
