// Copyright 2025 the Overplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by the chart composition layer.
//!
//! Failures are synchronous and total: a call either returns a figure
//! artifact or one of these errors, never a partial figure. An absent or
//! empty secondary table is not an error; it degrades to current-only
//! rendering.

extern crate alloc;

use alloc::string::String;

use crate::category::DrawCategory;

/// Caller configuration that cannot be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A non-default color dimension was requested while historical or
    /// projected data is present. Historical coloring is fixed to the model
    /// field, so a free color dimension is only valid for current-only data.
    ColorDimensionWithHistory {
        /// The requested color dimension's display name.
        dimension: String,
    },
    /// The render priority is not a permutation of the three draw categories.
    InvalidPriority {
        /// The category that appears more than once.
        duplicate: DrawCategory,
    },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ColorDimensionWithHistory { dimension } => write!(
                f,
                "color dimension `{dimension}` cannot be combined with historical data; \
                 historical series are always colored by model"
            ),
            Self::InvalidPriority { duplicate } => write!(
                f,
                "render priority must list each draw category exactly once; \
                 `{duplicate:?}` appears more than once"
            ),
        }
    }
}

/// Caller-supplied data that contradicts the working set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The manual color override for current keys has the wrong length.
    CurrentOverrideLength {
        /// Number of distinct current keys.
        expected: usize,
        /// Number of supplied colors.
        got: usize,
    },
    /// The manual color override for historical keys has the wrong length.
    HistoricalOverrideLength {
        /// Number of distinct historical keys.
        expected: usize,
        /// Number of supplied colors.
        got: usize,
    },
}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::CurrentOverrideLength { expected, got } => write!(
                f,
                "current color override has {got} entries but there are {expected} current keys"
            ),
            Self::HistoricalOverrideLength { expected, got } => write!(
                f,
                "historical color override has {got} entries but there are {expected} historical keys"
            ),
        }
    }
}

/// Any error reported while composing a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    /// Invalid caller configuration.
    Configuration(ConfigError),
    /// Invalid caller-supplied data.
    Validation(ValidationError),
}

impl core::fmt::Display for ChartError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Configuration(e) => write!(f, "configuration error: {e}"),
            Self::Validation(e) => write!(f, "validation error: {e}"),
        }
    }
}

impl From<ConfigError> for ChartError {
    fn from(value: ConfigError) -> Self {
        Self::Configuration(value)
    }
}

impl From<ValidationError> for ChartError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::format;
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn override_error_reports_both_counts() {
        let err = ValidationError::CurrentOverrideLength {
            expected: 4,
            got: 2,
        };
        let msg = format!("{err}");
        assert!(msg.contains('4'), "missing expected count: {msg}");
        assert!(msg.contains('2'), "missing supplied count: {msg}");
    }

    #[test]
    fn chart_error_wraps_config_error() {
        let err: ChartError = ConfigError::ColorDimensionWithHistory {
            dimension: "scenario".to_string(),
        }
        .into();
        assert!(matches!(err, ChartError::Configuration(_)));
    }
}
