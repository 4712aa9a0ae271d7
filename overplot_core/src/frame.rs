// Copyright 2025 the Overplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned series-record storage.
//!
//! A [`SeriesFrame`] is the raw input table for the chart layer: one record
//! per observation, with stable `row_keys` so marks derived from a row keep
//! their identity. Cleaning (dropping missing values, deriving identifiers)
//! happens downstream; this type stores records as supplied.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

/// One raw series observation.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesRecord {
    /// Model that produced the value.
    pub model: String,
    /// Scenario the value belongs to.
    pub scenario: String,
    /// Facet dimension value, typically a region.
    pub region: String,
    /// Ordinal period, typically a year.
    pub period: f64,
    /// Reported variable name.
    pub variable: String,
    /// Observed value; `None` marks a missing observation.
    pub value: Option<f64>,
    /// Series identifier; derived from model + scenario when absent.
    pub identifier: Option<String>,
}

impl SeriesRecord {
    /// Creates a record without an explicit identifier.
    pub fn new(
        model: impl Into<String>,
        scenario: impl Into<String>,
        region: impl Into<String>,
        period: f64,
        variable: impl Into<String>,
        value: impl Into<Option<f64>>,
    ) -> Self {
        Self {
            model: model.into(),
            scenario: scenario.into(),
            region: region.into(),
            period,
            variable: variable.into(),
            value: value.into(),
            identifier: None,
        }
    }

    /// Sets an explicit series identifier.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }
}

/// An owned frame of series records with stable row keys.
#[derive(Clone, Debug, Default)]
pub struct SeriesFrame {
    /// Stable keys for each row, aligned with `rows`.
    pub row_keys: Vec<u64>,
    /// The records, in insertion order.
    pub rows: Vec<SeriesRecord>,
}

impl SeriesFrame {
    /// Creates an empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frame from records, assigning sequential row keys.
    pub fn from_records(rows: Vec<SeriesRecord>) -> Self {
        let row_keys = (0..rows.len() as u64).collect();
        Self { row_keys, rows }
    }

    /// Appends a record and returns its row key.
    pub fn push(&mut self, record: SeriesRecord) -> u64 {
        let key = self.row_keys.last().map_or(0, |k| k + 1);
        self.row_keys.push(key);
        self.rows.push(record);
        key
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the frame holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    #[test]
    fn from_records_assigns_sequential_keys() {
        let frame = SeriesFrame::from_records(vec![
            SeriesRecord::new("m", "s", "r", 2020.0, "v", 1.0),
            SeriesRecord::new("m", "s", "r", 2025.0, "v", 2.0),
        ]);
        assert_eq!(frame.row_keys, vec![0, 1]);
    }

    #[test]
    fn push_continues_key_sequence() {
        let mut frame = SeriesFrame::from_records(vec![SeriesRecord::new(
            "m", "s", "r", 2020.0, "v", 1.0,
        )]);
        let key = frame.push(SeriesRecord::new("m", "s", "r", 2025.0, "v", None));
        assert_eq!(key, 1);
        assert_eq!(frame.row_count(), 2);
    }
}
