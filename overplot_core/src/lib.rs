// Copyright 2025 the Overplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing primitives and owned series data for `overplot_charts`.
//!
//! This crate is the boundary between the plot-composition engine and
//! whatever actually rasterizes the output:
//! - **Marks** are resolved geometric primitives (paths, rects, text) with a
//!   stable identity and an explicit z-index. A renderer executes them in
//!   `(z_index, MarkId)` order and owes us nothing else.
//! - **Frames** hold the raw series records the engine consumes, with stable
//!   row keys so per-row marks keep their identity across invocations.
//!
//! Text shaping and layout are out of scope; text marks store unshaped strings.

#![no_std]

extern crate alloc;

mod frame;
mod mark;

pub use frame::{SeriesFrame, SeriesRecord};
pub use mark::{Dash, Mark, MarkId, MarkKind, PathMark, RectMark, TextAnchor, TextBaseline, TextMark};
