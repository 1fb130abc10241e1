//! Round-trip tests for tally-xlsx.
//!
//! Each test builds a workbook in memory, writes it with `XlsxWriter`,
//! reads it back with `XlsxReader` and asserts on the loaded model.

mod common;
mod sheets;
mod styles;
mod values;

pub use common::*;
