//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - The value stored in a cell
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A range of cells (e.g., "A1:B10")
//! - [`CellData`] - Everything stored for one cell
//! - [`CellRef`] and [`CellMut`] - Handles that resolve a cell against its workbook

mod address;
mod handle;
mod input;
mod storage;
mod value;

pub use address::{CellAddress, CellRange, CellRangeIter};
pub use handle::{check_text, CellMut, CellRead, CellRef};
pub use input::{CellInput, FromCellValue};
pub use storage::{CellData, CellStorage};
pub use value::{CellError, CellType, CellValue};
