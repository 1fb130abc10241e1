//! # tally-core
//!
//! Document model for the tally spreadsheet library.
//!
//! This crate provides the in-memory workbook that readers and writers
//! operate on:
//! - [`Workbook`], [`Worksheet`] - The document and its sheets
//! - [`CellRef`] and [`CellMut`] - Handles for reading and writing one cell
//! - [`CellValue`], [`CellAddress`] and [`CellRange`] - Values and addressing
//! - [`Stylesheet`], [`Format`] and [`NamedStyle`] - Interned cell formatting
//! - [`SharedStringTable`] - Workbook-wide string interning
//! - [`Relationships`] and [`Manifest`] - Package bookkeeping for the file format
//!
//! ## Example
//!
//! ```rust
//! use tally_core::{CellRead, CellType, NumberFormat, Workbook};
//!
//! let mut workbook = Workbook::new();
//! workbook.set_guess_types(true);
//!
//! let mut cell = workbook.cell_mut(0, "A1").unwrap();
//! cell.set_value("12.5%").unwrap();
//! assert_eq!(cell.data_type(), CellType::Numeric);
//! assert_eq!(cell.number_format(), NumberFormat::percentage());
//!
//! workbook.cell_mut(0, "B1").unwrap().set_value("=A1*2").unwrap();
//! assert_eq!(workbook.cell(0, "B1").unwrap().formula().unwrap(), "A1*2");
//! ```

pub mod cell;
pub mod column;
pub mod comment;
pub mod datetime;
pub mod error;
pub mod infer;
pub mod named_range;
pub mod numfmt;
pub mod package;
pub mod row;
pub mod shared_strings;
pub mod style;
pub mod text;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{
    CellAddress, CellData, CellError, CellInput, CellMut, CellRange, CellRead, CellRef, CellType,
    CellValue, FromCellValue,
};
pub use column::ColumnProperties;
pub use comment::{CellKey, Comment};
pub use datetime::Calendar;
pub use error::{Error, Result};
pub use named_range::NamedRange;
pub use package::{Manifest, Relationship, RelationshipKind, Relationships, TargetMode};
pub use row::RowProperties;
pub use shared_strings::SharedStringTable;
pub use text::{RichText, SharedText, TextRun};
pub use workbook::{DocumentProperties, Workbook, WorkbookSettings};
pub use worksheet::{SheetId, Worksheet};

// Re-export all style types for convenience
pub use style::{
    Alignment, BorderEdge, BorderLineStyle, BorderSide, BorderStyle, Color, FillStyle, FontStyle,
    Format, HorizontalAlignment, NamedStyle, NumberFormat, PatternType, Protection, Stylesheet,
    Underline, VerticalAlignment,
};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Maximum number of characters in a string cell; longer text is truncated
pub const MAX_STRING_LEN: usize = 32_767;
