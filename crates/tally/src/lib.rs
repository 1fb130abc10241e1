//! # tally
//!
//! A Rust library for reading, writing, and manipulating XLSX spreadsheets.
//!
//! ## Features
//!
//! - Cells holding numbers, text, rich text, booleans, errors and formulas
//! - Dates and times on the 1900 and 1904 calendars
//! - Interned formats and named styles
//! - Merged cells, hyperlinks, comments and named ranges
//! - Read and write XLSX files (Office Open XML)
//!
//! ## Example
//!
//! ```rust
//! use tally::prelude::*;
//! use std::io::Cursor;
//!
//! let mut workbook = Workbook::new();
//! workbook.cell_mut(0, "A1").unwrap().set_value("Hello").unwrap();
//! workbook.cell_mut(0, "B1").unwrap().set_value(42.0).unwrap();
//! workbook.cell_mut(0, "C1").unwrap().set_formula("=B1*2").unwrap();
//!
//! let mut buffer = Cursor::new(Vec::new());
//! workbook.write_to(&mut buffer).unwrap();
//!
//! buffer.set_position(0);
//! let loaded = Workbook::from_reader(buffer).unwrap();
//! assert_eq!(loaded.cell(0, "B1").unwrap().value::<f64>(), 42.0);
//! ```

pub mod error;
pub mod prelude;

pub use error::{Error, Result};

/// Errors raised by the document model itself
pub use tally_core::Error as CoreError;

// Re-export core types
pub use tally_core::{
    Alignment, BorderEdge, BorderLineStyle, BorderSide, BorderStyle, Calendar, CellAddress,
    CellData, CellError, CellInput, CellMut, CellRange, CellRead, CellRef, CellType, CellValue,
    Color, Comment, DocumentProperties, FillStyle, FontStyle, Format, FromCellValue,
    HorizontalAlignment, NamedRange, NamedStyle, NumberFormat, PatternType, Protection, RichText,
    SharedText, Stylesheet, TextRun, Underline, VerticalAlignment, Workbook, WorkbookSettings,
    Worksheet, MAX_COLS, MAX_ROWS, MAX_SHEET_NAME_LEN, MAX_STRING_LEN,
};

// Re-export I/O types
pub use tally_xlsx::{LoadOptions, XlsxError, XlsxReader, XlsxWriter};

use std::io::{Read, Seek, Write};
use std::path::Path;

/// Extension trait for Workbook to add file I/O
pub trait WorkbookExt: Sized {
    /// Open a workbook from a file
    fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, &LoadOptions::default())
    }

    /// Open a workbook from a file with load options
    fn open_with_options<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self>;

    /// Read a workbook from any seekable source
    fn from_reader<R: Read + Seek>(reader: R) -> Result<Self>;

    /// Save the workbook to a file
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Write the workbook as XLSX to any seekable sink
    fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()>;
}

/// Accept only `.xlsx` and `.xlsm` paths
fn check_extension(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("xlsx") | Some("xlsm") => Ok(()),
        _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
    }
}

impl WorkbookExt for Workbook {
    fn open_with_options<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Workbook> {
        let path = path.as_ref();
        check_extension(path)?;
        Ok(XlsxReader::read_file_with_options(path, options)?)
    }

    fn from_reader<R: Read + Seek>(reader: R) -> Result<Workbook> {
        Ok(XlsxReader::read(reader)?)
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        check_extension(path)?;
        Ok(XlsxWriter::write_file(self, path)?)
    }

    fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        Ok(XlsxWriter::write(self, writer)?)
    }
}
