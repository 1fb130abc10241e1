//! # tally-xlsx
//!
//! XLSX (Office Open XML) reader and writer for tally.
//!
//! ```rust
//! use std::io::Cursor;
//! use tally_core::{CellRead, Workbook};
//! use tally_xlsx::{LoadOptions, XlsxReader, XlsxWriter};
//!
//! let mut workbook = Workbook::new();
//! workbook.cell_mut(0, "A1").unwrap().set_value("hello").unwrap();
//!
//! let mut buffer = Cursor::new(Vec::new());
//! XlsxWriter::write(&workbook, &mut buffer).unwrap();
//!
//! buffer.set_position(0);
//! let loaded = XlsxReader::read_with_options(buffer, &LoadOptions::default()).unwrap();
//! assert_eq!(loaded.cell(0, "A1").unwrap().value::<String>(), "hello");
//! ```

pub mod error;
pub mod reader;
pub mod writer;

mod styles;
mod xml;

pub use error::{XlsxError, XlsxResult};
pub use reader::{LoadOptions, XlsxReader};
pub use writer::XlsxWriter;
