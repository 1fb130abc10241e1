//! Prelude module - common imports for tally users
//!
//! ```rust
//! use tally::prelude::*;
//! ```

pub use crate::{
    // Style types
    Alignment,
    BorderLineStyle,
    BorderStyle,
    Calendar,
    // Cell types
    CellAddress,
    CellError,
    CellRange,
    CellRead,
    CellType,
    CellValue,
    Color,
    // Error types
    Error,
    FillStyle,
    FontStyle,
    Format,
    HorizontalAlignment,
    // I/O types
    LoadOptions,
    NamedStyle,
    NumberFormat,
    Protection,
    Result,
    RichText,
    TextRun,
    VerticalAlignment,
    // Main types
    Workbook,
    // Extension traits
    WorkbookExt,
    Worksheet,
    XlsxReader,
    XlsxWriter,
};
