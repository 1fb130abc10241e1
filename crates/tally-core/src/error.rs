//! Error types for tally-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the document model.
///
/// Every failing mutation leaves the previously committed state of the
/// workbook unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid or unknown cell range
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Row index out of bounds
    #[error("Row index {0} out of bounds (max: {1})")]
    RowOutOfBounds(i64, u32),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(i64, u16),

    /// Sheet index out of bounds
    #[error("Sheet index {0} out of bounds (count: {1})")]
    SheetOutOfBounds(usize, usize),

    /// Sheet not found by name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Invalid sheet name
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Duplicate sheet name
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// Named range lookup failed
    #[error("Named range not found: {0}")]
    NamedRangeNotFound(String),

    /// Invalid defined name
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// A string value contains a control character the file format cannot store
    #[error("Illegal character {0:?} in string value")]
    IllegalCharacter(char),

    /// A value of the wrong kind was supplied or requested
    #[error("Data type error: {0}")]
    DataType(String),

    /// An attribute cannot be assigned to this cell
    #[error("Attribute error: {0}")]
    Attribute(String),

    /// The cell has no hyperlink
    #[error("Cell {0} has no hyperlink")]
    NoHyperlink(String),

    /// The cell has no named style
    #[error("Cell {0} has no style")]
    NoStyle(String),

    /// No named style with this name exists
    #[error("Style not found: {0}")]
    StyleNotFound(String),

    /// Invalid format or style index
    #[error("Invalid style index: {0}")]
    InvalidStyleIndex(u32),

    /// The workbook was opened read-only
    #[error("Workbook is read-only")]
    ReadOnlyWorkbook,

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Whether this error reports a failed lookup by name
    pub fn is_key_error(&self) -> bool {
        matches!(
            self,
            Error::SheetNotFound(_) | Error::NamedRangeNotFound(_) | Error::StyleNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_errors() {
        assert!(Error::SheetNotFound("x".into()).is_key_error());
        assert!(Error::NamedRangeNotFound("x".into()).is_key_error());
        assert!(!Error::DataType("x".into()).is_key_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Error::IllegalCharacter('\u{1}').to_string(),
            "Illegal character '\\u{1}' in string value"
        );
    }
}
