//! Error type for the tally facade

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from opening, saving or editing a workbook
#[derive(Debug, Error)]
pub enum Error {
    /// The document model rejected an operation
    #[error(transparent)]
    Core(#[from] tally_core::Error),

    /// The XLSX package could not be read or written
    #[error(transparent)]
    Xlsx(#[from] tally_xlsx::XlsxError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The path does not name a supported file type
    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

impl Error {
    /// The core error behind this one, if any
    pub fn as_core(&self) -> Option<&tally_core::Error> {
        match self {
            Error::Core(e) | Error::Xlsx(tally_xlsx::XlsxError::Core(e)) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_is_reachable() {
        let err: Error = tally_xlsx::XlsxError::Core(tally_core::Error::ReadOnlyWorkbook).into();
        assert_eq!(err.as_core(), Some(&tally_core::Error::ReadOnlyWorkbook));
        assert_eq!(err.to_string(), "Core error: Workbook is read-only");

        let err = Error::UnsupportedFormat(PathBuf::from("book.ods"));
        assert_eq!(err.to_string(), "Unsupported file format: book.ods");
        assert!(err.as_core().is_none());
    }
}
