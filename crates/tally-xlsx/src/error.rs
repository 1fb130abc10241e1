//! Errors raised while moving a workbook in or out of an XLSX package

use thiserror::Error;

pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

#[derive(Debug, Error)]
pub enum XlsxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The archive itself is unreadable
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A valid ZIP archive that is not a spreadsheet package
    #[error("Not an XLSX package: {0}")]
    NotXlsx(String),

    /// A part named by the package graph is absent from the archive
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// The document model rejected something the package asked for
    #[error("Core error: {0}")]
    Core(#[from] tally_core::Error),
}

impl XlsxError {
    pub(crate) fn missing(part: impl Into<String>) -> Self {
        XlsxError::MissingPart(part.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            XlsxError::missing("xl/workbook.xml").to_string(),
            "Missing required part: xl/workbook.xml"
        );
        let err: XlsxError = tally_core::Error::ReadOnlyWorkbook.into();
        assert!(err.to_string().starts_with("Core error: "));
    }
}
