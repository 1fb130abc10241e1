//! Cell value types

use crate::text::{RichText, SharedText};
use ahash::AHashMap;
use once_cell::sync::Lazy;
use std::fmt;

/// The type tag a cell reports, independent of how the value is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    /// No value
    Null,
    /// Numbers, and dates/times stored as serial numbers
    Numeric,
    /// Plain or rich text
    String,
    /// Formula source text
    Formula,
    /// TRUE/FALSE
    Boolean,
    /// One of the reserved error codes
    Error,
}

/// The value stored in a cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Empty cell (no value)
    #[default]
    Empty,

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Numeric value, including date/time serials
    Number(f64),

    /// Text, shared with the workbook's string table when interned
    Text(SharedText),

    /// Error value (#VALUE!, #REF!, etc.)
    Error(CellError),

    /// Formula with its last known result
    Formula {
        /// Formula source without the leading `=`
        text: String,
        /// Cached result read from a file, if any
        cached_value: Option<Box<CellValue>>,
    },
}

impl CellValue {
    /// Create a plain text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(SharedText::new(RichText::plain(s)))
    }

    /// Create a formula value with no cached result
    pub fn formula<S: Into<String>>(text: S) -> Self {
        CellValue::Formula {
            text: text.into(),
            cached_value: None,
        }
    }

    /// The type tag for this value
    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Empty => CellType::Null,
            CellValue::Boolean(_) => CellType::Boolean,
            CellValue::Number(_) => CellType::Numeric,
            CellValue::Text(_) => CellType::String,
            CellValue::Error(_) => CellType::Error,
            CellValue::Formula { .. } => CellType::Formula,
        }
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check if the cell contains a formula
    pub fn is_formula(&self) -> bool {
        matches!(self, CellValue::Formula { .. })
    }

    /// Numeric view: numbers as-is, booleans as 0/1, formulas through their cache
    pub fn as_number(&self) -> Option<f64> {
        match self.effective_value() {
            CellValue::Number(n) => Some(*n),
            CellValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Boolean view: booleans as-is, numbers as non-zero
    pub fn as_bool(&self) -> Option<bool> {
        match self.effective_value() {
            CellValue::Boolean(b) => Some(*b),
            CellValue::Number(n) => Some(*n != 0.0),
            _ => None,
        }
    }

    /// Text view without run formatting
    pub fn as_text(&self) -> Option<&RichText> {
        match self.effective_value() {
            CellValue::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Formula source if this is a formula cell
    pub fn formula_text(&self) -> Option<&str> {
        match self {
            CellValue::Formula { text, .. } => Some(text),
            _ => None,
        }
    }

    /// The cached value for formulas, the value itself otherwise
    pub fn effective_value(&self) -> &CellValue {
        match self {
            CellValue::Formula {
                cached_value: Some(v),
                ..
            } => v.effective_value(),
            _ => self,
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Boolean(_) => "boolean",
            CellValue::Number(_) => "number",
            CellValue::Text(_) => "string",
            CellValue::Error(_) => "error",
            CellValue::Formula { .. } => "formula",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(t) => f.write_str(&t.plain_text()),
            CellValue::Error(e) => write!(f, "{}", e),
            CellValue::Formula { text, .. } => write!(f, "={}", text),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<CellError> for CellValue {
    fn from(e: CellError) -> Self {
        CellValue::Error(e)
    }
}

/// Spreadsheet error values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellError {
    /// #NULL! - Incorrect range operator
    Null,
    /// #DIV/0! - Division by zero
    Div0,
    /// #VALUE! - Wrong type of argument or operand
    Value,
    /// #REF! - Invalid cell reference
    Ref,
    /// #NAME? - Unrecognized formula name
    Name,
    /// #NUM! - Invalid numeric value
    Num,
    /// #N/A - Value not available
    Na,
    /// #GETTING_DATA - External data is loading
    GettingData,
    /// #SPILL! - Dynamic array cannot spill
    Spill,
    /// #CALC! - Calculation error
    Calc,
}

/// Codes that turn typed text into an error value. `#N/A!` is the legacy
/// spelling and maps to the same code as `#N/A`.
static RESERVED_CODES: Lazy<AHashMap<&'static str, CellError>> = Lazy::new(|| {
    [
        ("#NULL!", CellError::Null),
        ("#DIV/0!", CellError::Div0),
        ("#VALUE!", CellError::Value),
        ("#REF!", CellError::Ref),
        ("#NAME?", CellError::Name),
        ("#NUM!", CellError::Num),
        ("#N/A!", CellError::Na),
        ("#N/A", CellError::Na),
    ]
    .into_iter()
    .collect()
});

impl CellError {
    /// Canonical code as written to files
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Null => "#NULL!",
            CellError::Div0 => "#DIV/0!",
            CellError::Value => "#VALUE!",
            CellError::Ref => "#REF!",
            CellError::Name => "#NAME?",
            CellError::Num => "#NUM!",
            CellError::Na => "#N/A",
            CellError::GettingData => "#GETTING_DATA",
            CellError::Spill => "#SPILL!",
            CellError::Calc => "#CALC!",
        }
    }

    /// Look up one of the reserved codes recognised in typed text (exact case).
    pub fn reserved(code: &str) -> Option<Self> {
        RESERVED_CODES.get(code).copied()
    }

    /// Parse any known error code, including the newer dynamic-array codes.
    pub fn parse(code: &str) -> Option<Self> {
        Self::reserved(code).or(match code {
            "#GETTING_DATA" => Some(CellError::GettingData),
            "#SPILL!" => Some(CellError::Spill),
            "#CALC!" => Some(CellError::Calc),
            _ => None,
        })
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cell_value_views() {
        assert_eq!(CellValue::Number(42.0).as_number(), Some(42.0));
        assert_eq!(CellValue::Boolean(true).as_number(), Some(1.0));
        assert_eq!(CellValue::text("hello").as_number(), None);
        assert_eq!(CellValue::Number(0.0).as_bool(), Some(false));
        assert_eq!(CellValue::Empty.as_bool(), None);
        assert_eq!(CellValue::text("hi").cell_type(), CellType::String);
    }

    #[test]
    fn test_formula_cache() {
        let value = CellValue::Formula {
            text: "SUM(A1:A2)".into(),
            cached_value: Some(Box::new(CellValue::Number(3.0))),
        };
        assert_eq!(value.as_number(), Some(3.0));
        assert_eq!(value.formula_text(), Some("SUM(A1:A2)"));
        assert_eq!(value.to_string(), "=SUM(A1:A2)");
        assert_eq!(CellValue::formula("A1").as_number(), None);
    }

    #[test]
    fn test_reserved_codes() {
        assert_eq!(CellError::reserved("#DIV/0!"), Some(CellError::Div0));
        assert_eq!(CellError::reserved("#N/A!"), Some(CellError::Na));
        assert_eq!(CellError::reserved("#N/A"), Some(CellError::Na));
        assert_eq!(CellError::reserved("#n/a"), None);
        assert_eq!(CellError::reserved("#SPILL!"), None);
        assert_eq!(CellError::parse("#SPILL!"), Some(CellError::Spill));
        assert_eq!(CellError::Na.to_string(), "#N/A");
    }
}
