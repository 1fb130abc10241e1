//! Named ranges (defined names)
//!
//! A named range belongs to the worksheet it points into. In the file it is
//! written as a workbook-level defined name such as `Sheet1!$A$1:$B$4`.

use std::collections::BTreeMap;

use crate::cell::{CellAddress, CellRange};
use crate::error::{Error, Result};

/// A name for a block of cells on its owning worksheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRange {
    name: String,
    range: CellRange,
}

impl NamedRange {
    /// Create a named range after checking the name is usable
    pub fn new(name: impl Into<String>, range: CellRange) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            range: CellRange::new(range.start.relative(), range.end.relative()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn range(&self) -> CellRange {
        self.range
    }

    /// The defined-name formula for this range on a sheet titled `sheet`
    pub fn refers_to(&self, sheet: &str) -> String {
        let range = self.range.to_absolute();
        let body = if range.start == range.end {
            format!("{}:{}", range.start, range.end)
        } else {
            range.to_a1_string()
        };
        format!("{}!{}", quote_sheet_title(sheet), body)
    }
}

/// Check a defined name: a letter, `_` or `\` first, then letters, digits,
/// `_` and `.`; and not something that reads as a cell reference.
pub fn validate_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let first_ok = chars
        .next()
        .map_or(false, |c| c.is_alphabetic() || c == '_' || c == '\\');
    if !first_ok || !chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.') {
        return Err(Error::InvalidName(name.to_string()));
    }
    if CellAddress::parse(name).is_ok() || name.eq_ignore_ascii_case("r") || name.eq_ignore_ascii_case("c") {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Quote a sheet title for use in a reference when it is not a plain word
pub fn quote_sheet_title(title: &str) -> String {
    if title.chars().all(|c| c.is_alphanumeric() || c == '_') {
        title.to_string()
    } else {
        format!("'{}'", title.replace('\'', "''"))
    }
}

/// Split `Sheet1!$A$1:$B$2` or `'My Sheet'!A1` into sheet title and range.
///
/// Returns `None` for anything that is not a single sheet-qualified range,
/// such as constants or formulas.
pub fn parse_refers_to(text: &str) -> Option<(String, CellRange)> {
    let text = text.trim().trim_start_matches('=');
    let (sheet, reference) = text.rsplit_once('!')?;
    let sheet = match sheet.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        Some(quoted) => quoted.replace("''", "'"),
        None => sheet.to_string(),
    };
    let range = CellRange::parse(reference).ok()?;
    Some((sheet, range))
}

/// Named ranges of one worksheet, looked up case-insensitively
#[derive(Debug, Clone, Default)]
pub struct NamedRangeCollection {
    ranges: BTreeMap<String, NamedRange>,
}

impl NamedRangeCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named range, replacing one with the same name
    pub fn insert(&mut self, range: NamedRange) -> Option<NamedRange> {
        self.ranges.insert(range.name.to_lowercase(), range)
    }

    pub fn get(&self, name: &str) -> Option<&NamedRange> {
        self.ranges.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ranges.contains_key(&name.to_lowercase())
    }

    pub fn remove(&mut self, name: &str) -> Option<NamedRange> {
        self.ranges.remove(&name.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedRange> {
        self.ranges.values()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
