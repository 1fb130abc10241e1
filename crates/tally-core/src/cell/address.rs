//! Cell address and range types

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell coordinate such as `A1` or `$B$2`.
///
/// Rows and columns are 0-based internally and 1-based when displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAddress {
    /// Row index (0-based)
    pub row: u32,
    /// Column index (0-based, A=0)
    pub col: u16,
    /// Whether the row reference is absolute ($)
    pub row_absolute: bool,
    /// Whether the column reference is absolute ($)
    pub col_absolute: bool,
}

impl CellAddress {
    /// Create a relative cell address
    pub fn new(row: u32, col: u16) -> Self {
        Self {
            row,
            col,
            row_absolute: false,
            col_absolute: false,
        }
    }

    /// Create an absolute cell address ($A$1 style)
    pub fn absolute(row: u32, col: u16) -> Self {
        Self {
            row,
            col,
            row_absolute: true,
            col_absolute: true,
        }
    }

    /// Parse an A1-style reference.
    ///
    /// ```
    /// use tally_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("$B$2").unwrap();
    /// assert_eq!((addr.row, addr.col), (1, 1));
    /// assert!(addr.row_absolute && addr.col_absolute);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let text = s.trim();
        let invalid = |why: &str| Error::InvalidAddress(format!("{} in '{}'", why, text));

        let (col_absolute, rest) = match text.strip_prefix('$') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let split = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let (letters, rest) = rest.split_at(split);
        if letters.is_empty() {
            return Err(invalid("no column letters"));
        }
        let (row_absolute, digits) = match rest.strip_prefix('$') {
            Some(digits) => (true, digits),
            None => (false, rest),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("no row number"));
        }

        let col = Self::letters_to_column(letters)?;
        let row: u64 = digits.parse().map_err(|_| invalid("invalid row number"))?;
        if row == 0 {
            return Err(invalid("row number must be >= 1"));
        }
        if row > MAX_ROWS as u64 {
            return Err(Error::RowOutOfBounds(row as i64 - 1, MAX_ROWS - 1));
        }

        Ok(Self {
            row: row as u32 - 1,
            col,
            row_absolute,
            col_absolute,
        })
    }

    /// Convert a column index to letters (0 = A, 26 = AA)
    pub fn column_to_letters(col: u16) -> String {
        let mut letters = Vec::with_capacity(3);
        let mut n = col as u32 + 1;
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push(b'A' + rem as u8);
            n = (n - 1) / 26;
        }
        letters.iter().rev().map(|&b| b as char).collect()
    }

    /// Convert column letters to an index (A = 0, AA = 26), case-insensitive
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u64 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col * 26 + (c.to_ascii_uppercase() as u64 - 'A' as u64 + 1);
            if col > MAX_COLS as u64 {
                return Err(Error::ColumnOutOfBounds(col as i64 - 1, MAX_COLS - 1));
            }
        }

        Ok((col - 1) as u16)
    }

    /// Move the address by a signed number of rows and columns.
    pub fn offset(&self, rows: i64, cols: i64) -> Result<Self> {
        let row = self.row as i64 + rows;
        let col = self.col as i64 + cols;
        if row < 0 || row >= MAX_ROWS as i64 {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }
        if col < 0 || col >= MAX_COLS as i64 {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
        }
        Ok(Self {
            row: row as u32,
            col: col as u16,
            ..*self
        })
    }

    /// The same coordinate with both absolute markers cleared
    pub fn relative(&self) -> Self {
        Self::new(self.row, self.col)
    }

    /// Format as an A1-style string, including `$` markers
    pub fn to_a1_string(&self) -> String {
        format!(
            "{}{}{}{}",
            if self.col_absolute { "$" } else { "" },
            Self::column_to_letters(self.col),
            if self.row_absolute { "$" } else { "" },
            self.row + 1
        )
    }

    /// Create a range from this address to another
    pub fn to(&self, other: CellAddress) -> CellRange {
        CellRange::new(*self, other)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A rectangular block of cells such as `A1:B10`, always stored top-left to
/// bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRange {
    /// Top-left corner
    pub start: CellAddress,
    /// Bottom-right corner
    pub end: CellAddress,
}

impl CellRange {
    /// Create a range from two corners in any order
    pub fn new(a: CellAddress, b: CellAddress) -> Self {
        let (top, bottom) = if a.row <= b.row { (a, b) } else { (b, a) };
        let (left, right) = if a.col <= b.col { (a, b) } else { (b, a) };
        Self {
            start: CellAddress {
                row: top.row,
                col: left.col,
                row_absolute: top.row_absolute,
                col_absolute: left.col_absolute,
            },
            end: CellAddress {
                row: bottom.row,
                col: right.col,
                row_absolute: bottom.row_absolute,
                col_absolute: right.col_absolute,
            },
        }
    }

    /// Create a range from row/column indices
    pub fn from_indices(start_row: u32, start_col: u16, end_row: u32, end_col: u16) -> Self {
        Self::new(
            CellAddress::new(start_row, start_col),
            CellAddress::new(end_row, end_col),
        )
    }

    /// A range covering one cell
    pub fn single(addr: CellAddress) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Parse `A1:B10` or a single `C3`
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let parsed = match s.split_once(':') {
            Some((a, b)) => CellAddress::parse(a)
                .and_then(|a| CellAddress::parse(b).map(|b| Self::new(a, b))),
            None => CellAddress::parse(s).map(Self::single),
        };
        parsed.map_err(|e| match e {
            Error::InvalidAddress(_) => Error::InvalidRange(s.to_string()),
            other => other,
        })
    }

    /// Whether the cell lies inside this range
    pub fn contains(&self, addr: &CellAddress) -> bool {
        (self.start.row..=self.end.row).contains(&addr.row)
            && (self.start.col..=self.end.col).contains(&addr.col)
    }

    /// Number of rows covered
    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Number of columns covered
    pub fn col_count(&self) -> u16 {
        self.end.col - self.start.col + 1
    }

    /// Total number of cells covered
    pub fn cell_count(&self) -> u64 {
        self.row_count() as u64 * self.col_count() as u64
    }

    /// Whether two ranges share at least one cell
    pub fn overlaps(&self, other: &CellRange) -> bool {
        self.start.row <= other.end.row
            && other.start.row <= self.end.row
            && self.start.col <= other.end.col
            && other.start.col <= self.end.col
    }

    /// Iterate over the addresses in row-major order
    pub fn cells(&self) -> CellRangeIter {
        CellRangeIter {
            range: *self,
            next: Some(self.start.relative()),
        }
    }

    /// The range with all `$` markers set, as used in defined names
    pub fn to_absolute(&self) -> Self {
        Self {
            start: CellAddress::absolute(self.start.row, self.start.col),
            end: CellAddress::absolute(self.end.row, self.end.col),
        }
    }

    /// Format as `A1:B10`, or `A1` for a single cell
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start, self.end)
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Row-major iterator over a [`CellRange`]
pub struct CellRangeIter {
    range: CellRange,
    next: Option<CellAddress>,
}

impl Iterator for CellRangeIter {
    type Item = CellAddress;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = if current.col < self.range.end.col {
            Some(CellAddress::new(current.row, current.col + 1))
        } else if current.row < self.range.end.row {
            Some(CellAddress::new(current.row + 1, self.range.start.col))
        } else {
            None
        };
        Some(current)
    }
}
