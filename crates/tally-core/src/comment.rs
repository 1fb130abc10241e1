//! Cell comments (notes)
//!
//! A comment is created by asking a cell for it, which ties the comment to
//! that cell:
//!
//! ```rust
//! use tally_core::{CellRead, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let mut cell = workbook.cell_mut(0, "A1").unwrap();
//! cell.comment().set_text("Check this value");
//! assert_eq!(cell.comment_text(), Some("Check this value"));
//! ```

use crate::cell::CellAddress;
use crate::worksheet::SheetId;
use std::fmt;

/// Identity of a cell that survives sheet reordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub sheet: SheetId,
    pub address: CellAddress,
}

/// A note attached to a cell
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Comment {
    text: String,
    author: String,
    /// Shown without hovering
    visible: bool,
    owner: Option<CellKey>,
}

impl Comment {
    /// A detached comment. It can only be stored through the cell that
    /// allocated it, so this is mostly useful for readers and tests.
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
            visible: false,
            owner: None,
        }
    }

    pub(crate) fn owned_by(owner: CellKey) -> Self {
        Self {
            owner: Some(owner),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// The cell this comment belongs to
    pub fn owner(&self) -> Option<CellKey> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: CellKey) {
        self.owner = Some(owner);
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.author.is_empty() {
            write!(f, "{}", self.text)
        } else {
            write!(f, "[{}]: {}", self.author, self.text)
        }
    }
}
