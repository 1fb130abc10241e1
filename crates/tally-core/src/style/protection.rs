//! Cell protection

/// Protection flags, effective once the sheet is protected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Protection {
    /// Cell cannot be edited
    pub locked: bool,
    /// Formula is hidden
    pub hidden: bool,
}

impl Default for Protection {
    fn default() -> Self {
        Self {
            locked: true,
            hidden: false,
        }
    }
}

impl Protection {
    /// Editable, visible cell
    pub fn unlocked() -> Self {
        Self {
            locked: false,
            hidden: false,
        }
    }
}
