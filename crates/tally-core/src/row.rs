//! Row types

use crate::cell::CellData;

/// Default row height in points
pub const DEFAULT_ROW_HEIGHT: f64 = 15.0;

/// Per-row settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowProperties {
    /// Custom height in points (None = default)
    pub height: Option<f64>,
    /// Row is hidden
    pub hidden: bool,
}

impl RowProperties {
    /// Check if this row has any custom settings
    pub fn has_custom_settings(&self) -> bool {
        self.height.is_some() || self.hidden
    }
}

/// A populated row, yielded by worksheet row iteration
#[derive(Debug)]
pub struct RowData<'a> {
    /// Row index
    pub index: u32,
    /// Cells in this row
    pub cells: Vec<(u16, &'a CellData)>,
}

impl<'a> RowData<'a> {
    pub fn new(index: u32, cells: Vec<(u16, &'a CellData)>) -> Self {
        Self { index, cells }
    }

    /// Get a cell by column index
    pub fn get(&self, col: u16) -> Option<&'a CellData> {
        self.cells
            .binary_search_by_key(&col, |(c, _)| *c)
            .ok()
            .map(|i| self.cells[i].1)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
