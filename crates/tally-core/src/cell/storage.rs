//! Cell storage implementation
//!
//! Sparse, row-based storage. Only cells that were touched are stored, in a
//! `BTreeMap<row, BTreeMap<col, CellData>>` so iteration is row-major.

use std::collections::BTreeMap;

use super::{CellAddress, CellRange, CellValue};
use crate::column::ColumnProperties;
use crate::comment::Comment;
use crate::row::{RowData, RowProperties};

/// Everything stored for one cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellData {
    pub value: CellValue,
    /// Interned format, `None` when the cell has no explicit format
    pub format_id: Option<u32>,
    /// Named style, `None` when the cell has no explicit style
    pub style_id: Option<u32>,
    /// Part of a merged region
    pub merged: bool,
    /// Relationship id of the hyperlink in the worksheet's relationships
    pub hyperlink: Option<String>,
    pub comment: Option<Box<Comment>>,
}

impl CellData {
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// Nothing worth keeping: no value, not merged, no comment, no format.
    /// Such cells are skipped when saving and dropped by garbage collection.
    pub fn garbage_collectible(&self) -> bool {
        self.value.is_empty() && !self.merged && self.comment.is_none() && self.format_id.is_none()
    }
}

/// Sparse row-based storage for worksheet cells
#[derive(Debug, Clone, Default)]
pub struct CellStorage {
    rows: BTreeMap<u32, BTreeMap<u16, CellData>>,
    row_properties: BTreeMap<u32, RowProperties>,
    column_properties: BTreeMap<u16, ColumnProperties>,
    merged_regions: Vec<CellRange>,
}

impl CellStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, row: u32, col: u16) -> Option<&CellData> {
        self.rows.get(&row).and_then(|r| r.get(&col))
    }

    pub fn get_mut(&mut self, row: u32, col: u16) -> Option<&mut CellData> {
        self.rows.get_mut(&row).and_then(|r| r.get_mut(&col))
    }

    /// The cell at `row`/`col`, created empty if it does not exist yet
    pub fn entry(&mut self, row: u32, col: u16) -> &mut CellData {
        self.rows.entry(row).or_default().entry(col).or_default()
    }

    pub fn insert(&mut self, row: u32, col: u16, data: CellData) {
        self.rows.entry(row).or_default().insert(col, data);
    }

    pub fn remove(&mut self, row: u32, col: u16) -> Option<CellData> {
        let row_map = self.rows.get_mut(&row)?;
        let removed = row_map.remove(&col);
        if row_map.is_empty() {
            self.rows.remove(&row);
        }
        removed
    }

    /// Remove every cell and every row/column setting
    pub fn clear(&mut self) {
        self.rows.clear();
        self.row_properties.clear();
        self.column_properties.clear();
        self.merged_regions.clear();
    }

    /// Number of stored cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Bounds of stored cells as `(min_row, min_col, max_row, max_col)`
    pub fn used_bounds(&self) -> Option<(u32, u16, u32, u16)> {
        let min_row = *self.rows.keys().next()?;
        let max_row = *self.rows.keys().next_back()?;

        let mut min_col = u16::MAX;
        let mut max_col = 0u16;
        for row_data in self.rows.values() {
            if let Some(&col) = row_data.keys().next() {
                min_col = min_col.min(col);
            }
            if let Some(&col) = row_data.keys().next_back() {
                max_col = max_col.max(col);
            }
        }
        Some((min_row, min_col, max_row, max_col))
    }

    /// Drop cells with nothing worth keeping; returns how many were removed
    pub fn garbage_collect(&mut self) -> usize {
        let before = self.cell_count();
        for row in self.rows.values_mut() {
            row.retain(|_, cell| !cell.garbage_collectible());
        }
        self.rows.retain(|_, row| !row.is_empty());
        before - self.cell_count()
    }

    /// Iterate over all cells in row order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.rows
            .iter()
            .flat_map(|(&row, cols)| cols.iter().map(move |(&col, data)| (row, col, data)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, u16, &mut CellData)> {
        self.rows
            .iter_mut()
            .flat_map(|(&row, cols)| cols.iter_mut().map(move |(&col, data)| (row, col, data)))
    }

    /// Iterate over populated rows
    pub fn rows(&self) -> impl Iterator<Item = RowData<'_>> {
        self.rows.iter().map(|(&index, cols)| {
            RowData::new(index, cols.iter().map(|(&col, data)| (col, data)).collect())
        })
    }

    pub fn row_properties(&self, row: u32) -> Option<&RowProperties> {
        self.row_properties.get(&row)
    }

    /// Settings for `row`, created with defaults if absent
    pub fn row_properties_mut(&mut self, row: u32) -> &mut RowProperties {
        self.row_properties.entry(row).or_default()
    }

    /// Rows with custom settings, in order
    pub fn all_row_properties(&self) -> impl Iterator<Item = (u32, &RowProperties)> {
        self.row_properties.iter().map(|(&r, p)| (r, p))
    }

    pub fn column_properties(&self, col: u16) -> Option<&ColumnProperties> {
        self.column_properties.get(&col)
    }

    /// Settings for `col`, created with defaults if absent
    pub fn column_properties_mut(&mut self, col: u16) -> &mut ColumnProperties {
        self.column_properties.entry(col).or_default()
    }

    /// Columns with custom settings, in order
    pub fn all_column_properties(&self) -> impl Iterator<Item = (u16, &ColumnProperties)> {
        self.column_properties.iter().map(|(&c, p)| (c, p))
    }

    pub fn merged_regions(&self) -> &[CellRange] {
        &self.merged_regions
    }

    pub fn add_merged_region(&mut self, range: CellRange) {
        if !self.merged_regions.contains(&range) {
            self.merged_regions.push(range);
        }
    }

    /// Remove a merged region; false if it was not merged
    pub fn remove_merged_region(&mut self, range: &CellRange) -> bool {
        let before = self.merged_regions.len();
        self.merged_regions.retain(|r| r != range);
        self.merged_regions.len() != before
    }

    /// Whether a cell falls inside any merged region
    pub fn in_merged_region(&self, address: &CellAddress) -> bool {
        self.merged_regions.iter().any(|r| r.contains(address))
    }
}
