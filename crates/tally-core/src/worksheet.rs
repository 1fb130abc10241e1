//! Worksheet type

use crate::cell::{CellAddress, CellData, CellRange, CellStorage};
use crate::column::ColumnProperties;
use crate::comment::Comment;
use crate::error::{Error, Result};
use crate::named_range::{NamedRange, NamedRangeCollection};
use crate::package::{Relationship, Relationships};
use crate::row::{RowData, RowProperties};
use crate::MAX_SHEET_NAME_LEN;

/// Stable identity of a worksheet, independent of its position in the
/// workbook. Also used to name the sheet's part (`sheet{id}.xml`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SheetId(pub u32);

/// Characters a sheet title may not contain
const INVALID_TITLE_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];

/// Check the form of a sheet title. Uniqueness is the workbook's concern.
pub fn validate_title(title: &str) -> Result<()> {
    if title.is_empty() {
        return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
    }
    if title.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(Error::InvalidSheetName(format!(
            "Sheet name too long (max {} characters)",
            MAX_SHEET_NAME_LEN
        )));
    }
    if let Some(c) = title.chars().find(|c| INVALID_TITLE_CHARS.contains(c)) {
        return Err(Error::InvalidSheetName(format!(
            "Sheet name cannot contain '{}'",
            c
        )));
    }
    Ok(())
}

/// A worksheet (single sheet in a workbook)
///
/// Cells are read and written through the workbook's cell handles, which
/// need the shared-string table and stylesheet alongside the grid.
#[derive(Debug, Clone)]
pub struct Worksheet {
    id: SheetId,
    title: String,
    cells: CellStorage,
    /// Hyperlink targets referenced from cells
    relationships: Relationships,
    named_ranges: NamedRangeCollection,
    comment_count: usize,
}

impl Worksheet {
    pub(crate) fn new(id: SheetId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            cells: CellStorage::new(),
            relationships: Relationships::new(),
            named_ranges: NamedRangeCollection::new(),
            comment_count: 0,
        }
    }

    pub fn id(&self) -> SheetId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Change the title after checking its form.
    ///
    /// Use [`Workbook::rename_sheet`](crate::Workbook::rename_sheet) to also
    /// reject titles already taken by another sheet.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        validate_title(&title)?;
        log::debug!("renaming sheet {:?} to {:?}", self.title, title);
        self.title = title;
        Ok(())
    }

    /// Target of this sheet's part, relative to the workbook part
    pub fn part_target(&self) -> String {
        format!("worksheets/sheet{}.xml", self.id.0)
    }

    pub(crate) fn set_id(&mut self, id: SheetId) {
        self.id = id;
    }

    // === Cells ===

    pub fn storage(&self) -> &CellStorage {
        &self.cells
    }

    pub(crate) fn storage_mut(&mut self) -> &mut CellStorage {
        &mut self.cells
    }

    /// Stored data for a cell, if the cell was ever touched
    pub fn cell_data(&self, address: &CellAddress) -> Option<&CellData> {
        self.cells.get(address.row, address.col)
    }

    /// Number of stored cells
    pub fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All stored cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (CellAddress, &CellData)> {
        self.cells
            .iter()
            .map(|(row, col, data)| (CellAddress::new(row, col), data))
    }

    /// Populated rows in order
    pub fn rows(&self) -> impl Iterator<Item = RowData<'_>> {
        self.cells.rows()
    }

    /// The smallest range holding every stored cell, `None` when empty
    pub fn dimensions(&self) -> Option<CellRange> {
        self.cells
            .used_bounds()
            .map(|(r1, c1, r2, c2)| CellRange::from_indices(r1, c1, r2, c2))
    }

    /// Drop cells with nothing worth keeping; returns how many were removed
    pub fn garbage_collect(&mut self) -> usize {
        let removed = self.cells.garbage_collect();
        if removed > 0 {
            log::debug!("sheet {:?}: collected {} empty cells", self.title, removed);
        }
        removed
    }

    // === Row/Column Properties ===

    /// Custom height of a row in points, `None` for the default
    pub fn row_height(&self, row: u32) -> Option<f64> {
        self.cells.row_properties(row).and_then(|p| p.height)
    }

    pub fn set_row_height(&mut self, row: u32, height: f64) {
        self.cells.row_properties_mut(row).height = Some(height);
    }

    pub fn is_row_hidden(&self, row: u32) -> bool {
        self.cells.row_properties(row).map_or(false, |p| p.hidden)
    }

    pub fn set_row_hidden(&mut self, row: u32, hidden: bool) {
        self.cells.row_properties_mut(row).hidden = hidden;
    }

    /// Custom width of a column in points, `None` for the default
    pub fn column_width(&self, col: u16) -> Option<f64> {
        self.cells.column_properties(col).and_then(|p| p.width)
    }

    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.cells.column_properties_mut(col).width = Some(width);
    }

    pub fn is_column_hidden(&self, col: u16) -> bool {
        self.cells.column_properties(col).map_or(false, |p| p.hidden)
    }

    pub fn set_column_hidden(&mut self, col: u16, hidden: bool) {
        self.cells.column_properties_mut(col).hidden = hidden;
    }

    /// Rows with custom settings
    pub fn row_properties(&self) -> impl Iterator<Item = (u32, &RowProperties)> {
        self.cells
            .all_row_properties()
            .filter(|(_, p)| p.has_custom_settings())
    }

    /// Columns with custom settings
    pub fn column_properties(&self) -> impl Iterator<Item = (u16, &ColumnProperties)> {
        self.cells
            .all_column_properties()
            .filter(|(_, p)| p.has_custom_settings())
    }

    // === Merged Cells ===

    pub fn merged_ranges(&self) -> &[CellRange] {
        self.cells.merged_regions()
    }

    /// Merge a range and flag every cell in it as merged.
    ///
    /// Fails with `InvalidRange` when the range overlaps an existing merge.
    pub fn merge_cells(&mut self, range: &CellRange) -> Result<()> {
        let range = CellRange::new(range.start.relative(), range.end.relative());
        if let Some(existing) = self
            .cells
            .merged_regions()
            .iter()
            .find(|r| **r != range && r.overlaps(&range))
        {
            return Err(Error::InvalidRange(format!(
                "{} overlaps merged range {}",
                range, existing
            )));
        }
        for address in range.cells() {
            self.cells.entry(address.row, address.col).merged = true;
        }
        self.cells.add_merged_region(range);
        Ok(())
    }

    /// Unmerge a previously merged range and clear the merged flags.
    ///
    /// Fails with `InvalidRange` when the range is not merged.
    pub fn unmerge_cells(&mut self, range: &CellRange) -> Result<()> {
        let range = CellRange::new(range.start.relative(), range.end.relative());
        if !self.cells.remove_merged_region(&range) {
            return Err(Error::InvalidRange(format!("{} is not merged", range)));
        }
        for (row, col, data) in self.cells.iter_mut() {
            if range.contains(&CellAddress::new(row, col)) {
                data.merged = false;
            }
        }
        Ok(())
    }

    // === Named Ranges ===

    /// Name a range on this sheet, replacing an existing name
    pub fn create_named_range(&mut self, name: &str, range: &CellRange) -> Result<()> {
        let named = NamedRange::new(name, *range)?;
        self.named_ranges.insert(named);
        Ok(())
    }

    pub fn named_range(&self, name: &str) -> Result<&NamedRange> {
        self.named_ranges
            .get(name)
            .ok_or_else(|| Error::NamedRangeNotFound(name.to_string()))
    }

    pub fn has_named_range(&self, name: &str) -> bool {
        self.named_ranges.contains(name)
    }

    pub fn remove_named_range(&mut self, name: &str) -> Result<NamedRange> {
        self.named_ranges
            .remove(name)
            .ok_or_else(|| Error::NamedRangeNotFound(name.to_string()))
    }

    pub fn named_ranges(&self) -> impl Iterator<Item = &NamedRange> {
        self.named_ranges.iter()
    }

    // === Relationships, Hyperlinks, Comments ===

    pub fn relationships(&self) -> &Relationships {
        &self.relationships
    }

    pub(crate) fn relationships_mut(&mut self) -> &mut Relationships {
        &mut self.relationships
    }

    /// Cells with a hyperlink, paired with the relationship holding the target
    pub fn hyperlinks(&self) -> impl Iterator<Item = (CellAddress, &Relationship)> {
        self.iter_cells().filter_map(move |(address, data)| {
            let rel = self.relationships.get(data.hyperlink.as_deref()?)?;
            Some((address, rel))
        })
    }

    /// Number of cells holding a comment
    pub fn comment_count(&self) -> usize {
        self.comment_count
    }

    pub(crate) fn comment_added(&mut self) {
        self.comment_count += 1;
    }

    pub(crate) fn comment_removed(&mut self) {
        self.comment_count = self.comment_count.saturating_sub(1);
    }

    /// Comments in row-major order
    pub fn comments(&self) -> impl Iterator<Item = (CellAddress, &Comment)> {
        self.iter_cells()
            .filter_map(|(address, data)| Some((address, data.comment.as_deref()?)))
    }

    /// Distinct comment authors in first-seen order
    pub fn comment_authors(&self) -> Vec<&str> {
        let mut authors: Vec<&str> = Vec::new();
        for (_, comment) in self.comments() {
            if !authors.contains(&comment.author()) {
                authors.push(comment.author());
            }
        }
        authors
    }

    /// Point every comment at this sheet's id again, after a copy
    pub(crate) fn reown_comments(&mut self) {
        let sheet = self.id;
        for (row, col, data) in self.cells.iter_mut() {
            if let Some(comment) = data.comment.as_mut() {
                comment.set_owner(crate::comment::CellKey {
                    sheet,
                    address: CellAddress::new(row, col),
                });
            }
        }
    }

    /// Remove all cells, settings, names, links and comments
    pub fn clear(&mut self) {
        self.cells.clear();
        self.relationships.clear();
        self.named_ranges = NamedRangeCollection::new();
        self.comment_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use pretty_assertions::assert_eq;

    fn sheet() -> Worksheet {
        Worksheet::new(SheetId(1), "Sheet1")
    }

    #[test]
    fn test_title_validation() {
        let mut ws = sheet();
        assert!(ws.set_title("Data 2024").is_ok());
        assert_eq!(ws.title(), "Data 2024");
        assert!(ws.set_title("").is_err());
        assert!(ws.set_title("a/b").is_err());
        assert!(ws.set_title("x".repeat(MAX_SHEET_NAME_LEN + 1)).is_err());
        assert_eq!(ws.title(), "Data 2024");
    }

    #[test]
    fn test_merge_sets_flags() {
        let mut ws = sheet();
        let range = CellRange::parse("A1:B2").unwrap();
        ws.merge_cells(&range).unwrap();
        assert_eq!(ws.cell_count(), 4);
        assert!(ws.iter_cells().all(|(_, d)| d.merged));
        assert_eq!(ws.merged_ranges(), &[range]);

        ws.unmerge_cells(&range).unwrap();
        assert!(ws.iter_cells().all(|(_, d)| !d.merged));
        assert!(ws.merged_ranges().is_empty());
        assert_eq!(ws.garbage_collect(), 4);
    }

    #[test]
    fn test_unmerge_unknown_range() {
        let mut ws = sheet();
        let range = CellRange::parse("C3:D4").unwrap();
        assert!(matches!(ws.unmerge_cells(&range), Err(Error::InvalidRange(_))));
    }

    #[test]
    fn test_merge_overlap_rejected() {
        let mut ws = sheet();
        ws.merge_cells(&CellRange::parse("A1:B2").unwrap()).unwrap();
        let result = ws.merge_cells(&CellRange::parse("B2:C3").unwrap());
        assert!(matches!(result, Err(Error::InvalidRange(_))));
        assert_eq!(ws.merged_ranges().len(), 1);
    }

    #[test]
    fn test_named_ranges() {
        let mut ws = sheet();
        let range = CellRange::parse("A1:A10").unwrap();
        ws.create_named_range("Totals", &range).unwrap();
        assert!(ws.has_named_range("totals"));
        assert_eq!(ws.named_range("Totals").unwrap().range(), range);
        assert!(ws.create_named_range("A1", &range).is_err());
        assert!(ws.remove_named_range("Totals").is_ok());
        assert!(matches!(
            ws.named_range("Totals"),
            Err(Error::NamedRangeNotFound(_))
        ));
    }

    #[test]
    fn test_dimensions_and_props() {
        let mut ws = sheet();
        assert_eq!(ws.dimensions(), None);
        ws.storage_mut()
            .insert(2, 1, CellData::new(CellValue::Number(1.0)));
        ws.storage_mut()
            .insert(4, 3, CellData::new(CellValue::Number(2.0)));
        assert_eq!(ws.dimensions().map(|r| r.to_a1_string()), Some("B3:D5".to_string()));

        ws.set_column_width(2, 30.0);
        ws.set_row_hidden(7, true);
        assert_eq!(ws.column_width(2), Some(30.0));
        assert_eq!(ws.column_width(3), None);
        assert!(ws.is_row_hidden(7));
        assert_eq!(ws.row_properties().count(), 1);
    }
}
