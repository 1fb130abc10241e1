//! Workbook type - the main document structure

use chrono::NaiveDateTime;

use crate::cell::{CellAddress, CellMut, CellRef};
use crate::comment::CellKey;
use crate::datetime::Calendar;
use crate::error::{Error, Result};
use crate::named_range::NamedRange;
use crate::package::{
    content_types, parts, Manifest, Relationship, RelationshipKind, Relationships, TargetMode,
};
use crate::shared_strings::SharedStringTable;
use crate::style::{Format, NamedStyle, Stylesheet};
use crate::text::{RichText, SharedText};
use crate::worksheet::{validate_title, SheetId, Worksheet};
use crate::MAX_SHEET_NAME_LEN;

/// Workbook-level settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkbookSettings {
    /// Date system used to turn serial numbers into dates
    pub calendar: Calendar,
    /// Classify typed text as percentages, times and numbers
    pub guess_types: bool,
    /// Keep only the cached results of formulas when loading
    pub data_only: bool,
    /// Refuse to create sheets
    pub read_only: bool,
}

/// Document properties written to `docProps/core.xml`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentProperties {
    pub creator: String,
    pub last_modified_by: String,
    pub created: Option<NaiveDateTime>,
    pub modified: Option<NaiveDateTime>,
    pub title: Option<String>,
}

impl Default for DocumentProperties {
    fn default() -> Self {
        Self {
            creator: "tally".to_string(),
            last_modified_by: "tally".to_string(),
            created: None,
            modified: None,
            title: None,
        }
    }
}

/// A workbook (spreadsheet document)
///
/// The workbook owns every worksheet together with the tables cells point
/// into: the shared-string table and the stylesheet. Cells are reached
/// through handles borrowed from the workbook:
///
/// ```rust
/// use tally_core::{CellRead, Workbook};
///
/// let mut workbook = Workbook::new();
/// workbook.cell_mut(0, "A1").unwrap().set_value("Hello").unwrap();
/// workbook.cell_mut(0, "B1").unwrap().set_value(42).unwrap();
///
/// assert_eq!(workbook.cell(0, "A1").unwrap().value::<String>(), "Hello");
/// assert_eq!(workbook.cell(0, "B1").unwrap().value::<f64>(), 42.0);
/// ```
///
/// Cloning a workbook copies every sheet; handles always resolve against
/// the workbook they were borrowed from.
#[derive(Debug, Clone)]
pub struct Workbook {
    pub(crate) worksheets: Vec<Worksheet>,
    pub(crate) stylesheet: Stylesheet,
    pub(crate) shared_strings: SharedStringTable,
    relationships: Relationships,
    root_relationships: Relationships,
    manifest: Manifest,
    properties: DocumentProperties,
    settings: WorkbookSettings,
    active_sheet: usize,
    next_sheet_id: u32,
}

impl Workbook {
    /// Create a new workbook with one worksheet named "Sheet1"
    pub fn new() -> Self {
        let mut wb = Self::empty();
        let now = chrono::Utc::now().naive_utc();
        wb.properties.created = Some(now);
        wb.properties.modified = Some(now);
        if let Err(e) = wb.insert_sheet(0, "Sheet1".to_string()) {
            log::warn!("could not seed the first sheet: {}", e);
        }
        wb
    }

    /// Create a workbook with no worksheets, ready to be filled by a reader
    pub fn empty() -> Self {
        let mut root_relationships = Relationships::new();
        root_relationships.add(
            RelationshipKind::OfficeDocument,
            parts::WORKBOOK,
            TargetMode::Internal,
        );
        root_relationships.add(RelationshipKind::CoreProperties, parts::CORE, TargetMode::Internal);
        root_relationships.add(
            RelationshipKind::ExtendedProperties,
            parts::APP,
            TargetMode::Internal,
        );

        let mut relationships = Relationships::new();
        relationships.add(RelationshipKind::Styles, "styles.xml", TargetMode::Internal);

        let mut manifest = Manifest::new();
        manifest.register_override(parts::WORKBOOK, content_types::WORKBOOK);
        manifest.register_override(parts::STYLES, content_types::STYLES);
        manifest.register_override(parts::CORE, content_types::CORE_PROPERTIES);
        manifest.register_override(parts::APP, content_types::EXTENDED_PROPERTIES);

        Self {
            worksheets: Vec::new(),
            stylesheet: Stylesheet::new(),
            shared_strings: SharedStringTable::new(),
            relationships,
            root_relationships,
            manifest,
            properties: DocumentProperties::default(),
            settings: WorkbookSettings::default(),
            active_sheet: 0,
            next_sheet_id: 1,
        }
    }

    // ==================== Settings ====================

    pub fn settings(&self) -> &WorkbookSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut WorkbookSettings {
        &mut self.settings
    }

    pub fn guess_types(&self) -> bool {
        self.settings.guess_types
    }

    pub fn set_guess_types(&mut self, guess: bool) {
        self.settings.guess_types = guess;
    }

    pub fn data_only(&self) -> bool {
        self.settings.data_only
    }

    pub fn set_data_only(&mut self, data_only: bool) {
        self.settings.data_only = data_only;
    }

    pub fn read_only(&self) -> bool {
        self.settings.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.settings.read_only = read_only;
    }

    pub fn calendar(&self) -> Calendar {
        self.settings.calendar
    }

    pub fn set_calendar(&mut self, calendar: Calendar) {
        self.settings.calendar = calendar;
    }

    pub fn properties(&self) -> &DocumentProperties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut DocumentProperties {
        &mut self.properties
    }

    // ==================== Worksheets ====================

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a mutable worksheet by index
    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(index)
    }

    /// Get a worksheet by title
    pub fn worksheet_by_name(&self, title: &str) -> Result<&Worksheet> {
        self.worksheets
            .iter()
            .find(|ws| ws.title() == title)
            .ok_or_else(|| Error::SheetNotFound(title.to_string()))
    }

    /// Get a mutable worksheet by title
    pub fn worksheet_by_name_mut(&mut self, title: &str) -> Result<&mut Worksheet> {
        self.worksheets
            .iter_mut()
            .find(|ws| ws.title() == title)
            .ok_or_else(|| Error::SheetNotFound(title.to_string()))
    }

    /// Get the index of a worksheet by title
    pub fn sheet_index(&self, title: &str) -> Option<usize> {
        self.worksheets.iter().position(|ws| ws.title() == title)
    }

    /// Titles in sheet order
    pub fn sheet_titles(&self) -> Vec<&str> {
        self.worksheets.iter().map(Worksheet::title).collect()
    }

    /// Iterate over all worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Append a worksheet with a generated title; returns its index
    pub fn create_sheet(&mut self) -> Result<usize> {
        let title = self.generate_sheet_title();
        self.insert_sheet(self.worksheets.len(), title)
    }

    /// Append a worksheet with the given title; returns its index
    pub fn create_sheet_with_title(&mut self, title: &str) -> Result<usize> {
        self.insert_sheet(self.worksheets.len(), title.to_string())
    }

    /// Insert a worksheet with a generated title at `index`
    pub fn create_sheet_at(&mut self, index: usize) -> Result<usize> {
        if index > self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        let title = self.generate_sheet_title();
        self.insert_sheet(index, title)
    }

    fn insert_sheet(&mut self, index: usize, title: String) -> Result<usize> {
        if self.settings.read_only {
            return Err(Error::ReadOnlyWorkbook);
        }
        self.validate_sheet_title(&title, None)?;

        let worksheet = Worksheet::new(self.allocate_sheet_id(), title);
        self.register_sheet_part(&worksheet);
        log::debug!("created sheet {:?} at {}", worksheet.title(), index);
        self.worksheets.insert(index, worksheet);

        if self.worksheets.len() > 1 && self.active_sheet >= index {
            self.active_sheet += 1;
        }
        Ok(index)
    }

    fn allocate_sheet_id(&mut self) -> SheetId {
        let id = SheetId(self.next_sheet_id);
        self.next_sheet_id += 1;
        id
    }

    fn register_sheet_part(&mut self, worksheet: &Worksheet) {
        let target = worksheet.part_target();
        self.manifest
            .register_override(&format!("xl/{}", target), content_types::WORKSHEET);
        self.relationships
            .add(RelationshipKind::Worksheet, target, TargetMode::Internal);
    }

    /// Remove a worksheet together with its relationship and content type
    pub fn remove_sheet(&mut self, index: usize) -> Result<Worksheet> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        let worksheet = self.worksheets.remove(index);
        let target = worksheet.part_target();
        if let Some(id) = self.relationships.find_target(&target).map(|r| r.id.clone()) {
            self.relationships.remove(&id);
        }
        self.manifest.remove_override(&format!("xl/{}", target));
        log::debug!("removed sheet {:?}", worksheet.title());

        if self.worksheets.is_empty() {
            self.active_sheet = 0;
        } else if self.active_sheet > index || self.active_sheet >= self.worksheets.len() {
            self.active_sheet -= 1;
        }
        Ok(worksheet)
    }

    /// Append a deep copy of a worksheet under a fresh title; returns its index
    pub fn copy_sheet(&mut self, index: usize) -> Result<usize> {
        if self.settings.read_only {
            return Err(Error::ReadOnlyWorkbook);
        }
        let source = self
            .worksheets
            .get(index)
            .ok_or(Error::SheetOutOfBounds(index, self.worksheets.len()))?;
        let mut copy = source.clone();
        let title = self.generate_copy_title(source.title());
        copy.set_title(title)?;
        copy.set_id(self.allocate_sheet_id());
        copy.reown_comments();

        self.register_sheet_part(&copy);
        self.worksheets.push(copy);
        Ok(self.worksheets.len() - 1)
    }

    /// Move a worksheet to a new position
    pub fn move_sheet(&mut self, from: usize, to: usize) -> Result<()> {
        if from >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(from, self.worksheets.len()));
        }
        if to >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(to, self.worksheets.len()));
        }

        let worksheet = self.worksheets.remove(from);
        self.worksheets.insert(to, worksheet);

        if self.active_sheet == from {
            self.active_sheet = to;
        } else if from < self.active_sheet && to >= self.active_sheet {
            self.active_sheet -= 1;
        } else if from > self.active_sheet && to <= self.active_sheet {
            self.active_sheet += 1;
        }
        Ok(())
    }

    /// Rename a worksheet, rejecting titles used by another sheet
    pub fn rename_sheet(&mut self, index: usize, title: &str) -> Result<()> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        self.validate_sheet_title(title, Some(index))?;
        self.worksheets[index].set_title(title)
    }

    /// Get the active sheet index
    pub fn active_sheet(&self) -> usize {
        self.active_sheet
    }

    /// Set the active sheet index
    pub fn set_active_sheet(&mut self, index: usize) -> Result<()> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        self.active_sheet = index;
        Ok(())
    }

    fn validate_sheet_title(&self, title: &str, exclude: Option<usize>) -> Result<()> {
        validate_title(title)?;
        let lower = title.to_lowercase();
        let taken = self
            .worksheets
            .iter()
            .enumerate()
            .any(|(i, ws)| Some(i) != exclude && ws.title().to_lowercase() == lower);
        if taken {
            return Err(Error::DuplicateSheetName(title.to_string()));
        }
        Ok(())
    }

    fn generate_sheet_title(&self) -> String {
        let mut n = self.worksheets.len() + 1;
        loop {
            let title = format!("Sheet{}", n);
            if self.validate_sheet_title(&title, None).is_ok() {
                return title;
            }
            n += 1;
        }
    }

    fn generate_copy_title(&self, base: &str) -> String {
        let mut n = 2;
        loop {
            let suffix = format!(" ({})", n);
            let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.chars().count());
            let title: String = base.chars().take(keep).chain(suffix.chars()).collect();
            if self.validate_sheet_title(&title, None).is_ok() {
                return title;
            }
            n += 1;
        }
    }

    fn sheet_checked(&self, sheet: usize) -> Result<&Worksheet> {
        self.worksheets
            .get(sheet)
            .ok_or(Error::SheetOutOfBounds(sheet, self.worksheets.len()))
    }

    // ==================== Cells ====================

    /// Read handle for the cell at an A1 reference
    pub fn cell(&self, sheet: usize, reference: &str) -> Result<CellRef<'_>> {
        self.cell_at(sheet, CellAddress::parse(reference)?)
    }

    /// Read handle for the cell at an address
    pub fn cell_at(&self, sheet: usize, address: CellAddress) -> Result<CellRef<'_>> {
        self.sheet_checked(sheet)?;
        Ok(CellRef::new(self, sheet, address.relative()))
    }

    /// Write handle for the cell at an A1 reference
    pub fn cell_mut(&mut self, sheet: usize, reference: &str) -> Result<CellMut<'_>> {
        let address = CellAddress::parse(reference)?;
        self.cell_mut_at(sheet, address)
    }

    /// Write handle for the cell at an address
    pub fn cell_mut_at(&mut self, sheet: usize, address: CellAddress) -> Result<CellMut<'_>> {
        self.sheet_checked(sheet)?;
        Ok(CellMut::new(self, sheet, address.relative()))
    }

    /// Copy value, format, style, merge flag, hyperlink and comment from one
    /// cell to another. The copied comment belongs to the destination.
    pub fn copy_cell(
        &mut self,
        src_sheet: usize,
        src: CellAddress,
        dst_sheet: usize,
        dst: CellAddress,
    ) -> Result<()> {
        let source_ws = self.sheet_checked(src_sheet)?;
        self.sheet_checked(dst_sheet)?;

        let mut data = source_ws
            .cell_data(&src)
            .cloned()
            .unwrap_or_default();
        let link_target = data
            .hyperlink
            .as_deref()
            .and_then(|id| source_ws.relationships().get(id))
            .map(|rel| rel.target.clone());

        let destination = &mut self.worksheets[dst_sheet];
        let dst_key = CellKey {
            sheet: destination.id(),
            address: dst.relative(),
        };
        let previous = destination.storage_mut().remove(dst.row, dst.col);
        if let Some(previous) = previous {
            if let Some(id) = previous.hyperlink {
                destination.relationships_mut().remove(&id);
            }
            if previous.comment.is_some() {
                destination.comment_removed();
            }
        }

        data.hyperlink = link_target.map(|target| {
            destination
                .relationships_mut()
                .add(RelationshipKind::Hyperlink, target, TargetMode::External)
        });
        if let Some(comment) = data.comment.as_mut() {
            comment.set_owner(dst_key);
            destination.comment_added();
        }
        destination.storage_mut().insert(dst.row, dst.col, data);
        Ok(())
    }

    // ==================== Named Ranges ====================

    /// Name a range on a sheet. A range with the same name on any other
    /// sheet is replaced.
    pub fn create_named_range(&mut self, name: &str, sheet: usize, reference: &str) -> Result<()> {
        self.sheet_checked(sheet)?;
        let range = crate::cell::CellRange::parse(reference)?;
        NamedRange::new(name, range)?;
        for ws in &mut self.worksheets {
            if ws.has_named_range(name) {
                ws.remove_named_range(name)?;
            }
        }
        self.worksheets[sheet].create_named_range(name, &range)
    }

    /// The sheet index and definition of a named range
    pub fn named_range(&self, name: &str) -> Result<(usize, &NamedRange)> {
        self.worksheets
            .iter()
            .enumerate()
            .find_map(|(i, ws)| ws.named_range(name).ok().map(|r| (i, r)))
            .ok_or_else(|| Error::NamedRangeNotFound(name.to_string()))
    }

    pub fn has_named_range(&self, name: &str) -> bool {
        self.worksheets.iter().any(|ws| ws.has_named_range(name))
    }

    pub fn remove_named_range(&mut self, name: &str) -> Result<NamedRange> {
        let (sheet, _) = self.named_range(name)?;
        self.worksheets[sheet].remove_named_range(name)
    }

    /// Every named range with the index of its sheet
    pub fn named_ranges(&self) -> Vec<(usize, &NamedRange)> {
        self.worksheets
            .iter()
            .enumerate()
            .flat_map(|(i, ws)| ws.named_ranges().map(move |r| (i, r)))
            .collect()
    }

    // ==================== Package ====================

    /// Relationships of the workbook part
    pub fn relationships(&self) -> &Relationships {
        &self.relationships
    }

    /// Relationships of the package root
    pub fn root_relationships(&self) -> &Relationships {
        &self.root_relationships
    }

    /// Workbook relationship by id
    pub fn relationship(&self, id: &str) -> Option<&Relationship> {
        self.relationships.get(id)
    }

    /// Add a workbook relationship and return its id
    pub fn create_relationship(&mut self, kind: RelationshipKind, target: &str) -> String {
        self.relationships.add(kind, target, TargetMode::Internal)
    }

    pub fn next_relationship_id(&self) -> String {
        self.relationships.next_id()
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    // ==================== Shared Strings ====================

    pub fn shared_strings(&self) -> &SharedStringTable {
        &self.shared_strings
    }

    /// Add text to the shared-string table, keeping duplicates when asked.
    /// Returns the index of the entry.
    pub fn add_shared_string(&mut self, text: RichText, allow_duplicates: bool) -> u32 {
        self.ensure_shared_strings_part();
        self.shared_strings.push(text, allow_duplicates)
    }

    /// Intern text and return the shared handle cells store
    pub(crate) fn intern_text(&mut self, text: RichText) -> SharedText {
        self.ensure_shared_strings_part();
        let index = self.shared_strings.intern(text.clone());
        match self.shared_strings.get(index) {
            Some(shared) => shared.clone(),
            None => SharedText::new(text),
        }
    }

    fn ensure_shared_strings_part(&mut self) {
        if !self.manifest.has_override(parts::SHARED_STRINGS) {
            self.relationships.add(
                RelationshipKind::SharedStrings,
                "sharedStrings.xml",
                TargetMode::Internal,
            );
            self.manifest
                .register_override(parts::SHARED_STRINGS, content_types::SHARED_STRINGS);
        }
    }

    // ==================== Styles ====================

    pub fn stylesheet(&self) -> &Stylesheet {
        &self.stylesheet
    }

    pub fn stylesheet_mut(&mut self) -> &mut Stylesheet {
        &mut self.stylesheet
    }

    /// Intern a format, returning the id of an equal existing one if any
    pub fn add_format(&mut self, format: Format) -> u32 {
        self.stylesheet.add_format(format)
    }

    pub fn format(&self, id: u32) -> Result<&Format> {
        self.stylesheet.format(id)
    }

    pub fn add_style(&mut self, style: NamedStyle) -> u32 {
        self.stylesheet.add_style(style)
    }

    pub fn create_style(&mut self, name: &str) -> u32 {
        self.stylesheet.create_style(name)
    }

    pub fn has_style(&self, name: &str) -> bool {
        self.stylesheet.has_style(name)
    }

    /// Drop all formats; cells fall back to the default format
    pub fn clear_formats(&mut self) {
        self.stylesheet.clear_formats();
        for ws in &mut self.worksheets {
            for (_, _, data) in ws.storage_mut().iter_mut() {
                data.format_id = None;
            }
        }
    }

    /// Drop all named styles; cells lose their style
    pub fn clear_styles(&mut self) {
        self.stylesheet.clear_styles();
        for ws in &mut self.worksheets {
            for (_, _, data) in ws.storage_mut().iter_mut() {
                data.style_id = None;
            }
        }
    }

    /// Remove every sheet, string, format and style. Settings are kept.
    pub fn clear(&mut self) {
        let settings = self.settings;
        *self = Self::empty();
        self.settings = settings;
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellRead;
    use crate::comment::Comment;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_workbook() {
        let wb = Workbook::new();
        assert_eq!(wb.sheet_count(), 1);
        assert_eq!(wb.worksheet(0).unwrap().title(), "Sheet1");
        assert_eq!(wb.stylesheet().format_count(), 1);
        assert_eq!(wb.stylesheet().styles()[0].name, "Normal");
        assert!(wb.manifest().has_override("/xl/worksheets/sheet1.xml"));
        assert!(wb
            .relationships()
            .find_target("worksheets/sheet1.xml")
            .is_some());
        assert_eq!(
            wb.root_relationships().get("rId1").map(|r| r.kind.clone()),
            Some(RelationshipKind::OfficeDocument)
        );
    }

    #[test]
    fn test_create_sheets() {
        let mut wb = Workbook::new();
        assert_eq!(wb.create_sheet().unwrap(), 1);
        assert_eq!(wb.create_sheet_with_title("Data").unwrap(), 2);
        assert_eq!(wb.sheet_titles(), vec!["Sheet1", "Sheet2", "Data"]);

        assert_eq!(wb.create_sheet_at(0).unwrap(), 0);
        assert_eq!(wb.sheet_titles()[0], "Sheet4");
        assert!(wb.manifest().has_override("/xl/worksheets/sheet4.xml"));
    }

    #[test]
    fn test_duplicate_and_invalid_titles() {
        let mut wb = Workbook::new();
        assert!(matches!(
            wb.create_sheet_with_title("SHEET1"),
            Err(Error::DuplicateSheetName(_))
        ));
        assert!(wb.create_sheet_with_title("").is_err());
        assert!(wb.create_sheet_with_title("Sheet[1]").is_err());
        assert!(wb
            .create_sheet_with_title(&"A".repeat(MAX_SHEET_NAME_LEN + 1))
            .is_err());
        assert_eq!(wb.sheet_count(), 1);
    }

    #[test]
    fn test_read_only_rejects_sheets() {
        let mut wb = Workbook::new();
        wb.set_read_only(true);
        assert_eq!(wb.create_sheet(), Err(Error::ReadOnlyWorkbook));
        assert_eq!(wb.copy_sheet(0), Err(Error::ReadOnlyWorkbook));
    }

    #[test]
    fn test_remove_sheet_drops_part() {
        let mut wb = Workbook::new();
        wb.create_sheet_with_title("Second").unwrap();
        let removed = wb.remove_sheet(0).unwrap();
        assert_eq!(removed.title(), "Sheet1");
        assert!(!wb.manifest().has_override("/xl/worksheets/sheet1.xml"));
        assert!(wb
            .relationships()
            .find_target("worksheets/sheet1.xml")
            .is_none());
        assert_eq!(wb.sheet_titles(), vec!["Second"]);
        assert!(wb.remove_sheet(3).is_err());
    }

    #[test]
    fn test_worksheet_by_name() {
        let wb = Workbook::new();
        assert!(wb.worksheet_by_name("Sheet1").is_ok());
        let err = wb.worksheet_by_name("Missing").unwrap_err();
        assert!(err.is_key_error());
    }

    #[test]
    fn test_move_sheet_tracks_active() {
        let mut wb = Workbook::new();
        wb.create_sheet().unwrap();
        wb.create_sheet().unwrap();
        wb.set_active_sheet(0).unwrap();
        wb.move_sheet(0, 2).unwrap();
        assert_eq!(wb.sheet_titles(), vec!["Sheet2", "Sheet3", "Sheet1"]);
        assert_eq!(wb.active_sheet(), 2);
    }

    #[test]
    fn test_rename_sheet() {
        let mut wb = Workbook::new();
        wb.create_sheet().unwrap();
        assert!(wb.rename_sheet(1, "sheet1").is_err());
        wb.rename_sheet(0, "sheet1").unwrap();
        assert_eq!(wb.worksheet(0).unwrap().title(), "sheet1");
    }

    #[test]
    fn test_copy_sheet() {
        let mut wb = Workbook::new();
        {
            let mut cell = wb.cell_mut(0, "B2").unwrap();
            cell.set_value(5).unwrap();
            cell.comment().set_text("five");
        }
        let index = wb.copy_sheet(0).unwrap();
        assert_eq!(wb.worksheet(index).unwrap().title(), "Sheet1 (2)");

        let copied = wb.cell(index, "B2").unwrap();
        assert_eq!(copied.value::<f64>(), 5.0);
        let owner = wb.worksheet(index).unwrap().comments().next().unwrap().1.owner();
        assert_eq!(owner.map(|k| k.sheet), Some(wb.worksheet(index).unwrap().id()));
    }

    #[test]
    fn test_copy_cell() {
        let mut wb = Workbook::new();
        {
            let mut cell = wb.cell_mut(0, "A1").unwrap();
            cell.set_value("origin").unwrap();
            cell.set_hyperlink("http://example.com").unwrap();
            cell.comment().set_text("note");
        }
        wb.copy_cell(0, CellAddress::new(0, 0), 0, CellAddress::new(4, 4))
            .unwrap();

        let copy = wb.cell(0, "E5").unwrap();
        assert_eq!(copy.value::<String>(), "origin");
        assert_eq!(copy.hyperlink().unwrap(), "http://example.com");
        assert_eq!(copy.comment_text(), Some("note"));
        assert_eq!(wb.worksheet(0).unwrap().comment_count(), 2);

        let owner = wb
            .worksheet(0)
            .unwrap()
            .cell_data(&CellAddress::new(4, 4))
            .and_then(|d| d.comment.as_deref())
            .and_then(Comment::owner);
        assert_eq!(owner.map(|k| k.address), Some(CellAddress::new(4, 4)));
    }

    #[test]
    fn test_named_ranges_across_sheets() {
        let mut wb = Workbook::new();
        wb.create_sheet_with_title("Data").unwrap();
        wb.create_named_range("Block", 1, "A1:C3").unwrap();
        assert!(wb.has_named_range("block"));
        let (sheet, range) = wb.named_range("Block").unwrap();
        assert_eq!(sheet, 1);
        assert_eq!(range.refers_to("Data"), "Data!$A$1:$C$3");

        wb.create_named_range("Block", 0, "B2").unwrap();
        assert_eq!(wb.named_ranges().len(), 1);
        assert_eq!(wb.named_range("Block").unwrap().0, 0);

        wb.remove_named_range("Block").unwrap();
        assert!(matches!(
            wb.named_range("Block"),
            Err(Error::NamedRangeNotFound(_))
        ));
    }

    #[test]
    fn test_shared_strings_part_added_once() {
        let mut wb = Workbook::new();
        assert!(!wb.manifest().has_override(parts::SHARED_STRINGS));
        wb.cell_mut(0, "A1").unwrap().set_value("one").unwrap();
        wb.cell_mut(0, "A2").unwrap().set_value("two").unwrap();
        wb.cell_mut(0, "A3").unwrap().set_value("one").unwrap();
        assert!(wb.manifest().has_override(parts::SHARED_STRINGS));
        assert_eq!(
            wb.relationships()
                .by_kind(&RelationshipKind::SharedStrings)
                .count(),
            1
        );
        assert_eq!(wb.shared_strings().len(), 2);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut wb = Workbook::new();
        wb.cell_mut(0, "A1").unwrap().set_value(1).unwrap();
        let copy = wb.clone();
        wb.cell_mut(0, "A1").unwrap().set_value(2).unwrap();
        assert_eq!(copy.cell(0, "A1").unwrap().value::<f64>(), 1.0);
        assert_eq!(wb.cell(0, "A1").unwrap().value::<f64>(), 2.0);
    }

    #[test]
    fn test_clear_keeps_settings() {
        let mut wb = Workbook::new();
        wb.set_guess_types(true);
        wb.cell_mut(0, "A1").unwrap().set_value("x").unwrap();
        wb.clear();
        assert_eq!(wb.sheet_count(), 0);
        assert!(wb.shared_strings().is_empty());
        assert!(wb.guess_types());
        assert_eq!(
            wb.cell(0, "A1").map(|c| c.data_type()),
            Err(Error::SheetOutOfBounds(0, 0))
        );
    }
}
