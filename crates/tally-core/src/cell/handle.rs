//! Cell handles
//!
//! A cell is addressed by its sheet index and coordinate and resolved
//! against the workbook it was borrowed from. [`CellRef`] reads,
//! [`CellMut`] reads and writes; the read operations live on the shared
//! [`CellRead`] trait.

use std::fmt;

use super::{CellAddress, CellData, CellError, CellInput, CellType, CellValue, FromCellValue};
use crate::column::{points_to_pixels, DEFAULT_COLUMN_WIDTH};
use crate::comment::{CellKey, Comment};
use crate::datetime;
use crate::error::{Error, Result};
use crate::infer;
use crate::numfmt;
use crate::package::{RelationshipKind, TargetMode};
use crate::row::DEFAULT_ROW_HEIGHT;
use crate::style::{
    Alignment, BorderStyle, FillStyle, FontStyle, Format, NamedStyle, NumberFormat, Protection,
};
use crate::text::{RichText, SharedText, TextRun};
use crate::workbook::Workbook;
use crate::worksheet::Worksheet;
use crate::MAX_STRING_LEN;

static EMPTY_VALUE: CellValue = CellValue::Empty;

/// Control characters the file format cannot store
fn is_illegal_char(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}')
}

/// Reject text holding a control character outside tab, LF and CR
pub fn check_text(text: &str) -> Result<()> {
    match text.chars().find(|c| is_illegal_char(*c)) {
        Some(c) => Err(Error::IllegalCharacter(c)),
        None => Ok(()),
    }
}

/// Cut text down to the longest string a cell can hold
fn truncate_text(mut text: String) -> String {
    if let Some((index, _)) = text.char_indices().nth(MAX_STRING_LEN) {
        text.truncate(index);
    }
    text
}

/// Truncate runs so their combined length fits in a cell
fn truncate_runs(text: RichText) -> RichText {
    let mut remaining = MAX_STRING_LEN;
    let mut runs = Vec::with_capacity(text.runs().len());
    for run in text.runs() {
        if remaining == 0 {
            break;
        }
        let length = run.text.chars().count();
        let mut run = run.clone();
        if length > remaining {
            run.text = run.text.chars().take(remaining).collect();
        }
        remaining -= length.min(remaining);
        runs.push(run);
    }
    RichText::from_runs(runs)
}

/// Read access to a cell
pub trait CellRead {
    /// The workbook this cell resolves against
    fn workbook(&self) -> &Workbook;

    /// Index of the owning sheet
    fn sheet_index(&self) -> usize;

    /// The cell's coordinate
    fn reference(&self) -> CellAddress;

    fn worksheet(&self) -> &Worksheet {
        &self.workbook().worksheets[self.sheet_index()]
    }

    /// Stored data, `None` if the cell was never touched
    fn data(&self) -> Option<&CellData> {
        let address = self.reference();
        self.worksheet().storage().get(address.row, address.col)
    }

    /// The stored value
    fn raw_value(&self) -> &CellValue {
        self.data().map_or(&EMPTY_VALUE, |d| &d.value)
    }

    /// The value converted to `T`; see [`FromCellValue`]
    fn value<T: FromCellValue>(&self) -> T
    where
        Self: Sized,
    {
        T::from_cell_value(self.raw_value(), self.workbook().calendar())
    }

    fn data_type(&self) -> CellType {
        self.raw_value().cell_type()
    }

    fn has_value(&self) -> bool {
        !self.raw_value().is_empty()
    }

    /// The error code, `DataType` if the cell does not hold an error
    fn error(&self) -> Result<CellError> {
        match self.raw_value() {
            CellValue::Error(e) => Ok(*e),
            other => Err(Error::DataType(format!(
                "{} holds {}, not an error",
                self.reference(),
                other.type_name()
            ))),
        }
    }

    /// The formula without its leading `=`, `DataType` if there is none
    fn formula(&self) -> Result<&str> {
        self.raw_value()
            .formula_text()
            .ok_or_else(|| Error::DataType(format!("{} has no formula", self.reference())))
    }

    fn has_formula(&self) -> bool {
        self.raw_value().is_formula()
    }

    /// The hyperlink target, `NoHyperlink` if none is set
    fn hyperlink(&self) -> Result<&str> {
        self.data()
            .and_then(|d| d.hyperlink.as_deref())
            .and_then(|id| self.worksheet().relationships().get(id))
            .map(|rel| rel.target.as_str())
            .ok_or_else(|| Error::NoHyperlink(self.reference().to_string()))
    }

    fn has_hyperlink(&self) -> bool {
        self.data().map_or(false, |d| d.hyperlink.is_some())
    }

    fn comment_text(&self) -> Option<&str> {
        self.data()
            .and_then(|d| d.comment.as_deref())
            .map(Comment::text)
    }

    fn comment_author(&self) -> Option<&str> {
        self.data()
            .and_then(|d| d.comment.as_deref())
            .map(Comment::author)
    }

    fn has_comment(&self) -> bool {
        self.data().map_or(false, |d| d.comment.is_some())
    }

    /// Explicit format id, `None` when the cell uses the default
    fn format_id(&self) -> Option<u32> {
        self.data().and_then(|d| d.format_id)
    }

    fn has_format(&self) -> bool {
        self.format_id().is_some()
    }

    /// The effective format: the cell's own or the default (format 0)
    fn format(&self) -> Format {
        self.workbook()
            .stylesheet
            .format(self.format_id().unwrap_or(0))
            .cloned()
            .unwrap_or_default()
    }

    fn number_format(&self) -> NumberFormat {
        self.format().number_format
    }

    fn font(&self) -> FontStyle {
        self.format().font
    }

    fn fill(&self) -> FillStyle {
        self.format().fill
    }

    fn border(&self) -> BorderStyle {
        self.format().border
    }

    fn alignment(&self) -> Alignment {
        self.format().alignment
    }

    fn protection(&self) -> Protection {
        self.format().protection
    }

    /// Named style id, `None` when the cell has no explicit style
    fn style_id(&self) -> Option<u32> {
        self.data().and_then(|d| d.style_id)
    }

    /// The named style, `NoStyle` if none is set
    fn style(&self) -> Result<&NamedStyle> {
        match self.style_id() {
            Some(id) => self.workbook().stylesheet.style(id),
            None => Err(Error::NoStyle(self.reference().to_string())),
        }
    }

    fn has_style(&self) -> bool {
        self.style_id().is_some()
    }

    fn is_merged(&self) -> bool {
        self.data().map_or(false, |d| d.merged)
    }

    /// Nothing worth keeping: see [`CellData::garbage_collectible`]
    fn garbage_collectible(&self) -> bool {
        self.data().map_or(true, CellData::garbage_collectible)
    }

    /// A number shown through a date or time format
    fn is_date(&self) -> bool {
        self.data_type() == CellType::Numeric && self.number_format().is_date_format()
    }

    /// `<Cell Sheet1.A1>`
    fn to_repr(&self) -> String {
        format!("<Cell {}.{}>", self.worksheet().title(), self.reference())
    }

    /// The address moved by `rows` and `cols`
    fn offset(&self, rows: i64, cols: i64) -> Result<CellAddress> {
        self.reference().offset(rows, cols)
    }

    /// Pixel position of the top-left corner at 96 dpi, as `(left, top)`
    fn anchor(&self) -> (u32, u32) {
        let address = self.reference();
        let storage = self.worksheet().storage();

        let default_width = points_to_pixels(DEFAULT_COLUMN_WIDTH);
        let mut left = u32::from(address.col) * default_width;
        for (col, props) in storage.all_column_properties() {
            if col >= address.col {
                break;
            }
            if let Some(width) = props.width.filter(|w| *w > 0.0) {
                left = left - default_width + points_to_pixels(width);
            }
        }

        let default_height = points_to_pixels(DEFAULT_ROW_HEIGHT);
        let mut top = address.row * default_height;
        for (row, props) in storage.all_row_properties() {
            if row >= address.row {
                break;
            }
            if let Some(height) = props.height.filter(|h| *h > 0.0) {
                top = top - default_height + points_to_pixels(height);
            }
        }
        (left, top)
    }

    /// The value as it would be displayed through its number format
    fn display_text(&self) -> String {
        let code = self.number_format().format_code().into_owned();
        let calendar = self.workbook().calendar();
        let render = |value: &CellValue| match value {
            CellValue::Empty => String::new(),
            CellValue::Boolean(true) => "TRUE".to_string(),
            CellValue::Boolean(false) => "FALSE".to_string(),
            CellValue::Number(n) => numfmt::format_number(*n, &code, calendar),
            CellValue::Text(t) => numfmt::format_text(&t.plain_text(), &code),
            CellValue::Error(e) => numfmt::format_text(e.as_str(), &code),
            CellValue::Formula { .. } => String::new(),
        };
        render(self.raw_value().effective_value())
    }
}

/// Read-only handle to a cell
#[derive(Debug, Clone, Copy)]
pub struct CellRef<'a> {
    workbook: &'a Workbook,
    sheet: usize,
    address: CellAddress,
}

impl<'a> CellRef<'a> {
    pub(crate) fn new(workbook: &'a Workbook, sheet: usize, address: CellAddress) -> Self {
        Self {
            workbook,
            sheet,
            address,
        }
    }
}

impl CellRead for CellRef<'_> {
    fn workbook(&self) -> &Workbook {
        self.workbook
    }

    fn sheet_index(&self) -> usize {
        self.sheet
    }

    fn reference(&self) -> CellAddress {
        self.address
    }
}

impl fmt::Display for CellRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

/// Mutable handle to a cell.
///
/// Every failing operation leaves the cell as it was.
#[derive(Debug)]
pub struct CellMut<'a> {
    workbook: &'a mut Workbook,
    sheet: usize,
    address: CellAddress,
}

impl CellRead for CellMut<'_> {
    fn workbook(&self) -> &Workbook {
        self.workbook
    }

    fn sheet_index(&self) -> usize {
        self.sheet
    }

    fn reference(&self) -> CellAddress {
        self.address
    }
}

impl fmt::Display for CellMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

impl<'a> CellMut<'a> {
    pub(crate) fn new(workbook: &'a mut Workbook, sheet: usize, address: CellAddress) -> Self {
        Self {
            workbook,
            sheet,
            address,
        }
    }

    fn key(&self) -> CellKey {
        CellKey {
            sheet: self.worksheet().id(),
            address: self.address,
        }
    }

    fn worksheet_mut(&mut self) -> &mut Worksheet {
        &mut self.workbook.worksheets[self.sheet]
    }

    /// Stored data, created empty if the cell does not exist yet
    fn data_mut(&mut self) -> &mut CellData {
        let (row, col) = (self.address.row, self.address.col);
        self.worksheet_mut().storage_mut().entry(row, col)
    }

    fn existing_data_mut(&mut self) -> Option<&mut CellData> {
        let (row, col) = (self.address.row, self.address.col);
        self.worksheet_mut().storage_mut().get_mut(row, col)
    }

    fn store(&mut self, value: CellValue) {
        self.data_mut().value = value;
    }

    // === Values ===

    /// Assign a value.
    ///
    /// Text is validated (`IllegalCharacter`), truncated to the cell limit
    /// and classified: `=...` becomes a formula, a reserved error code an
    /// error, and with type guessing enabled a percentage, time or number.
    /// Calendar types are stored as serial numbers with a matching format.
    pub fn set_value(&mut self, value: impl Into<CellInput>) -> Result<()> {
        let calendar = self.workbook.calendar();
        match value.into() {
            CellInput::Empty => self.clear_value(),
            CellInput::Bool(b) => self.store(CellValue::Boolean(b)),
            CellInput::Number(n) => self.store(CellValue::Number(n)),
            CellInput::Text(text) => return self.set_text(text),
            CellInput::Rich(text) if text.is_plain() => return self.set_text(text.plain_text()),
            CellInput::Rich(text) => return self.set_rich_text(text),
            CellInput::Error(e) => self.store(CellValue::Error(e)),
            CellInput::Date(date) => {
                self.store(CellValue::Number(calendar.date_to_serial(date) as f64));
                self.set_number_format(NumberFormat::date());
            }
            CellInput::DateTime(dt) => {
                self.store(CellValue::Number(calendar.datetime_to_serial(dt)));
                self.set_number_format(NumberFormat::date_time());
            }
            CellInput::Time(time) => {
                self.store(CellValue::Number(datetime::time_to_serial(time)));
                self.set_number_format(NumberFormat::time());
            }
            CellInput::Duration(duration) => {
                self.store(CellValue::Number(datetime::duration_to_serial(duration)));
                self.set_number_format(NumberFormat::elapsed());
            }
        }
        Ok(())
    }

    fn set_text(&mut self, text: String) -> Result<()> {
        check_text(&text)?;
        let text = truncate_text(text);

        if text.len() > 1 && text.starts_with('=') {
            self.store(CellValue::formula(&text[1..]));
            return Ok(());
        }
        if let Some(error) = CellError::reserved(&text) {
            self.store(CellValue::Error(error));
            return Ok(());
        }
        if self.workbook.guess_types() {
            if let Some(inferred) = infer::infer(&text) {
                self.store(CellValue::Number(inferred.value()));
                if let Some(number_format) = inferred.number_format() {
                    self.set_number_format(number_format);
                }
                return Ok(());
            }
        }

        let shared = if text.is_empty() {
            SharedText::new(RichText::plain(text))
        } else {
            self.workbook.intern_text(RichText::plain(text))
        };
        self.store(CellValue::Text(shared));
        Ok(())
    }

    fn set_rich_text(&mut self, text: RichText) -> Result<()> {
        for run in text.runs() {
            check_text(&run.text)?;
        }
        let shared = self.workbook.intern_text(truncate_runs(text));
        self.store(CellValue::Text(shared));
        Ok(())
    }

    /// Store text as a string even when it looks like a formula or an
    /// error code. Type guessing still applies to plain text when enabled.
    pub fn set_text_value(&mut self, text: RichText) -> Result<()> {
        if !text.is_plain() {
            return self.set_rich_text(text);
        }
        let text = text.plain_text();
        check_text(&text)?;
        if self.workbook.guess_types() {
            if let Some(inferred) = infer::infer(&text) {
                self.store(CellValue::Number(inferred.value()));
                if let Some(number_format) = inferred.number_format() {
                    self.set_number_format(number_format);
                }
                return Ok(());
            }
        }
        let text = truncate_text(text);
        let shared = if text.is_empty() {
            SharedText::new(RichText::plain(text))
        } else {
            self.workbook.intern_text(RichText::plain(text))
        };
        self.store(CellValue::Text(shared));
        Ok(())
    }

    /// Reset to null. Format, style, comment and hyperlink are kept.
    pub fn clear_value(&mut self) {
        if let Some(data) = self.existing_data_mut() {
            data.value = CellValue::Empty;
        }
    }

    /// Store an error code such as `#REF!`
    pub fn set_error(&mut self, code: &str) -> Result<()> {
        let error = code
            .starts_with('#')
            .then(|| CellError::parse(code))
            .flatten()
            .ok_or_else(|| Error::DataType(format!("{:?} is not an error code", code)))?;
        self.store(CellValue::Error(error));
        Ok(())
    }

    // === Formulas ===

    /// Store a formula with no cached result. A leading `=` is dropped.
    pub fn set_formula(&mut self, formula: &str) -> Result<()> {
        let text = Self::formula_body(formula)?;
        self.store(CellValue::formula(text));
        Ok(())
    }

    /// Store a formula together with its last computed result
    pub fn set_formula_with_cached(&mut self, formula: &str, cached: CellValue) -> Result<()> {
        let text = Self::formula_body(formula)?;
        let cached_value = match cached {
            CellValue::Empty => None,
            CellValue::Formula { cached_value, .. } => cached_value,
            other => Some(Box::new(other)),
        };
        self.store(CellValue::Formula {
            text: text.to_string(),
            cached_value,
        });
        Ok(())
    }

    fn formula_body(formula: &str) -> Result<&str> {
        let text = formula.strip_prefix('=').unwrap_or(formula);
        if text.is_empty() {
            return Err(Error::DataType("formula cannot be empty".into()));
        }
        check_text(text)?;
        Ok(text)
    }

    /// Drop the formula. A cached result stays behind as the value.
    pub fn clear_formula(&mut self) {
        if let Some(data) = self.existing_data_mut() {
            if let CellValue::Formula { cached_value, .. } = &mut data.value {
                data.value = cached_value.take().map_or(CellValue::Empty, |v| *v);
            }
        }
    }

    // === Hyperlinks ===

    /// Link the cell to an external target such as `http://example.com`.
    ///
    /// The target must contain a `:`. An empty cell also takes the target
    /// as its text.
    pub fn set_hyperlink(&mut self, target: &str) -> Result<()> {
        if target.is_empty() || !target.contains(':') {
            return Err(Error::DataType(format!(
                "{:?} is not a hyperlink target",
                target
            )));
        }
        check_text(target)?;

        let existing = self.data().and_then(|d| d.hyperlink.clone());
        let relationships = self.worksheet_mut().relationships_mut();
        let id = match existing.filter(|id| relationships.get(id).is_some()) {
            Some(id) => {
                if let Some(rel) = relationships.get_mut(&id) {
                    rel.target = target.to_string();
                }
                id
            }
            None => relationships.add(RelationshipKind::Hyperlink, target, TargetMode::External),
        };
        self.data_mut().hyperlink = Some(id);

        if !self.has_value() {
            self.set_text(target.to_string())?;
        }
        Ok(())
    }

    /// Remove the hyperlink and its relationship
    pub fn clear_hyperlink(&mut self) {
        let id = self.existing_data_mut().and_then(|d| d.hyperlink.take());
        if let Some(id) = id {
            self.worksheet_mut().relationships_mut().remove(&id);
        }
    }

    // === Comments ===

    /// The cell's comment, created on first access
    pub fn comment(&mut self) -> &mut Comment {
        let key = self.key();
        let (row, col) = (self.address.row, self.address.col);
        let worksheet = self.worksheet_mut();
        let missing = worksheet
            .storage()
            .get(row, col)
            .map_or(true, |d| d.comment.is_none());
        if missing {
            worksheet.comment_added();
        }
        worksheet
            .storage_mut()
            .entry(row, col)
            .comment
            .get_or_insert_with(|| Box::new(Comment::owned_by(key)))
            .as_mut()
    }

    /// Shorthand for setting the text of [`comment`](Self::comment)
    pub fn set_comment_text(&mut self, text: impl Into<String>) {
        self.comment().set_text(text);
    }

    /// Replace the comment with one previously taken from this cell.
    ///
    /// Fails with `Attribute` when the comment belongs to another cell.
    pub fn set_comment(&mut self, comment: Comment) -> Result<()> {
        if comment.owner() != Some(self.key()) {
            return Err(Error::Attribute(format!(
                "comment does not belong to {}",
                self.to_repr()
            )));
        }
        if !self.has_comment() {
            self.worksheet_mut().comment_added();
        }
        self.data_mut().comment = Some(Box::new(comment));
        Ok(())
    }

    /// Remove the comment, if any
    pub fn clear_comment(&mut self) {
        let removed = self
            .existing_data_mut()
            .and_then(|d| d.comment.take())
            .is_some();
        if removed {
            self.worksheet_mut().comment_removed();
        }
    }

    // === Formats ===

    /// Intern `format` and point the cell at it
    pub fn set_format(&mut self, format: Format) {
        let id = self.workbook.stylesheet.add_format(format);
        self.data_mut().format_id = Some(id);
    }

    /// Point the cell at an already interned format, `InvalidStyleIndex`
    /// if there is no such format
    pub fn set_format_id(&mut self, id: u32) -> Result<()> {
        self.workbook.stylesheet.format(id)?;
        self.data_mut().format_id = Some(id);
        Ok(())
    }

    /// Go back to the default format
    pub fn clear_format(&mut self) {
        if let Some(data) = self.existing_data_mut() {
            data.format_id = None;
        }
    }

    /// Copy the current format, change one part and intern the result
    fn modify_format(&mut self, change: impl FnOnce(&mut Format)) {
        let mut format = self.format();
        change(&mut format);
        self.set_format(format);
    }

    pub fn set_number_format(&mut self, number_format: NumberFormat) {
        self.modify_format(|f| f.number_format = number_format);
    }

    pub fn set_font(&mut self, font: FontStyle) {
        self.modify_format(|f| f.font = font);
    }

    pub fn set_fill(&mut self, fill: FillStyle) {
        self.modify_format(|f| f.fill = fill);
    }

    pub fn set_border(&mut self, border: BorderStyle) {
        self.modify_format(|f| f.border = border);
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.modify_format(|f| f.alignment = alignment);
    }

    pub fn set_protection(&mut self, protection: Protection) {
        self.modify_format(|f| f.protection = protection);
    }

    // === Named styles ===

    /// Apply an existing named style, `StyleNotFound` if there is none
    pub fn set_style(&mut self, name: &str) -> Result<()> {
        let id = self.workbook.stylesheet.style_id(name)?;
        self.data_mut().style_id = Some(id);
        Ok(())
    }

    /// Apply a named style, adding it to the workbook if its name is new
    pub fn set_named_style(&mut self, style: NamedStyle) {
        let stylesheet = &mut self.workbook.stylesheet;
        let id = match stylesheet.style_id(&style.name) {
            Ok(id) => id,
            Err(_) => stylesheet.add_style(style),
        };
        self.data_mut().style_id = Some(id);
    }

    /// Apply a named style by id, `InvalidStyleIndex` if there is none
    pub fn set_style_id(&mut self, id: u32) -> Result<()> {
        self.workbook.stylesheet.style(id)?;
        self.data_mut().style_id = Some(id);
        Ok(())
    }

    pub fn clear_style(&mut self) {
        if let Some(data) = self.existing_data_mut() {
            data.style_id = None;
        }
    }

    // === Merging ===

    pub fn set_merged(&mut self, merged: bool) {
        if merged {
            self.data_mut().merged = true;
        } else if let Some(data) = self.existing_data_mut() {
            data.merged = false;
        }
    }
}

impl From<TextRun> for CellInput {
    fn from(run: TextRun) -> Self {
        CellInput::Rich(RichText::from_runs(vec![run]))
    }
}
