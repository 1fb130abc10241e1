//! The workbook's format and named-style tables

use super::number_format::FIRST_CUSTOM_ID;
use super::{
    Alignment, BorderStyle, FillStyle, FontStyle, Format, InternPool, NamedStyle, NumberFormat,
    Protection,
};
use crate::error::{Error, Result};
use ahash::AHashMap;
use std::collections::BTreeMap;

/// Deduplicated formats and named styles.
///
/// Format 0 is the default format and style 0 is "Normal"; both always
/// exist. Adding a value equal to an existing entry returns the existing id.
#[derive(Debug, Clone)]
pub struct Stylesheet {
    formats: InternPool<Format>,
    styles: Vec<NamedStyle>,
    style_names: AHashMap<String, u32>,
    custom_codes: BTreeMap<u32, String>,
    custom_ids: AHashMap<String, u32>,
}

/// Component ids of one format, as referenced from an `xf` record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatRecord {
    pub number_format_id: u32,
    pub font_id: u32,
    pub fill_id: u32,
    pub border_id: u32,
    pub alignment_id: u32,
    pub protection_id: u32,
}

/// Distinct components of every format and style, in id order.
///
/// Fill 0 is "none" and fill 1 is "gray125", which file readers expect at
/// those positions.
#[derive(Debug, Clone)]
pub struct StyleComponents {
    pub fonts: Vec<FontStyle>,
    pub fills: Vec<FillStyle>,
    pub borders: Vec<BorderStyle>,
    pub alignments: Vec<Alignment>,
    pub protections: Vec<Protection>,
    /// Custom number formats as (id, code)
    pub number_formats: Vec<(u32, String)>,
    /// One record per format id
    pub formats: Vec<FormatRecord>,
    /// One record per named style id
    pub styles: Vec<FormatRecord>,
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Stylesheet {
    /// A stylesheet holding only the default format and "Normal"
    pub fn new() -> Self {
        let normal = NamedStyle::normal();
        let mut style_names = AHashMap::new();
        style_names.insert(normal.name.clone(), 0);
        Self {
            formats: InternPool::new(Format::default()),
            styles: vec![normal],
            style_names,
            custom_codes: BTreeMap::new(),
            custom_ids: AHashMap::new(),
        }
    }

    /// Intern a format, returning the id of an equal existing one if any
    pub fn add_format(&mut self, format: Format) -> u32 {
        self.register_number_format(&format.number_format);
        let (id, added) = self.formats.get_or_insert(format);
        if added {
            log::trace!("interned new format {}", id);
        }
        id
    }

    /// Replace format 0, used when a file defines its own default
    pub fn set_default_format(&mut self, format: Format) {
        self.register_number_format(&format.number_format);
        self.formats.replace(0, format);
    }

    /// Format by id
    pub fn format(&self, id: u32) -> Result<&Format> {
        self.formats.get(id).ok_or(Error::InvalidStyleIndex(id))
    }

    /// Number of formats, including the default
    pub fn format_count(&self) -> usize {
        self.formats.len()
    }

    /// Formats in id order
    pub fn formats(&self) -> &[Format] {
        self.formats.as_slice()
    }

    /// Add a named style.
    ///
    /// An identical style returns its existing id. A style whose name is
    /// already taken replaces the previous definition under the same id.
    pub fn add_style(&mut self, style: NamedStyle) -> u32 {
        self.register_number_format(&style.format.number_format);
        match self.style_names.get(&style.name) {
            Some(&id) => {
                if self.styles[id as usize] != style {
                    log::trace!("redefined style {:?}", style.name);
                    self.styles[id as usize] = style;
                }
                id
            }
            None => {
                let id = self.styles.len() as u32;
                log::trace!("added style {:?} as {}", style.name, id);
                self.style_names.insert(style.name.clone(), id);
                self.styles.push(style);
                id
            }
        }
    }

    /// Create a style with the default format, or return the id of the
    /// existing style with this name
    pub fn create_style(&mut self, name: &str) -> u32 {
        match self.style_names.get(name) {
            Some(&id) => id,
            None => self.add_style(NamedStyle::new(name)),
        }
    }

    /// Named style by id
    pub fn style(&self, id: u32) -> Result<&NamedStyle> {
        self.styles
            .get(id as usize)
            .ok_or(Error::InvalidStyleIndex(id))
    }

    /// Id of the style with this name
    pub fn style_id(&self, name: &str) -> Result<u32> {
        self.style_names
            .get(name)
            .copied()
            .ok_or_else(|| Error::StyleNotFound(name.to_string()))
    }

    /// Named style by name
    pub fn style_by_name(&self, name: &str) -> Result<&NamedStyle> {
        self.style_id(name).and_then(|id| self.style(id))
    }

    /// Whether a style with this name exists
    pub fn has_style(&self, name: &str) -> bool {
        self.style_names.contains_key(name)
    }

    /// Named styles in id order
    pub fn styles(&self) -> &[NamedStyle] {
        &self.styles
    }

    /// Give a custom code its file id. Builtin formats need no entry.
    fn register_number_format(&mut self, number_format: &NumberFormat) {
        if let NumberFormat::Custom(code) = number_format {
            if !self.custom_ids.contains_key(code) {
                let id = self
                    .custom_codes
                    .keys()
                    .next_back()
                    .map_or(FIRST_CUSTOM_ID, |last| last + 1)
                    .max(FIRST_CUSTOM_ID);
                self.custom_codes.insert(id, code.clone());
                self.custom_ids.insert(code.clone(), id);
            }
        }
    }

    /// Register a custom code under the id a file assigned to it. Ids below
    /// the custom range, or already taken by another code, get a fresh id.
    pub fn register_number_format_with_id(&mut self, id: u32, code: &str) -> NumberFormat {
        let number_format = NumberFormat::from_code(code);
        if let NumberFormat::Custom(code) = &number_format {
            let taken = self.custom_codes.get(&id).map_or(false, |c| c != code);
            if id >= FIRST_CUSTOM_ID && !taken && !self.custom_ids.contains_key(code) {
                self.custom_codes.insert(id, code.clone());
                self.custom_ids.insert(code.clone(), id);
            } else {
                self.register_number_format(&number_format);
            }
        }
        number_format
    }

    /// File id of a number format. `None` for a custom code that was never
    /// added through a format or style.
    pub fn number_format_id(&self, number_format: &NumberFormat) -> Option<u32> {
        match number_format {
            NumberFormat::Custom(code) => self.custom_ids.get(code).copied(),
            other => other.builtin_id(),
        }
    }

    /// Custom number formats as (id, code), by id
    pub fn custom_number_formats(&self) -> impl Iterator<Item = (u32, &str)> {
        self.custom_codes.iter().map(|(id, code)| (*id, code.as_str()))
    }

    /// Collect the distinct fonts, fills, borders, alignments and
    /// protections used by all formats and styles.
    pub fn components(&self) -> StyleComponents {
        let mut fonts = InternPool::new(FontStyle::default());
        let mut fills = InternPool::new(FillStyle::None);
        fills.get_or_insert(FillStyle::gray125());
        let mut borders = InternPool::new(BorderStyle::default());
        let mut alignments = InternPool::new(Alignment::default());
        let mut protections = InternPool::new(Protection::default());

        let mut record = |format: &Format| FormatRecord {
            number_format_id: self.number_format_id(&format.number_format).unwrap_or(0),
            font_id: fonts.get_or_insert(format.font.clone()).0,
            fill_id: fills.get_or_insert(format.fill.clone()).0,
            border_id: borders.get_or_insert(format.border.clone()).0,
            alignment_id: alignments.get_or_insert(format.alignment.clone()).0,
            protection_id: protections.get_or_insert(format.protection).0,
        };

        let formats: Vec<FormatRecord> = self.formats.as_slice().iter().map(&mut record).collect();
        let styles: Vec<FormatRecord> = self.styles.iter().map(|s| record(&s.format)).collect();

        StyleComponents {
            fonts: fonts.as_slice().to_vec(),
            fills: fills.as_slice().to_vec(),
            borders: borders.as_slice().to_vec(),
            alignments: alignments.as_slice().to_vec(),
            protections: protections.as_slice().to_vec(),
            number_formats: self
                .custom_number_formats()
                .map(|(id, code)| (id, code.to_string()))
                .collect(),
            formats,
            styles,
        }
    }

    /// Drop all formats except a fresh default at id 0
    pub fn clear_formats(&mut self) {
        self.formats.reset(Format::default());
        self.custom_codes.clear();
        self.custom_ids.clear();
        for style in self.styles.clone() {
            self.register_number_format(&style.format.number_format);
        }
    }

    /// Drop all named styles except a fresh "Normal" at id 0
    pub fn clear_styles(&mut self) {
        let normal = NamedStyle::normal();
        self.style_names.clear();
        self.style_names.insert(normal.name.clone(), 0);
        self.styles = vec![normal];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{BorderLineStyle, Color, PatternType};
    use pretty_assertions::assert_eq;

    fn striking() -> Format {
        Format::new()
            .with_border(BorderStyle::outline(BorderLineStyle::Thin, Color::BLACK))
            .with_font(FontStyle::new().with_bold(true))
            .with_fill(FillStyle::solid(Color::YELLOW))
    }

    #[test]
    fn test_seeds() {
        let sheet = Stylesheet::new();
        assert_eq!(sheet.format_count(), 1);
        assert_eq!(sheet.format(0).unwrap(), &Format::default());
        assert_eq!(sheet.style(0).unwrap().name, "Normal");
        assert_eq!(sheet.style_id("Normal").unwrap(), 0);
    }

    #[test]
    fn test_add_format_is_idempotent() {
        let mut sheet = Stylesheet::new();
        let first = sheet.add_format(striking());
        let second = sheet.add_format(striking());
        assert_eq!(first, second);
        assert_eq!(sheet.format_count(), 2);
        assert_eq!(sheet.add_format(Format::default()), 0);
    }

    #[test]
    fn test_add_existing_style() {
        let mut sheet = Stylesheet::new();
        let id = sheet.create_style("test");
        assert_eq!(sheet.styles().len(), 2);

        let copy = sheet.style(id).unwrap().clone();
        assert_eq!(sheet.add_style(copy), id);
        assert_eq!(sheet.styles().len(), 2);
        assert_eq!(sheet.create_style("test"), id);
    }

    #[test]
    fn test_redefining_style_keeps_id() {
        let mut sheet = Stylesheet::new();
        let id = sheet.create_style("Heading");
        let bold = NamedStyle::new("Heading").with_format(striking());
        assert_eq!(sheet.add_style(bold), id);
        assert_eq!(sheet.style_by_name("Heading").unwrap().format, striking());
    }

    #[test]
    fn test_missing_style() {
        let sheet = Stylesheet::new();
        assert!(sheet.style_id("nope").unwrap_err().is_key_error());
        assert!(!sheet.has_style("nope"));
        assert_eq!(sheet.format(5), Err(Error::InvalidStyleIndex(5)));
    }

    #[test]
    fn test_custom_number_format_ids() {
        let mut sheet = Stylesheet::new();
        sheet.add_format(Format::new().with_number_format(NumberFormat::date()));
        sheet.add_format(Format::new().with_number_format(NumberFormat::percentage()));
        sheet.add_format(Format::new().with_number_format(NumberFormat::elapsed()));
        sheet.add_format(Format::new().with_number_format(NumberFormat::date()));

        let custom: Vec<_> = sheet.custom_number_formats().collect();
        assert_eq!(custom, vec![(164, "yyyy-mm-dd"), (165, "[hh]:mm:ss")]);
        assert_eq!(sheet.number_format_id(&NumberFormat::percentage()), Some(9));
        assert_eq!(sheet.number_format_id(&NumberFormat::Custom("0.0".into())), None);
    }

    #[test]
    fn test_register_file_ids() {
        let mut sheet = Stylesheet::new();
        assert_eq!(
            sheet.register_number_format_with_id(170, "0.000"),
            NumberFormat::Custom("0.000".into())
        );
        assert_eq!(
            sheet.register_number_format_with_id(43, "0.00000_ "),
            NumberFormat::Custom("0.00000_ ".into())
        );
        assert_eq!(sheet.register_number_format_with_id(9, "0%"), NumberFormat::BuiltIn(9));

        let custom: Vec<_> = sheet.custom_number_formats().collect();
        assert_eq!(custom, vec![(170, "0.000"), (171, "0.00000_ ")]);
    }

    #[test]
    fn test_components() {
        let mut sheet = Stylesheet::new();
        let id = sheet.add_format(striking());
        sheet.add_format(Format::new().with_fill(FillStyle::solid(Color::YELLOW)));

        let parts = sheet.components();
        assert_eq!(parts.fonts.len(), 2);
        assert_eq!(parts.fills.len(), 3);
        assert_eq!(
            parts.fills[1],
            FillStyle::Pattern {
                pattern: PatternType::Gray125,
                foreground: None,
                background: None
            }
        );
        assert_eq!(parts.borders.len(), 2);
        assert_eq!(parts.formats.len(), 3);
        assert_eq!(parts.formats[id as usize].fill_id, 2);
        assert_eq!(parts.formats[2].fill_id, 2);
        assert_eq!(parts.styles.len(), 1);
        assert_eq!(parts.styles[0], FormatRecord::default());
    }

    #[test]
    fn test_clear() {
        let mut sheet = Stylesheet::new();
        sheet.add_format(striking());
        sheet.create_style("x");
        sheet.clear_formats();
        sheet.clear_styles();
        assert_eq!(sheet.format_count(), 1);
        assert_eq!(sheet.styles().len(), 1);
        assert!(!sheet.has_style("x"));
    }
}
