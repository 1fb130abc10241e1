//! XLSX reader

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;

use crate::error::{XlsxError, XlsxResult};
use crate::styles::{parse_color, read_styles_xml, XfMap};
use crate::xml::{
    attr, bool_attr, decode_excel_escapes, parse_attr, rels_part, resolve_target, text_reader,
    trimmed_reader,
};
use tally_core::datetime::time_to_serial;
use tally_core::named_range::parse_refers_to;
use tally_core::package::parts;
use tally_core::{
    Calendar, CellAddress, CellError, CellRange, CellValue, Relationship, RelationshipKind,
    RichText, TargetMode, TextRun, Workbook,
};

/// Policies applied while loading a workbook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadOptions {
    /// Classify string cells as numbers, percentages and times
    pub guess_types: bool,
    /// Keep only the cached results of formulas
    pub data_only: bool,
}

impl LoadOptions {
    pub fn with_guess_types(mut self, guess_types: bool) -> Self {
        self.guess_types = guess_types;
        self
    }

    pub fn with_data_only(mut self, data_only: bool) -> Self {
        self.data_only = data_only;
        self
    }
}

/// A sheet entry of workbook.xml
#[derive(Debug)]
struct SheetEntry {
    name: String,
    rel_id: String,
}

/// The parts of workbook.xml the reader uses
#[derive(Debug, Default)]
struct WorkbookPart {
    sheets: Vec<SheetEntry>,
    date1904: bool,
    active_tab: usize,
    defined_names: Vec<(String, String)>,
}

/// Accumulates `<t>` text and `<r>` runs of a shared or inline string
#[derive(Debug, Default)]
struct RichTextBuilder {
    runs: Vec<TextRun>,
    run: Option<TextRun>,
    plain: String,
    in_rpr: bool,
    in_t: bool,
    in_rph: bool,
}

impl RichTextBuilder {
    fn start(&mut self, e: &BytesStart<'_>) {
        match e.local_name().as_ref() {
            b"r" => self.run = Some(TextRun::new(String::new())),
            b"rPr" => self.in_rpr = true,
            // phonetic hints are not part of the text
            b"rPh" => self.in_rph = true,
            b"t" if !self.in_rph => self.in_t = true,
            tag if self.in_rpr => {
                if let Some(run) = self.run.as_mut() {
                    apply_run_property(run, tag, e);
                }
            }
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"r" => {
                if let Some(run) = self.run.take() {
                    self.runs.push(run);
                }
            }
            b"rPr" => self.in_rpr = false,
            b"rPh" => self.in_rph = false,
            b"t" => self.in_t = false,
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if !self.in_t {
            return;
        }
        match self.run.as_mut() {
            Some(run) => run.text.push_str(text),
            None => self.plain.push_str(text),
        }
    }

    fn finish(&mut self) -> RichText {
        let builder = std::mem::take(self);
        if builder.runs.is_empty() {
            return RichText::plain(decode_excel_escapes(&builder.plain));
        }
        let runs = builder
            .runs
            .into_iter()
            .map(|mut run| {
                run.text = decode_excel_escapes(&run.text);
                run
            })
            .collect();
        RichText::from_runs(runs)
    }
}

fn apply_run_property(run: &mut TextRun, tag: &[u8], e: &BytesStart<'_>) {
    match tag {
        b"rFont" | b"name" => run.font = attr(e, b"val"),
        b"sz" => run.size = parse_attr(e, b"val"),
        b"color" => run.color = Some(parse_color(e)),
        b"family" => run.family = parse_attr(e, b"val"),
        b"scheme" => run.scheme = attr(e, b"val"),
        _ => {}
    }
}

/// One `<c>` element, applied to the workbook when it closes
#[derive(Debug)]
struct PendingCell {
    address: CellAddress,
    kind: Option<String>,
    style: Option<u32>,
    value: Option<String>,
    formula: Option<String>,
    inline: Option<RichText>,
}

/// Comment text and author for one cell
#[derive(Debug)]
struct PendingComment {
    address: CellAddress,
    text: String,
    author: String,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        Self::read_file_with_options(path, &LoadOptions::default())
    }

    /// Read a workbook from a file path with load options
    pub fn read_file_with_options<P: AsRef<Path>>(
        path: P,
        options: &LoadOptions,
    ) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read_with_options(file, options)
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        Self::read_with_options(reader, &LoadOptions::default())
    }

    /// Read a workbook from a reader with load options
    pub fn read_with_options<R: Read + Seek>(
        reader: R,
        options: &LoadOptions,
    ) -> XlsxResult<Workbook> {
        let mut archive = ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name(parts::CONTENT_TYPES).is_err() {
            return Err(XlsxError::NotXlsx(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let mut workbook = Workbook::empty();
        workbook.set_guess_types(options.guess_types);
        workbook.set_data_only(options.data_only);

        let root_rels = Self::read_rels(&mut archive, parts::ROOT_RELS)?;
        let workbook_path = root_rels
            .iter()
            .find(|r| r.kind == RelationshipKind::OfficeDocument)
            .map_or_else(|| parts::WORKBOOK.to_string(), |r| resolve_target("", &r.target));
        if let Some(core) = root_rels
            .iter()
            .find(|r| r.kind == RelationshipKind::CoreProperties)
        {
            Self::read_core_properties(&mut archive, &resolve_target("", &core.target), &mut workbook)?;
        }

        let workbook_rels = Self::read_rels(&mut archive, &rels_part(&workbook_path))?;
        let part_of = |kind: RelationshipKind| {
            workbook_rels
                .iter()
                .find(|r| r.kind == kind)
                .map(|r| resolve_target(&workbook_path, &r.target))
        };

        let xf_map = match part_of(RelationshipKind::Styles) {
            Some(path) => match archive.by_name(&path) {
                Ok(file) => read_styles_xml(file, workbook.stylesheet_mut())?,
                Err(_) => {
                    log::warn!("styles part {} is missing", path);
                    XfMap::default()
                }
            },
            None => XfMap::default(),
        };

        let shared_strings = match part_of(RelationshipKind::SharedStrings) {
            Some(path) => Self::read_shared_strings(&mut archive, &path)?,
            None => Vec::new(),
        };

        let workbook_part = Self::read_workbook_xml(&mut archive, &workbook_path)?;
        if workbook_part.date1904 {
            workbook.set_calendar(Calendar::Mac1904);
        }

        for entry in &workbook_part.sheets {
            let rel = workbook_rels.iter().find(|r| r.id == entry.rel_id);
            let path = match rel {
                Some(rel) => resolve_target(&workbook_path, &rel.target),
                None => {
                    log::warn!("sheet {:?} has no relationship {}", entry.name, entry.rel_id);
                    continue;
                }
            };
            let index = workbook.create_sheet_with_title(&entry.name)?;
            Self::read_worksheet(
                &mut archive,
                &path,
                &mut workbook,
                index,
                &shared_strings,
                &xf_map,
                options,
            )?;
        }

        // Ensure at least one sheet exists
        if workbook.sheet_count() == 0 {
            workbook.create_sheet()?;
        }
        if workbook.set_active_sheet(workbook_part.active_tab).is_err() {
            log::warn!("active tab {} is out of range", workbook_part.active_tab);
        }

        for (name, refers_to) in &workbook_part.defined_names {
            let target = parse_refers_to(refers_to)
                .and_then(|(sheet, range)| Some((workbook.sheet_index(&sheet)?, range)));
            match target {
                Some((sheet, range)) => {
                    if let Err(e) = workbook.create_named_range(name, sheet, &range.to_a1_string()) {
                        log::warn!("skipping defined name {:?}: {}", name, e);
                    }
                }
                None => log::debug!("skipping defined name {:?} = {:?}", name, refers_to),
            }
        }

        log::debug!("read workbook with {} sheets", workbook.sheet_count());
        Ok(workbook)
    }

    /// Relationships of a `.rels` part; a missing part has none
    fn read_rels<R: Read + Seek>(
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> XlsxResult<Vec<Relationship>> {
        let mut rels = Vec::new();
        let file = match archive.by_name(path) {
            Ok(f) => f,
            Err(_) => return Ok(rels),
        };

        let mut xml_reader = trimmed_reader(BufReader::new(file));
        let mut buf = Vec::new();
        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let id = attr(&e, b"Id");
                    let target = attr(&e, b"Target");
                    let kind = attr(&e, b"Type");
                    if let (Some(id), Some(target), Some(kind)) = (id, target, kind) {
                        let mode = match attr(&e, b"TargetMode").as_deref() {
                            Some("External") => TargetMode::External,
                            _ => TargetMode::Internal,
                        };
                        rels.push(Relationship::new(
                            id,
                            RelationshipKind::from_type_uri(&kind),
                            target,
                            mode,
                        ));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }
        log::debug!("read {} relationships from {}", rels.len(), path);
        Ok(rels)
    }

    fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
        let text = text.trim();
        chrono::DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.naive_utc())
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%SZ"))
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
            .ok()
    }

    fn read_core_properties<R: Read + Seek>(
        archive: &mut ZipArchive<R>,
        path: &str,
        workbook: &mut Workbook,
    ) -> XlsxResult<()> {
        let file = match archive.by_name(path) {
            Ok(f) => f,
            Err(_) => {
                log::warn!("core properties part {} is missing", path);
                return Ok(());
            }
        };

        let mut xml_reader = text_reader(BufReader::new(file));
        let mut buf = Vec::new();
        let mut field: Option<Vec<u8>> = None;
        let mut text = String::new();
        let props = workbook.properties_mut();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    field = Some(e.local_name().as_ref().to_vec());
                    text.clear();
                }
                Ok(Event::Text(e)) if field.is_some() => {
                    text.push_str(&e.unescape()?);
                }
                Ok(Event::End(_)) => {
                    match field.take().as_deref() {
                        Some(b"creator") => props.creator = text.clone(),
                        Some(b"lastModifiedBy") => props.last_modified_by = text.clone(),
                        Some(b"title") => props.title = Some(text.clone()),
                        Some(b"created") => props.created = Self::parse_timestamp(&text),
                        Some(b"modified") => props.modified = Self::parse_timestamp(&text),
                        _ => {}
                    }
                    text.clear();
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }
        log::debug!("read part {}", path);
        Ok(())
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> XlsxResult<Vec<RichText>> {
        let mut strings = Vec::new();
        let file = match archive.by_name(path) {
            Ok(f) => f,
            Err(_) => {
                log::warn!("shared strings part {} is missing", path);
                return Ok(strings);
            }
        };

        let mut xml_reader = text_reader(BufReader::new(file));
        let mut buf = Vec::new();
        let mut builder = RichTextBuilder::default();
        let mut in_si = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"si" => in_si = true,
                    _ if in_si => builder.start(&e),
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"si" => strings.push(RichText::plain("")),
                    _ if in_si => {
                        builder.start(&e);
                        builder.end(e.local_name().as_ref());
                    }
                    _ => {}
                },
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        strings.push(builder.finish());
                        in_si = false;
                    }
                    name if in_si => builder.end(name),
                    _ => {}
                },
                Ok(Event::Text(e)) if in_si => builder.text(&e.unescape()?),
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        log::debug!("read {} shared strings", strings.len());
        Ok(strings)
    }

    /// Read workbook.xml: sheets, date system, active tab and defined names
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> XlsxResult<WorkbookPart> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::missing(path))?;

        let mut xml_reader = text_reader(BufReader::new(file));
        let mut buf = Vec::new();
        let mut part = WorkbookPart::default();
        let mut defined_name: Option<(String, String)> = None;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"workbookPr" => part.date1904 = bool_attr(&e, b"date1904").unwrap_or(false),
                    b"workbookView" => part.active_tab = parse_attr(&e, b"activeTab").unwrap_or(0),
                    b"sheet" => {
                        if let (Some(name), Some(rel_id)) = (attr(&e, b"name"), attr(&e, b"id")) {
                            part.sheets.push(SheetEntry { name, rel_id });
                        }
                    }
                    b"definedName" => {
                        // built-in names such as print areas are not ranges we model
                        defined_name = attr(&e, b"name")
                            .filter(|name| !name.starts_with("_xlnm."))
                            .map(|name| (name, String::new()));
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) => {
                    if let Some((_, text)) = defined_name.as_mut() {
                        text.push_str(&e.unescape()?);
                    }
                }
                Ok(Event::End(e)) if e.local_name().as_ref() == b"definedName" => {
                    if let Some(name) = defined_name.take() {
                        part.defined_names.push(name);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        log::debug!("read part {} with {} sheets", path, part.sheets.len());
        Ok(part)
    }

    /// Value of a formula's `<v>` according to the cell type
    /// Serial for an ISO 8601 `t="d"` value: date-time, date or time of day
    fn iso_date_serial(text: &str, calendar: Calendar) -> Option<f64> {
        let text = text.trim();
        if let Some(dt) = Self::parse_timestamp(text)
            .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").ok())
        {
            return Some(calendar.datetime_to_serial(dt));
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Some(calendar.date_to_serial(date) as f64);
        }
        NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
            .ok()
            .map(time_to_serial)
    }

    fn cached_value(kind: Option<&str>, value: Option<&str>, calendar: Calendar) -> CellValue {
        let value = match value {
            Some(v) => v,
            None => return CellValue::Empty,
        };
        match kind {
            Some("str") | Some("s") | Some("inlineStr") => CellValue::text(value),
            Some("b") => CellValue::Boolean(value == "1" || value.eq_ignore_ascii_case("true")),
            Some("e") => match CellError::parse(value) {
                Some(error) => CellValue::Error(error),
                None => {
                    log::warn!("unknown cached error code {:?}", value);
                    CellValue::Empty
                }
            },
            Some("d") => Self::iso_date_serial(value, calendar)
                .map_or(CellValue::Empty, CellValue::Number),
            _ => value
                .trim()
                .parse()
                .map_or(CellValue::Empty, CellValue::Number),
        }
    }

    /// Apply a parsed `<c>` to the workbook
    fn apply_cell(
        workbook: &mut Workbook,
        sheet: usize,
        pending: PendingCell,
        shared_strings: &[RichText],
        xf_map: &XfMap,
        options: &LoadOptions,
    ) -> tally_core::Result<()> {
        let has_content = pending.value.is_some()
            || pending.inline.is_some()
            || pending.formula.as_deref().map_or(false, |f| !f.is_empty());
        let style = pending.style.filter(|xf| *xf != 0);
        if !has_content && style.is_none() {
            return Ok(());
        }

        let calendar = workbook.calendar();
        let mut cell = workbook.cell_mut_at(sheet, pending.address)?;
        let kind = pending.kind.as_deref();
        let value = pending.value.as_deref();

        match pending.formula {
            Some(formula) if !formula.is_empty() && !options.data_only => {
                cell.set_formula_with_cached(&formula, Self::cached_value(kind, value, calendar))?;
            }
            // data-only loads and shared-formula dependents keep the cached value
            _ => match kind {
                Some("s") => {
                    let text = value
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .and_then(|i| shared_strings.get(i));
                    match text {
                        Some(text) => cell.set_text_value(text.clone())?,
                        None => log::warn!(
                            "unresolvable shared string {:?} in {}",
                            value,
                            pending.address
                        ),
                    }
                }
                Some("inlineStr") => {
                    if let Some(text) = pending.inline {
                        cell.set_text_value(text)?;
                    }
                }
                Some("b") => {
                    if let Some(v) = value {
                        cell.set_value(v == "1" || v.eq_ignore_ascii_case("true"))?;
                    }
                }
                Some("e") => {
                    if let Some(v) = value {
                        if cell.set_error(v).is_err() {
                            log::warn!("unknown error code {:?} in {}", v, pending.address);
                        }
                    }
                }
                Some("str") => {
                    if let Some(v) = value {
                        cell.set_text_value(RichText::plain(v))?;
                    }
                }
                Some("d") => {
                    if let Some(v) = value {
                        match Self::iso_date_serial(v, calendar) {
                            Some(serial) => cell.set_value(serial)?,
                            None => log::warn!(
                                "unparseable ISO 8601 date {:?} in {}",
                                v,
                                pending.address
                            ),
                        }
                    }
                }
                Some("n") | None => {
                    if let Some(v) = value {
                        match v.trim().parse::<f64>() {
                            Ok(n) => cell.set_value(n)?,
                            Err(_) => log::warn!(
                                "unparseable number {:?} in {}",
                                v,
                                pending.address
                            ),
                        }
                    }
                }
                Some(other) => log::warn!("unknown cell type {:?} in {}", other, pending.address),
            },
        }

        if let Some(xf) = style {
            if !xf_map.contains(xf) {
                log::warn!("unknown style index {} in {}", xf, pending.address);
            } else {
                if let Some(id) = xf_map.format_id(xf) {
                    cell.set_format_id(id)?;
                }
                if let Some(id) = xf_map.style_id(xf) {
                    cell.set_style_id(id)?;
                }
            }
        }
        Ok(())
    }

    /// Read a worksheet from the archive
    fn read_worksheet<R: Read + Seek>(
        archive: &mut ZipArchive<R>,
        path: &str,
        workbook: &mut Workbook,
        sheet: usize,
        shared_strings: &[RichText],
        xf_map: &XfMap,
        options: &LoadOptions,
    ) -> XlsxResult<()> {
        let sheet_rels = Self::read_rels(archive, &rels_part(path))?;
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::missing(path))?;

        let mut xml_reader = text_reader(BufReader::new(file));
        let mut buf = Vec::new();

        let mut row: u32 = 0;
        let mut next_col: u16 = 0;
        let mut next_row: u32 = 0;
        let mut cell: Option<PendingCell> = None;
        let mut in_value = false;
        let mut in_formula = false;
        let mut inline: Option<RichTextBuilder> = None;
        let mut merges: Vec<String> = Vec::new();
        let mut hyperlinks: Vec<(String, String)> = Vec::new();

        loop {
            let event = xml_reader.read_event_into(&mut buf);
            let (start, empty) = match &event {
                Ok(Event::Start(e)) => (Some(e), false),
                Ok(Event::Empty(e)) => (Some(e), true),
                _ => (None, false),
            };

            if let Some(e) = start {
                match e.local_name().as_ref() {
                    b"row" => {
                        row = parse_attr::<u32>(e, b"r")
                            .and_then(|r| r.checked_sub(1))
                            .unwrap_or(next_row);
                        next_row = row + 1;
                        next_col = 0;
                        let ws = workbook
                            .worksheet_mut(sheet)
                            .ok_or(tally_core::Error::SheetOutOfBounds(sheet, 0))?;
                        if bool_attr(e, b"customHeight").unwrap_or(false) {
                            if let Some(height) = parse_attr::<f64>(e, b"ht") {
                                ws.set_row_height(row, height);
                            }
                        }
                        if bool_attr(e, b"hidden").unwrap_or(false) {
                            ws.set_row_hidden(row, true);
                        }
                    }
                    b"col" => {
                        let min = parse_attr::<u16>(e, b"min").unwrap_or(1).max(1);
                        let max = parse_attr::<u16>(e, b"max").unwrap_or(min).max(min);
                        let custom = bool_attr(e, b"customWidth").unwrap_or(false);
                        let width = parse_attr::<f64>(e, b"width").filter(|_| custom);
                        let hidden = bool_attr(e, b"hidden").unwrap_or(false);
                        let ws = workbook
                            .worksheet_mut(sheet)
                            .ok_or(tally_core::Error::SheetOutOfBounds(sheet, 0))?;
                        for col in (min - 1)..max.min(tally_core::MAX_COLS) {
                            if let Some(width) = width {
                                ws.set_column_width(col, width);
                            }
                            if hidden {
                                ws.set_column_hidden(col, true);
                            }
                        }
                    }
                    b"c" => {
                        let address = match attr(e, b"r") {
                            Some(r) => CellAddress::parse(&r)?,
                            None => CellAddress::new(row, next_col),
                        };
                        next_col = address.col.saturating_add(1);
                        let pending = PendingCell {
                            address,
                            kind: attr(e, b"t"),
                            style: parse_attr(e, b"s"),
                            value: None,
                            formula: None,
                            inline: None,
                        };
                        if empty {
                            Self::apply_or_warn(workbook, sheet, pending, shared_strings, xf_map, options);
                        } else {
                            cell = Some(pending);
                        }
                    }
                    b"v" if cell.is_some() && !empty => in_value = true,
                    b"f" if cell.is_some() => {
                        if let Some(c) = cell.as_mut() {
                            c.formula = Some(String::new());
                        }
                        in_formula = !empty;
                    }
                    b"is" if cell.is_some() && !empty => inline = Some(RichTextBuilder::default()),
                    b"mergeCell" => {
                        if let Some(reference) = attr(e, b"ref") {
                            merges.push(reference);
                        }
                    }
                    b"hyperlink" => {
                        if let (Some(reference), Some(id)) = (attr(e, b"ref"), attr(e, b"id")) {
                            hyperlinks.push((reference, id));
                        } else {
                            log::warn!("skipping hyperlink without an external target");
                        }
                    }
                    _ => {
                        if let Some(builder) = inline.as_mut() {
                            builder.start(e);
                            if empty {
                                builder.end(e.local_name().as_ref());
                            }
                        }
                    }
                }
            }

            match event {
                Ok(Event::Text(e)) => {
                    let text = e.unescape()?;
                    if in_value {
                        if let Some(c) = cell.as_mut() {
                            c.value.get_or_insert_with(String::new).push_str(&text);
                        }
                    } else if in_formula {
                        if let Some(formula) = cell.as_mut().and_then(|c| c.formula.as_mut()) {
                            formula.push_str(&text);
                        }
                    } else if let Some(builder) = inline.as_mut() {
                        builder.text(&text);
                    }
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"v" => in_value = false,
                    b"f" => in_formula = false,
                    b"is" => {
                        if let (Some(mut builder), Some(c)) = (inline.take(), cell.as_mut()) {
                            c.inline = Some(builder.finish());
                        }
                    }
                    b"c" => {
                        if let Some(pending) = cell.take() {
                            Self::apply_or_warn(workbook, sheet, pending, shared_strings, xf_map, options);
                        }
                    }
                    name => {
                        if let Some(builder) = inline.as_mut() {
                            builder.end(name);
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }
        drop(xml_reader);

        for reference in merges {
            let merged = CellRange::parse(&reference).and_then(|range| {
                workbook
                    .worksheet_mut(sheet)
                    .ok_or(tally_core::Error::SheetOutOfBounds(sheet, 0))?
                    .merge_cells(&range)
            });
            if let Err(e) = merged {
                log::warn!("skipping merge {}: {}", reference, e);
            }
        }

        for (reference, id) in hyperlinks {
            let target = sheet_rels
                .iter()
                .find(|r| r.id == id && r.kind == RelationshipKind::Hyperlink)
                .map(|r| r.target.clone());
            let linked = match target {
                Some(target) => workbook
                    .cell_mut(sheet, &reference)
                    .and_then(|mut c| c.set_hyperlink(&target)),
                None => Err(tally_core::Error::Other(format!("no relationship {}", id))),
            };
            if let Err(e) = linked {
                log::warn!("cannot attach hyperlink at {}: {}", reference, e);
            }
        }

        if let Some(rel) = sheet_rels
            .iter()
            .find(|r| r.kind == RelationshipKind::Comments)
        {
            let comments_path = resolve_target(path, &rel.target);
            for comment in Self::read_comments(archive, &comments_path)? {
                let mut cell = workbook.cell_mut_at(sheet, comment.address)?;
                let note = cell.comment();
                note.set_text(comment.text);
                note.set_author(comment.author);
            }
        }

        log::debug!("read part {}", path);
        Ok(())
    }

    fn apply_or_warn(
        workbook: &mut Workbook,
        sheet: usize,
        pending: PendingCell,
        shared_strings: &[RichText],
        xf_map: &XfMap,
        options: &LoadOptions,
    ) {
        let address = pending.address;
        if let Err(e) = Self::apply_cell(workbook, sheet, pending, shared_strings, xf_map, options) {
            log::warn!("skipping value of {}: {}", address, e);
        }
    }

    /// Read a comments part into (cell, text, author) entries
    fn read_comments<R: Read + Seek>(
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> XlsxResult<Vec<PendingComment>> {
        let mut comments = Vec::new();
        let file = match archive.by_name(path) {
            Ok(f) => f,
            Err(_) => {
                log::warn!("comments part {} is missing", path);
                return Ok(comments);
            }
        };

        let mut xml_reader = text_reader(BufReader::new(file));
        let mut buf = Vec::new();
        let mut authors: Vec<String> = Vec::new();
        let mut author: Option<String> = None;
        let mut current: Option<(CellAddress, usize)> = None;
        let mut builder = RichTextBuilder::default();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"author" => author = Some(String::new()),
                    b"comment" => {
                        let address = attr(&e, b"ref").map(|r| CellAddress::parse(&r));
                        match address {
                            Some(Ok(address)) => {
                                current = Some((address, parse_attr(&e, b"authorId").unwrap_or(0)));
                            }
                            _ => log::warn!("skipping comment with a bad reference"),
                        }
                    }
                    _ if current.is_some() => builder.start(&e),
                    _ => {}
                },
                Ok(Event::Text(e)) => {
                    let text = e.unescape()?;
                    match author.as_mut() {
                        Some(name) => name.push_str(&text),
                        None => builder.text(&text),
                    }
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"author" => {
                        if let Some(name) = author.take() {
                            authors.push(name);
                        }
                    }
                    b"comment" => {
                        if let Some((address, author_id)) = current.take() {
                            comments.push(PendingComment {
                                address,
                                text: builder.finish().plain_text(),
                                author: authors.get(author_id).cloned().unwrap_or_default(),
                            });
                        }
                    }
                    name if current.is_some() => builder.end(name),
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.local_name().as_ref() == b"author" => {
                    authors.push(String::new());
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        log::debug!("read {} comments from {}", comments.len(), path);
        Ok(comments)
    }
}
