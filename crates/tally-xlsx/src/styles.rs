//! XLSX styles (styles.xml) read/write helpers

use std::collections::HashMap;
use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};

use crate::error::{XlsxError, XlsxResult};
use crate::xml::{attr, bool_attr, escape_attr, parse_attr, trimmed_reader, XML_DECLARATION};
use tally_core::style::{
    Alignment, BorderEdge, BorderLineStyle, BorderSide, BorderStyle, Color, FillStyle, FontStyle,
    FontVerticalAlign, Format, FormatRecord, GradientStop, GradientType, HorizontalAlignment,
    NamedStyle, NumberFormat, PatternType, Protection, StyleComponents, Stylesheet, Underline,
    VerticalAlignment,
};
use tally_core::{CellData, Workbook};

// === Writing ===

/// Workbook-wide `cellXfs` table.
///
/// A cell's xf is the pair of its format id and named-style id; xf 0 is
/// the default format with the "Normal" style.
#[derive(Debug)]
pub(crate) struct XlsxStyleTable {
    xfs: Vec<(u32, u32)>,
    xf_ids: HashMap<(u32, u32), u32>,
}

impl XlsxStyleTable {
    pub(crate) fn build(workbook: &Workbook) -> Self {
        let mut table = Self {
            xfs: vec![(0, 0)],
            xf_ids: HashMap::from([((0, 0), 0)]),
        };
        for sheet in workbook.worksheets() {
            for (_, cell) in sheet.iter_cells() {
                let key = Self::key(cell);
                if !table.xf_ids.contains_key(&key) {
                    let id = table.xfs.len() as u32;
                    table.xfs.push(key);
                    table.xf_ids.insert(key, id);
                }
            }
        }
        table
    }

    fn key(cell: &CellData) -> (u32, u32) {
        (cell.format_id.unwrap_or(0), cell.style_id.unwrap_or(0))
    }

    pub(crate) fn xf_id_for(&self, cell: &CellData) -> u32 {
        self.xf_ids.get(&Self::key(cell)).copied().unwrap_or(0)
    }

    pub(crate) fn xf_count(&self) -> usize {
        self.xfs.len()
    }

    pub(crate) fn to_styles_xml(&self, stylesheet: &Stylesheet) -> String {
        let components = stylesheet.components();
        let mut xml = String::from(XML_DECLARATION);
        xml.push_str(
            "\n<styleSheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">",
        );

        if !components.number_formats.is_empty() {
            xml.push_str(&format!(
                "\n    <numFmts count=\"{}\">",
                components.number_formats.len()
            ));
            for (id, code) in &components.number_formats {
                xml.push_str(&format!(
                    "\n        <numFmt numFmtId=\"{}\" formatCode=\"{}\"/>",
                    id,
                    escape_attr(code)
                ));
            }
            xml.push_str("\n    </numFmts>");
        }

        xml.push_str(&format!("\n    <fonts count=\"{}\">", components.fonts.len()));
        for font in &components.fonts {
            xml.push_str("\n        ");
            xml.push_str(&write_font(font));
        }
        xml.push_str("\n    </fonts>");

        xml.push_str(&format!("\n    <fills count=\"{}\">", components.fills.len()));
        for fill in &components.fills {
            xml.push_str("\n        ");
            xml.push_str(&write_fill(fill));
        }
        xml.push_str("\n    </fills>");

        xml.push_str(&format!(
            "\n    <borders count=\"{}\">",
            components.borders.len()
        ));
        for border in &components.borders {
            xml.push_str("\n        ");
            xml.push_str(&write_border(border));
        }
        xml.push_str("\n    </borders>");

        xml.push_str(&format!(
            "\n    <cellStyleXfs count=\"{}\">",
            components.styles.len()
        ));
        for record in &components.styles {
            xml.push_str("\n        ");
            xml.push_str(&write_xf(record, &components, None));
        }
        xml.push_str("\n    </cellStyleXfs>");

        xml.push_str(&format!("\n    <cellXfs count=\"{}\">", self.xfs.len()));
        for &(format_id, style_id) in &self.xfs {
            let record = components
                .formats
                .get(format_id as usize)
                .copied()
                .unwrap_or_default();
            xml.push_str("\n        ");
            xml.push_str(&write_xf(&record, &components, Some(style_id)));
        }
        xml.push_str("\n    </cellXfs>");

        xml.push_str(&format!(
            "\n    <cellStyles count=\"{}\">",
            stylesheet.styles().len()
        ));
        for (id, style) in stylesheet.styles().iter().enumerate() {
            let builtin = style
                .builtin_id
                .map_or(String::new(), |b| format!(" builtinId=\"{}\"", b));
            let hidden = if style.hidden { " hidden=\"1\"" } else { "" };
            xml.push_str(&format!(
                "\n        <cellStyle name=\"{}\" xfId=\"{}\"{}{}/>",
                escape_attr(&style.name),
                id,
                builtin,
                hidden
            ));
        }
        xml.push_str("\n    </cellStyles>");

        xml.push_str("\n    <dxfs count=\"0\"/>");
        xml.push_str(
            "\n    <tableStyles count=\"0\" defaultTableStyle=\"TableStyleMedium9\" defaultPivotStyle=\"PivotStyleLight16\"/>",
        );
        xml.push_str("\n</styleSheet>");
        xml
    }
}

pub(crate) fn write_color(tag: &str, color: &Color) -> String {
    match color {
        Color::Auto => format!("<{} auto=\"1\"/>", tag),
        Color::Argb(v) => format!("<{} rgb=\"{:08X}\"/>", tag, v),
        Color::Indexed(i) => format!("<{} indexed=\"{}\"/>", tag, i),
        Color::Theme { index, .. } => match color.tint() {
            Some(tint) => format!("<{} theme=\"{}\" tint=\"{}\"/>", tag, index, tint),
            None => format!("<{} theme=\"{}\"/>", tag, index),
        },
    }
}

fn write_font(font: &FontStyle) -> String {
    let mut xml = String::from("<font>");
    if font.bold {
        xml.push_str("<b/>");
    }
    if font.italic {
        xml.push_str("<i/>");
    }
    if font.strikethrough {
        xml.push_str("<strike/>");
    }
    match font.underline {
        Underline::None => {}
        Underline::Single => xml.push_str("<u/>"),
        other => xml.push_str(&format!("<u val=\"{}\"/>", other.as_str())),
    }
    match font.vertical_align {
        FontVerticalAlign::Baseline => {}
        FontVerticalAlign::Superscript => {
            xml.push_str("<vertAlign val=\"superscript\"/>")
        }
        FontVerticalAlign::Subscript => {
            xml.push_str("<vertAlign val=\"subscript\"/>")
        }
    }
    xml.push_str(&format!("<sz val=\"{}\"/>", font.size));
    if !font.color.is_auto() {
        xml.push_str(&write_color("color", &font.color));
    }
    xml.push_str(&format!("<name val=\"{}\"/>", escape_attr(&font.name)));
    if let Some(family) = font.family {
        xml.push_str(&format!("<family val=\"{}\"/>", family));
    }
    if let Some(scheme) = &font.scheme {
        xml.push_str(&format!("<scheme val=\"{}\"/>", escape_attr(scheme)));
    }
    xml.push_str("</font>");
    xml
}

fn write_fill(fill: &FillStyle) -> String {
    match fill {
        FillStyle::None => "<fill><patternFill patternType=\"none\"/></fill>".to_string(),
        FillStyle::Pattern {
            pattern,
            foreground,
            background,
        } => {
            let mut inner = String::new();
            if let Some(fg) = foreground {
                inner.push_str(&write_color("fgColor", fg));
            }
            if let Some(bg) = background {
                inner.push_str(&write_color("bgColor", bg));
            }
            if inner.is_empty() {
                format!(
                    "<fill><patternFill patternType=\"{}\"/></fill>",
                    pattern.as_str()
                )
            } else {
                format!(
                    "<fill><patternFill patternType=\"{}\">{}</patternFill></fill>",
                    pattern.as_str(),
                    inner
                )
            }
        }
        FillStyle::Gradient {
            gradient_type,
            degree,
            stops,
        } => {
            let kind = match gradient_type {
                GradientType::Linear => String::new(),
                GradientType::Path => " type=\"path\"".to_string(),
            };
            let mut xml = format!("<fill><gradientFill{} degree=\"{}\">", kind, degree);
            for stop in stops {
                xml.push_str(&format!(
                    "<stop position=\"{}\">{}</stop>",
                    stop.position,
                    write_color("color", &stop.color)
                ));
            }
            xml.push_str("</gradientFill></fill>");
            xml
        }
    }
}

fn write_border_edge(tag: &str, edge: Option<&BorderEdge>) -> String {
    match edge {
        Some(edge) if edge.style != BorderLineStyle::None => {
            if edge.color.is_auto() {
                format!("<{} style=\"{}\"/>", tag, edge.style.as_str())
            } else {
                format!(
                    "<{} style=\"{}\">{}</{}>",
                    tag,
                    edge.style.as_str(),
                    write_color("color", &edge.color),
                    tag
                )
            }
        }
        _ => format!("<{}/>", tag),
    }
}

fn write_border(border: &BorderStyle) -> String {
    let mut xml = String::from("<border");
    if border.diagonal_up {
        xml.push_str(" diagonalUp=\"1\"");
    }
    if border.diagonal_down {
        xml.push_str(" diagonalDown=\"1\"");
    }
    xml.push('>');
    for side in BorderSide::ALL {
        xml.push_str(&write_border_edge(side.as_str(), border.side(side)));
    }
    xml.push_str("</border>");
    xml
}

fn write_alignment(al: &Alignment) -> String {
    let mut attrs = String::new();
    if al.horizontal != HorizontalAlignment::General {
        attrs.push_str(&format!(" horizontal=\"{}\"", al.horizontal.as_str()));
    }
    if al.vertical != VerticalAlignment::Bottom {
        attrs.push_str(&format!(" vertical=\"{}\"", al.vertical.as_str()));
    }
    if al.rotation != 0 {
        attrs.push_str(&format!(" textRotation=\"{}\"", al.rotation));
    }
    if al.wrap_text {
        attrs.push_str(" wrapText=\"1\"");
    }
    if al.indent > 0 {
        attrs.push_str(&format!(" indent=\"{}\"", al.indent));
    }
    if al.shrink_to_fit {
        attrs.push_str(" shrinkToFit=\"1\"");
    }
    format!("<alignment{}/>", attrs)
}

fn write_protection(p: &Protection) -> String {
    format!(
        "<protection locked=\"{}\" hidden=\"{}\"/>",
        u8::from(p.locked),
        u8::from(p.hidden)
    )
}

/// One `xf` record. Cell xfs name their named style; style xfs do not.
fn write_xf(record: &FormatRecord, components: &StyleComponents, style_id: Option<u32>) -> String {
    let mut xml = format!(
        "<xf numFmtId=\"{}\" fontId=\"{}\" fillId=\"{}\" borderId=\"{}\"",
        record.number_format_id, record.font_id, record.fill_id, record.border_id
    );
    if let Some(style_id) = style_id {
        xml.push_str(&format!(" xfId=\"{}\"", style_id));
    }
    if record.number_format_id != 0 {
        xml.push_str(" applyNumberFormat=\"1\"");
    }
    if record.font_id != 0 {
        xml.push_str(" applyFont=\"1\"");
    }
    if record.fill_id != 0 {
        xml.push_str(" applyFill=\"1\"");
    }
    if record.border_id != 0 {
        xml.push_str(" applyBorder=\"1\"");
    }

    let alignment = components
        .alignments
        .get(record.alignment_id as usize)
        .filter(|_| record.alignment_id != 0);
    let protection = components
        .protections
        .get(record.protection_id as usize)
        .filter(|_| record.protection_id != 0);
    if alignment.is_some() {
        xml.push_str(" applyAlignment=\"1\"");
    }
    if protection.is_some() {
        xml.push_str(" applyProtection=\"1\"");
    }

    if alignment.is_none() && protection.is_none() {
        xml.push_str("/>");
        return xml;
    }
    xml.push('>');
    if let Some(al) = alignment {
        xml.push_str(&write_alignment(al));
    }
    if let Some(p) = protection {
        xml.push_str(&write_protection(p));
    }
    xml.push_str("</xf>");
    xml
}

// === Reading ===

/// Where each `cellXfs` entry of a file landed in the stylesheet
#[derive(Debug, Default)]
pub(crate) struct XfMap {
    formats: Vec<u32>,
    styles: Vec<Option<u32>>,
}

impl XfMap {
    /// Format id for an xf index, `None` for xf 0 and unknown indices
    pub(crate) fn format_id(&self, xf: u32) -> Option<u32> {
        self.formats.get(xf as usize).copied().filter(|id| *id != 0)
    }

    /// Named-style id for an xf index; `xfId="0"` means no explicit style
    pub(crate) fn style_id(&self, xf: u32) -> Option<u32> {
        self.styles.get(xf as usize).copied().flatten()
    }

    pub(crate) fn contains(&self, xf: u32) -> bool {
        (xf as usize) < self.formats.len()
    }
}

#[derive(Debug, Clone, Default)]
struct ParsedXf {
    num_fmt_id: u32,
    font_id: u32,
    fill_id: u32,
    border_id: u32,
    xf_id: u32,
    alignment: Option<Alignment>,
    protection: Option<Protection>,
}

#[derive(Debug, Clone)]
struct ParsedCellStyle {
    name: String,
    xf_id: u32,
    builtin_id: Option<u32>,
    hidden: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Fonts,
    Fills,
    Borders,
    CellStyleXfs,
    CellXfs,
    Dxfs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FillColorSlot {
    None,
    Foreground,
    Background,
    Stop,
}

/// Everything collected from styles.xml before it is interned
struct StylesParser {
    section: Section,
    number_formats: HashMap<u32, NumberFormat>,
    fonts: Vec<FontStyle>,
    fills: Vec<FillStyle>,
    borders: Vec<BorderStyle>,
    style_xfs: Vec<ParsedXf>,
    cell_xfs: Vec<ParsedXf>,
    cell_styles: Vec<ParsedCellStyle>,

    font: Option<FontStyle>,
    fill: Option<FillStyle>,
    fill_slot: FillColorSlot,
    stop_position: f64,
    border: Option<BorderStyle>,
    border_side: Option<(BorderSide, BorderLineStyle)>,
    border_color: Option<Color>,
    xf: Option<ParsedXf>,
}

impl StylesParser {
    fn new() -> Self {
        Self {
            section: Section::None,
            number_formats: HashMap::new(),
            fonts: Vec::new(),
            fills: Vec::new(),
            borders: Vec::new(),
            style_xfs: Vec::new(),
            cell_xfs: Vec::new(),
            cell_styles: Vec::new(),
            font: None,
            fill: None,
            fill_slot: FillColorSlot::None,
            stop_position: 0.0,
            border: None,
            border_side: None,
            border_color: None,
            xf: None,
        }
    }

    fn start(&mut self, e: &BytesStart<'_>, stylesheet: &mut Stylesheet) {
        let name = e.local_name();
        match (self.section, name.as_ref()) {
            (_, b"fonts") => self.section = Section::Fonts,
            (_, b"fills") => self.section = Section::Fills,
            (_, b"borders") => self.section = Section::Borders,
            (_, b"cellStyleXfs") => self.section = Section::CellStyleXfs,
            (_, b"cellXfs") => self.section = Section::CellXfs,
            (_, b"dxfs") => self.section = Section::Dxfs,
            (Section::Dxfs, _) => {}

            (_, b"numFmt") => {
                let id = parse_attr::<u32>(e, b"numFmtId");
                let code = attr(e, b"formatCode");
                if let (Some(id), Some(code)) = (id, code) {
                    let number_format = stylesheet.register_number_format_with_id(id, &code);
                    self.number_formats.insert(id, number_format);
                }
            }

            (Section::Fonts, b"font") => {
                self.font = Some(FontStyle {
                    color: Color::Auto,
                    family: None,
                    scheme: None,
                    ..FontStyle::default()
                });
            }
            (Section::Fonts, tag) => {
                if let Some(font) = self.font.as_mut() {
                    apply_font_element(font, tag, e);
                }
            }

            (Section::Fills, b"fill") => self.fill = Some(FillStyle::None),
            (Section::Fills, b"patternFill") => {
                let pattern = attr(e, b"patternType")
                    .and_then(|p| PatternType::from_str(&p))
                    .unwrap_or(PatternType::None);
                self.fill = Some(if pattern == PatternType::None {
                    FillStyle::None
                } else {
                    FillStyle::Pattern {
                        pattern,
                        foreground: None,
                        background: None,
                    }
                });
            }
            (Section::Fills, b"gradientFill") => {
                let gradient_type = match attr(e, b"type").as_deref() {
                    Some("path") => GradientType::Path,
                    _ => GradientType::Linear,
                };
                self.fill = Some(FillStyle::Gradient {
                    gradient_type,
                    degree: parse_attr(e, b"degree").unwrap_or(0.0),
                    stops: Vec::new(),
                });
            }
            (Section::Fills, b"fgColor") => self.set_fill_color(FillColorSlot::Foreground, e),
            (Section::Fills, b"bgColor") => self.set_fill_color(FillColorSlot::Background, e),
            (Section::Fills, b"stop") => {
                self.fill_slot = FillColorSlot::Stop;
                self.stop_position = parse_attr(e, b"position").unwrap_or(0.0);
            }
            (Section::Fills, b"color") if self.fill_slot == FillColorSlot::Stop => {
                let color = parse_color(e);
                if let Some(FillStyle::Gradient { stops, .. }) = self.fill.as_mut() {
                    stops.push(GradientStop::new(self.stop_position, color));
                }
            }

            (Section::Borders, b"border") => {
                let mut border = BorderStyle::default();
                border.diagonal_up = bool_attr(e, b"diagonalUp").unwrap_or(false);
                border.diagonal_down = bool_attr(e, b"diagonalDown").unwrap_or(false);
                self.border = Some(border);
            }
            (Section::Borders, b"color") => self.border_color = Some(parse_color(e)),
            (Section::Borders, tag) => {
                let side = match tag {
                    b"left" | b"start" => Some(BorderSide::Left),
                    b"right" | b"end" => Some(BorderSide::Right),
                    b"top" => Some(BorderSide::Top),
                    b"bottom" => Some(BorderSide::Bottom),
                    b"diagonal" => Some(BorderSide::Diagonal),
                    _ => None,
                };
                if let Some(side) = side {
                    let line = attr(e, b"style")
                        .and_then(|s| {
                            let parsed = BorderLineStyle::from_str(&s);
                            if parsed.is_none() {
                                log::warn!("unrecognised border style {:?}", s);
                            }
                            parsed
                        })
                        .unwrap_or(BorderLineStyle::None);
                    self.border_side = Some((side, line));
                    self.border_color = None;
                }
            }

            (Section::CellStyleXfs | Section::CellXfs, b"xf") => {
                self.xf = Some(ParsedXf {
                    num_fmt_id: parse_attr(e, b"numFmtId").unwrap_or(0),
                    font_id: parse_attr(e, b"fontId").unwrap_or(0),
                    fill_id: parse_attr(e, b"fillId").unwrap_or(0),
                    border_id: parse_attr(e, b"borderId").unwrap_or(0),
                    xf_id: parse_attr(e, b"xfId").unwrap_or(0),
                    alignment: None,
                    protection: None,
                });
            }
            (Section::CellStyleXfs | Section::CellXfs, b"alignment") => {
                if let Some(xf) = self.xf.as_mut() {
                    xf.alignment = Some(parse_alignment(e));
                }
            }
            (Section::CellStyleXfs | Section::CellXfs, b"protection") => {
                if let Some(xf) = self.xf.as_mut() {
                    let mut protection = Protection::default();
                    if let Some(locked) = bool_attr(e, b"locked") {
                        protection.locked = locked;
                    }
                    if let Some(hidden) = bool_attr(e, b"hidden") {
                        protection.hidden = hidden;
                    }
                    xf.protection = Some(protection);
                }
            }

            (_, b"cellStyle") => {
                if let (Some(name), Some(xf_id)) = (attr(e, b"name"), parse_attr(e, b"xfId")) {
                    self.cell_styles.push(ParsedCellStyle {
                        name,
                        xf_id,
                        builtin_id: parse_attr(e, b"builtinId"),
                        hidden: bool_attr(e, b"hidden").unwrap_or(false),
                    });
                }
            }
            _ => {}
        }
    }

    fn set_fill_color(&mut self, slot: FillColorSlot, e: &BytesStart<'_>) {
        let color = parse_color(e);
        if let Some(FillStyle::Pattern {
            foreground,
            background,
            ..
        }) = self.fill.as_mut()
        {
            match slot {
                FillColorSlot::Foreground => *foreground = Some(color),
                FillColorSlot::Background => *background = Some(color),
                _ => {}
            }
        }
    }

    fn end(&mut self, name: &[u8]) {
        match (self.section, name) {
            (_, b"fonts" | b"fills" | b"borders" | b"cellStyleXfs" | b"cellXfs" | b"dxfs") => {
                self.section = Section::None;
            }
            (Section::Fonts, b"font") => {
                if let Some(font) = self.font.take() {
                    self.fonts.push(font);
                }
            }
            (Section::Fills, b"fill") => {
                if let Some(fill) = self.fill.take() {
                    self.fills.push(fill);
                }
            }
            (Section::Fills, b"stop") => self.fill_slot = FillColorSlot::None,
            (Section::Borders, b"border") => {
                if let Some(border) = self.border.take() {
                    self.borders.push(border);
                }
            }
            (Section::Borders, b"left" | b"start" | b"right" | b"end" | b"top" | b"bottom" | b"diagonal") => {
                if let (Some(border), Some((side, line))) = (self.border.as_mut(), self.border_side.take()) {
                    let edge = (line != BorderLineStyle::None).then(|| {
                        BorderEdge::new(line, self.border_color.take().unwrap_or_default())
                    });
                    border.set_side(side, edge);
                }
            }
            (Section::CellStyleXfs, b"xf") => {
                if let Some(xf) = self.xf.take() {
                    self.style_xfs.push(xf);
                }
            }
            (Section::CellXfs, b"xf") => {
                if let Some(xf) = self.xf.take() {
                    self.cell_xfs.push(xf);
                }
            }
            _ => {}
        }
    }

    fn resolve(&self, xf: &ParsedXf) -> Format {
        let number_format = self
            .number_formats
            .get(&xf.num_fmt_id)
            .cloned()
            .unwrap_or_else(|| NumberFormat::from_id(xf.num_fmt_id));
        Format {
            number_format,
            font: self.fonts.get(xf.font_id as usize).cloned().unwrap_or_default(),
            fill: self.fills.get(xf.fill_id as usize).cloned().unwrap_or_default(),
            border: self
                .borders
                .get(xf.border_id as usize)
                .cloned()
                .unwrap_or_default(),
            alignment: xf.alignment.clone().unwrap_or_default(),
            protection: xf.protection.unwrap_or_default(),
        }
    }

    /// Intern named styles, then cell formats
    fn finish(self, stylesheet: &mut Stylesheet) -> XfMap {
        let mut style_for_xf: HashMap<u32, u32> = HashMap::new();
        for cell_style in &self.cell_styles {
            let format = match self.style_xfs.get(cell_style.xf_id as usize) {
                Some(xf) => self.resolve(xf),
                None => {
                    log::warn!(
                        "style {:?} points at missing xf {}",
                        cell_style.name,
                        cell_style.xf_id
                    );
                    Format::default()
                }
            };
            let id = stylesheet.add_style(NamedStyle {
                name: cell_style.name.clone(),
                format,
                builtin_id: cell_style.builtin_id,
                hidden: cell_style.hidden,
            });
            style_for_xf.entry(cell_style.xf_id).or_insert(id);
        }

        let mut map = XfMap::default();
        for (index, xf) in self.cell_xfs.iter().enumerate() {
            let format = self.resolve(xf);
            let format_id = if index == 0 {
                stylesheet.set_default_format(format);
                0
            } else {
                stylesheet.add_format(format)
            };
            map.formats.push(format_id);
            let style_id = match xf.xf_id {
                0 => None,
                xf_id => style_for_xf.get(&xf_id).copied(),
            };
            map.styles.push(style_id);
        }
        log::debug!(
            "read {} cell formats and {} named styles",
            map.formats.len(),
            self.cell_styles.len()
        );
        map
    }
}

fn apply_font_element(font: &mut FontStyle, tag: &[u8], e: &BytesStart<'_>) {
    // a bare <b/> is on; val="0" turns it off
    let flag = || bool_attr(e, b"val").unwrap_or(true);
    match tag {
        b"b" => font.bold = flag(),
        b"i" => font.italic = flag(),
        b"strike" => font.strikethrough = flag(),
        b"u" => {
            font.underline = attr(e, b"val").map_or(Underline::Single, |v| Underline::from_str(&v))
        }
        b"vertAlign" => {
            font.vertical_align = match attr(e, b"val").as_deref() {
                Some("superscript") => FontVerticalAlign::Superscript,
                Some("subscript") => FontVerticalAlign::Subscript,
                _ => FontVerticalAlign::Baseline,
            }
        }
        b"sz" => {
            if let Some(size) = parse_attr(e, b"val") {
                font.size = size;
            }
        }
        b"color" => font.color = parse_color(e),
        b"name" | b"rFont" => {
            if let Some(name) = attr(e, b"val") {
                font.name = name;
            }
        }
        b"family" => font.family = parse_attr(e, b"val"),
        b"scheme" => font.scheme = attr(e, b"val"),
        _ => {}
    }
}

fn parse_alignment(e: &BytesStart<'_>) -> Alignment {
    let mut alignment = Alignment::default();
    if let Some(h) = attr(e, b"horizontal") {
        match HorizontalAlignment::from_str(&h) {
            Some(h) => alignment.horizontal = h,
            None => log::warn!("unrecognised horizontal alignment {:?}", h),
        }
    }
    if let Some(v) = attr(e, b"vertical") {
        match VerticalAlignment::from_str(&v) {
            Some(v) => alignment.vertical = v,
            None => log::warn!("unrecognised vertical alignment {:?}", v),
        }
    }
    alignment.wrap_text = bool_attr(e, b"wrapText").unwrap_or(false);
    alignment.shrink_to_fit = bool_attr(e, b"shrinkToFit").unwrap_or(false);
    alignment.indent = parse_attr(e, b"indent").unwrap_or(0);
    alignment.rotation = parse_attr(e, b"textRotation").unwrap_or(0);
    alignment
}

/// Color from `rgb`, `theme`/`tint`, `indexed` or `auto` attributes
pub(crate) fn parse_color(e: &BytesStart<'_>) -> Color {
    if let Some(rgb) = attr(e, b"rgb") {
        if let Some(color) = Color::from_hex(&rgb) {
            return color;
        }
        log::warn!("unrecognised color {:?}", rgb);
    }
    if let Some(index) = parse_attr::<u32>(e, b"theme") {
        return Color::theme(index, parse_attr(e, b"tint").unwrap_or(0.0));
    }
    if let Some(index) = parse_attr::<u32>(e, b"indexed") {
        return Color::Indexed(index);
    }
    Color::Auto
}

/// Read styles.xml into `stylesheet` and report where each xf landed
pub(crate) fn read_styles_xml<R: Read>(reader: R, stylesheet: &mut Stylesheet) -> XlsxResult<XfMap> {
    let mut xml_reader = trimmed_reader(BufReader::new(reader));
    let mut buf = Vec::new();
    let mut parser = StylesParser::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => parser.start(&e, stylesheet),
            Ok(Event::Empty(e)) => {
                parser.start(&e, stylesheet);
                parser.end(e.local_name().as_ref());
            }
            Ok(Event::End(e)) => parser.end(e.local_name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(parser.finish(stylesheet))
}
