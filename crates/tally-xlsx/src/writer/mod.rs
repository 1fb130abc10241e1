//! XLSX writer

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use chrono::NaiveDateTime;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{XlsxError, XlsxResult};
use crate::styles::{write_color, XlsxStyleTable};
use crate::xml::{escape_attr, escape_text, text_element, XML_DECLARATION};
use tally_core::package::{content_types, parts};
use tally_core::{
    CellAddress, CellData, CellValue, Calendar, RelationshipKind, Relationships, RichText,
    TargetMode, Workbook, Worksheet,
};

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PACKAGE_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a workbook to a file path
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        Self::write(workbook, file)
    }

    /// Write a workbook to a writer
    pub fn write<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<()> {
        let mut zip = ZipWriter::new(writer);

        // Build a workbook-wide style table.
        let style_table = XlsxStyleTable::build(workbook);

        Self::write_content_types(&mut zip, workbook)?;
        Self::write_rels(&mut zip, parts::ROOT_RELS, workbook.root_relationships())?;
        Self::write_core_properties(&mut zip, workbook)?;
        Self::write_app_properties(&mut zip, workbook)?;
        Self::write_workbook_xml(&mut zip, workbook)?;
        Self::write_rels(&mut zip, parts::WORKBOOK_RELS, workbook.relationships())?;
        Self::write_part(
            &mut zip,
            parts::STYLES,
            &style_table.to_styles_xml(workbook.stylesheet()),
        )?;
        if workbook.manifest().has_override(parts::SHARED_STRINGS) {
            Self::write_shared_strings(&mut zip, workbook)?;
        }

        for sheet in workbook.worksheets() {
            let mut relationships = sheet.relationships().clone();
            // Comments are linked from the sheet, their VML drawing from `legacyDrawing`
            let vml_rel = if sheet.comment_count() > 0 {
                let id = sheet.id().0;
                relationships.add(
                    RelationshipKind::Comments,
                    format!("../comments{}.xml", id),
                    TargetMode::Internal,
                );
                Some(relationships.add(
                    RelationshipKind::VmlDrawing,
                    format!("../drawings/vmlDrawing{}.vml", id),
                    TargetMode::Internal,
                ))
            } else {
                None
            };

            let part = format!("xl/{}", sheet.part_target());
            let xml = Self::worksheet_xml(workbook, sheet, &style_table, vml_rel.as_deref());
            Self::write_part(&mut zip, &part, &xml)?;

            if !relationships.is_empty() {
                Self::write_rels(&mut zip, &crate::xml::rels_part(&part), &relationships)?;
            }
            if vml_rel.is_some() {
                Self::write_comments(&mut zip, sheet)?;
            }
        }

        zip.finish()?;
        log::debug!("wrote workbook with {} sheets", workbook.sheet_count());
        Ok(())
    }

    fn write_part<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        name: &str,
        content: &str,
    ) -> XlsxResult<()> {
        zip.start_file(name, SimpleFileOptions::default())?;
        zip.write_all(content.as_bytes())?;
        log::debug!("wrote part {} ({} bytes)", name, content.len());
        Ok(())
    }

    fn write_content_types<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let commented: Vec<&Worksheet> = workbook
            .worksheets()
            .filter(|sheet| sheet.comment_count() > 0)
            .collect();

        let mut content = String::from(XML_DECLARATION);
        content.push_str(
            "\n<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
        );
        for (extension, content_type) in workbook.manifest().defaults() {
            content.push_str(&format!(
                "\n    <Default Extension=\"{}\" ContentType=\"{}\"/>",
                escape_attr(extension),
                escape_attr(content_type)
            ));
        }
        let has_vml_default = workbook.manifest().defaults().any(|(ext, _)| ext == "vml");
        if !commented.is_empty() && !has_vml_default {
            content.push_str(&format!(
                "\n    <Default Extension=\"vml\" ContentType=\"{}\"/>",
                content_types::VML_DRAWING
            ));
        }
        for (part, content_type) in workbook.manifest().overrides() {
            content.push_str(&format!(
                "\n    <Override PartName=\"{}\" ContentType=\"{}\"/>",
                escape_attr(part),
                escape_attr(content_type)
            ));
        }

        // Add content type for comments files
        for sheet in commented {
            content.push_str(&format!(
                "\n    <Override PartName=\"/xl/comments{}.xml\" ContentType=\"{}\"/>",
                sheet.id().0,
                content_types::COMMENTS
            ));
        }
        content.push_str("\n</Types>");

        Self::write_part(zip, parts::CONTENT_TYPES, &content)
    }

    fn write_rels<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        name: &str,
        relationships: &Relationships,
    ) -> XlsxResult<()> {
        let mut content = String::from(XML_DECLARATION);
        content.push_str(&format!("\n<Relationships xmlns=\"{}\">", PACKAGE_REL_NS));
        for rel in relationships.iter() {
            let mode = if rel.is_external() {
                " TargetMode=\"External\""
            } else {
                ""
            };
            content.push_str(&format!(
                "\n    <Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"{}/>",
                escape_attr(&rel.id),
                escape_attr(&rel.kind.type_uri()),
                escape_attr(&rel.target),
                mode
            ));
        }
        content.push_str("\n</Relationships>");
        Self::write_part(zip, name, &content)
    }

    fn w3cdtf(value: Option<NaiveDateTime>) -> String {
        value
            .unwrap_or_else(|| chrono::Utc::now().naive_utc())
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string()
    }

    fn write_core_properties<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let props = workbook.properties();
        let mut content = String::from(XML_DECLARATION);
        content.push_str(
            "\n<cp:coreProperties xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:dcterms=\"http://purl.org/dc/terms/\" xmlns:dcmitype=\"http://purl.org/dc/dcmitype/\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">",
        );
        if let Some(title) = &props.title {
            content.push_str(&format!("\n    <dc:title>{}</dc:title>", escape_text(title)));
        }
        content.push_str(&format!(
            "\n    <dc:creator>{}</dc:creator>",
            escape_text(&props.creator)
        ));
        content.push_str(&format!(
            "\n    <cp:lastModifiedBy>{}</cp:lastModifiedBy>",
            escape_text(&props.last_modified_by)
        ));
        content.push_str(&format!(
            "\n    <dcterms:created xsi:type=\"dcterms:W3CDTF\">{}</dcterms:created>",
            Self::w3cdtf(props.created)
        ));
        content.push_str(&format!(
            "\n    <dcterms:modified xsi:type=\"dcterms:W3CDTF\">{}</dcterms:modified>",
            Self::w3cdtf(props.modified)
        ));
        content.push_str("\n</cp:coreProperties>");
        Self::write_part(zip, parts::CORE, &content)
    }

    fn write_app_properties<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let titles = workbook.sheet_titles();
        let mut content = String::from(XML_DECLARATION);
        content.push_str(
            "\n<Properties xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/extended-properties\" xmlns:vt=\"http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes\">",
        );
        content.push_str("\n    <Application>tally</Application>");
        content.push_str(&format!(
            "\n    <HeadingPairs><vt:vector size=\"2\" baseType=\"variant\"><vt:variant><vt:lpstr>Worksheets</vt:lpstr></vt:variant><vt:variant><vt:i4>{}</vt:i4></vt:variant></vt:vector></HeadingPairs>",
            titles.len()
        ));
        content.push_str(&format!(
            "\n    <TitlesOfParts><vt:vector size=\"{}\" baseType=\"lpstr\">",
            titles.len()
        ));
        for title in titles {
            content.push_str(&format!("<vt:lpstr>{}</vt:lpstr>", escape_text(title)));
        }
        content.push_str("</vt:vector></TitlesOfParts>");
        content.push_str("\n</Properties>");
        Self::write_part(zip, parts::APP, &content)
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let mut content = String::from(XML_DECLARATION);
        content.push_str(&format!(
            "\n<workbook xmlns=\"{}\" xmlns:r=\"{}\">",
            MAIN_NS, REL_NS
        ));
        match workbook.calendar() {
            Calendar::Mac1904 => content.push_str("\n    <workbookPr date1904=\"1\"/>"),
            Calendar::Windows1900 => content.push_str("\n    <workbookPr/>"),
        }
        content.push_str(&format!(
            "\n    <bookViews><workbookView activeTab=\"{}\"/></bookViews>",
            workbook.active_sheet()
        ));

        content.push_str("\n    <sheets>");
        for sheet in workbook.worksheets() {
            let rel = workbook
                .relationships()
                .find_target(&sheet.part_target())
                .ok_or_else(|| XlsxError::missing(sheet.part_target()))?;
            content.push_str(&format!(
                "\n        <sheet name=\"{}\" sheetId=\"{}\" r:id=\"{}\"/>",
                escape_attr(sheet.title()),
                sheet.id().0,
                escape_attr(&rel.id)
            ));
        }
        content.push_str("\n    </sheets>");

        let named_ranges = workbook.named_ranges();
        if !named_ranges.is_empty() {
            content.push_str("\n    <definedNames>");
            for (sheet_index, range) in named_ranges {
                let title = workbook
                    .worksheet(sheet_index)
                    .map(Worksheet::title)
                    .unwrap_or_default();
                content.push_str(&format!(
                    "\n        <definedName name=\"{}\">{}</definedName>",
                    escape_attr(range.name()),
                    escape_text(&range.refers_to(title))
                ));
            }
            content.push_str("\n    </definedNames>");
        }

        content.push_str("\n    <calcPr calcId=\"124519\" fullCalcOnLoad=\"1\"/>");
        content.push_str("\n</workbook>");
        Self::write_part(zip, parts::WORKBOOK, &content)
    }

    /// `<t>` for plain text, `<r>` runs with their properties otherwise
    fn rich_text_xml(text: &RichText) -> String {
        if text.is_plain() {
            return text_element(&text.plain_text());
        }
        let mut xml = String::new();
        for run in text.runs() {
            xml.push_str("<r>");
            if run.has_formatting() {
                xml.push_str("<rPr>");
                if let Some(font) = &run.font {
                    xml.push_str(&format!("<rFont val=\"{}\"/>", escape_attr(font)));
                }
                if let Some(family) = run.family {
                    xml.push_str(&format!("<family val=\"{}\"/>", family));
                }
                if let Some(color) = &run.color {
                    xml.push_str(&write_color("color", color));
                }
                if let Some(size) = run.size {
                    xml.push_str(&format!("<sz val=\"{}\"/>", size));
                }
                if let Some(scheme) = &run.scheme {
                    xml.push_str(&format!("<scheme val=\"{}\"/>", escape_attr(scheme)));
                }
                xml.push_str("</rPr>");
            }
            xml.push_str(&text_element(&run.text));
            xml.push_str("</r>");
        }
        xml
    }

    fn write_shared_strings<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let table = workbook.shared_strings();
        let mut content = String::from(XML_DECLARATION);
        content.push_str(&format!(
            "\n<sst xmlns=\"{}\" count=\"{}\" uniqueCount=\"{}\">",
            MAIN_NS,
            table.len(),
            table.len()
        ));
        for text in table.iter() {
            content.push_str("\n    <si>");
            content.push_str(&Self::rich_text_xml(text));
            content.push_str("</si>");
        }
        content.push_str("\n</sst>");
        Self::write_part(zip, parts::SHARED_STRINGS, &content)
    }

    fn number_text(n: f64) -> String {
        format!("{}", n)
    }

    /// Type attribute and `<v>` for a plain value; `None` for empty cells
    fn value_xml(workbook: &Workbook, value: &CellValue) -> Option<(&'static str, String)> {
        match value {
            CellValue::Empty => None,
            CellValue::Boolean(b) => Some((" t=\"b\"", format!("<v>{}</v>", u8::from(*b)))),
            CellValue::Number(n) if n.is_finite() => {
                Some(("", format!("<v>{}</v>", Self::number_text(*n))))
            }
            CellValue::Number(_) => Some((" t=\"e\"", "<v>#NUM!</v>".to_string())),
            CellValue::Error(e) => Some((" t=\"e\"", format!("<v>{}</v>", e.as_str()))),
            CellValue::Text(text) => match workbook.shared_strings().index_of(text) {
                Some(index) => Some((" t=\"s\"", format!("<v>{}</v>", index))),
                None => Some((
                    " t=\"inlineStr\"",
                    format!("<is>{}</is>", Self::rich_text_xml(text)),
                )),
            },
            CellValue::Formula { .. } => None,
        }
    }

    fn cell_xml(
        workbook: &Workbook,
        address: CellAddress,
        cell: &CellData,
        style_table: &XlsxStyleTable,
    ) -> String {
        let xf_id = style_table.xf_id_for(cell);
        let style_attr = if xf_id != 0 {
            format!(" s=\"{}\"", xf_id)
        } else {
            String::new()
        };
        let reference = address.to_a1_string();

        match &cell.value {
            CellValue::Formula { text, cached_value } => {
                let (type_attr, value) = match cached_value.as_deref() {
                    Some(CellValue::Text(t)) => (
                        " t=\"str\"",
                        format!("<v>{}</v>", escape_text(&t.plain_text())),
                    ),
                    Some(cached) => Self::value_xml(workbook, cached).unwrap_or(("", String::new())),
                    None => ("", String::new()),
                };
                format!(
                    "<c r=\"{}\"{}{}><f>{}</f>{}</c>",
                    reference,
                    style_attr,
                    type_attr,
                    escape_text(text),
                    value
                )
            }
            value => match Self::value_xml(workbook, value) {
                Some((type_attr, value)) => format!(
                    "<c r=\"{}\"{}{}>{}</c>",
                    reference, style_attr, type_attr, value
                ),
                // Preserve style-only cells
                None => format!("<c r=\"{}\"{}/>", reference, style_attr),
            },
        }
    }

    fn worksheet_xml(
        workbook: &Workbook,
        sheet: &Worksheet,
        style_table: &XlsxStyleTable,
        vml_rel: Option<&str>,
    ) -> String {
        let mut content = String::from(XML_DECLARATION);
        content.push_str(&format!(
            "\n<worksheet xmlns=\"{}\" xmlns:r=\"{}\">",
            MAIN_NS, REL_NS
        ));

        let dimension = sheet
            .dimensions()
            .map_or_else(|| "A1".to_string(), |range| range.to_a1_string());
        content.push_str(&format!("\n    <dimension ref=\"{}\"/>", dimension));

        let selected = workbook
            .worksheets()
            .position(|ws| ws.id() == sheet.id())
            .map_or(false, |i| i == workbook.active_sheet());
        let tab_selected = if selected { " tabSelected=\"1\"" } else { "" };
        content.push_str(&format!(
            "\n    <sheetViews><sheetView{} workbookViewId=\"0\"/></sheetViews>",
            tab_selected
        ));
        content.push_str("\n    <sheetFormatPr defaultRowHeight=\"15\"/>");

        let columns: Vec<_> = sheet.column_properties().collect();
        if !columns.is_empty() {
            content.push_str("\n    <cols>");
            for (col, props) in columns {
                let mut attrs = format!(" min=\"{}\" max=\"{}\"", col + 1, col + 1);
                if let Some(width) = props.width {
                    attrs.push_str(&format!(" width=\"{}\" customWidth=\"1\"", width));
                }
                if props.hidden {
                    attrs.push_str(" hidden=\"1\"");
                }
                content.push_str(&format!("\n        <col{}/>", attrs));
            }
            content.push_str("\n    </cols>");
        }

        // Rows with written cells or custom settings, in order
        let mut rows: BTreeMap<u32, Vec<(CellAddress, &CellData)>> = BTreeMap::new();
        for (address, cell) in sheet.iter_cells() {
            if cell.garbage_collectible() && cell.style_id.is_none() {
                continue;
            }
            rows.entry(address.row).or_default().push((address, cell));
        }
        for (row, _) in sheet.row_properties() {
            rows.entry(row).or_default();
        }

        if rows.is_empty() {
            content.push_str("\n    <sheetData/>");
        } else {
            content.push_str("\n    <sheetData>");
            for (row, cells) in rows {
                let mut attrs = format!(" r=\"{}\"", row + 1);
                if let Some(height) = sheet.row_height(row) {
                    attrs.push_str(&format!(" ht=\"{}\" customHeight=\"1\"", height));
                }
                if sheet.is_row_hidden(row) {
                    attrs.push_str(" hidden=\"1\"");
                }
                if cells.is_empty() {
                    content.push_str(&format!("\n        <row{}/>", attrs));
                    continue;
                }
                content.push_str(&format!("\n        <row{}>", attrs));
                for (address, cell) in cells {
                    content.push_str("\n            ");
                    content.push_str(&Self::cell_xml(workbook, address, cell, style_table));
                }
                content.push_str("\n        </row>");
            }
            content.push_str("\n    </sheetData>");
        }

        // Write merged cells (if any)
        let merged = sheet.merged_ranges();
        if !merged.is_empty() {
            content.push_str(&format!("\n    <mergeCells count=\"{}\">", merged.len()));
            for range in merged {
                content.push_str(&format!("\n        <mergeCell ref=\"{}\"/>", range));
            }
            content.push_str("\n    </mergeCells>");
        }

        let hyperlinks: Vec<_> = sheet.hyperlinks().collect();
        if !hyperlinks.is_empty() {
            content.push_str("\n    <hyperlinks>");
            for (address, rel) in hyperlinks {
                content.push_str(&format!(
                    "\n        <hyperlink ref=\"{}\" r:id=\"{}\"/>",
                    address,
                    escape_attr(&rel.id)
                ));
            }
            content.push_str("\n    </hyperlinks>");
        }

        content.push_str(
            "\n    <pageMargins left=\"0.7\" right=\"0.7\" top=\"0.75\" bottom=\"0.75\" header=\"0.3\" footer=\"0.3\"/>",
        );
        if let Some(id) = vml_rel {
            content.push_str(&format!("\n    <legacyDrawing r:id=\"{}\"/>", escape_attr(id)));
        }
        content.push_str("\n</worksheet>");
        content
    }

    /// Write the comments part and its VML drawing for a worksheet
    fn write_comments<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        sheet: &Worksheet,
    ) -> XlsxResult<()> {
        let id = sheet.id().0;
        let authors = sheet.comment_authors();

        let mut content = String::from(XML_DECLARATION);
        content.push_str(&format!("\n<comments xmlns=\"{}\">", MAIN_NS));
        content.push_str("\n    <authors>");
        for author in &authors {
            content.push_str(&format!("\n        <author>{}</author>", escape_text(author)));
        }
        content.push_str("\n    </authors>");
        content.push_str("\n    <commentList>");
        for (address, comment) in sheet.comments() {
            let author_id = authors
                .iter()
                .position(|a| *a == comment.author())
                .unwrap_or(0);
            content.push_str(&format!(
                "\n        <comment ref=\"{}\" authorId=\"{}\"><text><r>{}</r></text></comment>",
                address,
                author_id,
                text_element(comment.text())
            ));
        }
        content.push_str("\n    </commentList>");
        content.push_str("\n</comments>");
        Self::write_part(zip, &format!("xl/comments{}.xml", id), &content)?;

        let mut vml = String::from(
            "<xml xmlns:v=\"urn:schemas-microsoft-com:vml\" xmlns:o=\"urn:schemas-microsoft-com:office:office\" xmlns:x=\"urn:schemas-microsoft-com:office:excel\">",
        );
        vml.push_str(
            "\n <o:shapelayout v:ext=\"edit\"><o:idmap v:ext=\"edit\" data=\"1\"/></o:shapelayout>",
        );
        vml.push_str(
            "\n <v:shapetype id=\"_x0000_t202\" coordsize=\"21600,21600\" o:spt=\"202\" path=\"m,l,21600r21600,l21600,xe\"><v:stroke joinstyle=\"miter\"/><v:path gradientshapeok=\"t\" o:connecttype=\"rect\"/></v:shapetype>",
        );
        for (n, (address, comment)) in sheet.comments().enumerate() {
            let visibility = if comment.visible() { "visible" } else { "hidden" };
            let visible_flag = if comment.visible() { "<x:Visible/>" } else { "" };
            vml.push_str(&format!(
                "\n <v:shape id=\"_x0000_s{}\" type=\"#_x0000_t202\" style=\"position:absolute;margin-left:59.25pt;margin-top:1.5pt;width:108pt;height:59.25pt;z-index:{};visibility:{}\" fillcolor=\"#ffffe1\" o:insetmode=\"auto\"><v:fill color2=\"#ffffe1\"/><v:shadow on=\"t\" color=\"black\" obscured=\"t\"/><v:path o:connecttype=\"none\"/><v:textbox style=\"mso-direction-alt:auto\"><div style=\"text-align:left\"></div></v:textbox><x:ClientData ObjectType=\"Note\"><x:MoveWithCells/><x:SizeWithCells/><x:AutoFill>False</x:AutoFill><x:Row>{}</x:Row><x:Column>{}</x:Column>{}</x:ClientData></v:shape>",
                1024 + n,
                n + 1,
                visibility,
                address.row,
                address.col,
                visible_flag
            ));
        }
        vml.push_str("\n</xml>");
        Self::write_part(zip, &format!("xl/drawings/vmlDrawing{}.vml", id), &vml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Read};
    use tally_core::{Format, FontStyle, TextRun};

    fn write(workbook: &Workbook) -> zip::ZipArchive<Cursor<Vec<u8>>> {
        let mut buffer = Cursor::new(Vec::new());
        XlsxWriter::write(workbook, &mut buffer).unwrap();
        zip::ZipArchive::new(Cursor::new(buffer.into_inner())).unwrap()
    }

    fn part(archive: &mut zip::ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut content = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    #[test]
    fn test_minimal_package() {
        let workbook = Workbook::new();
        let mut archive = write(&workbook);
        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "docProps/app.xml",
            "xl/workbook.xml",
            "xl/_rels/workbook.xml.rels",
            "xl/styles.xml",
            "xl/worksheets/sheet1.xml",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing {}", name);
        }
        assert!(archive.by_name("xl/sharedStrings.xml").is_err());

        let types = part(&mut archive, "[Content_Types].xml");
        assert!(types.contains("PartName=\"/xl/worksheets/sheet1.xml\""));
        let sheet = part(&mut archive, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("<dimension ref=\"A1\"/>"));
        assert!(sheet.contains("<sheetData/>"));
    }

    #[test]
    fn test_cell_values() {
        let mut workbook = Workbook::new();
        workbook.cell_mut(0, "A1").unwrap().set_value("shared").unwrap();
        workbook.cell_mut(0, "B1").unwrap().set_value(2.5).unwrap();
        workbook.cell_mut(0, "C1").unwrap().set_value(true).unwrap();
        workbook.cell_mut(0, "D1").unwrap().set_error("#DIV/0!").unwrap();
        workbook.cell_mut(0, "A2").unwrap().set_formula("=SUM(B1:B1)").unwrap();
        workbook
            .cell_mut(0, "B2")
            .unwrap()
            .set_formula_with_cached("A1", CellValue::text("shared"))
            .unwrap();

        let mut archive = write(&workbook);
        let sheet = part(&mut archive, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("<c r=\"A1\" t=\"s\"><v>0</v></c>"));
        assert!(sheet.contains("<c r=\"B1\"><v>2.5</v></c>"));
        assert!(sheet.contains("<c r=\"C1\" t=\"b\"><v>1</v></c>"));
        assert!(sheet.contains("<c r=\"D1\" t=\"e\"><v>#DIV/0!</v></c>"));
        assert!(sheet.contains("<c r=\"A2\"><f>SUM(B1:B1)</f></c>"));
        assert!(sheet.contains("<c r=\"B2\" t=\"str\"><f>A1</f><v>shared</v></c>"));
        assert!(sheet.contains("<dimension ref=\"A1:D2\"/>"));

        let strings = part(&mut archive, "xl/sharedStrings.xml");
        assert!(strings.contains("<si><t>shared</t></si>"));
    }

    #[test]
    fn test_rich_text_runs() {
        let text = RichText::from_runs(vec![
            TextRun::new("bold ").with_font("Calibri").with_size(12.0),
            TextRun::new("plain"),
        ]);
        assert_eq!(
            XlsxWriter::rich_text_xml(&text),
            "<r><rPr><rFont val=\"Calibri\"/><sz val=\"12\"/></rPr><t xml:space=\"preserve\">bold </t></r><r><t>plain</t></r>"
        );
        assert_eq!(XlsxWriter::rich_text_xml(&RichText::plain("a&b")), "<t>a&amp;b</t>");
    }

    #[test]
    fn test_styled_empty_cell_kept() {
        let mut workbook = Workbook::new();
        workbook
            .cell_mut(0, "C3")
            .unwrap()
            .set_format(Format::new().with_font(FontStyle::new().with_bold(true)));
        let mut archive = write(&workbook);
        let sheet = part(&mut archive, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("<c r=\"C3\" s=\"1\"/>"));
        let styles = part(&mut archive, "xl/styles.xml");
        assert!(styles.contains("<cellXfs count=\"2\">"));
    }

    #[test]
    fn test_workbook_parts() {
        let mut workbook = Workbook::new();
        workbook.create_sheet_with_title("Data & Notes").unwrap();
        workbook.set_active_sheet(1).unwrap();
        workbook.set_calendar(Calendar::Mac1904);
        workbook.create_named_range("totals", 1, "A1:B2").unwrap();

        let mut archive = write(&workbook);
        let xml = part(&mut archive, "xl/workbook.xml");
        assert!(xml.contains("<workbookPr date1904=\"1\"/>"));
        assert!(xml.contains("<workbookView activeTab=\"1\"/>"));
        assert!(xml.contains("<sheet name=\"Data &amp; Notes\" sheetId=\"2\" r:id=\""));
        assert!(xml.contains("<definedName name=\"totals\">'Data &amp; Notes'!$A$1:$B$2</definedName>"));

        let rels = part(&mut archive, "xl/_rels/workbook.xml.rels");
        assert!(rels.contains("Target=\"worksheets/sheet2.xml\""));
        assert!(rels.contains("Target=\"styles.xml\""));
    }

    #[test]
    fn test_hyperlinks_and_comments() {
        let mut workbook = Workbook::new();
        {
            let mut cell = workbook.cell_mut(0, "A1").unwrap();
            cell.set_hyperlink("https://example.com/?a=1&b=2").unwrap();
        }
        {
            let mut cell = workbook.cell_mut(0, "B2").unwrap();
            let comment = cell.comment();
            comment.set_text("Check <this>");
            comment.set_author("Ada");
        }

        let mut archive = write(&workbook);
        let sheet = part(&mut archive, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("<hyperlink ref=\"A1\" r:id=\"rId1\"/>"));
        assert!(sheet.contains("<legacyDrawing r:id=\"rId3\"/>"));

        let rels = part(&mut archive, "xl/worksheets/_rels/sheet1.xml.rels");
        assert!(rels.contains("Target=\"https://example.com/?a=1&amp;b=2\" TargetMode=\"External\""));
        assert!(rels.contains("Target=\"../comments1.xml\""));
        assert!(rels.contains("Target=\"../drawings/vmlDrawing1.vml\""));

        let comments = part(&mut archive, "xl/comments1.xml");
        assert!(comments.contains("<author>Ada</author>"));
        assert!(comments.contains("<comment ref=\"B2\" authorId=\"0\"><text><r><t>Check &lt;this&gt;</t></r></text></comment>"));

        let types = part(&mut archive, "[Content_Types].xml");
        assert!(types.contains("PartName=\"/xl/comments1.xml\""));
        assert!(types.contains("Extension=\"vml\""));
        assert!(archive.by_name("xl/drawings/vmlDrawing1.vml").is_ok());
    }

    #[test]
    fn test_row_and_column_settings() {
        let mut workbook = Workbook::new();
        {
            let sheet = workbook.worksheet_mut(0).unwrap();
            sheet.set_row_height(4, 30.0);
            sheet.set_row_hidden(6, true);
            sheet.set_column_width(1, 20.5);
        }
        let mut archive = write(&workbook);
        let sheet = part(&mut archive, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("<col min=\"2\" max=\"2\" width=\"20.5\" customWidth=\"1\"/>"));
        assert!(sheet.contains("<row r=\"5\" ht=\"30\" customHeight=\"1\"/>"));
        assert!(sheet.contains("<row r=\"7\" hidden=\"1\"/>"));
    }
}
