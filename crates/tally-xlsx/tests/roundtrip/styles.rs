//! Formats and named styles that survive a save and load.

use crate::roundtrip;
use pretty_assertions::assert_eq;
use tally_core::style::{BorderLineStyle, Underline};
use tally_core::{
    Alignment, BorderStyle, CellRead, Color, FillStyle, FontStyle, Format, HorizontalAlignment,
    NamedStyle, NumberFormat, Protection, VerticalAlignment, Workbook,
};

#[test]
fn test_cell_format() {
    let format = Format::new()
        .with_number_format(NumberFormat::from_code("#,##0.000"))
        .with_font(
            FontStyle::new()
                .with_name("Arial")
                .with_size(13.0)
                .with_italic(true)
                .with_underline(Underline::Double)
                .with_color(Color::theme(4, 0.4)),
        )
        .with_fill(FillStyle::solid(Color::from_hex("FF336699").unwrap()))
        .with_border(BorderStyle::outline(BorderLineStyle::Medium, Color::BLACK))
        .with_alignment(
            Alignment::new()
                .with_horizontal(HorizontalAlignment::Right)
                .with_vertical(VerticalAlignment::Top)
                .with_wrap(true),
        )
        .with_protection(Protection::unlocked());

    let mut wb = Workbook::new();
    {
        let mut cell = wb.cell_mut(0, "B3").unwrap();
        cell.set_value(1234.5).unwrap();
        cell.set_format(format.clone());
    }

    let loaded = roundtrip(&wb);
    let cell = loaded.cell(0, "B3").unwrap();
    assert!(cell.has_format());
    assert_eq!(cell.format(), format);
    assert_eq!(cell.value::<f64>(), 1234.5);
}

#[test]
fn test_shared_format_written_once() {
    let bold = Format::new().with_font(FontStyle::new().with_bold(true));
    let mut wb = Workbook::new();
    for reference in ["A1", "A2", "C7"] {
        let mut cell = wb.cell_mut(0, reference).unwrap();
        cell.set_value(reference).unwrap();
        cell.set_format(bold.clone());
    }

    let loaded = roundtrip(&wb);
    let ids: Vec<_> = ["A1", "A2", "C7"]
        .iter()
        .map(|r| loaded.cell(0, r).unwrap().format_id())
        .collect();
    assert!(ids[0].is_some());
    assert!(ids.iter().all(|id| *id == ids[0]));
    assert!(loaded.cell(0, "C7").unwrap().font().bold);
}

#[test]
fn test_styled_empty_cell() {
    let mut wb = Workbook::new();
    wb.cell_mut(0, "D4")
        .unwrap()
        .set_format(Format::new().with_fill(FillStyle::solid(Color::YELLOW)));

    let loaded = roundtrip(&wb);
    let cell = loaded.cell(0, "D4").unwrap();
    assert!(!cell.has_value());
    assert_eq!(cell.fill(), FillStyle::solid(Color::YELLOW));
}

#[test]
fn test_named_style() {
    let mut wb = Workbook::new();
    let heading = NamedStyle::new("Heading").with_format(
        Format::new().with_font(FontStyle::new().with_bold(true).with_size(18.0)),
    );
    {
        let mut cell = wb.cell_mut(0, "A1").unwrap();
        cell.set_value("Title").unwrap();
        cell.set_named_style(heading.clone());
    }

    let loaded = roundtrip(&wb);
    assert!(loaded.has_style("Heading"));
    assert!(loaded.has_style("Normal"));
    let cell = loaded.cell(0, "A1").unwrap();
    assert!(cell.has_style());
    assert_eq!(cell.style().unwrap(), &heading);
}
