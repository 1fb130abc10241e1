//! Cell values that survive a save and load.

use crate::{part_text, roundtrip, roundtrip_with, write_bytes};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tally_core::{
    Calendar, CellError, CellRead, CellType, CellValue, Color, NumberFormat, RichText, TextRun,
    Workbook,
};
use tally_xlsx::LoadOptions;

#[test]
fn test_scalar_values() {
    let mut wb = Workbook::new();
    wb.cell_mut(0, "A1").unwrap().set_value("hello").unwrap();
    wb.cell_mut(0, "B1").unwrap().set_value(-12.75).unwrap();
    wb.cell_mut(0, "C1").unwrap().set_value(false).unwrap();
    wb.cell_mut(0, "D1").unwrap().set_error("#N/A").unwrap();
    wb.cell_mut(0, "E1").unwrap().set_value(" padded ").unwrap();

    let loaded = roundtrip(&wb);
    let cell = |r: &str| loaded.cell(0, r).unwrap();
    assert_eq!(cell("A1").value::<String>(), "hello");
    assert_eq!(cell("B1").value::<f64>(), -12.75);
    assert_eq!(cell("C1").data_type(), CellType::Boolean);
    assert_eq!(cell("C1").value::<bool>(), false);
    assert_eq!(cell("D1").error().unwrap(), CellError::Na);
    assert_eq!(cell("E1").value::<String>(), " padded ");
    assert!(!cell("F1").has_value());
}

#[test]
fn test_repeated_strings_share_one_entry() {
    let mut wb = Workbook::new();
    for row in 1..=3 {
        wb.cell_mut(0, &format!("A{}", row)).unwrap().set_value("same").unwrap();
    }
    let bytes = write_bytes(&wb);
    let strings = part_text(&bytes, "xl/sharedStrings.xml");
    assert_eq!(strings.matches("<si>").count(), 1);

    let loaded = roundtrip(&wb);
    assert_eq!(loaded.shared_strings().len(), 1);
    assert_eq!(loaded.cell(0, "A3").unwrap().value::<String>(), "same");
}

#[test]
fn test_text_that_looks_like_a_formula() {
    let mut wb = Workbook::new();
    wb.cell_mut(0, "A1")
        .unwrap()
        .set_text_value(RichText::plain("=not a formula"))
        .unwrap();
    let loaded = roundtrip(&wb);
    let cell = loaded.cell(0, "A1").unwrap();
    assert_eq!(cell.data_type(), CellType::String);
    assert_eq!(cell.value::<String>(), "=not a formula");
}

#[test]
fn test_escaped_characters() {
    let mut wb = Workbook::new();
    wb.cell_mut(0, "A1").unwrap().set_value("a < b & c").unwrap();
    wb.cell_mut(0, "A2").unwrap().set_value("line\r\nnext").unwrap();
    wb.cell_mut(0, "A3").unwrap().set_value("keep _x0041_").unwrap();

    let loaded = roundtrip(&wb);
    assert_eq!(loaded.cell(0, "A1").unwrap().value::<String>(), "a < b & c");
    assert_eq!(loaded.cell(0, "A2").unwrap().value::<String>(), "line\r\nnext");
    assert_eq!(loaded.cell(0, "A3").unwrap().value::<String>(), "keep _x0041_");
}

#[test]
fn test_rich_text() {
    let text = RichText::from_runs(vec![
        TextRun::new("Red ").with_color(Color::RED).with_size(14.0),
        TextRun::new("plain"),
    ]);
    let mut wb = Workbook::new();
    wb.cell_mut(0, "A1").unwrap().set_value(text.clone()).unwrap();

    let loaded = roundtrip(&wb);
    let cell = loaded.cell(0, "A1").unwrap();
    assert_eq!(cell.value::<RichText>(), text);
    assert_eq!(cell.value::<String>(), "Red plain");
}

#[test]
fn test_formulas() {
    let mut wb = Workbook::new();
    wb.cell_mut(0, "A1").unwrap().set_value(2.0).unwrap();
    wb.cell_mut(0, "A2").unwrap().set_formula("=A1*2").unwrap();
    wb.cell_mut(0, "A3")
        .unwrap()
        .set_formula_with_cached("A1*3", CellValue::Number(6.0))
        .unwrap();

    let loaded = roundtrip(&wb);
    assert_eq!(loaded.cell(0, "A2").unwrap().formula().unwrap(), "A1*2");
    let a3 = loaded.cell(0, "A3").unwrap();
    assert_eq!(a3.formula().unwrap(), "A1*3");
    assert_eq!(a3.value::<f64>(), 6.0);

    let cached = roundtrip_with(&wb, &LoadOptions::default().with_data_only(true));
    let a3 = cached.cell(0, "A3").unwrap();
    assert!(!a3.has_formula());
    assert_eq!(a3.value::<f64>(), 6.0);
    assert!(!cached.cell(0, "A2").unwrap().has_value());
}

#[test]
fn test_dates_in_both_calendars() {
    let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    for calendar in [Calendar::Windows1900, Calendar::Mac1904] {
        let mut wb = Workbook::new();
        wb.set_calendar(calendar);
        wb.cell_mut(0, "A1").unwrap().set_value(date).unwrap();

        let loaded = roundtrip(&wb);
        assert_eq!(loaded.calendar(), calendar);
        let cell = loaded.cell(0, "A1").unwrap();
        assert!(cell.is_date());
        assert_eq!(cell.number_format(), NumberFormat::date());
        assert_eq!(cell.value::<NaiveDate>(), date);
    }
}

#[test]
fn test_guess_types_on_load() {
    let mut wb = Workbook::new();
    wb.cell_mut(0, "A1").unwrap().set_value("42").unwrap();

    let plain = roundtrip(&wb);
    assert_eq!(plain.cell(0, "A1").unwrap().data_type(), CellType::String);

    let guessed = roundtrip_with(&wb, &LoadOptions::default().with_guess_types(true));
    assert!(guessed.guess_types());
    assert_eq!(guessed.cell(0, "A1").unwrap().value::<f64>(), 42.0);
}

#[test]
fn test_document_properties() {
    let mut wb = Workbook::new();
    {
        let props = wb.properties_mut();
        props.creator = "Ada".to_string();
        props.title = Some("Ledger".to_string());
        props.created = NaiveDate::from_ymd_opt(2023, 5, 6)
            .unwrap()
            .and_hms_opt(7, 8, 9);
    }
    let loaded = roundtrip(&wb);
    let props = loaded.properties();
    assert_eq!(props.creator, "Ada");
    assert_eq!(props.title.as_deref(), Some("Ledger"));
    assert_eq!(props.created, wb.properties().created);
}
