//! End-to-end tests for XLSX roundtrip (create -> save -> read -> verify)

use chrono::{NaiveDate, NaiveTime};
use pretty_assertions::assert_eq;
use std::io::Cursor;
use tally::prelude::*;
use tally::XlsxError;

fn roundtrip(workbook: &Workbook) -> Workbook {
    let mut buffer = Cursor::new(Vec::new());
    workbook.write_to(&mut buffer).unwrap();
    buffer.set_position(0);
    Workbook::from_reader(buffer).unwrap()
}

/// Test basic roundtrip with numeric values
#[test]
fn test_roundtrip_numbers() {
    let mut wb = Workbook::new();
    for (reference, value) in [("A1", 42.0), ("B1", 3.14159), ("C1", -100.5), ("A2", 0.0), ("B2", 1e10)] {
        wb.cell_mut(0, reference).unwrap().set_value(value).unwrap();
    }

    let loaded = roundtrip(&wb);
    assert_eq!(loaded.cell(0, "A1").unwrap().value::<f64>(), 42.0);
    assert!((loaded.cell(0, "B1").unwrap().value::<f64>() - 3.14159).abs() < 1e-10);
    assert_eq!(loaded.cell(0, "C1").unwrap().value::<f64>(), -100.5);
    assert_eq!(loaded.cell(0, "A2").unwrap().data_type(), CellType::Numeric);
    assert_eq!(loaded.cell(0, "B2").unwrap().value::<f64>(), 1e10);
}

/// Test basic roundtrip with string values
#[test]
fn test_roundtrip_strings() {
    let mut wb = Workbook::new();
    wb.cell_mut(0, "A1").unwrap().set_value("Hello, World!").unwrap();
    wb.cell_mut(0, "B1").unwrap().set_value("").unwrap();
    wb.cell_mut(0, "C1").unwrap().set_value("Special: <>&\"'").unwrap();
    wb.cell_mut(0, "A2").unwrap().set_value("Multi\nLine").unwrap();
    wb.cell_mut(0, "B2").unwrap().set_value("Unicode: \u{1F600}").unwrap();

    let loaded = roundtrip(&wb);
    let text = |r: &str| loaded.cell(0, r).unwrap().value::<String>();
    assert_eq!(text("A1"), "Hello, World!");
    assert_eq!(text("B1"), "");
    assert_eq!(text("C1"), "Special: <>&\"'");
    assert_eq!(text("A2"), "Multi\nLine");
    assert_eq!(text("B2"), "Unicode: \u{1F600}");
}

/// Booleans, errors and formulas keep their kind
#[test]
fn test_roundtrip_typed_values() {
    let mut wb = Workbook::new();
    wb.cell_mut(0, "A1").unwrap().set_value(true).unwrap();
    wb.cell_mut(0, "A2").unwrap().set_value(CellError::Div0).unwrap();
    wb.cell_mut(0, "A3").unwrap().set_value("=SUM(A1:A2)").unwrap();

    let loaded = roundtrip(&wb);
    assert_eq!(loaded.cell(0, "A1").unwrap().data_type(), CellType::Boolean);
    assert_eq!(loaded.cell(0, "A2").unwrap().error().unwrap(), CellError::Div0);
    let a3 = loaded.cell(0, "A3").unwrap();
    assert_eq!(a3.data_type(), CellType::Formula);
    assert_eq!(a3.formula().unwrap(), "SUM(A1:A2)");
}

/// Calendar values come back through their number formats
#[test]
fn test_roundtrip_dates_and_times() {
    let date = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
    let time = NaiveTime::from_hms_opt(18, 30, 15).unwrap();
    let mut wb = Workbook::new();
    wb.cell_mut(0, "A1").unwrap().set_value(date).unwrap();
    wb.cell_mut(0, "A2").unwrap().set_value(time).unwrap();
    wb.cell_mut(0, "A3").unwrap().set_value(date.and_time(time)).unwrap();

    let loaded = roundtrip(&wb);
    let a1 = loaded.cell(0, "A1").unwrap();
    assert!(a1.is_date());
    assert_eq!(a1.value::<NaiveDate>(), date);
    let a2 = loaded.cell(0, "A2").unwrap();
    assert_eq!(a2.number_format(), NumberFormat::time());
    assert_eq!(a2.value::<NaiveTime>(), time);
    assert_eq!(
        loaded.cell(0, "A3").unwrap().value::<chrono::NaiveDateTime>(),
        date.and_time(time)
    );
}

/// Formats, hyperlinks and comments on one sheet
#[test]
fn test_roundtrip_decorations() {
    let mut wb = Workbook::new();
    {
        let mut cell = wb.cell_mut(0, "B2").unwrap();
        cell.set_value("Linked").unwrap();
        cell.set_hyperlink("mailto:someone@example.com").unwrap();
        cell.set_format(
            Format::new()
                .with_font(FontStyle::new().with_bold(true))
                .with_fill(FillStyle::solid(Color::BLUE)),
        );
        cell.comment().set_text("Owner: accounts");
    }

    let loaded = roundtrip(&wb);
    let cell = loaded.cell(0, "B2").unwrap();
    assert_eq!(cell.value::<String>(), "Linked");
    assert_eq!(cell.hyperlink().unwrap(), "mailto:someone@example.com");
    assert!(cell.font().bold);
    assert_eq!(cell.fill(), FillStyle::solid(Color::BLUE));
    assert_eq!(cell.comment_text(), Some("Owner: accounts"));
}

/// Test saving through the filesystem
#[test]
fn test_save_and_open_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.xlsx");

    let mut wb = Workbook::new();
    wb.create_sheet_with_title("Totals").unwrap();
    wb.cell_mut(1, "C3").unwrap().set_value(99.5).unwrap();
    wb.save(&path).unwrap();

    let loaded = Workbook::open(&path).unwrap();
    assert_eq!(loaded.sheet_titles(), vec!["Sheet1", "Totals"]);
    assert_eq!(loaded.cell(1, "C3").unwrap().value::<f64>(), 99.5);

    let options = LoadOptions::default().with_data_only(true);
    let loaded = Workbook::open_with_options(&path, &options).unwrap();
    assert!(loaded.data_only());
}

/// Unknown extensions are refused before touching the filesystem
#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let wb = Workbook::new();
    assert!(matches!(wb.save(&path), Err(Error::UnsupportedFormat(_))));
    assert!(!path.exists());
    assert!(matches!(Workbook::open(&path), Err(Error::UnsupportedFormat(_))));
}

/// Missing files surface as XLSX IO errors
#[test]
fn test_open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Workbook::open(dir.path().join("missing.xlsx"));
    assert!(matches!(result, Err(Error::Xlsx(XlsxError::Io(_)))));
}
