//! Sheet structure that survives a save and load.

use crate::{roundtrip, write_bytes};
use pretty_assertions::assert_eq;
use std::io::Cursor;
use tally_core::{CellRange, CellRead, Workbook};
use tally_xlsx::{XlsxError, XlsxReader, XlsxWriter};

#[test]
fn test_sheet_order_titles_and_active_tab() {
    let mut wb = Workbook::new();
    wb.create_sheet_with_title("Q1 & Q2").unwrap();
    wb.create_sheet_with_title("It's mine").unwrap();
    wb.set_active_sheet(2).unwrap();
    wb.cell_mut(2, "A1").unwrap().set_value(3.0).unwrap();

    let loaded = roundtrip(&wb);
    assert_eq!(loaded.sheet_titles(), vec!["Sheet1", "Q1 & Q2", "It's mine"]);
    assert_eq!(loaded.active_sheet(), 2);
    assert_eq!(loaded.cell(2, "A1").unwrap().value::<f64>(), 3.0);
}

#[test]
fn test_merged_cells() {
    let mut wb = Workbook::new();
    wb.cell_mut(0, "A1").unwrap().set_value("wide").unwrap();
    let range = CellRange::parse("A1:C2").unwrap();
    wb.worksheet_mut(0).unwrap().merge_cells(&range).unwrap();

    let loaded = roundtrip(&wb);
    assert_eq!(loaded.worksheet(0).unwrap().merged_ranges(), &[range]);
    assert!(loaded.cell(0, "B2").unwrap().is_merged());
    assert_eq!(loaded.cell(0, "A1").unwrap().value::<String>(), "wide");
}

#[test]
fn test_row_and_column_properties() {
    let mut wb = Workbook::new();
    {
        let ws = wb.worksheet_mut(0).unwrap();
        ws.set_row_height(2, 31.5);
        ws.set_row_hidden(9, true);
        ws.set_column_width(3, 24.0);
        ws.set_column_hidden(5, true);
    }

    let loaded = roundtrip(&wb);
    let ws = loaded.worksheet(0).unwrap();
    assert_eq!(ws.row_height(2), Some(31.5));
    assert!(ws.is_row_hidden(9));
    assert_eq!(ws.column_width(3), Some(24.0));
    assert!(ws.is_column_hidden(5));
    assert!(!ws.is_column_hidden(4));
}

#[test]
fn test_hyperlinks_and_comments() {
    let mut wb = Workbook::new();
    wb.cell_mut(0, "A1")
        .unwrap()
        .set_hyperlink("https://example.com/?q=1&r=2")
        .unwrap();
    {
        let mut cell = wb.cell_mut(0, "C5").unwrap();
        cell.set_value("see note").unwrap();
        let comment = cell.comment();
        comment.set_text("Checked twice");
        comment.set_author("Grace");
    }

    let loaded = roundtrip(&wb);
    let a1 = loaded.cell(0, "A1").unwrap();
    assert_eq!(a1.hyperlink().unwrap(), "https://example.com/?q=1&r=2");
    assert_eq!(a1.value::<String>(), "https://example.com/?q=1&r=2");

    let c5 = loaded.cell(0, "C5").unwrap();
    assert_eq!(c5.comment_text(), Some("Checked twice"));
    assert_eq!(c5.comment_author(), Some("Grace"));
    assert_eq!(loaded.worksheet(0).unwrap().comment_authors(), vec!["Grace"]);
}

#[test]
fn test_named_ranges() {
    let mut wb = Workbook::new();
    wb.create_sheet_with_title("Data Sheet").unwrap();
    wb.create_named_range("inputs", 1, "B2:D9").unwrap();
    wb.create_named_range("corner", 0, "A1").unwrap();

    let loaded = roundtrip(&wb);
    let (sheet, range) = loaded.named_range("inputs").unwrap();
    assert_eq!(sheet, 1);
    assert_eq!(range.range(), CellRange::parse("B2:D9").unwrap());
    let (sheet, range) = loaded.named_range("corner").unwrap();
    assert_eq!(sheet, 0);
    assert_eq!(range.range(), CellRange::parse("A1").unwrap());
}

#[test]
fn test_written_package_reads_twice() {
    let mut wb = Workbook::new();
    wb.cell_mut(0, "A1").unwrap().set_value("stable").unwrap();
    let first = roundtrip(&wb);
    let second = roundtrip(&first);
    assert_eq!(write_bytes(&first).is_empty(), false);
    assert_eq!(second.cell(0, "A1").unwrap().value::<String>(), "stable");
    assert_eq!(second.sheet_titles(), first.sheet_titles());
}

#[test]
fn test_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.xlsx");
    let mut wb = Workbook::new();
    wb.cell_mut(0, "B2").unwrap().set_value(7.0).unwrap();
    XlsxWriter::write_file(&wb, &path).unwrap();

    let loaded = XlsxReader::read_file(&path).unwrap();
    assert_eq!(loaded.cell(0, "B2").unwrap().value::<f64>(), 7.0);
}

#[test]
fn test_not_a_package() {
    let result = XlsxReader::read(Cursor::new(b"plain text".to_vec()));
    assert!(matches!(result, Err(XlsxError::Zip(_))));
}
