//! Shared helpers for round-trip tests.

use std::io::{Cursor, Read};

use tally_core::Workbook;
use tally_xlsx::{LoadOptions, XlsxReader, XlsxWriter};

/// Write `workbook` to memory and return the package bytes
pub fn write_bytes(workbook: &Workbook) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    XlsxWriter::write(workbook, &mut buffer).unwrap();
    buffer.into_inner()
}

/// Write and read back with default options
pub fn roundtrip(workbook: &Workbook) -> Workbook {
    roundtrip_with(workbook, &LoadOptions::default())
}

/// Write and read back with the given options
pub fn roundtrip_with(workbook: &Workbook, options: &LoadOptions) -> Workbook {
    let bytes = write_bytes(workbook);
    XlsxReader::read_with_options(Cursor::new(bytes), options).unwrap()
}

/// The text of one part of a written package
pub fn part_text(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}
