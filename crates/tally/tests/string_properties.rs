//! Property tests for text values

use proptest::prelude::*;
use std::io::Cursor;
use tally::prelude::*;
use tally::CoreError;

/// Printable text that is neither a formula nor an error code
fn plain_text() -> impl Strategy<Value = String> {
    "[^=#\\p{C}][^\\p{C}]{0,63}"
}

/// Control characters a cell refuses
fn illegal_char() -> impl Strategy<Value = char> {
    prop_oneof![
        (0u32..=8).prop_map(|c| char::from_u32(c).unwrap()),
        Just('\u{b}'),
        Just('\u{c}'),
        (0x0eu32..=0x1f).prop_map(|c| char::from_u32(c).unwrap()),
    ]
}

proptest! {
    #[test]
    fn test_text_survives_set_and_get(text in plain_text()) {
        let mut wb = Workbook::new();
        wb.cell_mut(0, "A1").unwrap().set_value(text.as_str()).unwrap();
        let cell = wb.cell(0, "A1").unwrap();
        prop_assert_eq!(cell.data_type(), CellType::String);
        prop_assert_eq!(cell.value::<String>(), text);
    }

    #[test]
    fn test_text_survives_xlsx(text in plain_text()) {
        let mut wb = Workbook::new();
        wb.cell_mut(0, "B7").unwrap().set_value(text.as_str()).unwrap();

        let mut buffer = Cursor::new(Vec::new());
        wb.write_to(&mut buffer).unwrap();
        buffer.set_position(0);
        let loaded = Workbook::from_reader(buffer).unwrap();
        prop_assert_eq!(loaded.cell(0, "B7").unwrap().value::<String>(), text);
    }

    #[test]
    fn test_control_characters_rejected(
        prefix in "[a-z]{0,8}",
        bad in illegal_char(),
        suffix in "[a-z]{0,8}",
    ) {
        let mut wb = Workbook::new();
        let mut cell = wb.cell_mut(0, "A1").unwrap();
        cell.set_value("before").unwrap();

        let text = format!("{}{}{}", prefix, bad, suffix);
        let result = cell.set_value(text);
        prop_assert_eq!(result, Err(CoreError::IllegalCharacter(bad)));
        prop_assert_eq!(cell.value::<String>(), "before");
    }
}
