//! Conversions into and out of cell values

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use super::{CellError, CellValue};
use crate::datetime::{self, Calendar};
use crate::numfmt::format_general;
use crate::text::RichText;

/// Anything that can be assigned with `set_value`.
///
/// Text goes through validation, formula/error detection and type guessing;
/// calendar types are stored as serial numbers with a matching format.
#[derive(Debug, Clone, PartialEq)]
pub enum CellInput {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    Rich(RichText),
    Error(CellError),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    Duration(Duration),
}

impl From<bool> for CellInput {
    fn from(v: bool) -> Self {
        CellInput::Bool(v)
    }
}

macro_rules! numeric_input {
    ($($t:ty),*) => {
        $(
            impl From<$t> for CellInput {
                fn from(v: $t) -> Self {
                    CellInput::Number(v as f64)
                }
            }
        )*
    };
}

numeric_input!(f64, f32, i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl From<&str> for CellInput {
    fn from(v: &str) -> Self {
        CellInput::Text(v.to_string())
    }
}

impl From<String> for CellInput {
    fn from(v: String) -> Self {
        CellInput::Text(v)
    }
}

impl From<&String> for CellInput {
    fn from(v: &String) -> Self {
        CellInput::Text(v.clone())
    }
}

impl From<RichText> for CellInput {
    fn from(v: RichText) -> Self {
        CellInput::Rich(v)
    }
}

impl From<CellError> for CellInput {
    fn from(v: CellError) -> Self {
        CellInput::Error(v)
    }
}

impl From<NaiveDate> for CellInput {
    fn from(v: NaiveDate) -> Self {
        CellInput::Date(v)
    }
}

impl From<NaiveDateTime> for CellInput {
    fn from(v: NaiveDateTime) -> Self {
        CellInput::DateTime(v)
    }
}

impl From<NaiveTime> for CellInput {
    fn from(v: NaiveTime) -> Self {
        CellInput::Time(v)
    }
}

impl From<Duration> for CellInput {
    fn from(v: Duration) -> Self {
        CellInput::Duration(v)
    }
}

impl<T: Into<CellInput>> From<Option<T>> for CellInput {
    fn from(v: Option<T>) -> Self {
        v.map_or(CellInput::Empty, Into::into)
    }
}

/// Types a cell value can be read as.
///
/// Conversions never fail: a mismatched type yields a zero-like value, the
/// same way the stored number of a text cell is zero. Formulas convert
/// their cached result.
pub trait FromCellValue: Sized {
    fn from_cell_value(value: &CellValue, calendar: Calendar) -> Self;
}

fn number_of(value: &CellValue) -> f64 {
    match value.effective_value() {
        CellValue::Number(n) => *n,
        CellValue::Boolean(b) => f64::from(u8::from(*b)),
        _ => 0.0,
    }
}

impl FromCellValue for f64 {
    fn from_cell_value(value: &CellValue, _: Calendar) -> Self {
        number_of(value)
    }
}

macro_rules! numeric_output {
    ($($t:ty),*) => {
        $(
            impl FromCellValue for $t {
                fn from_cell_value(value: &CellValue, _: Calendar) -> Self {
                    number_of(value) as $t
                }
            }
        )*
    };
}

numeric_output!(f32, i32, i64, u16, u32, u64, usize);

impl FromCellValue for bool {
    fn from_cell_value(value: &CellValue, _: Calendar) -> Self {
        number_of(value) != 0.0
    }
}

impl FromCellValue for String {
    fn from_cell_value(value: &CellValue, _: Calendar) -> Self {
        match value.effective_value() {
            CellValue::Empty | CellValue::Formula { .. } => String::new(),
            CellValue::Boolean(true) => "TRUE".to_string(),
            CellValue::Boolean(false) => "FALSE".to_string(),
            CellValue::Number(n) => format_general(*n),
            CellValue::Text(t) => t.plain_text(),
            CellValue::Error(e) => e.as_str().to_string(),
        }
    }
}

impl FromCellValue for RichText {
    fn from_cell_value(value: &CellValue, calendar: Calendar) -> Self {
        match value.effective_value() {
            CellValue::Text(t) => (**t).clone(),
            _ => RichText::plain(String::from_cell_value(value, calendar)),
        }
    }
}

impl FromCellValue for NaiveDate {
    fn from_cell_value(value: &CellValue, calendar: Calendar) -> Self {
        let serial = number_of(value).floor() as i64;
        calendar.serial_to_date(serial).unwrap_or_default()
    }
}

impl FromCellValue for NaiveDateTime {
    fn from_cell_value(value: &CellValue, calendar: Calendar) -> Self {
        calendar
            .serial_to_datetime(number_of(value))
            .unwrap_or_default()
    }
}

impl FromCellValue for NaiveTime {
    fn from_cell_value(value: &CellValue, _: Calendar) -> Self {
        datetime::serial_to_time(number_of(value))
    }
}

impl FromCellValue for Duration {
    fn from_cell_value(value: &CellValue, _: Calendar) -> Self {
        datetime::serial_to_duration(number_of(value))
    }
}

impl FromCellValue for CellValue {
    fn from_cell_value(value: &CellValue, _: Calendar) -> Self {
        value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn read<T: FromCellValue>(value: &CellValue) -> T {
        T::from_cell_value(value, Calendar::Windows1900)
    }

    #[test]
    fn test_inputs() {
        assert_eq!(CellInput::from(3), CellInput::Number(3.0));
        assert_eq!(CellInput::from("x"), CellInput::Text("x".into()));
        assert_eq!(CellInput::from(None::<f64>), CellInput::Empty);
        assert_eq!(CellInput::from(Some(true)), CellInput::Bool(true));
    }

    #[test]
    fn test_numeric_reads() {
        let v = CellValue::Number(2.75);
        assert_eq!(read::<f64>(&v), 2.75);
        assert_eq!(read::<i64>(&v), 2);
        assert!(read::<bool>(&v));
        assert_eq!(read::<f64>(&CellValue::Boolean(true)), 1.0);
        assert_eq!(read::<f64>(&CellValue::text("12")), 0.0);
    }

    #[test]
    fn test_string_reads() {
        assert_eq!(read::<String>(&CellValue::text("hi")), "hi");
        assert_eq!(read::<String>(&CellValue::Number(0.5)), "0.5");
        assert_eq!(read::<String>(&CellValue::Error(CellError::Ref)), "#REF!");
        assert_eq!(read::<String>(&CellValue::Empty), "");
    }

    #[test]
    fn test_formula_reads_cached() {
        let v = CellValue::Formula {
            text: "1+1".into(),
            cached_value: Some(Box::new(CellValue::Number(2.0))),
        };
        assert_eq!(read::<f64>(&v), 2.0);
        assert_eq!(read::<String>(&CellValue::formula("A1")), "");
    }

    #[test]
    fn test_calendar_reads() {
        let v = CellValue::Number(42551.5);
        assert_eq!(
            read::<NaiveDate>(&v),
            NaiveDate::from_ymd_opt(2016, 6, 30).unwrap()
        );
        assert_eq!(read::<NaiveTime>(&v), NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        assert_eq!(read::<Duration>(&CellValue::Number(1.5)), Duration::hours(36));
    }
}
