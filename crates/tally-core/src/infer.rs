//! Type guessing for text input
//!
//! When a workbook has "guess types" enabled, text assigned to a cell is
//! offered to [`infer`], which tries a percentage, then a time of day, then a
//! plain number.

use crate::datetime::time_parts_to_serial;
use crate::style::NumberFormat;

/// A numeric reading of some text
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Inferred {
    /// `"12.5%"`, stored as the fraction
    Percentage(f64),
    /// `"10:30"`, stored as a day fraction
    Time(TimeFields),
    /// `"3.14"`
    Number(f64),
}

impl Inferred {
    /// The value to store in the cell
    pub fn value(&self) -> f64 {
        match self {
            Inferred::Percentage(v) | Inferred::Number(v) => *v,
            Inferred::Time(t) => t.to_serial(),
        }
    }

    /// The number format that goes with the reading, if any
    pub fn number_format(&self) -> Option<NumberFormat> {
        match self {
            Inferred::Percentage(_) => Some(NumberFormat::percentage()),
            Inferred::Time(_) => Some(NumberFormat::time()),
            Inferred::Number(_) => None,
        }
    }
}

/// Clock fields parsed from text. Hours are not capped at 23.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeFields {
    pub hour: i64,
    pub minute: i64,
    pub second: i64,
    pub microsecond: i64,
}

impl TimeFields {
    /// Whole seconds the fields add up to, `None` when that overflows
    pub fn total_seconds(&self) -> Option<i64> {
        self.hour
            .checked_mul(3600)?
            .checked_add(self.minute.checked_mul(60)?)?
            .checked_add(self.second)
    }

    pub fn to_serial(&self) -> f64 {
        time_parts_to_serial(self.hour, self.minute, self.second, self.microsecond)
    }
}

/// Try each reading in priority order
pub fn infer(text: &str) -> Option<Inferred> {
    if let Some(v) = parse_percentage(text) {
        return Some(Inferred::Percentage(v));
    }
    if let Some(t) = parse_time(text) {
        return Some(Inferred::Time(t));
    }
    parse_number(text).map(Inferred::Number)
}

/// A finite real number filling the whole string; leading whitespace is
/// allowed, `nan` and `inf` spellings are not
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    if trimmed.is_empty() || trimmed.ends_with(char::is_whitespace) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `"<number>%"` as a fraction
pub fn parse_percentage(text: &str) -> Option<f64> {
    let number = text.strip_suffix('%')?;
    parse_number(number).map(|v| v / 100.0)
}

/// Colon-separated clock time.
///
/// The tail after the last colon is seconds. With a single colon, the head
/// is minutes when the text contains a `.` anywhere and hours otherwise; in
/// the hours case the tail is read as minutes instead.
pub fn parse_time(text: &str) -> Option<TimeFields> {
    let last = text.rfind(':')?;
    let first = text.find(':')?;

    let seconds = leading_float(&text[last + 1..])?;
    if !seconds.is_finite() || seconds.abs() >= i64::MAX as f64 {
        return None;
    }
    let whole = seconds.trunc();
    let mut fields = TimeFields {
        second: whole as i64,
        microsecond: ((seconds - whole) * 1e6).round() as i64,
        ..TimeFields::default()
    };

    if first == last {
        let head = leading_int(&text[..first])?;
        if text.contains('.') {
            fields.minute = head;
        } else {
            fields.hour = head;
            fields.minute = fields.second;
            fields.second = 0;
        }
    } else {
        fields.hour = leading_int(&text[..first])?;
        fields.minute = leading_int(&text[first + 1..last])?;
    }
    fields.total_seconds()?;
    Some(fields)
}

/// Skip whitespace and an optional sign; returns the sign and the rest
fn split_sign(text: &str) -> (bool, &str) {
    let text = text.trim_start();
    match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    }
}

/// Integer prefix of `text`; trailing characters are ignored
fn leading_int(text: &str) -> Option<i64> {
    let (negative, rest) = split_sign(text);
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Decimal prefix of `text` (digits, fraction, exponent); trailing
/// characters are ignored
fn leading_float(text: &str) -> Option<f64> {
    let (negative, rest) = split_sign(text);
    let bytes = rest.as_bytes();
    let mut end = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    let mut mantissa_digits = end;
    if bytes.get(end) == Some(&b'.') {
        let frac = bytes[end + 1..].iter().take_while(|b| b.is_ascii_digit()).count();
        mantissa_digits += frac;
        end += 1 + frac;
    }
    if mantissa_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = bytes[exp.min(bytes.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }
    let value: f64 = rest[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_percentage() {
        let v = parse_percentage("12.34%").unwrap();
        assert!((v - 0.1234).abs() < 1e-12);
        assert_eq!(parse_percentage(" 50%"), Some(0.5));
        assert_eq!(parse_percentage("%"), None);
        assert_eq!(parse_percentage("abc%"), None);
        assert_eq!(parse_percentage("50"), None);
        assert_eq!(
            infer("12.34%").unwrap().number_format(),
            Some(NumberFormat::percentage())
        );
    }

    #[test]
    fn test_time_overflow_is_not_a_time() {
        assert_eq!(parse_time("9223372036854775807:00"), None);
        assert_eq!(parse_time("1:9223372036854775807:00"), None);
        assert_eq!(parse_time("0:0:1e300"), None);
        assert!(matches!(
            infer("9223372036854775807:00"),
            None | Some(Inferred::Number(_))
        ));
    }

    #[test]
    fn test_non_finite_words_stay_text() {
        assert_eq!(parse_number("nan"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("Infinity"), None);
        assert_eq!(parse_percentage("-Infinity%"), None);
        assert_eq!(parse_number("1e400"), None);
        assert_eq!(infer("NaN"), None);
    }

    #[test]
    fn test_time_two_colons() {
        let t = parse_time("25:00:00.5").unwrap();
        assert_eq!(
            t,
            TimeFields {
                hour: 25,
                minute: 0,
                second: 0,
                microsecond: 500_000
            }
        );
        assert_eq!(t.to_serial(), 90_000.5 / 86_400.0);
    }

    #[test]
    fn test_time_one_colon() {
        // no decimal point: hours and minutes
        let t = parse_time("10:30").unwrap();
        assert_eq!((t.hour, t.minute, t.second), (10, 30, 0));

        // decimal point anywhere: minutes and seconds
        let t = parse_time("4:30.25").unwrap();
        assert_eq!((t.hour, t.minute, t.second, t.microsecond), (0, 4, 30, 250_000));

        let t = parse_time("12.5:30").unwrap();
        assert_eq!((t.hour, t.minute, t.second), (0, 12, 30));
    }

    #[test]
    fn test_time_failures() {
        assert_eq!(parse_time("1030"), None);
        assert_eq!(parse_time("a:30"), None);
        assert_eq!(parse_time("10:b"), None);
        assert_eq!(parse_time("1:x:3"), None);
        assert_eq!(parse_time("10:inf"), None);
    }

    #[test]
    fn test_lenient_segments() {
        let t = parse_time(" 9:15 am").unwrap();
        assert_eq!((t.hour, t.minute), (9, 15));
        assert_eq!(leading_float("1.5e3x"), Some(1500.0));
        assert_eq!(leading_float("2e"), Some(2.0));
        assert_eq!(leading_float(".5"), Some(0.5));
        assert_eq!(leading_float("."), None);
        assert_eq!(leading_int("-7h"), Some(-7));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse_number("3.14"), Some(3.14));
        assert_eq!(parse_number(" -2e3"), Some(-2000.0));
        assert_eq!(parse_number("3.14abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("1 "), None);
    }

    #[test]
    fn test_priority() {
        assert!(matches!(infer("50%"), Some(Inferred::Percentage(_))));
        assert!(matches!(infer("1:00"), Some(Inferred::Time(_))));
        assert!(matches!(infer("42"), Some(Inferred::Number(_))));
        assert_eq!(infer("hello"), None);
        assert_eq!(infer("42").unwrap().value(), 42.0);
        assert_eq!(
            infer("1:00").unwrap().number_format(),
            Some(NumberFormat::time())
        );
    }
}
