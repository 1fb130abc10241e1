//! Small XML helpers shared by the reader and the writer

use std::io::BufRead;
use std::str::FromStr;

use quick_xml::events::BytesStart;
use quick_xml::reader::Reader;

pub(crate) const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// A reader that keeps whitespace, so `<t> padded </t>` survives
pub(crate) fn text_reader<R: BufRead>(reader: R) -> Reader<R> {
    let mut xml_reader = Reader::from_reader(reader);
    xml_reader.trim_text(false);
    xml_reader
}

/// A reader for parts where only attributes matter
pub(crate) fn trimmed_reader<R: BufRead>(reader: R) -> Reader<R> {
    let mut xml_reader = Reader::from_reader(reader);
    xml_reader.trim_text(true);
    xml_reader
}

/// Attribute value by local name, so `r:id` matches `id`
pub(crate) fn attr(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Attribute parsed into `T`; missing or malformed values are `None`
pub(crate) fn parse_attr<T: FromStr>(e: &BytesStart<'_>, name: &[u8]) -> Option<T> {
    attr(e, name).and_then(|v| v.trim().parse().ok())
}

/// Boolean attribute, accepting `1`/`0` and `true`/`false`
pub(crate) fn bool_attr(e: &BytesStart<'_>, name: &[u8]) -> Option<bool> {
    attr(e, name).map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Escape element text
pub(crate) fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in encode_excel_escapes(s).chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            c => out.push(c),
        }
    }
    out
}

/// Escape an attribute value
pub(crate) fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            c => out.push(c),
        }
    }
    out
}

/// `<t>` with `xml:space="preserve"` when the text has edge whitespace
pub(crate) fn text_element(s: &str) -> String {
    let padded = s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace);
    if padded {
        format!(r#"<t xml:space="preserve">{}</t>"#, escape_text(s))
    } else {
        format!("<t>{}</t>", escape_text(s))
    }
}

fn is_escape_at(s: &str, index: usize) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= index + 7
        && bytes[index] == b'_'
        && bytes[index + 1] == b'x'
        && bytes[index + 2..index + 6].iter().all(u8::is_ascii_hexdigit)
        && bytes[index + 6] == b'_'
}

/// Protect literal `_xHHHH_` sequences so readers do not decode them.
///
/// The underscore that opens such a sequence is itself written as `_x005F_`.
pub(crate) fn encode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }
    let mut result = String::with_capacity(s.len() + 8);
    for (i, c) in s.char_indices() {
        if c == '_' && is_escape_at(s, i) {
            result.push_str("_x005F_");
        } else {
            result.push(c);
        }
    }
    result
}

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }
    let mut result = String::with_capacity(s.len());
    let mut index = 0;
    while index < s.len() {
        if is_escape_at(s, index) {
            let decoded = u32::from_str_radix(&s[index + 2..index + 6], 16)
                .ok()
                .and_then(char::from_u32);
            if let Some(c) = decoded {
                result.push(c);
                index += 7;
                continue;
            }
        }
        let c = match s[index..].chars().next() {
            Some(c) => c,
            None => break,
        };
        result.push(c);
        index += c.len_utf8();
    }
    result
}

/// Resolve a relationship target against the part that owns it.
///
/// `resolve_target("xl/worksheets/sheet1.xml", "../comments1.xml")` is
/// `xl/comments1.xml`; absolute targets lose their leading `/`.
pub(crate) fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "." | "" => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// The `.rels` part describing the relationships of `part`
pub(crate) fn rels_part(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, name)) => format!("{}/_rels/{}.rels", dir, name),
        None => format!("_rels/{}.rels", part),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_excel_escapes_carriage_return() {
        assert_eq!(decode_excel_escapes("hello_x000d_world"), "hello\rworld");
    }

    #[test]
    fn test_decode_excel_escapes_multiple() {
        assert_eq!(
            decode_excel_escapes("line1_x000d__x000a_line2"),
            "line1\r\nline2"
        );
    }

    #[test]
    fn test_decode_excel_escapes_underscore() {
        assert_eq!(decode_excel_escapes("under_x005f_score"), "under_score");
    }

    #[test]
    fn test_decode_excel_escapes_partial_sequence() {
        assert_eq!(decode_excel_escapes("_x00"), "_x00");
        assert_eq!(decode_excel_escapes("_x000d"), "_x000d");
        assert_eq!(decode_excel_escapes("plain text"), "plain text");
    }

    #[test]
    fn test_decode_excel_escapes_uppercase() {
        assert_eq!(decode_excel_escapes("_x000D_"), "\r");
        assert_eq!(decode_excel_escapes("é_x0041_"), "éA");
    }

    #[test]
    fn test_encode_protects_literal_sequences() {
        let literal = "keep _x0041_ as is";
        let encoded = encode_excel_escapes(literal);
        assert_eq!(encoded, "keep _x005F_x0041_ as is");
        assert_eq!(decode_excel_escapes(&encoded), literal);
        assert_eq!(encode_excel_escapes("snake_xcase"), "snake_xcase");
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a<b & c>\r"), "a&lt;b &amp; c&gt;&#13;");
        assert_eq!(text_element(" x"), r#"<t xml:space="preserve"> x</t>"#);
        assert_eq!(text_element("x"), "<t>x</t>");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target("xl/workbook.xml", "worksheets/sheet1.xml"),
            "xl/worksheets/sheet1.xml"
        );
        assert_eq!(
            resolve_target("xl/worksheets/sheet1.xml", "../comments1.xml"),
            "xl/comments1.xml"
        );
        assert_eq!(resolve_target("xl/workbook.xml", "/xl/styles.xml"), "xl/styles.xml");
        assert_eq!(resolve_target("", "xl/workbook.xml"), "xl/workbook.xml");
    }

    #[test]
    fn test_rels_part() {
        assert_eq!(rels_part("xl/workbook.xml"), "xl/_rels/workbook.xml.rels");
        assert_eq!(
            rels_part("xl/worksheets/sheet2.xml"),
            "xl/worksheets/_rels/sheet2.xml.rels"
        );
    }
}
