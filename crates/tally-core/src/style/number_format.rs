//! Number format types

use std::borrow::Cow;

/// Codes of the predefined formats, by id.
///
/// Ids 23-36 and 50+ are locale dependent and have no fixed code.
const BUILTIN_CODES: [(u32, &str); 36] = [
    (0, "General"),
    (1, "0"),
    (2, "0.00"),
    (3, "#,##0"),
    (4, "#,##0.00"),
    (5, "\"$\"#,##0_);(\"$\"#,##0)"),
    (6, "\"$\"#,##0_);[Red](\"$\"#,##0)"),
    (7, "\"$\"#,##0.00_);(\"$\"#,##0.00)"),
    (8, "\"$\"#,##0.00_);[Red](\"$\"#,##0.00)"),
    (9, "0%"),
    (10, "0.00%"),
    (11, "0.00E+00"),
    (12, "# ?/?"),
    (13, "# ??/??"),
    (14, "mm-dd-yy"),
    (15, "d-mmm-yy"),
    (16, "d-mmm"),
    (17, "mmm-yy"),
    (18, "h:mm AM/PM"),
    (19, "h:mm:ss AM/PM"),
    (20, "h:mm"),
    (21, "h:mm:ss"),
    (22, "m/d/yy h:mm"),
    (37, "#,##0 ;(#,##0)"),
    (38, "#,##0 ;[Red](#,##0)"),
    (39, "#,##0.00;(#,##0.00)"),
    (40, "#,##0.00;[Red](#,##0.00)"),
    (41, "_(* #,##0_);_(* \\(#,##0\\);_(* \"-\"_);_(@_)"),
    (42, "_(\"$\"* #,##0_);_(\"$\"* \\(#,##0\\);_(\"$\"* \"-\"_);_(@_)"),
    (43, "_(* #,##0.00_);_(* \\(#,##0.00\\);_(* \"-\"??_);_(@_)"),
    (44, "_(\"$\"* #,##0.00_);_(\"$\"* \\(#,##0.00\\);_(\"$\"* \"-\"??_);_(@_)"),
    (45, "mm:ss"),
    (46, "[h]:mm:ss"),
    (47, "mmss.0"),
    (48, "##0.0E+0"),
    (49, "@"),
];

/// First id available for custom formats
pub const FIRST_CUSTOM_ID: u32 = 164;

/// Number format of a cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    /// General format (builtin 0)
    #[default]
    General,

    /// Predefined format by id
    BuiltIn(u32),

    /// Custom format code
    Custom(String),
}

impl NumberFormat {
    /// 9 - 0%
    pub const ID_PERCENT: u32 = 9;
    /// 14 - mm-dd-yy
    pub const ID_DATE_SHORT: u32 = 14;
    /// 21 - h:mm:ss
    pub const ID_TIME: u32 = 21;
    /// 49 - @
    pub const ID_TEXT: u32 = 49;

    /// Format for a builtin id; id 0 is [`NumberFormat::General`]
    pub fn from_id(id: u32) -> Self {
        match id {
            0 => NumberFormat::General,
            id => NumberFormat::BuiltIn(id),
        }
    }

    /// Format for a code, resolved to a builtin id when one matches
    pub fn from_code<S: AsRef<str> + Into<String>>(code: S) -> Self {
        match builtin_id(code.as_ref()) {
            Some(id) => Self::from_id(id),
            None => NumberFormat::Custom(code.into()),
        }
    }

    /// `0%`
    pub fn percentage() -> Self {
        NumberFormat::BuiltIn(Self::ID_PERCENT)
    }

    /// `h:mm:ss`
    pub fn time() -> Self {
        NumberFormat::BuiltIn(Self::ID_TIME)
    }

    /// `yyyy-mm-dd`
    pub fn date() -> Self {
        NumberFormat::Custom("yyyy-mm-dd".into())
    }

    /// `yyyy-mm-dd h:mm:ss`
    pub fn date_time() -> Self {
        NumberFormat::Custom("yyyy-mm-dd h:mm:ss".into())
    }

    /// `[hh]:mm:ss`
    pub fn elapsed() -> Self {
        NumberFormat::Custom("[hh]:mm:ss".into())
    }

    /// `@`
    pub fn text() -> Self {
        NumberFormat::BuiltIn(Self::ID_TEXT)
    }

    /// Builtin id, if this is a predefined format
    pub fn builtin_id(&self) -> Option<u32> {
        match self {
            NumberFormat::General => Some(0),
            NumberFormat::BuiltIn(id) => Some(*id),
            NumberFormat::Custom(_) => None,
        }
    }

    /// The format code; unknown builtin ids fall back to `General`
    pub fn format_code(&self) -> Cow<'_, str> {
        match self {
            NumberFormat::General => Cow::Borrowed("General"),
            NumberFormat::BuiltIn(id) => Cow::Borrowed(builtin_code(*id).unwrap_or("General")),
            NumberFormat::Custom(code) => Cow::Borrowed(code.as_str()),
        }
    }

    /// Check if this is the General format
    pub fn is_general(&self) -> bool {
        matches!(self, NumberFormat::General | NumberFormat::BuiltIn(0))
    }

    /// Whether values with this format are dates or times
    pub fn is_date_format(&self) -> bool {
        is_date_code(&self.format_code())
    }
}

/// Code of a predefined format
pub fn builtin_code(id: u32) -> Option<&'static str> {
    BUILTIN_CODES.iter().find(|(i, _)| *i == id).map(|(_, c)| *c)
}

/// Id of the predefined format with this code
pub fn builtin_id(code: &str) -> Option<u32> {
    BUILTIN_CODES.iter().find(|(_, c)| *c == code).map(|(i, _)| *i)
}

/// Whether a format code contains date or time placeholders outside quoted
/// literals, escapes and bracketed modifiers. Elapsed-time brackets count.
pub fn is_date_code(code: &str) -> bool {
    if code.eq_ignore_ascii_case("general") {
        return false;
    }

    let mut chars = code.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                for q in chars.by_ref() {
                    if q == '"' {
                        break;
                    }
                }
            }
            '\\' | '_' | '*' => {
                chars.next();
            }
            '[' => {
                let mut inner = String::new();
                for b in chars.by_ref() {
                    if b == ']' {
                        break;
                    }
                    inner.push(b.to_ascii_lowercase());
                }
                let elapsed = !inner.is_empty()
                    && inner.chars().all(|x| x == inner.chars().next().unwrap_or(' '))
                    && matches!(inner.chars().next(), Some('h' | 'm' | 's'));
                if elapsed {
                    return true;
                }
            }
            'y' | 'Y' | 'd' | 'D' | 'h' | 'H' | 's' | 'S' | 'm' | 'M' => return true,
            _ => {}
        }
    }
    false
}
