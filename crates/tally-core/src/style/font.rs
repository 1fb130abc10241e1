//! Fonts

use super::Color;
use std::hash::{Hash, Hasher};

/// Font settings of a format
#[derive(Debug, Clone, PartialEq)]
pub struct FontStyle {
    /// Font name (e.g. "Calibri")
    pub name: String,
    /// Size in points
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: Underline,
    pub strikethrough: bool,
    pub color: Color,
    /// Font family id (2 = swiss)
    pub family: Option<u32>,
    /// Scheme ("minor", "major")
    pub scheme: Option<String>,
    /// Superscript/subscript
    pub vertical_align: FontVerticalAlign,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            name: "Calibri".to_string(),
            size: 11.0,
            bold: false,
            italic: false,
            underline: Underline::None,
            strikethrough: false,
            color: Color::Theme { index: 1, tint: 0 },
            family: Some(2),
            scheme: Some("minor".to_string()),
            vertical_align: FontVerticalAlign::Baseline,
        }
    }
}

impl FontStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Size in points; non-positive sizes are ignored
    pub fn with_size(mut self, size: f64) -> Self {
        if size > 0.0 {
            self.size = size;
        }
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn with_underline(mut self, underline: Underline) -> Self {
        self.underline = underline;
        self
    }

    pub fn with_strikethrough(mut self, strike: bool) -> Self {
        self.strikethrough = strike;
        self
    }

    pub fn with_vertical_align(mut self, align: FontVerticalAlign) -> Self {
        self.vertical_align = align;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Hash for FontStyle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.size.to_bits().hash(state);
        (self.bold, self.italic, self.strikethrough).hash(state);
        self.underline.hash(state);
        self.color.hash(state);
        self.family.hash(state);
        self.scheme.hash(state);
        self.vertical_align.hash(state);
    }
}

impl Eq for FontStyle {}

/// Underline style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Underline {
    #[default]
    None,
    Single,
    Double,
    SingleAccounting,
    DoubleAccounting,
}

const UNDERLINE_NAMES: [(Underline, &str); 5] = [
    (Underline::None, "none"),
    (Underline::Single, "single"),
    (Underline::Double, "double"),
    (Underline::SingleAccounting, "singleAccounting"),
    (Underline::DoubleAccounting, "doubleAccounting"),
];

impl Underline {
    /// OOXML `u/@val` value
    pub fn as_str(&self) -> &'static str {
        UNDERLINE_NAMES
            .iter()
            .find(|(u, _)| u == self)
            .map_or("none", |(_, name)| *name)
    }

    /// Unknown values fall back to single, matching a bare `<u/>`
    pub fn from_str(s: &str) -> Self {
        UNDERLINE_NAMES
            .iter()
            .find(|(_, name)| *name == s)
            .map_or(Underline::Single, |(u, _)| *u)
    }
}

/// Superscript/subscript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontVerticalAlign {
    #[default]
    Baseline,
    Superscript,
    Subscript,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_font_builders() {
        let font = FontStyle::new()
            .with_name("Arial")
            .with_size(-3.0)
            .with_bold(true)
            .with_vertical_align(FontVerticalAlign::Superscript);
        assert_eq!(font.name, "Arial");
        assert_eq!(font.size, 11.0);
        assert!(font.bold);
        assert_ne!(font, FontStyle::default());
    }

    #[test]
    fn test_underline_names() {
        assert_eq!(Underline::from_str("doubleAccounting"), Underline::DoubleAccounting);
        assert_eq!(Underline::from_str("bogus"), Underline::Single);
        assert_eq!(Underline::from_str("none").as_str(), "none");
    }
}
