//! Composite formatting records

use super::{Alignment, BorderStyle, FillStyle, FontStyle, NumberFormat, Protection};

/// Everything that controls how one cell looks.
///
/// Formats are interned by the [`Stylesheet`](super::Stylesheet); cells refer
/// to them by id and never mutate an interned record in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Format {
    pub number_format: NumberFormat,
    pub font: FontStyle,
    pub fill: FillStyle,
    pub border: BorderStyle,
    pub alignment: Alignment,
    pub protection: Protection,
}

impl Format {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_number_format(mut self, number_format: NumberFormat) -> Self {
        self.number_format = number_format;
        self
    }

    pub fn with_font(mut self, font: FontStyle) -> Self {
        self.font = font;
        self
    }

    pub fn with_fill(mut self, fill: FillStyle) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_border(mut self, border: BorderStyle) -> Self {
        self.border = border;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_protection(mut self, protection: Protection) -> Self {
        self.protection = protection;
        self
    }
}

/// A named, reusable preset ("Normal", "Hyperlink", user styles)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedStyle {
    pub name: String,
    pub format: Format,
    /// Id of a predefined style (0 = Normal)
    pub builtin_id: Option<u32>,
    pub hidden: bool,
}

impl NamedStyle {
    /// A user style with the default format
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            format: Format::default(),
            builtin_id: None,
            hidden: false,
        }
    }

    /// The "Normal" style every workbook starts with
    pub fn normal() -> Self {
        Self {
            builtin_id: Some(0),
            ..Self::new("Normal")
        }
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }
}
