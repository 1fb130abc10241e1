//! Color representation

use std::fmt;

/// A color as stored in the stylesheet
///
/// Theme tints are kept in thousandths so colors stay hashable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Automatic/default color
    #[default]
    Auto,

    /// Packed ARGB value
    Argb(u32),

    /// Theme color index with tint in thousandths (-1000..=1000)
    Theme {
        /// Theme color index
        index: u32,
        /// Tint in thousandths
        tint: i16,
    },

    /// Indexed color (legacy palette)
    Indexed(u32),
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);

    /// Opaque RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::argb(0xFF, r, g, b)
    }

    /// ARGB color
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color::Argb(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Theme color with a fractional tint (-1.0..=1.0)
    pub fn theme(index: u32, tint: f64) -> Self {
        Color::Theme {
            index,
            tint: (tint.clamp(-1.0, 1.0) * 1000.0).round() as i16,
        }
    }

    /// Parse `RRGGBB` or `AARRGGBB`, with or without a leading `#`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let packed = u32::from_str_radix(hex, 16).ok()?;
        match hex.len() {
            6 => Some(Color::Argb(0xFF00_0000 | packed)),
            8 => Some(Color::Argb(packed)),
            _ => None,
        }
    }

    /// `AARRGGBB` for explicit colors, `None` for theme, indexed and auto
    pub fn to_argb_hex(&self) -> Option<String> {
        match self {
            Color::Argb(v) => Some(format!("{:08X}", v)),
            _ => None,
        }
    }

    /// Tint as a fraction, for theme colors
    pub fn tint(&self) -> Option<f64> {
        match self {
            Color::Theme { tint, .. } if *tint != 0 => Some(*tint as f64 / 1000.0),
            _ => None,
        }
    }

    /// Check if color is automatic/default
    pub fn is_auto(&self) -> bool {
        matches!(self, Color::Auto)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Auto => f.write_str("auto"),
            Color::Argb(v) => write!(f, "#{:08X}", v),
            Color::Theme { index, tint } => write!(f, "theme({}, {})", index, tint),
            Color::Indexed(i) => write!(f, "indexed({})", i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#FF0000"), Some(Color::RED));
        assert_eq!(Color::from_hex("80FFFFFF"), Some(Color::argb(0x80, 255, 255, 255)));
        assert_eq!(Color::from_hex("F00"), None);
        assert_eq!(Color::from_hex("GG0000"), None);
    }

    #[test]
    fn test_to_argb_hex() {
        assert_eq!(Color::rgb(0x12, 0x34, 0x56).to_argb_hex().as_deref(), Some("FF123456"));
        assert_eq!(Color::Indexed(2).to_argb_hex(), None);
    }

    #[test]
    fn test_theme_tint() {
        let color = Color::theme(4, -0.2499);
        assert_eq!(color.tint(), Some(-0.25));
        assert_eq!(Color::theme(1, 0.0).tint(), None);
    }
}
