//! Cell text placement

/// Rotation value that stacks characters vertically
pub const STACKED_ROTATION: i16 = 255;

/// Where and how text sits inside a cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Alignment {
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
    pub wrap_text: bool,
    pub shrink_to_fit: bool,
    /// Indent level (0-250)
    pub indent: u8,
    /// Degrees in -90..=90, or [`STACKED_ROTATION`]
    pub rotation: i16,
}

impl Alignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_horizontal(mut self, align: HorizontalAlignment) -> Self {
        self.horizontal = align;
        self
    }

    pub fn with_vertical(mut self, align: VerticalAlignment) -> Self {
        self.vertical = align;
        self
    }

    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap_text = wrap;
        self
    }

    pub fn with_shrink_to_fit(mut self, shrink: bool) -> Self {
        self.shrink_to_fit = shrink;
        self
    }

    /// Indent, capped at 250 levels
    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent.min(250);
        self
    }

    /// Rotation in degrees; anything outside -90..=90 other than
    /// [`STACKED_ROTATION`] is clamped
    pub fn with_rotation(mut self, degrees: i16) -> Self {
        self.rotation = if degrees == STACKED_ROTATION {
            degrees
        } else {
            degrees.clamp(-90, 90)
        };
        self
    }

    pub fn is_stacked(&self) -> bool {
        self.rotation == STACKED_ROTATION
    }

    /// Whether every setting is at its default
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlignment {
    #[default]
    General,
    Left,
    Center,
    Right,
    Fill,
    Justify,
    CenterContinuous,
    Distributed,
}

const HORIZONTAL_NAMES: [(HorizontalAlignment, &str); 8] = [
    (HorizontalAlignment::General, "general"),
    (HorizontalAlignment::Left, "left"),
    (HorizontalAlignment::Center, "center"),
    (HorizontalAlignment::Right, "right"),
    (HorizontalAlignment::Fill, "fill"),
    (HorizontalAlignment::Justify, "justify"),
    (HorizontalAlignment::CenterContinuous, "centerContinuous"),
    (HorizontalAlignment::Distributed, "distributed"),
];

impl HorizontalAlignment {
    /// OOXML `horizontal` attribute value
    pub fn as_str(&self) -> &'static str {
        HORIZONTAL_NAMES
            .iter()
            .find(|(h, _)| h == self)
            .map_or("general", |(_, name)| *name)
    }

    pub fn from_str(s: &str) -> Option<Self> {
        HORIZONTAL_NAMES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(h, _)| *h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalAlignment {
    Top,
    Center,
    #[default]
    Bottom,
    Justify,
    Distributed,
}

const VERTICAL_NAMES: [(VerticalAlignment, &str); 5] = [
    (VerticalAlignment::Top, "top"),
    (VerticalAlignment::Center, "center"),
    (VerticalAlignment::Bottom, "bottom"),
    (VerticalAlignment::Justify, "justify"),
    (VerticalAlignment::Distributed, "distributed"),
];

impl VerticalAlignment {
    /// OOXML `vertical` attribute value
    pub fn as_str(&self) -> &'static str {
        VERTICAL_NAMES
            .iter()
            .find(|(v, _)| v == self)
            .map_or("bottom", |(_, name)| *name)
    }

    pub fn from_str(s: &str) -> Option<Self> {
        VERTICAL_NAMES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(v, _)| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_limits() {
        let alignment = Alignment::new().with_indent(255).with_rotation(120);
        assert_eq!(alignment.indent, 250);
        assert_eq!(alignment.rotation, 90);
        assert!(Alignment::new().with_rotation(STACKED_ROTATION).is_stacked());
        assert!(!alignment.is_default());
        assert!(Alignment::new().is_default());
    }

    #[test]
    fn test_attribute_names() {
        assert_eq!(HorizontalAlignment::CenterContinuous.as_str(), "centerContinuous");
        assert_eq!(
            HorizontalAlignment::from_str("distributed"),
            Some(HorizontalAlignment::Distributed)
        );
        assert_eq!(VerticalAlignment::from_str("middle"), None);
        assert_eq!(VerticalAlignment::default().as_str(), "bottom");
    }
}
