//! Border style types

use super::Color;

/// Borders of a cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BorderStyle {
    pub left: Option<BorderEdge>,
    pub right: Option<BorderEdge>,
    pub top: Option<BorderEdge>,
    pub bottom: Option<BorderEdge>,
    pub diagonal: Option<BorderEdge>,
    pub diagonal_up: bool,
    pub diagonal_down: bool,
}

/// One side of a cell border
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderSide {
    Left,
    Right,
    Top,
    Bottom,
    Diagonal,
}

impl BorderSide {
    /// All sides in the order OOXML serializes them
    pub const ALL: [BorderSide; 5] = [
        BorderSide::Left,
        BorderSide::Right,
        BorderSide::Top,
        BorderSide::Bottom,
        BorderSide::Diagonal,
    ];

    /// Element name in `styles.xml`
    pub fn as_str(&self) -> &'static str {
        match self {
            BorderSide::Left => "left",
            BorderSide::Right => "right",
            BorderSide::Top => "top",
            BorderSide::Bottom => "bottom",
            BorderSide::Diagonal => "diagonal",
        }
    }
}

impl BorderStyle {
    /// No borders
    pub fn new() -> Self {
        Self::default()
    }

    /// The same edge on left, right, top and bottom
    pub fn outline(style: BorderLineStyle, color: Color) -> Self {
        let edge = Some(BorderEdge::new(style, color));
        Self {
            left: edge,
            right: edge,
            top: edge,
            bottom: edge,
            ..Self::default()
        }
    }

    /// Edge on one side
    pub fn side(&self, side: BorderSide) -> Option<&BorderEdge> {
        match side {
            BorderSide::Left => self.left.as_ref(),
            BorderSide::Right => self.right.as_ref(),
            BorderSide::Top => self.top.as_ref(),
            BorderSide::Bottom => self.bottom.as_ref(),
            BorderSide::Diagonal => self.diagonal.as_ref(),
        }
    }

    /// Replace the edge on one side
    pub fn set_side(&mut self, side: BorderSide, edge: Option<BorderEdge>) {
        let slot = match side {
            BorderSide::Left => &mut self.left,
            BorderSide::Right => &mut self.right,
            BorderSide::Top => &mut self.top,
            BorderSide::Bottom => &mut self.bottom,
            BorderSide::Diagonal => &mut self.diagonal,
        };
        *slot = edge;
    }

    /// Builder form of [`set_side`](Self::set_side)
    pub fn with_side(mut self, side: BorderSide, style: BorderLineStyle, color: Color) -> Self {
        self.set_side(side, Some(BorderEdge::new(style, color)));
        self
    }

    /// Whether no side has an edge
    pub fn is_empty(&self) -> bool {
        BorderSide::ALL.iter().all(|s| self.side(*s).is_none())
    }
}

/// A single border edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BorderEdge {
    pub style: BorderLineStyle,
    pub color: Color,
}

impl BorderEdge {
    pub fn new(style: BorderLineStyle, color: Color) -> Self {
        Self { style, color }
    }

    /// Thin black line
    pub fn thin() -> Self {
        Self::new(BorderLineStyle::Thin, Color::BLACK)
    }
}

/// Border line styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderLineStyle {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
}

const LINE_NAMES: [(BorderLineStyle, &str); 14] = [
    (BorderLineStyle::None, "none"),
    (BorderLineStyle::Thin, "thin"),
    (BorderLineStyle::Medium, "medium"),
    (BorderLineStyle::Thick, "thick"),
    (BorderLineStyle::Dashed, "dashed"),
    (BorderLineStyle::Dotted, "dotted"),
    (BorderLineStyle::Double, "double"),
    (BorderLineStyle::Hair, "hair"),
    (BorderLineStyle::MediumDashed, "mediumDashed"),
    (BorderLineStyle::DashDot, "dashDot"),
    (BorderLineStyle::MediumDashDot, "mediumDashDot"),
    (BorderLineStyle::DashDotDot, "dashDotDot"),
    (BorderLineStyle::MediumDashDotDot, "mediumDashDotDot"),
    (BorderLineStyle::SlantDashDot, "slantDashDot"),
];

impl BorderLineStyle {
    /// OOXML `style` attribute value
    pub fn as_str(&self) -> &'static str {
        LINE_NAMES
            .iter()
            .find(|(s, _)| s == self)
            .map_or("none", |(_, name)| *name)
    }

    /// Parse an OOXML `style` attribute value
    pub fn from_str(s: &str) -> Option<Self> {
        LINE_NAMES.iter().find(|(_, name)| *name == s).map(|(l, _)| *l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline() {
        let border = BorderStyle::outline(BorderLineStyle::Thin, Color::BLACK);
        assert_eq!(border.side(BorderSide::Top), Some(&BorderEdge::thin()));
        assert!(border.diagonal.is_none());
        assert!(!border.is_empty());
        assert!(BorderStyle::new().is_empty());
    }

    #[test]
    fn test_line_names() {
        assert_eq!(BorderLineStyle::MediumDashDot.as_str(), "mediumDashDot");
        assert_eq!(BorderLineStyle::from_str("hair"), Some(BorderLineStyle::Hair));
    }
}
