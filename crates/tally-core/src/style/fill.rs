//! Fill/background style types

use super::Color;
use std::hash::{Hash, Hasher};

/// Cell background
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FillStyle {
    /// No fill
    #[default]
    None,

    /// Pattern fill; a solid fill is the `Solid` pattern with a foreground
    Pattern {
        pattern: PatternType,
        foreground: Option<Color>,
        background: Option<Color>,
    },

    /// Gradient fill
    Gradient {
        gradient_type: GradientType,
        degree: f64,
        stops: Vec<GradientStop>,
    },
}

impl FillStyle {
    /// Solid fill with one color
    pub fn solid(color: Color) -> Self {
        FillStyle::Pattern {
            pattern: PatternType::Solid,
            foreground: Some(color),
            background: None,
        }
    }

    /// The 12.5% gray fill every stylesheet reserves at index 1
    pub fn gray125() -> Self {
        FillStyle::Pattern {
            pattern: PatternType::Gray125,
            foreground: None,
            background: None,
        }
    }

    /// Check if this is "no fill"
    pub fn is_none(&self) -> bool {
        matches!(self, FillStyle::None)
    }
}

impl Hash for FillStyle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FillStyle::None => {}
            FillStyle::Pattern {
                pattern,
                foreground,
                background,
            } => (pattern, foreground, background).hash(state),
            FillStyle::Gradient {
                gradient_type,
                degree,
                stops,
            } => {
                gradient_type.hash(state);
                degree.to_bits().hash(state);
                for stop in stops {
                    stop.position.to_bits().hash(state);
                    stop.color.hash(state);
                }
            }
        }
    }
}

impl Eq for FillStyle {}

/// Pattern fill types, named as in OOXML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PatternType {
    #[default]
    None,
    Solid,
    MediumGray,
    DarkGray,
    LightGray,
    DarkHorizontal,
    DarkVertical,
    DarkDown,
    DarkUp,
    DarkGrid,
    DarkTrellis,
    LightHorizontal,
    LightVertical,
    LightDown,
    LightUp,
    LightGrid,
    LightTrellis,
    Gray125,
    Gray0625,
}

const PATTERN_NAMES: [(PatternType, &str); 19] = [
    (PatternType::None, "none"),
    (PatternType::Solid, "solid"),
    (PatternType::MediumGray, "mediumGray"),
    (PatternType::DarkGray, "darkGray"),
    (PatternType::LightGray, "lightGray"),
    (PatternType::DarkHorizontal, "darkHorizontal"),
    (PatternType::DarkVertical, "darkVertical"),
    (PatternType::DarkDown, "darkDown"),
    (PatternType::DarkUp, "darkUp"),
    (PatternType::DarkGrid, "darkGrid"),
    (PatternType::DarkTrellis, "darkTrellis"),
    (PatternType::LightHorizontal, "lightHorizontal"),
    (PatternType::LightVertical, "lightVertical"),
    (PatternType::LightDown, "lightDown"),
    (PatternType::LightUp, "lightUp"),
    (PatternType::LightGrid, "lightGrid"),
    (PatternType::LightTrellis, "lightTrellis"),
    (PatternType::Gray125, "gray125"),
    (PatternType::Gray0625, "gray0625"),
];

impl PatternType {
    /// OOXML `patternType` value
    pub fn as_str(&self) -> &'static str {
        PATTERN_NAMES
            .iter()
            .find(|(p, _)| p == self)
            .map_or("none", |(_, name)| *name)
    }

    /// Parse an OOXML `patternType` value
    pub fn from_str(s: &str) -> Option<Self> {
        PATTERN_NAMES.iter().find(|(_, name)| *name == s).map(|(p, _)| *p)
    }
}

/// Gradient types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GradientType {
    #[default]
    Linear,
    Path,
}

/// Gradient stop
#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    /// Position (0.0 to 1.0)
    pub position: f64,
    pub color: Color,
}

impl GradientStop {
    pub fn new(position: f64, color: Color) -> Self {
        Self { position, color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_names() {
        assert_eq!(PatternType::Gray125.as_str(), "gray125");
        assert_eq!(PatternType::from_str("darkUp"), Some(PatternType::DarkUp));
        assert_eq!(PatternType::from_str("plaid"), None);
    }

    #[test]
    fn test_solid_is_pattern() {
        assert_eq!(
            FillStyle::solid(Color::RED),
            FillStyle::Pattern {
                pattern: PatternType::Solid,
                foreground: Some(Color::RED),
                background: None,
            }
        );
        assert!(!FillStyle::gray125().is_none());
    }
}
