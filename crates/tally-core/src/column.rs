//! Column types

/// Default column width in points, as used for pixel anchoring
pub const DEFAULT_COLUMN_WIDTH: f64 = 51.85;

/// Per-column settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnProperties {
    /// Custom width (None = default)
    pub width: Option<f64>,
    /// Column is hidden
    pub hidden: bool,
}

impl ColumnProperties {
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Check if this column has any custom settings
    pub fn has_custom_settings(&self) -> bool {
        self.width.is_some() || self.hidden
    }
}

/// Points to whole pixels at 96 dpi, rounding up
pub fn points_to_pixels(points: f64) -> u32 {
    (points * 96.0 / 72.0).ceil() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_to_pixels() {
        assert_eq!(points_to_pixels(DEFAULT_COLUMN_WIDTH), 70);
        assert_eq!(points_to_pixels(15.0), 20);
        assert_eq!(points_to_pixels(0.0), 0);
    }

    #[test]
    fn test_builders() {
        let props = ColumnProperties::default().with_width(20.0).with_hidden(true);
        assert_eq!(props.width, Some(20.0));
        assert!(props.hidden);
        assert!(props.has_custom_settings());
    }
}
