//! Cell formatting
//!
//! - [`Format`] - the composite record a cell points at
//! - [`NamedStyle`] - named presets such as "Normal"
//! - [`Stylesheet`] - the interning tables for both
//! - [`FontStyle`], [`FillStyle`], [`BorderStyle`], [`Alignment`],
//!   [`Protection`], [`NumberFormat`], [`Color`] - the components

mod alignment;
mod border;
mod color;
mod fill;
mod font;
mod format;
mod number_format;
mod pool;
mod protection;
mod stylesheet;

pub use alignment::{Alignment, HorizontalAlignment, VerticalAlignment};
pub use border::{BorderEdge, BorderLineStyle, BorderSide, BorderStyle};
pub use color::Color;
pub use fill::{FillStyle, GradientStop, GradientType, PatternType};
pub use font::{FontStyle, FontVerticalAlign, Underline};
pub use format::{Format, NamedStyle};
pub use number_format::{builtin_code, builtin_id, is_date_code, NumberFormat, FIRST_CUSTOM_ID};
pub use pool::InternPool;
pub use protection::Protection;
pub use stylesheet::{FormatRecord, StyleComponents, Stylesheet};
