//! Rich text values
//!
//! A [`RichText`] is a sequence of [`TextRun`]s. Text with a single run and no
//! run formatting is a plain string and is written to files as such.

use crate::style::Color;
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// A piece of text with optional font overrides
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextRun {
    /// The run's characters
    pub text: String,
    /// Font size in points
    pub size: Option<f64>,
    /// Font color
    pub color: Option<Color>,
    /// Font name
    pub font: Option<String>,
    /// Font family id
    pub family: Option<u32>,
    /// Font scheme ("major", "minor")
    pub scheme: Option<String>,
}

impl TextRun {
    /// A run with no formatting
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Set the font size
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the font color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the font name
    pub fn with_font<S: Into<String>>(mut self, name: S) -> Self {
        self.font = Some(name.into());
        self
    }

    /// Set the font family id
    pub fn with_family(mut self, family: u32) -> Self {
        self.family = Some(family);
        self
    }

    /// Set the font scheme
    pub fn with_scheme<S: Into<String>>(mut self, scheme: S) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Whether any override is present
    pub fn has_formatting(&self) -> bool {
        self.size.is_some()
            || self.color.is_some()
            || self.font.is_some()
            || self.family.is_some()
            || self.scheme.is_some()
    }
}

impl Eq for TextRun {}

impl Hash for TextRun {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
        self.size.map(f64::to_bits).hash(state);
        self.color.hash(state);
        self.font.hash(state);
        self.family.hash(state);
        self.scheme.hash(state);
    }
}

/// Text made of formatted runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RichText {
    runs: Vec<TextRun>,
}

impl RichText {
    /// Text with one unformatted run
    pub fn plain<S: Into<String>>(text: S) -> Self {
        Self {
            runs: vec![TextRun::new(text)],
        }
    }

    /// Build from runs
    pub fn from_runs(runs: Vec<TextRun>) -> Self {
        Self { runs }
    }

    /// Append a run
    pub fn push_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// The runs in order
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Whether this text is stored as a plain string: no runs, or one
    /// unformatted run.
    pub fn is_plain(&self) -> bool {
        match self.runs.as_slice() {
            [] => true,
            [run] => !run.has_formatting(),
            _ => false,
        }
    }

    /// Concatenated text of all runs
    pub fn plain_text(&self) -> String {
        match self.runs.as_slice() {
            [run] => run.text.clone(),
            runs => runs.iter().map(|r| r.text.as_str()).collect(),
        }
    }

    /// Whether the text has no characters
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.is_empty())
    }
}

impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in &self.runs {
            f.write_str(&run.text)?;
        }
        Ok(())
    }
}

impl From<&str> for RichText {
    fn from(s: &str) -> Self {
        RichText::plain(s)
    }
}

impl From<String> for RichText {
    fn from(s: String) -> Self {
        RichText::plain(s)
    }
}

/// Reference-counted rich text shared between cells and the string table
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SharedText(Arc<RichText>);

impl SharedText {
    /// Wrap a rich text value
    pub fn new(text: RichText) -> Self {
        SharedText(Arc::new(text))
    }

    /// Whether two handles point to the same allocation
    pub fn ptr_eq(a: &SharedText, b: &SharedText) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl Deref for SharedText {
    type Target = RichText;

    fn deref(&self) -> &RichText {
        &self.0
    }
}

impl Borrow<RichText> for SharedText {
    fn borrow(&self) -> &RichText {
        &self.0
    }
}

impl fmt::Debug for SharedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_plain() {
            write!(f, "{:?}", self.plain_text())
        } else {
            f.debug_list().entries(self.runs()).finish()
        }
    }
}

impl fmt::Display for SharedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}
