//! Input fragment types produced by the external document parser.

use serde::{Deserialize, Serialize};

/// A span of text with position and style metadata.
///
/// Fragments are immutable once produced by the parser; the pipeline owns
/// them for the duration of one document's processing. Coordinates use a
/// top-left origin: `y` grows downward, so small `y` means top of page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// The text content.
    pub text: String,

    /// Page index (0-based).
    pub page: u32,

    /// X position (left edge).
    pub x: f32,

    /// Y position (distance from top of page).
    pub y: f32,

    /// Font size in points.
    pub font_size: f32,

    /// Font family name (e.g., "Helvetica-Bold").
    pub font_family: String,

    /// Whether the text is bold.
    #[serde(default)]
    pub bold: bool,

    /// Whether the text is italic.
    #[serde(default)]
    pub italic: bool,

    /// Document-order index, strictly increasing across the whole document
    /// regardless of page.
    pub index: u32,
}

impl TextFragment {
    /// Create a new fragment, deriving style flags from the family name.
    pub fn new(
        text: impl Into<String>,
        page: u32,
        x: f32,
        y: f32,
        font_size: f32,
        font_family: impl Into<String>,
        index: u32,
    ) -> Self {
        let font_family = font_family.into();
        let lower = font_family.to_lowercase();
        let bold =
            lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        let italic = lower.contains("italic") || lower.contains("oblique");

        Self {
            text: text.into(),
            page,
            x,
            y,
            font_size,
            font_family,
            bold,
            italic,
            index,
        }
    }

    /// Set explicit style flags (overrides flags derived from the family).
    pub fn with_style(mut self, bold: bool, italic: bool) -> Self {
        self.bold = bold;
        self.italic = italic;
        self
    }

    /// Word count of the text content.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Whether the fragment holds any non-whitespace content.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A finite ordered sequence of fragments for one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FragmentStream {
    /// Fragments in extraction order.
    pub fragments: Vec<TextFragment>,

    /// Total number of pages in the source document.
    pub page_count: u32,
}

impl FragmentStream {
    /// Create a stream from fragments and a page count.
    pub fn new(fragments: Vec<TextFragment>, page_count: u32) -> Self {
        Self {
            fragments,
            page_count,
        }
    }

    /// Number of fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether the stream has no fragments.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
