//! Output artifact types: headings and the document outline.

use serde::{Deserialize, Serialize};

/// Hierarchy level of a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Top-level section heading.
    H1,
    /// Second-level heading.
    H2,
    /// Third-level heading.
    H3,
}

impl HeadingLevel {
    /// Numeric depth (H1 = 1).
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    /// Level for a numeric depth, clamped to the supported range.
    pub fn from_depth(depth: u8) -> Self {
        match depth {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeadingLevel::H1 => write!(f, "H1"),
            HeadingLevel::H2 => write!(f, "H2"),
            HeadingLevel::H3 => write!(f, "H3"),
        }
    }
}

/// A single classified heading.
///
/// Immutable once produced by the refiner. `page` is 1-indexed, matching
/// the output artifact contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Hierarchy level.
    pub level: HeadingLevel,

    /// Heading text.
    pub text: String,

    /// Page number (1-indexed).
    pub page: u32,
}

impl Heading {
    /// Create a new heading.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// The outline artifact for one document: a title plus ordered headings.
///
/// Headings are ordered by (page, document-order index): document reading
/// order, never score order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Document title; empty when none was found.
    pub title: String,

    /// Headings in document reading order.
    pub outline: Vec<Heading>,
}

impl Outline {
    /// Create a new outline.
    pub fn new(title: impl Into<String>, outline: Vec<Heading>) -> Self {
        Self {
            title: title.into(),
            outline,
        }
    }

    /// An empty outline (no title, no headings).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the outline has neither a title nor headings.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.outline.is_empty()
    }

    /// Number of headings.
    pub fn heading_count(&self) -> usize {
        self.outline.len()
    }
}
