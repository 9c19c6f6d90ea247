//! Document-wide typographic statistics.
//!
//! The profile is derived once per document and passed read-only into the
//! later stages; nothing here is process-wide state, so parallel per-document
//! workers stay independent.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::model::TextFragment;

/// Font statistics used as the scoring baseline.
#[derive(Debug, Clone)]
pub struct FontProfile {
    /// Body text font size: the character-weighted modal size class.
    pub body_size: f32,

    /// Dominant font family by character count.
    pub dominant_family: String,

    /// Character counts per size class (keys are size * 10, 0.1pt precision).
    size_histogram: HashMap<i32, usize>,

    /// Total character count across all fragments.
    total_chars: usize,
}

impl FontProfile {
    /// Build the profile from normalized fragments.
    ///
    /// Fails only with [`Error::EmptyDocument`] when the document has no
    /// extractable text; the caller then emits an empty outline.
    pub fn build(fragments: &[TextFragment]) -> Result<Self> {
        let mut size_histogram: HashMap<i32, usize> = HashMap::new();
        let mut family_chars: HashMap<&str, usize> = HashMap::new();
        let mut total_chars = 0usize;

        for frag in fragments {
            let chars = frag.text.chars().filter(|c| !c.is_whitespace()).count();
            if chars == 0 {
                continue;
            }
            *size_histogram.entry(size_key(frag.font_size)).or_insert(0) += chars;
            *family_chars.entry(frag.font_family.as_str()).or_insert(0) += chars;
            total_chars += chars;
        }

        if total_chars == 0 {
            return Err(Error::EmptyDocument);
        }

        // Modal size class by character count; ties break toward the
        // smaller size, since body text is rarely the largest class.
        let body_key = size_histogram
            .iter()
            .max_by(|(ka, ca), (kb, cb)| ca.cmp(cb).then(kb.cmp(ka)))
            .map(|(k, _)| *k)
            .unwrap_or(120);
        let body_size = body_key as f32 / 10.0;

        let dominant_family = family_chars
            .iter()
            .max_by(|(fa, ca), (fb, cb)| ca.cmp(cb).then(fb.cmp(fa)))
            .map(|(f, _)| (*f).to_string())
            .unwrap_or_default();

        log::debug!(
            "Font profile: body size {:.1}pt, dominant family {:?}, {} size classes",
            body_size,
            dominant_family,
            size_histogram.len()
        );

        Ok(Self {
            body_size,
            dominant_family,
            size_histogram,
            total_chars,
        })
    }

    /// Percentile rank of a font size: the fraction of document characters
    /// set at this size or smaller, in [0, 1].
    pub fn percentile(&self, font_size: f32) -> f32 {
        let key = size_key(font_size);
        let below: usize = self
            .size_histogram
            .iter()
            .filter(|(k, _)| **k <= key)
            .map(|(_, count)| *count)
            .sum();
        below as f32 / self.total_chars as f32
    }

    /// Whether a size is visually distinguished from body text.
    pub fn is_above_body(&self, font_size: f32) -> bool {
        size_key(font_size) > size_key(self.body_size)
    }

    /// Number of distinct size classes observed.
    pub fn size_class_count(&self) -> usize {
        self.size_histogram.len()
    }
}

/// Histogram key for a font size (0.1pt precision).
fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, size: f32, family: &str, index: u32) -> TextFragment {
        TextFragment::new(text, 0, 0.0, index as f32 * 14.0, size, family, index)
    }

    #[test]
    fn test_body_size_is_char_weighted_mode() {
        let fragments = vec![
            frag("A short heading", 18.0, "Helvetica-Bold", 0),
            frag(
                "A long paragraph of body text that dominates the character count of the page",
                11.0,
                "Times",
                1,
            ),
            frag("More running text with plenty of characters in it", 11.0, "Times", 2),
        ];

        let profile = FontProfile::build(&fragments).unwrap();
        assert!((profile.body_size - 11.0).abs() < 0.01);
        assert_eq!(profile.dominant_family, "Times");
    }

    #[test]
    fn test_tie_breaks_toward_smaller_size() {
        let fragments = vec![
            frag("aaaaaaaaaa", 14.0, "Times", 0),
            frag("bbbbbbbbbb", 10.0, "Times", 1),
        ];
        let profile = FontProfile::build(&fragments).unwrap();
        assert!((profile.body_size - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_empty_document() {
        let result = FontProfile::build(&[]);
        assert!(matches!(result, Err(Error::EmptyDocument)));

        let blank = vec![frag("   ", 12.0, "Times", 0)];
        assert!(matches!(FontProfile::build(&blank), Err(Error::EmptyDocument)));
    }

    #[test]
    fn test_percentile_ordering() {
        let fragments = vec![
            frag("body body body body body body", 11.0, "Times", 0),
            frag("subsection heading", 14.0, "Times", 1),
            frag("chapter", 20.0, "Times", 2),
        ];
        let profile = FontProfile::build(&fragments).unwrap();

        let p_body = profile.percentile(11.0);
        let p_mid = profile.percentile(14.0);
        let p_top = profile.percentile(20.0);
        assert!(p_body < p_mid);
        assert!(p_mid < p_top);
        assert!((p_top - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_above_body() {
        let fragments = vec![
            frag("body body body body", 11.0, "Times", 0),
            frag("Heading", 14.0, "Times", 1),
        ];
        let profile = FontProfile::build(&fragments).unwrap();
        assert!(profile.is_above_body(14.0));
        assert!(!profile.is_above_body(11.0));
        assert!(!profile.is_above_body(10.0));
    }
}
