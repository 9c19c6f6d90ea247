//! Fragment normalization.
//!
//! Cleans raw fragments before any statistics are computed: Unicode NFKC
//! (which also folds fullwidth forms), whitespace collapse, script-aware
//! diacritic stripping, merging of runs the extractor split mid-line, and
//! removal of zero-content fragments.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::model::TextFragment;

/// Dominant script of a text, detected by character ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Latin alphabet.
    Latin,
    /// Cyrillic alphabet.
    Cyrillic,
    /// Arabic script.
    Arabic,
    /// Hebrew script.
    Hebrew,
    /// CJK ideographs and kana.
    Cjk,
    /// Devanagari script.
    Devanagari,
    /// Anything else (digits, punctuation, mixed).
    Other,
}

/// Detect the dominant script of a text by counting character hits.
pub fn detect_script(text: &str) -> Script {
    let mut latin = 0usize;
    let mut cyrillic = 0usize;
    let mut arabic = 0usize;
    let mut hebrew = 0usize;
    let mut cjk = 0usize;
    let mut devanagari = 0usize;

    for c in text.chars() {
        let code = c as u32;
        if c.is_ascii_alphabetic() || (0x00C0..=0x024F).contains(&code) {
            latin += 1;
        } else if (0x0400..=0x04FF).contains(&code) {
            cyrillic += 1;
        } else if (0x0600..=0x06FF).contains(&code) {
            arabic += 1;
        } else if (0x0590..=0x05FF).contains(&code) {
            hebrew += 1;
        } else if (0x0900..=0x097F).contains(&code) {
            devanagari += 1;
        } else if is_cjk_char(c) {
            cjk += 1;
        }
    }

    let scores = [
        (Script::Latin, latin),
        (Script::Cyrillic, cyrillic),
        (Script::Arabic, arabic),
        (Script::Hebrew, hebrew),
        (Script::Cjk, cjk),
        (Script::Devanagari, devanagari),
    ];
    scores
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .max_by_key(|(_, n)| *n)
        .map(|(s, _)| s)
        .unwrap_or(Script::Other)
}

/// Check if a character is from a script that doesn't use word spaces
/// (Chinese ideographs and Japanese kana; Korean uses spaces).
pub fn is_cjk_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs + Extension A
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        // Hiragana
        || (0x3040..=0x309F).contains(&code)
        // Katakana
        || (0x30A0..=0x30FF).contains(&code)
        // CJK Symbols and Punctuation
        || (0x3000..=0x303F).contains(&code)
}

/// Combining marks stripped for RTL scripts (Arabic harakat, Hebrew points).
fn is_rtl_diacritic(c: char) -> bool {
    let code = c as u32;
    (0x064B..=0x0652).contains(&code)
        || code == 0x0670
        || (0x0591..=0x05C7).contains(&code)
}

/// Fragment normalizer.
///
/// Construct once per document (or reuse across documents; it holds only
/// compiled patterns).
pub struct Normalizer {
    whitespace: Regex,
}

impl Normalizer {
    /// Create a normalizer with its patterns compiled.
    pub fn new() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Normalize a single text: NFKC, diacritic stripping for RTL scripts,
    /// whitespace collapse, trim.
    pub fn normalize_text(&self, text: &str) -> String {
        let nfkc: String = text.nfkc().collect();

        let stripped = match detect_script(&nfkc) {
            Script::Arabic | Script::Hebrew => {
                nfkc.chars().filter(|c| !is_rtl_diacritic(*c)).collect()
            }
            _ => nfkc,
        };

        self.whitespace.replace_all(&stripped, " ").trim().to_string()
    }

    /// Normalize a fragment sequence.
    ///
    /// Cleans each text, merges runs the extractor split mid-line, drops
    /// exact duplicates and empties. Order indices of survivors keep their
    /// original values so document order is preserved.
    pub fn normalize(&self, fragments: Vec<TextFragment>) -> Vec<TextFragment> {
        let mut result: Vec<TextFragment> = Vec::with_capacity(fragments.len());

        for mut frag in fragments {
            frag.text = self.normalize_text(&frag.text);
            if frag.text.is_empty() {
                continue;
            }

            if let Some(prev) = result.last_mut() {
                // Re-extraction artifacts: the same span reported twice.
                if prev.page == frag.page
                    && prev.text == frag.text
                    && (prev.x - frag.x).abs() < 0.5
                    && (prev.y - frag.y).abs() < 0.5
                {
                    continue;
                }

                if Self::is_continuation(prev, &frag) {
                    Self::merge_into(prev, &frag);
                    continue;
                }
            }

            result.push(frag);
        }

        result
    }

    /// Whether `next` is the continuation of `prev` on the same visual line:
    /// consecutive in extraction order, same page and baseline, same size
    /// and style, advancing to the right.
    fn is_continuation(prev: &TextFragment, next: &TextFragment) -> bool {
        let y_tolerance = prev.font_size * 0.3;
        next.index == prev.index + 1
            && next.page == prev.page
            && (next.y - prev.y).abs() <= y_tolerance
            && (next.font_size - prev.font_size).abs() <= 0.1
            && next.bold == prev.bold
            && next.italic == prev.italic
            && next.x > prev.x
    }

    /// Append `next`'s text to `prev`, inserting a space when the X gap at
    /// the join point indicates a word break. Character width is estimated
    /// as half the font size. No space between spaceless-script characters.
    /// The merged fragment advances its order index so a following run
    /// still counts as consecutive.
    fn merge_into(prev: &mut TextFragment, next: &TextFragment) {
        let char_width = prev.font_size * 0.5;
        let prev_end = prev.x + prev.text.chars().count() as f32 * char_width;
        let gap = next.x - prev_end;

        let prev_last = prev.text.chars().last();
        let next_first = next.text.chars().next();
        let spaceless = matches!((prev_last, next_first), (Some(a), Some(b)) if is_cjk_char(a) && is_cjk_char(b));

        if !spaceless && gap > char_width * 0.2 && !prev.text.ends_with(' ') {
            prev.text.push(' ');
        }
        prev.text.push_str(&next.text);
        prev.index = next.index;
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, page: u32, x: f32, y: f32, size: f32, index: u32) -> TextFragment {
        TextFragment::new(text, page, x, y, size, "Helvetica", index)
    }

    #[test]
    fn test_whitespace_collapse() {
        let n = Normalizer::new();
        assert_eq!(n.normalize_text("  Hello\t\n  world  "), "Hello world");
    }

    #[test]
    fn test_nfkc_folds_fullwidth() {
        let n = Normalizer::new();
        assert_eq!(n.normalize_text("Ｃｈａｐｔｅｒ　１"), "Chapter 1");
    }

    #[test]
    fn test_empty_fragments_dropped() {
        let n = Normalizer::new();
        let frags = vec![
            frag("Title", 0, 72.0, 100.0, 18.0, 0),
            frag("   ", 0, 72.0, 120.0, 11.0, 1),
            frag("\u{00A0}", 0, 72.0, 140.0, 11.0, 2),
        ];
        let out = n.normalize(frags);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "Title");
    }

    #[test]
    fn test_split_run_merged_without_space() {
        let n = Normalizer::new();
        // "1. Intro" is 8 chars at ~8pt each: the next run starts right at
        // the estimated end, so no word break is inferred.
        let frags = vec![
            frag("1. Intro", 0, 72.0, 100.0, 16.0, 0),
            frag("duction", 0, 136.5, 100.5, 16.0, 1),
        ];
        let out = n.normalize(frags);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "1. Introduction");
        assert_eq!(out[0].index, 1);
    }

    #[test]
    fn test_split_run_merged_with_space() {
        let n = Normalizer::new();
        let frags = vec![
            frag("1.", 0, 72.0, 100.0, 16.0, 0),
            frag("Introduction", 0, 95.0, 100.0, 16.0, 1),
        ];
        let out = n.normalize(frags);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "1. Introduction");
    }

    #[test]
    fn test_different_line_not_merged() {
        let n = Normalizer::new();
        let frags = vec![
            frag("Heading", 0, 72.0, 100.0, 16.0, 0),
            frag("Body text", 0, 72.0, 130.0, 16.0, 1),
        ];
        let out = n.normalize(frags);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_duplicate_span_dropped() {
        let n = Normalizer::new();
        let frags = vec![
            frag("Overview", 0, 72.0, 100.0, 14.0, 0),
            frag("Overview", 0, 72.0, 100.0, 14.0, 1),
        ];
        let out = n.normalize(frags);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_cjk_merge_without_space() {
        let n = Normalizer::new();
        let frags = vec![
            frag("第1章", 0, 72.0, 100.0, 16.0, 0),
            frag("概要", 0, 120.0, 100.0, 16.0, 1),
        ];
        let out = n.normalize(frags);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "第1章概要");
    }

    #[test]
    fn test_script_detection() {
        assert_eq!(detect_script("Introduction"), Script::Latin);
        assert_eq!(detect_script("Введение"), Script::Cyrillic);
        assert_eq!(detect_script("第一章"), Script::Cjk);
        assert_eq!(detect_script("مقدمة"), Script::Arabic);
        assert_eq!(detect_script("1234"), Script::Other);
    }
}
