//! Multi-factor heading scoring.
//!
//! Each surviving fragment gets independently normalized sub-scores in
//! [0, 1], one per factor, combined by the configured weights into one
//! composite score. Candidates below the document-relative threshold
//! percentile are dropped; there is no absolute cutoff because
//! typographic conventions vary too much across documents.

use std::collections::HashMap;

use regex::Regex;

use crate::config::Config;
use crate::model::{HeadingLevel, TextFragment};

use super::geometry::PageGeometry;
use super::profile::FontProfile;

/// Raw factor sub-scores for one candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactorScores {
    /// Font size percentile above body text.
    pub size: f32,
    /// Bold/italic flags and non-body font family.
    pub typography: f32,
    /// Vertical placement and whitespace gap above.
    pub position: f32,
    /// Lexical heading cues.
    pub pattern: f32,
    /// Isolation from surrounding text.
    pub context: f32,
    /// Inverse word count.
    pub length: f32,
}

/// A scored heading candidate.
#[derive(Debug, Clone)]
pub struct HeadingCandidate {
    /// The originating fragment.
    pub fragment: TextFragment,
    /// Raw factor sub-scores.
    pub scores: FactorScores,
    /// Weighted composite score.
    pub composite: f32,
    /// Hierarchy level, unset until the level assigner runs.
    pub level: Option<HeadingLevel>,
}

/// Multi-factor scorer with pre-compiled lexical patterns.
pub struct Scorer {
    numbered: Regex,
    sub_numbered: Regex,
    lettered: Regex,
    roman: Regex,
    named_section: Regex,
    cjk_chapter: Regex,
    bullet: Regex,
}

impl Scorer {
    /// Create a scorer with its patterns compiled.
    pub fn new() -> Self {
        Self {
            // "1. Introduction", "2 Background"
            numbered: Regex::new(r"^\d{1,3}[.)]?\s+\S").unwrap(),
            // "1.1 Overview", "2.3.4 Details"
            sub_numbered: Regex::new(r"^\d{1,3}(\.\d{1,3})+\.?\s+\S").unwrap(),
            // "A. Scope", "b) Goals"
            lettered: Regex::new(r"^[A-Za-z][.)]\s+\S").unwrap(),
            // "IV. Evaluation"
            roman: Regex::new(r"^[IVXLCDM]{1,7}[.)]\s+\S").unwrap(),
            // "Chapter 3", "Section B", "Appendix A"
            named_section: Regex::new(r"(?i)^(chapter|section|part|appendix|annex)\s+[A-Z0-9]")
                .unwrap(),
            // "第1章", "第十二章"
            cjk_chapter: Regex::new(r"^第[0-9一二三四五六七八九十百]+[章节節部]").unwrap(),
            bullet: Regex::new(r"^[•·▪▫◦‣⁃]\s*\S").unwrap(),
        }
    }

    /// Score the surviving fragments against the whole document.
    ///
    /// `fragments` is the full normalized sequence (needed for neighborhood
    /// context); `survivors` are the filter's output. Returns candidates
    /// above the relative threshold, in document order.
    pub fn score(
        &self,
        survivors: Vec<TextFragment>,
        fragments: &[TextFragment],
        profile: &FontProfile,
        geometry: &PageGeometry,
        config: &Config,
    ) -> Vec<HeadingCandidate> {
        if survivors.is_empty() {
            return Vec::new();
        }

        let neighborhood = Neighborhood::build(fragments);

        let mut candidates: Vec<HeadingCandidate> = survivors
            .into_iter()
            .map(|frag| {
                let scores = FactorScores {
                    size: self.size_factor(&frag, profile),
                    typography: self.typography_factor(&frag, profile),
                    position: self.position_factor(&frag, geometry, &neighborhood),
                    pattern: self.pattern_factor(&frag.text),
                    context: self.context_factor(&frag, geometry, &neighborhood),
                    length: self.length_factor(&frag),
                };
                let w = &config.weights;
                let composite = w.size * scores.size
                    + w.typography * scores.typography
                    + w.position * scores.position
                    + w.pattern * scores.pattern
                    + w.context * scores.context
                    + w.length * scores.length;
                HeadingCandidate {
                    fragment: frag,
                    scores,
                    composite,
                    level: None,
                }
            })
            .collect();

        let threshold = score_threshold(&candidates, config.score_threshold_percentile);
        let before = candidates.len();
        candidates.retain(|c| c.composite >= threshold);

        log::debug!(
            "Scorer: {} of {} candidates at or above the p{} threshold {:.3}",
            candidates.len(),
            before,
            config.score_threshold_percentile,
            threshold
        );

        candidates
    }

    /// Size percentile above the body baseline, renormalized to [0, 1].
    fn size_factor(&self, frag: &TextFragment, profile: &FontProfile) -> f32 {
        let body = profile.percentile(profile.body_size);
        if body >= 1.0 {
            return 0.0;
        }
        ((profile.percentile(frag.font_size) - body) / (1.0 - body)).clamp(0.0, 1.0)
    }

    /// Bold and italic flags plus a font family distinct from the body font.
    fn typography_factor(&self, frag: &TextFragment, profile: &FontProfile) -> f32 {
        let mut score = 0.0;
        if frag.bold {
            score += 0.6;
        }
        if frag.italic {
            score += 0.2;
        }
        if frag.font_family != profile.dominant_family {
            score += 0.2;
        }
        f32::min(score, 1.0)
    }

    /// Vertical placement on the page, left alignment, and the whitespace
    /// gap separating the fragment from the line above it.
    fn position_factor(
        &self,
        frag: &TextFragment,
        geometry: &PageGeometry,
        neighborhood: &Neighborhood,
    ) -> f32 {
        let top = 1.0 - geometry.relative_y(frag);

        let left = match geometry.extent(frag.page) {
            Some(extent) => 1.0 - ((frag.x - extent.min_x) / extent.width()).clamp(0.0, 1.0),
            None => 0.5,
        };

        let gap_above = match neighborhood.gap_above(frag) {
            // First line of the page is maximally separated.
            None => 1.0,
            Some(gap) => (gap / (2.0 * neighborhood.median_gap)).clamp(0.0, 1.0),
        };

        0.5 * top + 0.2 * left + 0.3 * gap_above
    }

    /// Lexical cues: numbering prefixes, title casing, absent terminal
    /// punctuation, bullet markers.
    fn pattern_factor(&self, text: &str) -> f32 {
        let mut score = 0.0;

        if self.sub_numbered.is_match(text)
            || self.numbered.is_match(text)
            || self.roman.is_match(text)
            || self.lettered.is_match(text)
            || self.named_section.is_match(text)
            || self.cjk_chapter.is_match(text)
        {
            score += 0.5;
        } else if self.bullet.is_match(text) {
            score += 0.1;
        }

        score += 0.2 * title_case_ratio(text);

        if !text.ends_with(['.', '!', '?', ';', ',', ':']) {
            score += 0.2;
        }

        // Short fragments of pure upper case read as section labels.
        if text.len() > 2 && text.chars().filter(|c| c.is_alphabetic()).count() > 2 {
            let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
            if letters.iter().all(|c| c.is_uppercase()) {
                score += 0.1;
            }
        }

        f32::min(score, 1.0)
    }

    /// Isolation: inter-line gaps above and below larger than the document
    /// baseline, and a line short relative to the page width.
    fn context_factor(
        &self,
        frag: &TextFragment,
        geometry: &PageGeometry,
        neighborhood: &Neighborhood,
    ) -> f32 {
        let median = neighborhood.median_gap;
        let isolated_above = neighborhood
            .gap_above(frag)
            .map(|g| g > median * 1.3)
            .unwrap_or(true);
        let isolated_below = neighborhood
            .gap_below(frag)
            .map(|g| g > median * 1.3)
            .unwrap_or(true);

        let mut score = match (isolated_above, isolated_below) {
            (true, true) => 0.6,
            (true, false) | (false, true) => 0.3,
            (false, false) => 0.0,
        };

        if let Some(extent) = geometry.extent(frag.page) {
            let est_width = frag.text.chars().count() as f32 * frag.font_size * 0.5;
            let ratio = (est_width / extent.width()).clamp(0.0, 1.0);
            score += 0.4 * (1.0 - ratio);
        }

        f32::min(score, 1.0)
    }

    /// Inverse word count: short fragments score high, long ones near zero.
    fn length_factor(&self, frag: &TextFragment) -> f32 {
        let words = frag.word_count();
        if words <= 2 {
            1.0
        } else {
            (1.0 - (words as f32 - 2.0) / 10.0).clamp(0.0, 1.0)
        }
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Fraction of words starting with an uppercase letter.
fn title_case_ratio(text: &str) -> f32 {
    let words: Vec<&str> = text
        .split_whitespace()
        .filter(|w| w.chars().any(|c| c.is_alphabetic()))
        .collect();
    if words.is_empty() {
        return 0.0;
    }
    let capitalized = words
        .iter()
        .filter(|w| {
            w.chars()
                .find(|c| c.is_alphabetic())
                .map(|c| c.is_uppercase())
                .unwrap_or(false)
        })
        .count();
    capitalized as f32 / words.len() as f32
}

/// Relative score threshold: the nearest-rank percentile of the document's
/// own composite distribution. Inclusive comparison keeps degenerate two-
/// or three-candidate documents intact.
fn score_threshold(candidates: &[HeadingCandidate], percentile: u8) -> f32 {
    if candidates.is_empty() || percentile == 0 {
        return 0.0;
    }
    let mut scores: Vec<f32> = candidates.iter().map(|c| c.composite).collect();
    scores.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let rank = ((percentile as f32 / 100.0) * scores.len() as f32).ceil() as usize;
    scores[rank.saturating_sub(1).min(scores.len() - 1)]
}

/// Vertical neighborhood of every fragment: per-page sorted baselines and
/// the document's median inter-line gap.
struct Neighborhood {
    page_ys: HashMap<u32, Vec<f32>>,
    median_gap: f32,
}

impl Neighborhood {
    fn build(fragments: &[TextFragment]) -> Self {
        let mut page_ys: HashMap<u32, Vec<f32>> = HashMap::new();
        for frag in fragments {
            page_ys.entry(frag.page).or_default().push(frag.y);
        }

        let mut gaps: Vec<f32> = Vec::new();
        for ys in page_ys.values_mut() {
            ys.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            ys.dedup_by(|a, b| (*a - *b).abs() < 0.5);
            for pair in ys.windows(2) {
                let gap = pair[1] - pair[0];
                if gap > 0.1 {
                    gaps.push(gap);
                }
            }
        }

        gaps.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let median_gap = if gaps.is_empty() {
            14.0
        } else {
            gaps[gaps.len() / 2]
        };

        Self { page_ys, median_gap }
    }

    /// Gap to the nearest baseline above the fragment on its page, `None`
    /// when the fragment is the topmost line.
    fn gap_above(&self, frag: &TextFragment) -> Option<f32> {
        let ys = self.page_ys.get(&frag.page)?;
        let idx = ys.partition_point(|y| *y < frag.y - 0.5);
        if idx == 0 {
            None
        } else {
            Some(frag.y - ys[idx - 1])
        }
    }

    /// Gap to the nearest baseline below the fragment on its page, `None`
    /// when the fragment is the bottommost line.
    fn gap_below(&self, frag: &TextFragment) -> Option<f32> {
        let ys = self.page_ys.get(&frag.page)?;
        let idx = ys.partition_point(|y| *y <= frag.y + 0.5);
        if idx >= ys.len() {
            None
        } else {
            Some(ys[idx] - frag.y)
        }
    }
}
