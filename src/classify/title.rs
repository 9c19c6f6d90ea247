//! Document title selection.
//!
//! The title comes from the first-page candidate pool under a stricter rule
//! set than heading classification, independent of the level bands: it must
//! carry the page's maximum font size, and ties break by composite score
//! and then earliest document order.

use crate::config::Config;
use crate::model::TextFragment;

use super::score::HeadingCandidate;

/// The selected title and the order index of its source fragment, used to
/// keep the title out of the heading outline.
#[derive(Debug, Clone, Default)]
pub struct TitlePick {
    /// Title text; empty when the document has none.
    pub text: String,
    /// Document-order index of the title fragment.
    pub index: Option<u32>,
}

/// Select the document title.
///
/// Considers candidates from the first page, widening to the configured
/// page window when the first page is sparse. Falls back to the single
/// largest-font fragment of the first page when no candidate qualifies,
/// and to the empty string when the document has no text at all.
pub fn select_title(
    candidates: &[HeadingCandidate],
    fragments: &[TextFragment],
    config: &Config,
) -> TitlePick {
    if fragments.is_empty() {
        return TitlePick::default();
    }

    let first_page_candidates = candidates.iter().filter(|c| c.fragment.page == 0).count();
    let window = if first_page_candidates >= 3 {
        1
    } else {
        config.title_page_window.max(1)
    };

    let pool: Vec<&HeadingCandidate> = candidates
        .iter()
        .filter(|c| c.fragment.page < window)
        .collect();

    // The page's maximum size comes from all fragments in the window, not
    // just candidates; a title must not be out-sized by anything near it.
    let max_size = fragments
        .iter()
        .filter(|f| f.page < window)
        .map(|f| f.font_size)
        .fold(0.0f32, f32::max);

    let pick = pool
        .iter()
        .filter(|c| c.fragment.font_size >= max_size - 0.1)
        .min_by(|a, b| {
            b.composite
                .partial_cmp(&a.composite)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.fragment.index.cmp(&b.fragment.index))
        });

    if let Some(cand) = pick {
        return TitlePick {
            text: cand.fragment.text.clone(),
            index: Some(cand.fragment.index),
        };
    }

    // No qualifying candidate: take the largest-font fragment of the first
    // populated page.
    let first_page = fragments.iter().map(|f| f.page).min().unwrap_or(0);
    let fallback = fragments
        .iter()
        .filter(|f| f.page == first_page)
        .max_by(|a, b| {
            a.font_size
                .partial_cmp(&b.font_size)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.index.cmp(&a.index))
        });

    match fallback {
        Some(frag) => TitlePick {
            text: frag.text.clone(),
            index: Some(frag.index),
        },
        None => TitlePick::default(),
    }
}
