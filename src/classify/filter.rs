//! Structural eligibility filter for heading candidates.
//!
//! Rejects fragments that cannot be headings before any scoring happens:
//! body-sized text, page furniture repeated across pages, over-long
//! paragraphs, and empties. The filter is conservative; borderline
//! fragments pass through and let the scorer decide.

use std::collections::{HashMap, HashSet};

use crate::config::Config;
use crate::model::TextFragment;

use super::geometry::PageGeometry;
use super::profile::FontProfile;

/// Number of vertical bands used for the furniture recurrence key (5% of
/// the page content height each).
const FURNITURE_BANDS: f32 = 20.0;

/// Filter a normalized fragment sequence down to heading candidates.
///
/// Survivors keep their document order. `page_count` is the page count
/// reported by the parser, which may exceed the number of pages that hold
/// fragments.
pub fn filter_candidates(
    fragments: &[TextFragment],
    profile: &FontProfile,
    geometry: &PageGeometry,
    page_count: u32,
    config: &Config,
) -> Vec<TextFragment> {
    let furniture = furniture_keys(fragments, geometry, page_count, config);

    let survivors: Vec<TextFragment> = fragments
        .iter()
        .filter(|frag| {
            if frag.is_blank() {
                return false;
            }
            // Not visually distinguished from running text.
            if !profile.is_above_body(frag.font_size) {
                return false;
            }
            // Long paragraphs misdetected as headings.
            if frag.text.chars().count() > config.max_heading_chars {
                return false;
            }
            if furniture.contains(&furniture_key(frag, geometry)) {
                return false;
            }
            true
        })
        .cloned()
        .collect();

    log::debug!(
        "Candidate filter: {} of {} fragments survive ({} furniture keys)",
        survivors.len(),
        fragments.len(),
        furniture.len()
    );

    survivors
}

/// Recurrence key for page-furniture detection: normalized lowercase text
/// plus the vertical band the fragment occupies on its page.
fn furniture_key(frag: &TextFragment, geometry: &PageGeometry) -> (String, i32) {
    let band = (geometry.relative_y(frag) * FURNITURE_BANDS) as i32;
    (frag.text.to_lowercase(), band)
}

/// Keys whose text recurs at the same relative vertical position on more
/// than the configured fraction of pages (running headers/footers, page
/// numbers with stable prefixes, watermarks).
fn furniture_keys(
    fragments: &[TextFragment],
    geometry: &PageGeometry,
    page_count: u32,
    config: &Config,
) -> HashSet<(String, i32)> {
    if page_count < 2 {
        return HashSet::new();
    }

    let mut pages_per_key: HashMap<(String, i32), HashSet<u32>> = HashMap::new();
    for frag in fragments {
        pages_per_key
            .entry(furniture_key(frag, geometry))
            .or_default()
            .insert(frag.page);
    }

    let limit = config.furniture_page_fraction * page_count as f32;
    pages_per_key
        .into_iter()
        .filter(|(_, pages)| pages.len() >= 2 && pages.len() as f32 > limit)
        .map(|(key, _)| key)
        .collect()
}
