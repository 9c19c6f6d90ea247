//! The heading classification pipeline.
//!
//! Stages run strictly in sequence, each consuming the prior stage's
//! complete output: normalize → font profile → candidate filter → scorer →
//! title selection → level assignment → refinement. The pipeline is pure
//! and deterministic; given any well-formed fragment sequence it always
//! produces an [`Outline`] and never fails.

mod filter;
mod geometry;
mod level;
mod normalize;
mod profile;
mod refine;
mod score;
mod title;

pub use normalize::{detect_script, Normalizer, Script};
pub use profile::FontProfile;
pub use score::{FactorScores, HeadingCandidate, Scorer};

use crate::config::Config;
use crate::model::{FragmentStream, Outline};

use geometry::PageGeometry;

/// Classify a fragment stream into an outline.
///
/// Resource-ceiling truncations are logged; use [`classify_with_warnings`]
/// to receive them programmatically.
pub fn classify(stream: &FragmentStream, config: &Config) -> Outline {
    classify_with_warnings(stream, config).0
}

/// Classify a fragment stream, returning the outline together with any
/// truncation warnings.
pub fn classify_with_warnings(
    stream: &FragmentStream,
    config: &Config,
) -> (Outline, Vec<String>) {
    let mut warnings = Vec::new();

    let mut fragments = stream.fragments.clone();
    if fragments.len() > config.max_fragments {
        let dropped = fragments.len() - config.max_fragments;
        fragments.truncate(config.max_fragments);
        let msg = format!(
            "fragment ceiling reached: dropped {} of {} fragments",
            dropped,
            config.max_fragments + dropped
        );
        log::warn!("{msg}");
        warnings.push(msg);
    }

    let fragments = Normalizer::new().normalize(fragments);

    let profile = match FontProfile::build(&fragments) {
        Ok(profile) => profile,
        Err(_) => {
            // No extractable text: an empty outline, not a failure.
            return (Outline::empty(), warnings);
        }
    };

    let geometry = PageGeometry::build(&fragments);
    let page_count = stream.page_count.max(1);

    let survivors =
        filter::filter_candidates(&fragments, &profile, &geometry, page_count, config);
    let mut candidates =
        Scorer::new().score(survivors, &fragments, &profile, &geometry, config);

    let title = title::select_title(&candidates, &fragments, config);
    if let Some(title_index) = title.index {
        candidates.retain(|c| c.fragment.index != title_index);
    }

    level::assign_levels(&mut candidates);

    if candidates.len() > config.max_headings {
        let total = candidates.len();
        // Keep the strongest candidates; the refiner restores document
        // order afterwards.
        candidates.sort_by(|a, b| {
            b.composite
                .partial_cmp(&a.composite)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(
                    b.fragment
                        .font_size
                        .partial_cmp(&a.fragment.font_size)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
                .then(a.fragment.index.cmp(&b.fragment.index))
        });
        candidates.truncate(config.max_headings);
        let msg = format!(
            "heading ceiling reached: kept {} of {} candidates",
            config.max_headings, total
        );
        log::warn!("{msg}");
        warnings.push(msg);
    }

    let headings = refine::refine(candidates);

    (Outline::new(title.text, headings), warnings)
}
