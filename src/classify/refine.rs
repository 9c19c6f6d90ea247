//! Hierarchy refinement.
//!
//! Document-order passes over the leveled candidates: sorts into reading
//! order, repairs illegal level jumps, and collapses adjacent duplicates.
//! Refinement never fails; it only demotes and merges, so output is emitted
//! even from a degenerate candidate set.

use crate::model::{Heading, HeadingLevel};

use super::score::HeadingCandidate;

/// Produce the final heading sequence from leveled candidates.
///
/// The returned headings are ordered by (page, document-order index),
/// never by score, with 1-indexed pages.
pub fn refine(mut candidates: Vec<HeadingCandidate>) -> Vec<Heading> {
    // Presentation order must mirror the source document.
    candidates.sort_by_key(|c| (c.fragment.page, c.fragment.index));

    let mut headings: Vec<Heading> = Vec::with_capacity(candidates.len());
    let mut prev_depth: u8 = 0;

    for cand in candidates {
        let assigned = cand.level.map(HeadingLevel::depth).unwrap_or(3);
        // A heading may not sit more than one level below the most recent
        // higher-level heading; illegal jumps are demoted to the nearest
        // legal depth.
        let depth = assigned.min(prev_depth + 1);
        let level = HeadingLevel::from_depth(depth);
        let page = cand.fragment.page + 1;

        // A heading fragmented into multiple runs shows up as adjacent
        // identical entries; keep the first.
        if let Some(last) = headings.last() {
            if last.page == page
                && last.level == level
                && last.text.eq_ignore_ascii_case(&cand.fragment.text)
            {
                continue;
            }
        }

        prev_depth = depth;
        headings.push(Heading::new(level, cand.fragment.text, page));
    }

    headings
}
