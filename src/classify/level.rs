//! Hierarchy level assignment.
//!
//! Levels come from the document's own score distribution rather than fixed
//! cutoffs: distinct composite scores are sorted descending and the two
//! largest gaps between consecutive values become the H1/H2 and H2/H3 cut
//! points. A document whose scores form fewer than three clusters simply
//! does not emit the lower levels.

use crate::model::HeadingLevel;

use super::score::HeadingCandidate;

/// Distinctness precision for composite scores. Composites within one
/// quantum land in the same band, which resolves ties toward the higher
/// level.
const SCORE_QUANTUM: f32 = 1e-4;

/// Assign a provisional level to every candidate in place.
pub fn assign_levels(candidates: &mut [HeadingCandidate]) {
    if candidates.is_empty() {
        return;
    }

    let mut distinct: Vec<i64> = candidates.iter().map(|c| quantize(c.composite)).collect();
    distinct.sort_unstable_by(|a, b| b.cmp(a));
    distinct.dedup();

    let cuts = band_cuts(&distinct);

    for cand in candidates.iter_mut() {
        let q = quantize(cand.composite);
        // Rank of this score among the distinct values (0 = highest).
        let rank = distinct.iter().position(|d| *d == q).unwrap_or(0);
        let depth = match cuts {
            None => 1,
            Some((c1, None)) => {
                if rank <= c1 {
                    1
                } else {
                    2
                }
            }
            Some((c1, Some(c2))) => {
                if rank <= c1 {
                    1
                } else if rank <= c2 {
                    2
                } else {
                    3
                }
            }
        };
        cand.level = Some(HeadingLevel::from_depth(depth));
    }

    log::debug!(
        "Level assigner: {} candidates over {} distinct score values",
        candidates.len(),
        distinct.len()
    );
}

fn quantize(score: f32) -> i64 {
    (score / SCORE_QUANTUM).round() as i64
}

/// Find the band cut points over distinct scores sorted descending.
///
/// Returns `None` for a single cluster (everything H1), `Some((c1, None))`
/// for two values (one gap), otherwise the two largest-gap positions with
/// `c1 < c2`: ranks `0..=c1` are H1, `c1+1..=c2` are H2, the rest H3. When
/// gap magnitudes tie, the gap nearer the top of the ranking wins, which
/// promotes the ambiguous middle upward.
fn band_cuts(distinct: &[i64]) -> Option<(usize, Option<usize>)> {
    match distinct.len() {
        0 | 1 => None,
        2 => Some((0, None)),
        _ => {
            let gaps: Vec<i64> = distinct.windows(2).map(|w| w[0] - w[1]).collect();

            let mut best = 0usize;
            for (i, gap) in gaps.iter().enumerate() {
                if *gap > gaps[best] {
                    best = i;
                }
            }
            let mut second = usize::MAX;
            for (i, gap) in gaps.iter().enumerate() {
                if i == best {
                    continue;
                }
                if second == usize::MAX || *gap > gaps[second] {
                    second = i;
                }
            }

            let (c1, c2) = if best < second {
                (best, second)
            } else {
                (second, best)
            };
            Some((c1, Some(c2)))
        }
    }
}
