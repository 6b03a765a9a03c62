//! Coarse anchor extraction from piano-roll DTW.

use crate::dtw::Dtw;
use crate::note::{NoteArray, TimeAnchor};
use crate::pianoroll::{binarize, compute_pianoroll};

/// Extract (score time, performance time) anchors by warping piano rolls.
///
/// Both sequences are rasterized time-major so that the DTW axis indexes
/// time and the feature axis indexes pitch; the performance roll is
/// binarized first. Each path step `(i, j)` maps to the anchor
/// `(i / s_time_div, j / p_time_div)`. Anchors are sorted by score time and
/// deduplicated within 1e-6.
///
/// # Arguments
/// * `score` - Score notes (beat timeline)
/// * `performance` - Performance notes (seconds timeline)
/// * `matcher` - DTW engine to warp with
/// * `s_time_div` - Score piano-roll cells per beat
/// * `p_time_div` - Performance piano-roll cells per second
pub fn anchors_from_dtw(
    score: &NoteArray,
    performance: &NoteArray,
    matcher: &Dtw,
    s_time_div: usize,
    p_time_div: usize,
) -> Vec<TimeAnchor> {
    let s_roll = compute_pianoroll(score, s_time_div, false);
    let mut p_roll = compute_pianoroll(performance, p_time_div, false);
    binarize(&mut p_roll);

    let result = matcher.compute(&s_roll, &p_roll, true, false);

    let mut anchors: Vec<TimeAnchor> = result
        .path
        .iter()
        .map(|&(i, j)| {
            TimeAnchor::new(
                i as f32 / s_time_div as f32,
                j as f32 / p_time_div as f32,
            )
        })
        .collect();

    anchors.sort_by(|a, b| a.score_time.total_cmp(&b.score_time));
    anchors.dedup_by(|current, kept| (current.score_time - kept.score_time).abs() < 1e-6);
    anchors
}
