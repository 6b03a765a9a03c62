//! Cutting note sequences into anchor-delimited windows.

use crate::note::{NoteArray, TimeAnchor};

/// Cut both sequences into overlapping windows between consecutive anchors.
///
/// Window `i` spans anchors `i` and `i + window_size`; the score interval is
/// widened by `sfuzziness` beats on each side and the performance interval
/// by `pfuzziness` seconds. With `pfuzziness_relative_to_tempo`, the
/// performance margin is scaled by the window's local tempo ratio
/// (Δperformance / Δscore, with the score span floored at 1e-6).
///
/// Notes whose onset falls inside the widened interval are copied into the
/// window. Returns the parallel (score windows, performance windows) lists;
/// with fewer than two anchors a single window holding the full inputs is
/// returned.
pub fn cut_note_arrays(
    score: &NoteArray,
    performance: &NoteArray,
    anchors: &[TimeAnchor],
    sfuzziness: f32,
    pfuzziness: f32,
    window_size: usize,
    pfuzziness_relative_to_tempo: bool,
) -> (Vec<NoteArray>, Vec<NoteArray>) {
    if anchors.len() < 2 {
        return (vec![score.clone()], vec![performance.clone()]);
    }

    let mut score_windows = Vec::new();
    let mut performance_windows = Vec::new();

    for i in 0..anchors.len().saturating_sub(window_size) {
        let score_start = anchors[i].score_time;
        let score_end = anchors[i + window_size].score_time;
        let perf_start = anchors[i].performance_time;
        let perf_end = anchors[i + window_size].performance_time;

        let perf_margin = if pfuzziness_relative_to_tempo {
            let tempo_ratio = (perf_end - perf_start) / (score_end - score_start).max(1e-6);
            pfuzziness * tempo_ratio
        } else {
            pfuzziness
        };

        score_windows.push(NoteArray::new(
            score
                .iter()
                .filter(|n| {
                    n.onset_beat >= score_start - sfuzziness
                        && n.onset_beat <= score_end + sfuzziness
                })
                .cloned()
                .collect(),
        ));
        performance_windows.push(NoteArray::new(
            performance
                .iter()
                .filter(|n| {
                    n.onset_sec >= perf_start - perf_margin && n.onset_sec <= perf_end + perf_margin
                })
                .cloned()
                .collect(),
        ));
    }

    (score_windows, performance_windows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Note;

    fn fixtures() -> (NoteArray, NoteArray) {
        let score = NoteArray::new(
            (0..8)
                .map(|i| Note::score(format!("s{i}"), 60, i as f32, 0.5))
                .collect(),
        );
        let performance = NoteArray::new(
            (0..8)
                .map(|i| Note::performance(format!("p{i}"), 60, i as f32 * 2.0, 0.5, 70))
                .collect(),
        );
        (score, performance)
    }

    #[test]
    fn test_window_count() {
        let (score, performance) = fixtures();
        let anchors: Vec<TimeAnchor> =
            (0..5).map(|i| TimeAnchor::new(i as f32, i as f32 * 2.0)).collect();

        let (sw, pw) = cut_note_arrays(&score, &performance, &anchors, 0.0, 0.0, 1, false);
        assert_eq!(sw.len(), 4);
        assert_eq!(pw.len(), 4);

        let (sw2, _) = cut_note_arrays(&score, &performance, &anchors, 0.0, 0.0, 2, false);
        assert_eq!(sw2.len(), 3);
    }

    #[test]
    fn test_window_selection_with_fuzz() {
        let (score, performance) = fixtures();
        let anchors = vec![TimeAnchor::new(2.0, 4.0), TimeAnchor::new(3.0, 6.0)];

        let (sw, pw) = cut_note_arrays(&score, &performance, &anchors, 1.0, 0.0, 1, false);
        // Score interval [1, 4], inclusive.
        let ids: Vec<&str> = sw[0].iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s2", "s3", "s4"]);
        // Performance interval [4, 6] with zero margin.
        let pids: Vec<&str> = pw[0].iter().map(|n| n.id.as_str()).collect();
        assert_eq!(pids, vec!["p2", "p3"]);
    }

    #[test]
    fn test_tempo_relative_margin() {
        let (score, performance) = fixtures();
        // Tempo ratio is 2 seconds per beat, so pfuzziness 1.0 widens the
        // performance interval by 2 seconds on each side.
        let anchors = vec![TimeAnchor::new(2.0, 4.0), TimeAnchor::new(3.0, 6.0)];

        let (_, pw) = cut_note_arrays(&score, &performance, &anchors, 0.0, 1.0, 1, true);
        let pids: Vec<&str> = pw[0].iter().map(|n| n.id.as_str()).collect();
        assert_eq!(pids, vec!["p1", "p2", "p3", "p4"]);
    }

    #[test]
    fn test_under_two_anchors_single_window() {
        let (score, performance) = fixtures();
        let (sw, pw) =
            cut_note_arrays(&score, &performance, &[TimeAnchor::new(0.0, 0.0)], 1.0, 1.0, 1, true);

        assert_eq!(sw.len(), 1);
        assert_eq!(pw.len(), 1);
        assert_eq!(sw[0], score);
        assert_eq!(pw[0], performance);
    }
}
