//! Reconciling per-window alignments into one global alignment.

use std::collections::{HashMap, HashSet};

use crate::matcher::greedy_alignment;
use crate::note::{Alignment, NoteArray};

/// Merge per-window alignments into a single conflict-free alignment.
///
/// Windows overlap, so the same note can be matched differently in
/// neighboring windows. Match candidates are indexed per score id and per
/// performance id together with their window of origin; conflicts are
/// resolved in favor of the lowest window whose counterpart is still free.
/// Notes left unmatched afterwards go through a greedy pass, and whatever
/// remains is emitted as deletions (score) and insertions (performance).
///
/// The result mentions every score id and every performance id exactly
/// once. Score ids are processed in first-encounter order over the windows,
/// which makes the tie-breaking reproducible.
pub fn mend_note_alignments(
    window_alignments: &[Vec<Alignment>],
    score: &NoteArray,
    performance: &NoteArray,
) -> Vec<Alignment> {
    // Candidate multi-indices over all window matches, in window order.
    let mut score_order: Vec<String> = Vec::new();
    let mut score_candidates: HashMap<String, Vec<(usize, String)>> = HashMap::new();
    let mut perf_candidates: HashMap<String, Vec<(usize, String)>> = HashMap::new();

    for (window_id, alignment) in window_alignments.iter().enumerate() {
        for record in alignment {
            if let Alignment::Match {
                score_id,
                performance_id,
            } = record
            {
                if !score_candidates.contains_key(score_id) {
                    score_order.push(score_id.clone());
                }
                score_candidates
                    .entry(score_id.clone())
                    .or_default()
                    .push((window_id, performance_id.clone()));
                perf_candidates
                    .entry(performance_id.clone())
                    .or_default()
                    .push((window_id, score_id.clone()));
            }
        }
    }

    let mut used_score: HashSet<String> = HashSet::new();
    let mut used_perf: HashSet<String> = HashSet::new();
    let mut mended: Vec<Alignment> = Vec::new();

    for score_id in &score_order {
        let candidates = &score_candidates[score_id];

        let accepted: Option<&String> = if candidates.len() == 1 {
            let (_, perf_id) = &candidates[0];
            if used_perf.contains(perf_id) {
                None
            } else {
                let rivals = &perf_candidates[perf_id];
                if rivals.len() == 1 {
                    Some(perf_id)
                } else {
                    // The performance note goes to the lowest-window rival
                    // whose score id is still free; accept only if that is
                    // us.
                    match rivals.iter().find(|(_, rival)| !used_score.contains(rival)) {
                        Some((_, rival)) if rival == score_id => Some(perf_id),
                        _ => None,
                    }
                }
            }
        } else {
            candidates
                .iter()
                .find(|(window_id, perf_id)| {
                    !used_perf.contains(perf_id)
                        && !perf_candidates[perf_id].iter().any(|(rival_window, rival)| {
                            rival_window < window_id
                                && rival != score_id
                                && !used_score.contains(rival)
                        })
                })
                .map(|(_, perf_id)| perf_id)
        };

        if let Some(perf_id) = accepted {
            used_score.insert(score_id.clone());
            used_perf.insert(perf_id.clone());
            mended.push(Alignment::Match {
                score_id: score_id.clone(),
                performance_id: perf_id.clone(),
            });
        }
    }

    // Leftovers get a greedy pass before being written off.
    let leftover_score = NoteArray::new(
        score
            .iter()
            .filter(|n| !used_score.contains(&n.id))
            .cloned()
            .collect(),
    );
    let leftover_perf = NoteArray::new(
        performance
            .iter()
            .filter(|n| !used_perf.contains(&n.id))
            .cloned()
            .collect(),
    );
    for record in greedy_alignment(&leftover_score, &leftover_perf) {
        if let Alignment::Match {
            score_id,
            performance_id,
        } = record
        {
            if !used_score.contains(&score_id) && !used_perf.contains(&performance_id) {
                used_score.insert(score_id.clone());
                used_perf.insert(performance_id.clone());
                mended.push(Alignment::Match {
                    score_id,
                    performance_id,
                });
            }
        }
    }

    for note in score.iter() {
        if !used_score.contains(&note.id) {
            mended.push(Alignment::Deletion {
                score_id: note.id.clone(),
            });
        }
    }
    for note in performance.iter() {
        if !used_perf.contains(&note.id) {
            mended.push(Alignment::Insertion {
                performance_id: note.id.clone(),
            });
        }
    }

    mended
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Note;

    fn note_arrays(score_ids: &[&str], perf_ids: &[&str]) -> (NoteArray, NoteArray) {
        let score = NoteArray::new(
            score_ids
                .iter()
                .enumerate()
                .map(|(i, id)| Note::score(*id, 60, i as f32, 0.5))
                .collect(),
        );
        let performance = NoteArray::new(
            perf_ids
                .iter()
                .enumerate()
                .map(|(i, id)| Note::performance(*id, 60, i as f32, 0.5, 70))
                .collect(),
        );
        (score, performance)
    }

    fn matched(score_id: &str, performance_id: &str) -> Alignment {
        Alignment::Match {
            score_id: score_id.into(),
            performance_id: performance_id.into(),
        }
    }

    #[test]
    fn test_agreeing_windows_merge() {
        let (score, performance) = note_arrays(&["s0", "s1"], &["p0", "p1"]);
        let windows = vec![
            vec![matched("s0", "p0"), matched("s1", "p1")],
            vec![matched("s0", "p0"), matched("s1", "p1")],
        ];

        let mended = mend_note_alignments(&windows, &score, &performance);
        assert_eq!(mended.len(), 2);
        assert!(mended.contains(&matched("s0", "p0")));
        assert!(mended.contains(&matched("s1", "p1")));
    }

    #[test]
    fn test_conflicting_windows_prefer_lowest() {
        // Window 0 pairs (s0, p0); window 1 disagrees and pairs (s1, p0).
        // The earlier window wins and s1 falls through to the greedy pass,
        // which hands it the free p1.
        let (score, performance) = note_arrays(&["s0", "s1"], &["p0", "p1"]);
        let windows = vec![vec![matched("s0", "p0")], vec![matched("s1", "p0")]];

        let mended = mend_note_alignments(&windows, &score, &performance);
        assert!(mended.contains(&matched("s0", "p0")));
        assert!(mended.contains(&matched("s1", "p1")));
        assert_eq!(mended.len(), 2);
    }

    #[test]
    fn test_unmatched_become_deletions_and_insertions() {
        let (score, performance) = note_arrays(&["s0", "s1"], &["p0"]);
        let windows = vec![vec![matched("s0", "p0")]];

        let mut score_pitched = score.clone();
        score_pitched.notes[1].pitch = 61; // greedy cannot pair it with p0

        let mended = mend_note_alignments(&windows, &score_pitched, &performance);
        assert!(mended.contains(&matched("s0", "p0")));
        assert!(mended.contains(&Alignment::Deletion {
            score_id: "s1".into()
        }));
        assert_eq!(mended.len(), 2);
    }

    #[test]
    fn test_no_windows_falls_back_to_greedy() {
        let (score, performance) = note_arrays(&["s0"], &["p0", "p1"]);
        let mended = mend_note_alignments(&[], &score, &performance);

        assert!(mended.contains(&matched("s0", "p0")));
        assert!(mended.contains(&Alignment::Insertion {
            performance_id: "p1".into()
        }));
        assert_eq!(mended.len(), 2);
    }

    #[test]
    fn test_every_id_exactly_once() {
        let (score, performance) = note_arrays(&["s0", "s1", "s2"], &["p0", "p1"]);
        let windows = vec![
            vec![matched("s0", "p0"), matched("s1", "p1")],
            vec![matched("s1", "p0"), matched("s2", "p1")],
        ];

        let mended = mend_note_alignments(&windows, &score, &performance);

        let mut score_seen: Vec<&str> = mended.iter().filter_map(|a| a.score_id()).collect();
        score_seen.sort_unstable();
        assert_eq!(score_seen, vec!["s0", "s1", "s2"]);

        let mut perf_seen: Vec<&str> = mended.iter().filter_map(|a| a.performance_id()).collect();
        perf_seen.sort_unstable();
        assert_eq!(perf_seen, vec!["p0", "p1"]);
    }
}
