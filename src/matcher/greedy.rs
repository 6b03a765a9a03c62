//! First-fit greedy note matching.

use crate::note::{Alignment, NoteArray};

/// Match notes greedily by pitch, first come first served.
///
/// Each score note takes the first unconsumed performance note of the same
/// pitch, in input order. Unmatched score notes become deletions; leftover
/// performance notes become insertions. Used as the baseline matcher and as
/// the fallback when a window has too few anchors for the combinatorial
/// matcher.
///
/// # Example
/// ```
/// use scoralign::{Note, NoteArray};
/// use scoralign::matcher::greedy_alignment;
///
/// let score = NoteArray::new(vec![Note::score("s0", 60, 0.0, 1.0)]);
/// let performance = NoteArray::new(vec![
///     Note::performance("p0", 60, 0.1, 1.0, 70),
///     Note::performance("p1", 64, 0.1, 1.0, 70),
/// ]);
/// let alignment = greedy_alignment(&score, &performance);
/// assert_eq!(alignment.len(), 2); // one match, one insertion
/// ```
pub fn greedy_alignment(score: &NoteArray, performance: &NoteArray) -> Vec<Alignment> {
    let mut alignment = Vec::with_capacity(score.len() + performance.len());
    let mut consumed = vec![false; performance.len()];

    for score_note in score.iter() {
        let hit = performance
            .iter()
            .enumerate()
            .find(|(j, p)| !consumed[*j] && p.pitch == score_note.pitch);
        match hit {
            Some((j, perf_note)) => {
                consumed[j] = true;
                alignment.push(Alignment::Match {
                    score_id: score_note.id.clone(),
                    performance_id: perf_note.id.clone(),
                });
            }
            None => alignment.push(Alignment::Deletion {
                score_id: score_note.id.clone(),
            }),
        }
    }

    for (j, perf_note) in performance.iter().enumerate() {
        if !consumed[j] {
            alignment.push(Alignment::Insertion {
                performance_id: perf_note.id.clone(),
            });
        }
    }

    alignment
}
