//! Pitch-wise sequence matching with bounded combinatorial omission search.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::interp::LinearInterpolator;
use crate::matcher::greedy_alignment;
use crate::note::{Alignment, NoteArray, TimeAnchor};

/// Pitch-wise matcher guided by a window's time anchors.
///
/// Score onsets are projected into performance time through a linear
/// interpolator over the anchors; per pitch, the two onset sequences are
/// paired in sorted order. When one side has surplus notes, the matcher
/// searches over which surplus notes to omit so that the retained sequence
/// fits the shorter side with the least squared onset error. The search
/// enumerates all index combinations up to a budget and falls back to
/// uniform random sampling beyond it; the random source is seedable for
/// reproducible runs.
pub struct SequenceMatcher {
    rng: StdRng,
}

impl SequenceMatcher {
    /// Create a matcher with an entropy-seeded sampling source.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a matcher whose sampling branch is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Align one window of notes under its time anchors.
    ///
    /// With fewer than two anchors no projection is possible and the simple
    /// greedy matcher takes over. `shift` allows a per-pitch constant offset
    /// to be factored out of the residual; `cap_combinations` bounds the
    /// omission search (0 disables it, degrading to prefix pairing).
    pub fn align(
        &mut self,
        score: &NoteArray,
        performance: &NoteArray,
        anchors: &[TimeAnchor],
        shift: bool,
        cap_combinations: usize,
    ) -> Result<Vec<Alignment>> {
        if anchors.len() < 2 {
            return Ok(greedy_alignment(score, performance));
        }

        let score_times: Vec<f32> = anchors.iter().map(|a| a.score_time).collect();
        let perf_times: Vec<f32> = anchors.iter().map(|a| a.performance_time).collect();
        let interp = LinearInterpolator::new(&score_times, &perf_times)?;

        let mut alignment: Vec<Alignment> = Vec::new();
        let mut consumed: HashSet<String> = HashSet::new();

        for pitch in score.unique_pitches() {
            let s_notes = score.filter_by_pitch(pitch);
            let p_notes = performance.filter_by_pitch(pitch);

            if p_notes.is_empty() {
                for note in s_notes.iter() {
                    alignment.push(Alignment::Deletion {
                        score_id: note.id.clone(),
                    });
                }
                continue;
            }

            // Projected score onsets and performance onsets, sorted.
            let projected = interp.map(&s_notes.onset_beats());
            let perf_onsets = p_notes.onset_secs();

            let mut s_order: Vec<usize> = (0..projected.len()).collect();
            s_order.sort_by(|&i, &j| projected[i].total_cmp(&projected[j]));
            let mut p_order: Vec<usize> = (0..perf_onsets.len()).collect();
            p_order.sort_by(|&i, &j| perf_onsets[i].total_cmp(&perf_onsets[j]));

            let s_sorted: Vec<f32> = s_order.iter().map(|&i| projected[i]).collect();
            let p_sorted: Vec<f32> = p_order.iter().map(|&i| perf_onsets[i]).collect();

            if s_sorted.len() == p_sorted.len() {
                for (&si, &pi) in s_order.iter().zip(p_order.iter()) {
                    consumed.insert(p_notes[pi].id.clone());
                    alignment.push(Alignment::Match {
                        score_id: s_notes[si].id.clone(),
                        performance_id: p_notes[pi].id.clone(),
                    });
                }
            } else if s_sorted.len() > p_sorted.len() {
                // Score surplus: omitted score notes were not performed.
                let omit = self.best_omission(&s_sorted, &p_sorted, shift, cap_combinations);
                let mut next_p = 0;
                for (k, &si) in s_order.iter().enumerate() {
                    if !omit.contains(&k) && next_p < p_order.len() {
                        let pi = p_order[next_p];
                        next_p += 1;
                        consumed.insert(p_notes[pi].id.clone());
                        alignment.push(Alignment::Match {
                            score_id: s_notes[si].id.clone(),
                            performance_id: p_notes[pi].id.clone(),
                        });
                    } else {
                        alignment.push(Alignment::Deletion {
                            score_id: s_notes[si].id.clone(),
                        });
                    }
                }
            } else {
                // Performance surplus: omitted performance notes are extra.
                let omit = self.best_omission(&p_sorted, &s_sorted, shift, cap_combinations);
                let mut next_s = 0;
                for (k, &pi) in p_order.iter().enumerate() {
                    consumed.insert(p_notes[pi].id.clone());
                    if !omit.contains(&k) && next_s < s_order.len() {
                        let si = s_order[next_s];
                        next_s += 1;
                        alignment.push(Alignment::Match {
                            score_id: s_notes[si].id.clone(),
                            performance_id: p_notes[pi].id.clone(),
                        });
                    } else {
                        alignment.push(Alignment::Insertion {
                            performance_id: p_notes[pi].id.clone(),
                        });
                    }
                }
            }
        }

        // Performance notes of pitches absent from the score.
        for note in performance.iter() {
            if !consumed.contains(&note.id) {
                alignment.push(Alignment::Insertion {
                    performance_id: note.id.clone(),
                });
            }
        }

        Ok(alignment)
    }

    /// Pick the surplus indices of `long` whose omission leaves the best
    /// fit against `short`.
    fn best_omission(
        &mut self,
        long: &[f32],
        short: &[f32],
        shift: bool,
        cap_combinations: usize,
    ) -> HashSet<usize> {
        let surplus = long.len() - short.len();
        if surplus == 0 || cap_combinations == 0 {
            return HashSet::new();
        }

        let mut best_residual = f64::INFINITY;
        let mut best: Vec<usize> = Vec::new();

        if count_combinations(long.len(), surplus) <= cap_combinations as f64 {
            let mut combo: Vec<usize> = (0..surplus).collect();
            loop {
                let r = omission_residual(long, short, &combo, shift);
                if r < best_residual {
                    best_residual = r;
                    best = combo.clone();
                }
                if !next_combination(&mut combo, long.len()) {
                    break;
                }
            }
        } else {
            for _ in 0..cap_combinations {
                let combo = sample_indices(&mut self.rng, long.len(), surplus);
                let r = omission_residual(long, short, &combo, shift);
                if r < best_residual {
                    best_residual = r;
                    best = combo;
                }
            }
        }

        best.into_iter().collect()
    }
}

impl Default for SequenceMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Binomial coefficient C(n, k) as a float, for the cap check.
fn count_combinations(n: usize, k: usize) -> f64 {
    let mut total = 1.0f64;
    for i in 0..k {
        total *= (n - i) as f64 / (i + 1) as f64;
    }
    total
}

/// Squared onset error of `long` with the `omit` indices removed, paired
/// in order against `short`; with `shift`, the mean offset is factored out
/// first.
fn omission_residual(long: &[f32], short: &[f32], omit: &[usize], shift: bool) -> f64 {
    let mut omitted = vec![false; long.len()];
    for &i in omit {
        omitted[i] = true;
    }
    let retained: Vec<f64> = long
        .iter()
        .enumerate()
        .filter(|(i, _)| !omitted[*i])
        .map(|(_, &t)| t as f64)
        .collect();

    if shift && retained.len() == short.len() {
        let mean = retained
            .iter()
            .zip(short.iter())
            .map(|(&l, &s)| l - s as f64)
            .sum::<f64>()
            / retained.len() as f64;
        retained
            .iter()
            .zip(short.iter())
            .map(|(&l, &s)| {
                let d = l - s as f64 - mean;
                d * d
            })
            .sum()
    } else {
        retained
            .iter()
            .zip(short.iter())
            .map(|(&l, &s)| {
                let d = l - s as f64;
                d * d
            })
            .sum()
    }
}

/// Advance `combo` to the next lexicographic k-combination of `0..n`.
/// Returns false when the sweep is exhausted.
fn next_combination(combo: &mut [usize], n: usize) -> bool {
    let k = combo.len();
    let mut i = k;
    while i > 0 {
        i -= 1;
        if combo[i] < n - (k - i) {
            combo[i] += 1;
            for j in i + 1..k {
                combo[j] = combo[j - 1] + 1;
            }
            return true;
        }
    }
    false
}

/// Draw `k` distinct indices from `0..n` uniformly.
fn sample_indices(rng: &mut StdRng, n: usize, k: usize) -> Vec<usize> {
    let mut pool: Vec<usize> = (0..n).collect();
    let mut combo = Vec::with_capacity(k);
    for _ in 0..k {
        let pick = rng.gen_range(0..pool.len());
        combo.push(pool.swap_remove(pick));
    }
    combo
}
