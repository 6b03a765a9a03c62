//! Top-level orchestration of the hierarchical alignment pipeline.

use std::time::{Duration, Instant};

use crate::align::{anchors_from_dtw, cut_note_arrays, mend_note_alignments};
use crate::dtw::Dtw;
use crate::error::Result;
use crate::matcher::{greedy_alignment, SequenceMatcher};
use crate::note::{Alignment, NoteArray, TimeAnchor};

/// Strategy for the per-window anchor computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlignmentType {
    /// Re-run piano-roll DTW inside every window (default).
    #[default]
    Dtw,
    /// Interpolate linearly between the window's coarse anchors.
    Linear,
    /// Skip anchor computation and match every window greedily.
    Greedy,
}

/// Configuration for [`AutomaticNoteMatcher`].
///
/// # Example
/// ```
/// use scoralign::{AlignmentType, MatcherConfig};
///
/// let config = MatcherConfig::default()
///     .with_alignment_type(AlignmentType::Linear)
///     .with_window_size(2)
///     .with_seed(Some(42));
/// assert_eq!(config.window_size, 2);
/// ```
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Per-window anchor strategy.
    pub alignment_type: AlignmentType,
    /// Node length hook for the fine pass. Accepted for API compatibility;
    /// the present pipeline body never reads it.
    pub score_fine_node_length: f32,
    /// Score piano-roll cells per beat.
    pub s_time_div: usize,
    /// Performance piano-roll cells per second.
    pub p_time_div: usize,
    /// Score window half-margin in beats.
    pub sfuzziness: f32,
    /// Performance window half-margin in seconds, before tempo scaling.
    pub pfuzziness: f32,
    /// Anchors spanned per window.
    pub window_size: usize,
    /// Scale the performance margin by the window's local tempo ratio.
    pub pfuzziness_relative_to_tempo: bool,
    /// Allow a per-pitch constant onset shift in the omission search.
    pub shift_onsets: bool,
    /// Combination budget of the omission search.
    pub cap_combinations: usize,
    /// Seed for the sampling branch of the omission search; `None` seeds
    /// from entropy.
    pub seed: Option<u64>,
}

impl MatcherConfig {
    /// Set the per-window anchor strategy.
    pub fn with_alignment_type(mut self, alignment_type: AlignmentType) -> Self {
        self.alignment_type = alignment_type;
        self
    }

    /// Set the fine-pass node length hook.
    pub fn with_score_fine_node_length(mut self, score_fine_node_length: f32) -> Self {
        self.score_fine_node_length = score_fine_node_length;
        self
    }

    /// Set the score piano-roll subdivision.
    pub fn with_s_time_div(mut self, s_time_div: usize) -> Self {
        self.s_time_div = s_time_div;
        self
    }

    /// Set the performance piano-roll subdivision.
    pub fn with_p_time_div(mut self, p_time_div: usize) -> Self {
        self.p_time_div = p_time_div;
        self
    }

    /// Set the score window half-margin (beats).
    pub fn with_sfuzziness(mut self, sfuzziness: f32) -> Self {
        self.sfuzziness = sfuzziness;
        self
    }

    /// Set the performance window half-margin (seconds).
    pub fn with_pfuzziness(mut self, pfuzziness: f32) -> Self {
        self.pfuzziness = pfuzziness;
        self
    }

    /// Set the number of anchors spanned per window.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Toggle tempo-relative scaling of the performance margin.
    pub fn with_pfuzziness_relative_to_tempo(mut self, relative: bool) -> Self {
        self.pfuzziness_relative_to_tempo = relative;
        self
    }

    /// Toggle the per-pitch onset shift.
    pub fn with_shift_onsets(mut self, shift_onsets: bool) -> Self {
        self.shift_onsets = shift_onsets;
        self
    }

    /// Set the combination budget.
    pub fn with_cap_combinations(mut self, cap_combinations: usize) -> Self {
        self.cap_combinations = cap_combinations;
        self
    }

    /// Set the sampling seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            alignment_type: AlignmentType::Dtw,
            score_fine_node_length: 0.25,
            s_time_div: 16,
            p_time_div: 16,
            sfuzziness: 4.0,
            pfuzziness: 4.0,
            window_size: 1,
            pfuzziness_relative_to_tempo: true,
            shift_onsets: false,
            cap_combinations: 10_000,
            seed: None,
        }
    }
}

/// Wall-clock time spent in each pipeline stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageTimings {
    /// Coarse piano-roll DTW pass.
    pub coarse: Duration,
    /// Window cutting.
    pub windowing: Duration,
    /// Per-window anchor computation and symbolic matching.
    pub matching: Duration,
    /// Global mending.
    pub mending: Duration,
}

/// Hierarchical score-to-performance note matcher.
///
/// A coarse DTW over piano rolls yields time anchors; the anchors cut both
/// sequences into fuzzy overlapping windows; each window is matched
/// pitch-wise; and the per-window decisions are mended into one global
/// alignment in which every note appears exactly once.
///
/// # Example
/// ```
/// use scoralign::{AutomaticNoteMatcher, MatcherConfig, Note, NoteArray};
///
/// let score = NoteArray::new(vec![
///     Note::score("s0", 60, 0.0, 0.5),
///     Note::score("s1", 64, 1.0, 0.5),
/// ]);
/// let performance = NoteArray::new(vec![
///     Note::performance("p0", 60, 0.0, 0.6, 70),
///     Note::performance("p1", 64, 1.2, 0.6, 70),
/// ]);
///
/// let mut matcher = AutomaticNoteMatcher::new(MatcherConfig::default());
/// let alignment = matcher.align(&score, &performance).unwrap();
/// assert_eq!(alignment.len(), 2);
/// ```
pub struct AutomaticNoteMatcher {
    config: MatcherConfig,
    note_matcher: Dtw,
    symbolic_matcher: SequenceMatcher,
}

impl AutomaticNoteMatcher {
    /// Create a matcher with the given configuration.
    pub fn new(config: MatcherConfig) -> Self {
        let symbolic_matcher = match config.seed {
            Some(seed) => SequenceMatcher::with_seed(seed),
            None => SequenceMatcher::new(),
        };
        Self {
            config,
            note_matcher: Dtw::default(),
            symbolic_matcher,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Align a score with a performance.
    pub fn align(&mut self, score: &NoteArray, performance: &NoteArray) -> Result<Vec<Alignment>> {
        self.align_with_stats(score, performance).map(|(a, _)| a)
    }

    /// Align a score with a performance, returning per-stage timings.
    pub fn align_with_stats(
        &mut self,
        score: &NoteArray,
        performance: &NoteArray,
    ) -> Result<(Vec<Alignment>, StageTimings)> {
        let mut timings = StageTimings::default();

        let started = Instant::now();
        let coarse_anchors = anchors_from_dtw(
            score,
            performance,
            &self.note_matcher,
            self.config.s_time_div,
            self.config.p_time_div,
        );
        timings.coarse = started.elapsed();
        log::debug!(
            "coarse DTW pass: {} anchors in {:?}",
            coarse_anchors.len(),
            timings.coarse
        );

        let started = Instant::now();
        let (score_windows, performance_windows) = cut_note_arrays(
            score,
            performance,
            &coarse_anchors,
            self.config.sfuzziness,
            self.config.pfuzziness,
            self.config.window_size,
            self.config.pfuzziness_relative_to_tempo,
        );
        timings.windowing = started.elapsed();
        log::debug!(
            "cutting: {} windows in {:?}",
            score_windows.len(),
            timings.windowing
        );

        let started = Instant::now();
        let mut window_alignments: Vec<Vec<Alignment>> = Vec::with_capacity(score_windows.len());
        for (window_id, (score_window, performance_window)) in score_windows
            .iter()
            .zip(performance_windows.iter())
            .enumerate()
        {
            if self.config.alignment_type == AlignmentType::Greedy {
                window_alignments.push(greedy_alignment(score_window, performance_window));
                continue;
            }

            let window_anchors = match self.config.alignment_type {
                AlignmentType::Dtw
                    if !score_window.is_empty() && !performance_window.is_empty() =>
                {
                    anchors_from_dtw(
                        score_window,
                        performance_window,
                        &self.note_matcher,
                        self.config.s_time_div,
                        self.config.p_time_div,
                    )
                }
                _ => surrounding_anchors(&coarse_anchors, window_id),
            };

            window_alignments.push(self.symbolic_matcher.align(
                score_window,
                performance_window,
                &window_anchors,
                self.config.shift_onsets,
                self.config.cap_combinations,
            )?);
        }
        timings.matching = started.elapsed();
        log::debug!(
            "fine anchor passes and symbolic matching in {:?}",
            timings.matching
        );

        let started = Instant::now();
        let alignment = mend_note_alignments(&window_alignments, score, performance);
        timings.mending = started.elapsed();
        log::debug!(
            "mending: {} records in {:?}",
            alignment.len(),
            timings.mending
        );

        Ok((alignment, timings))
    }
}

/// The two coarse anchors delimiting a window, when available.
fn surrounding_anchors(anchors: &[TimeAnchor], window_id: usize) -> Vec<TimeAnchor> {
    if window_id + 1 < anchors.len() {
        vec![anchors[window_id], anchors[window_id + 1]]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Note;

    fn fixtures() -> (NoteArray, NoteArray) {
        let pitches = [60u8, 62, 64, 65, 67, 69, 71, 72];
        let score = NoteArray::new(
            pitches
                .iter()
                .enumerate()
                .map(|(i, &p)| Note::score(format!("s{i}"), p, i as f32 * 0.5, 0.4))
                .collect(),
        );
        let performance = NoteArray::new(
            pitches
                .iter()
                .enumerate()
                .map(|(i, &p)| Note::performance(format!("p{i}"), p, i as f32 * 0.6, 0.4, 70))
                .collect(),
        );
        (score, performance)
    }

    #[test]
    fn test_default_config() {
        let config = MatcherConfig::default();
        assert_eq!(config.alignment_type, AlignmentType::Dtw);
        assert_eq!(config.s_time_div, 16);
        assert_eq!(config.p_time_div, 16);
        assert_eq!(config.sfuzziness, 4.0);
        assert_eq!(config.pfuzziness, 4.0);
        assert_eq!(config.window_size, 1);
        assert!(config.pfuzziness_relative_to_tempo);
        assert!(!config.shift_onsets);
        assert_eq!(config.cap_combinations, 10_000);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_empty_inputs_yield_empty_alignment() {
        let mut matcher = AutomaticNoteMatcher::new(MatcherConfig::default());
        let alignment = matcher
            .align(&NoteArray::default(), &NoteArray::default())
            .unwrap();
        assert!(alignment.is_empty());
    }

    #[test]
    fn test_stage_timings_are_reported() {
        let (score, performance) = fixtures();
        let mut matcher = AutomaticNoteMatcher::new(MatcherConfig::default());
        let (alignment, timings) = matcher.align_with_stats(&score, &performance).unwrap();

        assert!(!alignment.is_empty());
        assert!(timings.coarse > Duration::ZERO);
    }

    #[test]
    fn test_surrounding_anchors() {
        let anchors = vec![
            TimeAnchor::new(0.0, 0.0),
            TimeAnchor::new(1.0, 2.0),
            TimeAnchor::new(2.0, 4.0),
        ];
        assert_eq!(surrounding_anchors(&anchors, 0).len(), 2);
        assert_eq!(surrounding_anchors(&anchors, 1).len(), 2);
        assert!(surrounding_anchors(&anchors, 2).is_empty());
    }
}
