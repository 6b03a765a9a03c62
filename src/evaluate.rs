//! Set-wise F-score evaluation of alignments.

use std::collections::HashSet;

use crate::note::{Alignment, AlignmentLabel};

/// Precision, recall, and F-score of a predicted alignment, with the
/// filtered record counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FScore {
    pub precision: f64,
    pub recall: f64,
    pub f_score: f64,
    /// Predicted records surviving the label filter.
    pub n_predicted: usize,
    /// Ground-truth records surviving the label filter.
    pub n_ground_truth: usize,
}

/// Score a predicted alignment against ground truth over selected labels.
///
/// Both lists are filtered to the given labels; a predicted record counts
/// as correct when the identical record (same label and ids) appears in the
/// filtered ground truth. When both filtered sides are empty the result is
/// a perfect score; a ratio with an empty denominator is 0.
///
/// # Example
/// ```
/// use scoralign::evaluate::fscore_alignments;
/// use scoralign::{Alignment, AlignmentLabel};
///
/// let truth = vec![
///     Alignment::Match { score_id: "s0".into(), performance_id: "p0".into() },
///     Alignment::Deletion { score_id: "s1".into() },
/// ];
/// let result = fscore_alignments(&truth, &truth, &[AlignmentLabel::Match]);
/// assert_eq!(result.f_score, 1.0);
/// assert_eq!(result.n_predicted, 1); // the deletion is filtered out
/// ```
pub fn fscore_alignments(
    prediction: &[Alignment],
    ground_truth: &[Alignment],
    labels: &[AlignmentLabel],
) -> FScore {
    let predicted: Vec<&Alignment> = prediction
        .iter()
        .filter(|a| labels.contains(&a.label()))
        .collect();
    let truth: HashSet<&Alignment> = ground_truth
        .iter()
        .filter(|a| labels.contains(&a.label()))
        .collect();

    let n_predicted = predicted.len();
    let n_ground_truth = truth.len();

    if n_predicted == 0 && n_ground_truth == 0 {
        return FScore {
            precision: 1.0,
            recall: 1.0,
            f_score: 1.0,
            n_predicted,
            n_ground_truth,
        };
    }

    let n_correct = predicted.iter().filter(|a| truth.contains(*a)).count();

    let precision = if n_predicted > 0 {
        n_correct as f64 / n_predicted as f64
    } else {
        0.0
    };
    let recall = if n_ground_truth > 0 {
        n_correct as f64 / n_ground_truth as f64
    } else {
        0.0
    };
    let f_score = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    FScore {
        precision,
        recall,
        f_score,
        n_predicted,
        n_ground_truth,
    }
}

/// Score only the `Match` records.
pub fn fscore_matches(prediction: &[Alignment], ground_truth: &[Alignment]) -> FScore {
    fscore_alignments(prediction, ground_truth, &[AlignmentLabel::Match])
}
