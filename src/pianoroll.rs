//! Piano-roll rasterization of note sequences.

use ndarray::Array2;

use crate::note::{Note, NoteArray};

/// Rasterize a note array into a time × pitch grid.
///
/// The time axis is chosen from the first note: if it carries any non-zero
/// beat-domain field the grid is indexed in beats, otherwise in seconds.
/// Each unit of time is split into `time_div` cells; a cell is 1.0 while a
/// note of that pitch is sounding and 0.0 otherwise. The pitch axis spans
/// the occupied pitch range only.
///
/// With `remove_drums`, notes with pitch ≥ 128 are left out.
///
/// Returns a 0×0 grid for an empty input (or when drum removal excludes
/// every note).
///
/// # Arguments
/// * `notes` - Note sequence to rasterize
/// * `time_div` - Cells per unit of time (beat or second)
/// * `remove_drums` - Skip drum events (pitch ≥ 128)
///
/// # Example
/// ```
/// use scoralign::{Note, NoteArray};
/// use scoralign::pianoroll::compute_pianoroll;
///
/// let notes = NoteArray::new(vec![
///     Note::score("s0", 60, 0.0, 1.0),
///     Note::score("s1", 62, 1.0, 1.0),
/// ]);
/// let roll = compute_pianoroll(&notes, 4, false);
/// assert_eq!(roll.shape(), &[9, 3]); // ceil(2.0 * 4) + 1 steps, pitches 60..=62
/// assert_eq!(roll[[0, 0]], 1.0);     // C4 sounding at t = 0
/// assert_eq!(roll[[0, 2]], 0.0);     // D4 not yet
/// ```
pub fn compute_pianoroll(notes: &NoteArray, time_div: usize, remove_drums: bool) -> Array2<f32> {
    let kept: Vec<_> = notes
        .iter()
        .filter(|n| !(remove_drums && n.pitch >= 128))
        .collect();
    if kept.is_empty() {
        return Array2::zeros((0, 0));
    }

    let use_beats = notes[0].onset_beat != 0.0 || notes[0].duration_beat != 0.0;
    let onset_of = |n: &Note| if use_beats { n.onset_beat } else { n.onset_sec };
    let duration_of = |n: &Note| {
        if use_beats {
            n.duration_beat
        } else {
            n.duration_sec
        }
    };

    let mut max_time = 0.0f32;
    let mut min_pitch = u8::MAX;
    let mut max_pitch = u8::MIN;
    for &note in &kept {
        max_time = max_time.max(onset_of(note) + duration_of(note));
        min_pitch = min_pitch.min(note.pitch);
        max_pitch = max_pitch.max(note.pitch);
    }

    let n_steps = (max_time * time_div as f32).ceil() as usize + 1;
    let n_pitches = (max_pitch - min_pitch) as usize + 1;
    let mut roll = Array2::zeros((n_steps, n_pitches));

    for &note in &kept {
        let start = (onset_of(note) * time_div as f32).floor().max(0.0) as usize;
        let end = ((onset_of(note) + duration_of(note)) * time_div as f32).floor() as usize;
        let pitch_idx = (note.pitch - min_pitch) as usize;
        for t in start..=end.min(n_steps - 1) {
            roll[[t, pitch_idx]] = 1.0;
        }
    }

    roll
}

/// Threshold every positive cell to 1.0 in place.
pub fn binarize(roll: &mut Array2<f32>) {
    roll.mapv_inplace(|v| if v > 0.0 { 1.0 } else { 0.0 });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Note;

    #[test]
    fn test_pianoroll_score_axis() {
        let notes = NoteArray::new(vec![
            Note::score("s0", 60, 0.0, 0.5),
            Note::score("s1", 72, 1.0, 0.5),
        ]);
        let roll = compute_pianoroll(&notes, 16, false);

        // ceil(1.5 * 16) + 1 time steps, pitches 60..=72.
        assert_eq!(roll.shape(), &[25, 13]);
        assert_eq!(roll[[0, 0]], 1.0);
        assert_eq!(roll[[8, 0]], 1.0); // floor(0.5 * 16) inclusive
        assert_eq!(roll[[9, 0]], 0.0);
        assert_eq!(roll[[16, 12]], 1.0);
    }

    #[test]
    fn test_pianoroll_seconds_axis() {
        let notes = NoteArray::new(vec![Note::performance("p0", 64, 0.25, 0.25, 70)]);
        let roll = compute_pianoroll(&notes, 4, false);

        assert_eq!(roll.shape(), &[3, 1]);
        assert_eq!(roll[[0, 0]], 0.0);
        assert_eq!(roll[[1, 0]], 1.0);
        assert_eq!(roll[[2, 0]], 1.0);
    }

    #[test]
    fn test_pianoroll_empty() {
        let roll = compute_pianoroll(&NoteArray::default(), 16, false);
        assert_eq!(roll.shape(), &[0, 0]);
    }

    #[test]
    fn test_pianoroll_remove_drums() {
        let notes = NoteArray::new(vec![
            Note::performance("p0", 60, 0.0, 0.5, 64),
            Note::performance("drum", 130, 0.0, 0.5, 64),
        ]);
        let roll = compute_pianoroll(&notes, 4, true);
        assert_eq!(roll.shape()[1], 1);

        let only_drums = NoteArray::new(vec![Note::performance("drum", 130, 0.0, 0.5, 64)]);
        assert_eq!(compute_pianoroll(&only_drums, 4, true).shape(), &[0, 0]);
    }

    #[test]
    fn test_binarize() {
        let notes = NoteArray::new(vec![
            Note::performance("p0", 60, 0.0, 0.5, 64),
            Note::performance("p1", 60, 0.25, 0.5, 64),
        ]);
        let mut roll = compute_pianoroll(&notes, 4, false);
        binarize(&mut roll);
        assert!(roll.iter().all(|&v| v == 0.0 || v == 1.0));
    }
}
