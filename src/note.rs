//! Note records, note sequences, and alignment labels.

/// A single musical note, covering both the score and performance domains.
///
/// Score notes live on the metric timeline (`onset_beat`/`duration_beat`);
/// performance notes live on the wall-clock timeline (`onset_sec`/
/// `duration_sec`) and carry a `velocity`. Fields of the unused domain stay
/// at zero.
///
/// # Example
/// ```
/// use scoralign::Note;
///
/// let s = Note::score("s0", 60, 0.0, 0.5);
/// let p = Note::performance("p0", 60, 0.1, 0.45, 70);
/// assert_eq!(s.pitch, p.pitch);
/// assert_eq!(p.velocity, 70);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Note {
    /// Identifier, unique within its sequence.
    pub id: String,
    /// MIDI pitch. Values of 128 and above denote drum events.
    pub pitch: u8,
    /// Score onset in beats.
    pub onset_beat: f32,
    /// Score duration in beats.
    pub duration_beat: f32,
    /// Performance onset in seconds.
    pub onset_sec: f32,
    /// Performance duration in seconds.
    pub duration_sec: f32,
    /// Performance key velocity.
    pub velocity: u8,
}

impl Note {
    /// Create a score note on the beat timeline.
    pub fn score(id: impl Into<String>, pitch: u8, onset_beat: f32, duration_beat: f32) -> Self {
        Self {
            id: id.into(),
            pitch,
            onset_beat,
            duration_beat,
            ..Self::default()
        }
    }

    /// Create a performance note on the seconds timeline.
    pub fn performance(
        id: impl Into<String>,
        pitch: u8,
        onset_sec: f32,
        duration_sec: f32,
        velocity: u8,
    ) -> Self {
        Self {
            id: id.into(),
            pitch,
            onset_sec,
            duration_sec,
            velocity,
            ..Self::default()
        }
    }
}

/// An ordered sequence of notes.
///
/// No ordering or uniqueness invariant is imposed on construction; the
/// alignment stages re-sort where they depend on order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteArray {
    /// The notes, in caller-supplied order.
    pub notes: Vec<Note>,
}

impl NoteArray {
    /// Create a note array from a vector of notes.
    pub fn new(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    /// Number of notes.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Whether the array holds no notes.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Iterate over the notes in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Note> {
        self.notes.iter()
    }

    /// All notes with the given pitch, preserving order.
    pub fn filter_by_pitch(&self, pitch: u8) -> NoteArray {
        NoteArray::new(
            self.notes
                .iter()
                .filter(|n| n.pitch == pitch)
                .cloned()
                .collect(),
        )
    }

    /// Distinct pitches present in the array, ascending.
    pub fn unique_pitches(&self) -> Vec<u8> {
        let set: std::collections::BTreeSet<u8> = self.notes.iter().map(|n| n.pitch).collect();
        set.into_iter().collect()
    }

    /// Score onsets (beats) in note order.
    pub fn onset_beats(&self) -> Vec<f32> {
        self.notes.iter().map(|n| n.onset_beat).collect()
    }

    /// Performance onsets (seconds) in note order.
    pub fn onset_secs(&self) -> Vec<f32> {
        self.notes.iter().map(|n| n.onset_sec).collect()
    }
}

impl From<Vec<Note>> for NoteArray {
    fn from(notes: Vec<Note>) -> Self {
        Self::new(notes)
    }
}

impl std::ops::Index<usize> for NoteArray {
    type Output = Note;

    fn index(&self, idx: usize) -> &Note {
        &self.notes[idx]
    }
}

impl<'a> IntoIterator for &'a NoteArray {
    type Item = &'a Note;
    type IntoIter = std::slice::Iter<'a, Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}

/// One record of a note-level alignment.
///
/// A complete alignment mentions every score id exactly once (as `Match` or
/// `Deletion`) and every performance id exactly once (as `Match` or
/// `Insertion`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// A score note was played as a specific performance note.
    Match {
        score_id: String,
        performance_id: String,
    },
    /// A score note was not performed.
    Deletion { score_id: String },
    /// A performance note has no score counterpart.
    Insertion { performance_id: String },
}

impl Alignment {
    /// The record's label.
    pub fn label(&self) -> AlignmentLabel {
        match self {
            Alignment::Match { .. } => AlignmentLabel::Match,
            Alignment::Deletion { .. } => AlignmentLabel::Deletion,
            Alignment::Insertion { .. } => AlignmentLabel::Insertion,
        }
    }

    /// The score id, if the record carries one.
    pub fn score_id(&self) -> Option<&str> {
        match self {
            Alignment::Match { score_id, .. } | Alignment::Deletion { score_id } => Some(score_id),
            Alignment::Insertion { .. } => None,
        }
    }

    /// The performance id, if the record carries one.
    pub fn performance_id(&self) -> Option<&str> {
        match self {
            Alignment::Match { performance_id, .. } | Alignment::Insertion { performance_id } => {
                Some(performance_id)
            }
            Alignment::Deletion { .. } => None,
        }
    }
}

/// Alignment record labels, for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentLabel {
    Match,
    Deletion,
    Insertion,
}

/// A paired (score time, performance time) point constraining local
/// alignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAnchor {
    /// Score time in beats.
    pub score_time: f32,
    /// Performance time in seconds.
    pub performance_time: f32,
}

impl TimeAnchor {
    /// Create an anchor from a score time (beats) and a performance time
    /// (seconds).
    pub fn new(score_time: f32, performance_time: f32) -> Self {
        Self {
            score_time,
            performance_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale() -> NoteArray {
        let pitches = [60u8, 62, 64, 65, 67, 69, 71, 72];
        NoteArray::new(
            pitches
                .iter()
                .enumerate()
                .map(|(i, &p)| Note::score(format!("s{i}"), p, i as f32 * 0.5, 0.4))
                .collect(),
        )
    }

    #[test]
    fn test_filter_by_pitch() {
        let notes = scale();
        let c4 = notes.filter_by_pitch(60);
        assert_eq!(c4.len(), 1);
        assert_eq!(c4[0].id, "s0");

        assert!(notes.filter_by_pitch(61).is_empty());
    }

    #[test]
    fn test_unique_pitches_sorted() {
        let mut notes = scale();
        notes.notes.push(Note::score("s8", 60, 4.0, 0.4));
        let pitches = notes.unique_pitches();
        assert_eq!(pitches, vec![60, 62, 64, 65, 67, 69, 71, 72]);
    }

    #[test]
    fn test_onset_accessors() {
        let notes = scale();
        let onsets = notes.onset_beats();
        assert_eq!(onsets.len(), 8);
        assert_eq!(onsets[0], 0.0);
        assert_eq!(onsets[1], 0.5);

        // Score notes keep performance fields at zero.
        assert!(notes.onset_secs().iter().all(|&t| t == 0.0));
    }

    #[test]
    fn test_alignment_accessors() {
        let m = Alignment::Match {
            score_id: "s0".into(),
            performance_id: "p0".into(),
        };
        assert_eq!(m.label(), AlignmentLabel::Match);
        assert_eq!(m.score_id(), Some("s0"));
        assert_eq!(m.performance_id(), Some("p0"));

        let d = Alignment::Deletion {
            score_id: "s1".into(),
        };
        assert_eq!(d.performance_id(), None);

        let i = Alignment::Insertion {
            performance_id: "p1".into(),
        };
        assert_eq!(i.score_id(), None);
    }
}
