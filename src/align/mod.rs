//! Coarse-to-fine alignment stages: anchor extraction, window cutting, and
//! global mending.

mod anchors;
mod mend;
mod windows;

pub use anchors::anchors_from_dtw;
pub use mend::mend_note_alignments;
pub use windows::cut_note_arrays;
