//! Symbolic score-to-performance note alignment.
//!
//! Scoralign aligns a musical score (notes on a beat timeline) with a
//! recorded performance (notes on a wall-clock timeline) at the note level:
//! every score note ends up matched with a specific performance note or
//! marked deleted, and every surplus performance note is marked inserted.
//!
//! # Pipeline
//!
//! 1. Both sequences are rasterized into piano rolls and warped against each
//!    other with DTW, yielding coarse (score time, performance time) anchors.
//! 2. The anchors cut both sequences into overlapping windows with
//!    tempo-aware fuzzy margins.
//! 3. Inside each window, a pitch-wise matcher pairs onsets in sorted order,
//!    resolving count imbalances through a bounded combinatorial search over
//!    which notes to omit.
//! 4. A mending stage reconciles the overlapping per-window decisions into a
//!    single conflict-free alignment, with a greedy fallback for leftovers.
//!
//! # Quick Start
//!
//! ```rust
//! use scoralign::{AutomaticNoteMatcher, MatcherConfig, Note, NoteArray};
//!
//! let score = NoteArray::new(vec![
//!     Note::score("s0", 60, 0.0, 0.5),
//!     Note::score("s1", 62, 0.5, 0.5),
//! ]);
//! let performance = NoteArray::new(vec![
//!     Note::performance("p0", 60, 0.0, 0.55, 64),
//!     Note::performance("p1", 62, 0.62, 0.5, 72),
//! ]);
//!
//! let mut matcher = AutomaticNoteMatcher::new(MatcherConfig::default());
//! let alignment = matcher.align(&score, &performance).unwrap();
//! assert_eq!(alignment.len(), 2); // both notes matched
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`note`] | Note records, note sequences, alignment labels, time anchors |
//! | [`pianoroll`] | Time × pitch rasterization |
//! | [`dtw`] | Standard and weighted dynamic time warping |
//! | [`interp`] | Piecewise-linear time mapping |
//! | [`align`] | Anchor extraction, window cutting, global mending |
//! | [`matcher`] | Greedy and pitch-wise matchers, top-level orchestrator |
//! | [`evaluate`] | F-score evaluation against ground truth |
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`. The [`Error`] enum covers mismatched
//! and empty constructor inputs; degenerate alignment inputs (empty
//! sequences, under-anchored windows) degrade gracefully instead of
//! erroring.
//!
//! # Determinism
//!
//! The pipeline is deterministic except for the sampling branch of the
//! combinatorial search, which activates only when a window offers more
//! omission candidates than `cap_combinations`. Seed it through
//! [`MatcherConfig::with_seed`] for reproducible runs.

#![deny(unsafe_code)]

pub mod error;
pub use error::{Error, Result};

pub mod align;
pub mod dtw;
pub mod evaluate;
pub mod interp;
pub mod matcher;
pub mod note;
pub mod pianoroll;

pub use matcher::{AlignmentType, AutomaticNoteMatcher, MatcherConfig, StageTimings};
pub use note::{Alignment, AlignmentLabel, Note, NoteArray, TimeAnchor};
