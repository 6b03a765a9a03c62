//! Note matchers: the greedy baseline, the pitch-wise combinatorial
//! matcher, and the top-level orchestrator.

mod automatic;
mod greedy;
mod pitchwise;

pub use automatic::{AlignmentType, AutomaticNoteMatcher, MatcherConfig, StageTimings};
pub use greedy::greedy_alignment;
pub use pitchwise::SequenceMatcher;
