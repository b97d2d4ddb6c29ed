//! Skill detection: fixed lexicon plus JD-derived terms, and the must/nice split.

mod classifier;
mod lexicon;

pub use classifier::classify_must_nice;
pub use lexicon::{top_terms, MatchMode, SkillMatcher, JD_TERM_LIMIT};
