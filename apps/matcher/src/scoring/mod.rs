//! Relevance math: lexical TF-IDF, dense embedding similarity, the hybrid
//! score and the final ordering.

pub mod embedding;
pub mod ranker;
pub mod tfidf;
pub mod weights;

pub use ranker::rank_results;
pub use weights::{compute_hybrid_score, ratio, ScoreWeights, SkillRatios};
