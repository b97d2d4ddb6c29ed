//! Resume matching: data model, JD parsing, the two scoring pipelines,
//! explanation enrichment, and the run engine.

pub mod engine;
pub mod explain;
pub mod jd_parser;
pub mod models;
pub mod pipeline;
pub mod prompts;

#[cfg(test)]
pub(crate) mod test_support;

pub use engine::{evaluate_candidate, run, PipelineMode};
pub use models::MatchInput;
