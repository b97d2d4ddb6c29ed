use std::path::PathBuf;

use thiserror::Error;

use crate::documents::ExtractError;
use crate::llm_client::LlmError;

/// Matcher-level error type.
/// `exit_code` maps each variant onto the process exit status used by the CLI.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("job description file not found: {}", .0.display())]
    MissingJobDescription(PathBuf),

    #[error("failed to read JD: {0}")]
    ReadJobDescription(#[source] ExtractError),

    #[error("resumes folder not found: {}", .0.display())]
    MissingResumesDir(PathBuf),

    #[error("failed to list resumes: {0}")]
    ListResumes(#[source] std::io::Error),

    #[error("no resumes found")]
    NoResumes,

    #[error("resume file not found: {}", .0.display())]
    MissingResume(PathBuf),

    #[error("failed to read resume: {0}")]
    ReadResume(#[source] ExtractError),

    #[error("failed to write results: {0}")]
    WriteResults(#[source] csv::Error),

    #[error("openai api key not configured")]
    MissingApiKey,

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

impl MatchError {
    pub fn exit_code(&self) -> i32 {
        match self {
            MatchError::MissingJobDescription(_) | MatchError::ReadJobDescription(_) => 2,
            MatchError::MissingResumesDir(_) | MatchError::ListResumes(_) => 3,
            MatchError::NoResumes => 4,
            MatchError::MissingApiKey => 6,
            MatchError::MissingResume(_)
            | MatchError::ReadResume(_)
            | MatchError::WriteResults(_)
            | MatchError::Llm(_) => 5,
        }
    }
}
