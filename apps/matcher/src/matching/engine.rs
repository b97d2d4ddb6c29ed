//! Matching engine: validates a request, loads documents, picks a pipeline,
//! and persists the ranked results.

use std::path::Path;

use tracing::{info, warn};

use crate::config::Config;
use crate::documents::{discover_resumes, extract_text, load_resumes, ResumeDocument};
use crate::errors::MatchError;
use crate::llm_client::LlmClient;
use crate::matching::jd_parser::{analyze_resume, extract_jd_info, JobDescription};
use crate::matching::models::{MatchInput, MatchOutput, ResumeAnalysis};
use crate::matching::pipeline::{AiPipeline, HeuristicPipeline, MatchPipeline, RankedRun};
use crate::output::{append_run_log, resolve_out_path, write_results_csv};
use crate::skills::SkillMatcher;
use crate::text::redact_pii;

/// Which pipelines a run may use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PipelineMode {
    /// AI when a credential is configured, heuristic otherwise or on failure.
    #[default]
    Auto,
    /// Heuristic only; the AI client is never built.
    HeuristicOnly,
}

/// Ranks every resume under `input.resumes_dir` against the JD and writes the CSV.
pub async fn run(
    input: &MatchInput,
    config: &Config,
    mode: PipelineMode,
) -> Result<MatchOutput, MatchError> {
    if !input.jd_path.is_file() {
        return Err(MatchError::MissingJobDescription(input.jd_path.clone()));
    }
    if !input.resumes_dir.is_dir() {
        return Err(MatchError::MissingResumesDir(input.resumes_dir.clone()));
    }

    let jd_raw = extract_text(&input.jd_path).map_err(MatchError::ReadJobDescription)?;

    let paths = discover_resumes(&input.resumes_dir).map_err(MatchError::ListResumes)?;
    if paths.is_empty() {
        return Err(MatchError::NoResumes);
    }
    let total = paths.len();

    let loaded = load_resumes(&paths);
    if loaded.documents.is_empty() {
        return Err(MatchError::NoResumes);
    }
    if !loaded.skipped.is_empty() {
        warn!("Skipped {} of {total} resumes", loaded.skipped.len());
    }

    let matcher = SkillMatcher::new(config.skill_match);
    let jd = JobDescription::new(jd_raw, &matcher);
    let ranked = rank_with_fallback(&jd, &loaded.documents, input.top_n, config, mode, matcher).await?;

    let out_path = resolve_out_path(input.out_path.as_deref());
    write_results_csv(&out_path, &ranked.results)?;
    append_run_log(&out_path, total);
    info!("Wrote {} results to {}", ranked.results.len(), out_path.display());

    Ok(MatchOutput {
        results: ranked.results,
        out_path,
        total,
        skipped: loaded.skipped,
        jd_info: Some(ranked.jd_info),
    })
}

async fn rank_with_fallback(
    jd: &JobDescription,
    resumes: &[ResumeDocument],
    top_n: usize,
    config: &Config,
    mode: PipelineMode,
    matcher: SkillMatcher,
) -> Result<RankedRun, MatchError> {
    let heuristic = HeuristicPipeline::new(matcher);
    if mode == PipelineMode::HeuristicOnly {
        info!("Ranking {} resumes with the {} pipeline", resumes.len(), heuristic.backend());
        return heuristic.rank(jd, resumes, top_n).await;
    }

    let attempt = match AiPipeline::from_config(config, matcher) {
        Ok(ai) => {
            info!("Ranking {} resumes with the {} pipeline", resumes.len(), ai.backend());
            ai.rank(jd, resumes, top_n).await
        }
        Err(e) => Err(e),
    };

    match attempt {
        Ok(ranked) => Ok(ranked),
        Err(e) if config.require_ai => Err(e),
        Err(MatchError::MissingApiKey) => {
            info!("No API key configured; using the {} pipeline", heuristic.backend());
            heuristic.rank(jd, resumes, top_n).await
        }
        Err(e) => {
            warn!("AI pipeline failed, falling back to {}: {e}", heuristic.backend());
            heuristic.rank(jd, resumes, top_n).await
        }
    }
}

/// LLM evaluation of a single resume against a JD. Needs a credential;
/// there is no heuristic fallback.
pub async fn evaluate_candidate(
    config: &Config,
    jd_path: &Path,
    resume_path: &Path,
) -> Result<ResumeAnalysis, MatchError> {
    if !jd_path.is_file() {
        return Err(MatchError::MissingJobDescription(jd_path.to_path_buf()));
    }
    if !resume_path.is_file() {
        return Err(MatchError::MissingResume(resume_path.to_path_buf()));
    }

    let settings = config.ai_settings()?;
    let client = LlmClient::new(&settings)?;

    let jd_raw = extract_text(jd_path).map_err(MatchError::ReadJobDescription)?;
    let resume_raw = extract_text(resume_path).map_err(MatchError::ReadResume)?;

    let jd_info = extract_jd_info(&client, &redact_pii(&jd_raw)).await?;
    let analysis = analyze_resume(
        &client,
        &jd_info,
        &redact_pii(&resume_raw),
        settings.explain_max_chars,
    )
    .await?;
    Ok(analysis)
}
