use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::documents::ResumeDocument;
use crate::llm_client::LlmClient;
use crate::matching::jd_parser::analyze_resume;
use crate::matching::models::{join_or_none, JDExtract, MatchResult, ResumeExtract};

/// Replaces the heuristic strengths, weaknesses and explanation of `results`
/// with an LLM analysis of each candidate. A failed analysis leaves that
/// result untouched; it never fails the run.
pub async fn enrich_top_results(
    client: &LlmClient,
    jd_info: &JDExtract,
    results: &mut [MatchResult],
    resumes: &[ResumeDocument],
    max_chars: usize,
) {
    let by_path: HashMap<&Path, &ResumeDocument> = resumes
        .iter()
        .map(|doc| (doc.path.as_path(), doc))
        .collect();

    for result in results.iter_mut() {
        let Some(doc) = by_path.get(result.file.as_path()) else {
            continue;
        };

        match analyze_resume(client, jd_info, &doc.redacted, max_chars).await {
            Ok(analysis) => {
                result.strengths = join_or_none(&analysis.strengths);
                result.weaknesses = join_or_none(&analysis.weaknesses);
                if !analysis.summary.is_empty() {
                    result.explanation = analysis.summary.clone();
                }
                result.extracted = Some(ResumeExtract::from(&analysis));
                debug!("Explained rank {}", result.rank);
            }
            Err(e) => {
                warn!("Explanation failed for rank {}: {e}", result.rank);
            }
        }
    }
}
