//! JD parser: prepares the job description once per run and extracts its
//! requirements, either through the LLM or from the lexicon and cue lines.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::llm_client::{LlmClient, LlmError};
use crate::matching::models::{truncate_chars, JDExtract, ResumeAnalysis};
use crate::matching::prompts::{resume_analysis_prompt, JD_EXTRACT_SYSTEM, RESUME_ANALYSIS_SYSTEM};
use crate::skills::{classify_must_nice, top_terms, SkillMatcher, JD_TERM_LIMIT};
use crate::text::{normalize_text, redact_pii};

static YEARS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)\b").unwrap());

/// The job description in every form the pipelines need.
#[derive(Debug, Clone)]
pub struct JobDescription {
    pub raw: String,
    pub redacted: String,
    pub normalized: String,
    /// Most frequent JD tokens, used as dynamic skills.
    pub terms: Vec<String>,
    /// Lexicon skills plus qualifying dynamic terms found in the JD.
    pub skills: Vec<String>,
    /// Lexicon skills only.
    pub lexicon_skills: Vec<String>,
}

impl JobDescription {
    pub fn new(raw: String, matcher: &SkillMatcher) -> Self {
        let redacted = redact_pii(&raw);
        let normalized = normalize_text(&raw);
        let terms = top_terms(&normalized, JD_TERM_LIMIT);
        let skills = matcher.extract_skills(&normalized, &terms);
        let lexicon_skills = matcher.extract_skills(&normalized, &[]);
        Self {
            raw,
            redacted,
            normalized,
            terms,
            skills,
            lexicon_skills,
        }
    }
}

/// Requirements derived without the LLM: role title from the first non-empty
/// line, must/nice from cue lines, the remaining lexicon skills as "other",
/// and the first "N years" phrase as the experience minimum.
pub fn heuristic_jd_extract(jd: &JobDescription, matcher: &SkillMatcher) -> JDExtract {
    let split = classify_must_nice(&jd.raw, matcher);
    let skills_other = jd
        .lexicon_skills
        .iter()
        .filter(|s| !split.must.contains(s) && !split.nice.contains(s))
        .cloned()
        .collect();

    JDExtract {
        role_title: jd
            .raw
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_string(),
        skills_must: split.must,
        skills_nice: split.nice,
        skills_other,
        years_experience_min: years_required(&jd.raw),
        ..JDExtract::default()
    }
}

fn years_required(text: &str) -> f64 {
    YEARS_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Extracts structured requirements from the redacted JD.
pub async fn extract_jd_info(client: &LlmClient, jd_redacted: &str) -> Result<JDExtract, LlmError> {
    let info: JDExtract = client
        .complete_structured(JD_EXTRACT_SYSTEM, jd_redacted)
        .await?;
    debug!(
        "JD extracted: {} must, {} nice, {} other skills",
        info.skills_must.len(),
        info.skills_nice.len(),
        info.skills_other.len()
    );
    Ok(info)
}

/// Asks the LLM to assess one redacted resume against extracted requirements.
/// The resume is cut to `max_chars` characters first.
pub async fn analyze_resume(
    client: &LlmClient,
    jd_info: &JDExtract,
    resume_redacted: &str,
    max_chars: usize,
) -> Result<ResumeAnalysis, LlmError> {
    let jd_json = serde_json::to_string(jd_info)?;
    let prompt = resume_analysis_prompt(&jd_json, truncate_chars(resume_redacted, max_chars));
    client
        .complete_structured(RESUME_ANALYSIS_SYSTEM, &prompt)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::MatchMode;

    const JD: &str = "\n  Senior Data Engineer \nMust have Python and SQL.\nNice to have Docker.\nExperience with Airflow and Spark.\nAt least 5+ years in data roles.";

    fn word_matcher() -> SkillMatcher {
        SkillMatcher::new(MatchMode::WordBoundary)
    }

    #[test]
    fn test_job_description_forms() {
        let jd = JobDescription::new(JD.to_string(), &word_matcher());
        assert!(jd.normalized.starts_with("senior data engineer must have python sql"));
        assert!(jd.terms.len() <= JD_TERM_LIMIT);
        assert!(jd.lexicon_skills.contains(&"airflow".to_string()));
        assert!(jd.skills.contains(&"engineer".to_string()));
        assert!(!jd.lexicon_skills.contains(&"engineer".to_string()));
    }

    #[test]
    fn test_heuristic_extract() {
        let matcher = word_matcher();
        let jd = JobDescription::new(JD.to_string(), &matcher);
        let info = heuristic_jd_extract(&jd, &matcher);

        assert_eq!(info.role_title, "Senior Data Engineer");
        assert_eq!(info.skills_must, vec!["python", "sql"]);
        assert_eq!(info.skills_nice, vec!["docker"]);
        assert!(info.skills_other.contains(&"airflow".to_string()));
        assert!(info.skills_other.contains(&"spark".to_string()));
        assert!(!info.skills_other.contains(&"python".to_string()));
        assert_eq!(info.years_experience_min, 5.0);
        assert!(info.responsibilities.is_empty());
    }

    #[test]
    fn test_years_required_variants() {
        assert_eq!(years_required("3 yrs of Go"), 3.0);
        assert_eq!(years_required("2.5 years"), 2.5);
        assert_eq!(years_required("10+ Years required"), 10.0);
        assert_eq!(years_required("plenty of experience"), 0.0);
    }
}
