use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::documents::SkippedDocument;
use crate::llm_client::schema::{object_schema, FieldKind};
use crate::llm_client::StructuredOutput;

/// One ranking request. `top_n == 0` keeps every result; a missing
/// `out_path` writes to `outputs/results.csv`.
#[derive(Debug, Clone)]
pub struct MatchInput {
    pub jd_path: PathBuf,
    pub resumes_dir: PathBuf,
    pub top_n: usize,
    pub out_path: Option<PathBuf>,
}

/// Structured job requirements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JDExtract {
    pub role_title: String,
    pub skills_must: Vec<String>,
    pub skills_nice: Vec<String>,
    pub skills_other: Vec<String>,
    pub years_experience_min: f64,
    pub education: Vec<String>,
    pub certifications: Vec<String>,
    pub titles: Vec<String>,
    pub responsibilities: Vec<String>,
}

impl StructuredOutput for JDExtract {
    const SCHEMA_NAME: &'static str = "jd_extract";

    fn json_schema() -> serde_json::Value {
        object_schema(&[
            ("role_title", FieldKind::Text),
            ("skills_must", FieldKind::TextList),
            ("skills_nice", FieldKind::TextList),
            ("skills_other", FieldKind::TextList),
            ("years_experience_min", FieldKind::NonNegativeNumber),
            ("education", FieldKind::TextList),
            ("certifications", FieldKind::TextList),
            ("titles", FieldKind::TextList),
            ("responsibilities", FieldKind::TextList),
        ])
    }

    fn sanitize(self) -> Self {
        Self {
            role_title: self.role_title.trim().to_string(),
            skills_must: clean_skill_list(self.skills_must),
            skills_nice: clean_skill_list(self.skills_nice),
            skills_other: clean_skill_list(self.skills_other),
            years_experience_min: non_negative(self.years_experience_min),
            education: clean_list(self.education),
            certifications: clean_list(self.certifications),
            titles: clean_list(self.titles),
            responsibilities: clean_list(self.responsibilities),
        }
    }
}

/// LLM assessment of one resume against a `JDExtract`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResumeAnalysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub summary: String,
    pub skills: Vec<String>,
    pub years_experience: f64,
    pub education: Vec<String>,
    pub certifications: Vec<String>,
    pub titles: Vec<String>,
}

impl StructuredOutput for ResumeAnalysis {
    const SCHEMA_NAME: &'static str = "resume_analysis";

    fn json_schema() -> serde_json::Value {
        object_schema(&[
            ("strengths", FieldKind::TextList),
            ("weaknesses", FieldKind::TextList),
            ("summary", FieldKind::Text),
            ("skills", FieldKind::TextList),
            ("years_experience", FieldKind::NonNegativeNumber),
            ("education", FieldKind::TextList),
            ("certifications", FieldKind::TextList),
            ("titles", FieldKind::TextList),
        ])
    }

    fn sanitize(self) -> Self {
        Self {
            strengths: clean_list(self.strengths),
            weaknesses: clean_list(self.weaknesses),
            summary: self.summary.trim().to_string(),
            skills: clean_skill_list(self.skills),
            years_experience: non_negative(self.years_experience),
            education: clean_list(self.education),
            certifications: clean_list(self.certifications),
            titles: clean_list(self.titles),
        }
    }
}

/// The structured part of a `ResumeAnalysis`, attached to enriched results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeExtract {
    pub skills: Vec<String>,
    pub years_experience: f64,
    pub education: Vec<String>,
    pub certifications: Vec<String>,
    pub titles: Vec<String>,
}

impl From<&ResumeAnalysis> for ResumeExtract {
    fn from(analysis: &ResumeAnalysis) -> Self {
        Self {
            skills: analysis.skills.clone(),
            years_experience: analysis.years_experience,
            education: analysis.education.clone(),
            certifications: analysis.certifications.clone(),
            titles: analysis.titles.clone(),
        }
    }
}

/// One ranked candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchResult {
    /// 1-based, assigned by the ranker.
    pub rank: usize,
    pub candidate: String,
    /// 0-100 with two decimals.
    pub score: f64,
    pub strengths: String,
    pub weaknesses: String,
    pub explanation: String,
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted: Option<ResumeExtract>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutput {
    pub results: Vec<MatchResult>,
    pub out_path: PathBuf,
    /// Resume files discovered, including any that failed extraction.
    pub total: usize,
    pub skipped: Vec<SkippedDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jd_info: Option<JDExtract>,
}

/// Lowercased, trimmed, deduplicated and sorted.
pub fn clean_skill_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Trimmed, deduplicated and sorted; case is preserved.
pub fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted union of several lists, blanks dropped.
pub fn merge_unique(lists: &[&[String]]) -> Vec<String> {
    lists
        .iter()
        .flat_map(|list| list.iter())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Comma-joined list, or the literal `None` when empty.
pub fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

/// The first `max_chars` characters of `text`. Zero disables the limit.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    if max_chars == 0 {
        return text;
    }
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_jd_extract_sanitize() {
        let raw = JDExtract {
            role_title: "  Data Engineer ".to_string(),
            skills_must: strings(&["Python", " sql", "python", ""]),
            years_experience_min: -2.0,
            education: strings(&["BSc ", "BSc", "  "]),
            ..JDExtract::default()
        };
        let clean = raw.sanitize();
        assert_eq!(clean.role_title, "Data Engineer");
        assert_eq!(clean.skills_must, strings(&["python", "sql"]));
        assert_eq!(clean.years_experience_min, 0.0);
        assert_eq!(clean.education, strings(&["BSc"]));
    }

    #[test]
    fn test_free_text_keeps_case() {
        assert_eq!(
            clean_list(strings(&["Led AWS migration", "led aws migration"])),
            strings(&["Led AWS migration", "led aws migration"])
        );
    }

    #[test]
    fn test_resume_analysis_rejects_unknown_fields() {
        let json = r#"{"strengths": [], "weaknesses": [], "summary": "", "skills": [],
            "years_experience": 1, "education": [], "certifications": [], "titles": [],
            "salary": 100}"#;
        assert!(serde_json::from_str::<ResumeAnalysis>(json).is_err());
    }

    #[test]
    fn test_resume_analysis_rejects_missing_fields() {
        let json = r#"{"strengths": ["python"], "summary": "ok"}"#;
        assert!(serde_json::from_str::<ResumeAnalysis>(json).is_err());
    }

    #[test]
    fn test_schemas_list_every_field() {
        let schema = JDExtract::json_schema();
        assert_eq!(schema["required"].as_array().unwrap().len(), 9);
        let schema = ResumeAnalysis::json_schema();
        assert_eq!(schema["required"].as_array().unwrap().len(), 8);
        assert_eq!(schema["properties"]["summary"]["type"], "string");
    }

    #[test]
    fn test_merge_unique_sorts_union() {
        let a = strings(&["sql", "python"]);
        let b = strings(&["docker", "sql", " "]);
        assert_eq!(merge_unique(&[&a, &b]), strings(&["docker", "python", "sql"]));
    }

    #[test]
    fn test_join_or_none() {
        assert_eq!(join_or_none(&[]), "None");
        assert_eq!(join_or_none(&strings(&["python", "sql"])), "python, sql");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("short", 0), "short");
    }

    #[test]
    fn test_result_omits_missing_extract() {
        let value = serde_json::to_value(MatchResult::default()).unwrap();
        assert!(value.get("extracted").is_none());
        assert_eq!(value["rank"], 0);
    }

    #[test]
    fn test_output_uses_camel_case() {
        let output = MatchOutput {
            results: Vec::new(),
            out_path: PathBuf::from("outputs/results.csv"),
            total: 3,
            skipped: Vec::new(),
            jd_info: None,
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["outPath"], "outputs/results.csv");
        assert_eq!(value["total"], 3);
        assert!(value.get("jdInfo").is_none());
    }
}
