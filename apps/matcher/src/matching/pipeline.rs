//! Match pipelines: interchangeable scoring strategies behind one trait.
//!
//! `HeuristicPipeline` is self-contained: TF-IDF similarity plus lexicon skill
//! overlap. `AiPipeline` swaps in LLM-extracted requirements and embedding
//! similarity, then enriches the top results with per-resume analyses.
//! Both feed the same hybrid formula; their scores are not comparable
//! with each other.

use std::collections::BTreeSet;

use async_trait::async_trait;
use tracing::info;

use crate::config::{AiSettings, Config};
use crate::documents::ResumeDocument;
use crate::errors::MatchError;
use crate::llm_client::{LlmClient, LlmError};
use crate::matching::explain::enrich_top_results;
use crate::matching::jd_parser::{extract_jd_info, heuristic_jd_extract, JobDescription};
use crate::matching::models::{clean_skill_list, join_or_none, merge_unique, JDExtract, MatchResult};
use crate::scoring::embedding::{average_embeddings, chunk_by_words, dense_cosine};
use crate::scoring::tfidf::{build_tfidf_vectors, cosine_similarity};
use crate::scoring::{compute_hybrid_score, rank_results, ratio, ScoreWeights, SkillRatios};
use crate::skills::{classify_must_nice, SkillMatcher};

/// Strengths and weaknesses lists are capped at this many skills.
const MAX_LISTED_SKILLS: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Shared output + trait
// ────────────────────────────────────────────────────────────────────────────

/// Ranked results plus the requirements they were scored against.
#[derive(Debug, Clone)]
pub struct RankedRun {
    pub results: Vec<MatchResult>,
    pub jd_info: JDExtract,
}

/// A scoring strategy. Implementations score every resume, rank, and apply
/// the `top_n` cutoff.
#[async_trait]
pub trait MatchPipeline: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    async fn rank(
        &self,
        jd: &JobDescription,
        resumes: &[ResumeDocument],
        top_n: usize,
    ) -> Result<RankedRun, MatchError>;
}

/// The skill lists one run scores against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillUniverse {
    pub must: Vec<String>,
    pub nice: Vec<String>,
    pub general: Vec<String>,
}

impl SkillUniverse {
    /// Scores one resume given its similarity and the skills found in it.
    fn score(
        &self,
        doc: &ResumeDocument,
        similarity: f64,
        resume_skills: &BTreeSet<String>,
    ) -> MatchResult {
        let matched = |list: &[String]| list.iter().filter(|s| resume_skills.contains(*s)).count();
        let ratios = SkillRatios {
            must: ratio(matched(&self.must), self.must.len()),
            nice: ratio(matched(&self.nice), self.nice.len()),
            skill: ratio(matched(&self.general), self.general.len()),
        };
        let weights = ScoreWeights::for_must_count(self.must.len());

        MatchResult {
            rank: 0,
            candidate: doc.name.clone(),
            score: compute_hybrid_score(similarity, &ratios, &weights),
            strengths: join_or_none(&self.walk(|s| resume_skills.contains(s))),
            weaknesses: join_or_none(&self.walk(|s| !resume_skills.contains(s))),
            explanation: format!(
                "Similarity={similarity:.2}; MustMatch={:.2}; NiceMatch={:.2}; SkillMatch={:.2}",
                ratios.must, ratios.nice, ratios.skill
            ),
            file: doc.path.clone(),
            extracted: None,
        }
    }

    /// Skills accepted by `keep`, walking must, then nice, then general,
    /// without repeats and at most `MAX_LISTED_SKILLS`.
    fn walk(&self, keep: impl Fn(&str) -> bool) -> Vec<String> {
        let mut picked: Vec<String> = Vec::new();
        for skill in self.must.iter().chain(&self.nice).chain(&self.general) {
            if picked.len() >= MAX_LISTED_SKILLS {
                break;
            }
            if keep(skill.as_str()) && !picked.contains(skill) {
                picked.push(skill.clone());
            }
        }
        picked
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HeuristicPipeline
// ────────────────────────────────────────────────────────────────────────────

/// TF-IDF similarity over the JD and all resumes as one corpus, plus
/// lexicon and JD-term skill overlap. No network access.
pub struct HeuristicPipeline {
    matcher: SkillMatcher,
}

impl HeuristicPipeline {
    pub fn new(matcher: SkillMatcher) -> Self {
        Self { matcher }
    }
}

#[async_trait]
impl MatchPipeline for HeuristicPipeline {
    fn backend(&self) -> &'static str {
        "heuristic"
    }

    async fn rank(
        &self,
        jd: &JobDescription,
        resumes: &[ResumeDocument],
        top_n: usize,
    ) -> Result<RankedRun, MatchError> {
        let jd_info = heuristic_jd_extract(jd, &self.matcher);
        let universe = SkillUniverse {
            must: jd_info.skills_must.clone(),
            nice: jd_info.skills_nice.clone(),
            general: jd.skills.clone(),
        };

        let corpus: Vec<&str> = std::iter::once(jd.normalized.as_str())
            .chain(resumes.iter().map(|doc| doc.normalized.as_str()))
            .collect();
        let vectors = build_tfidf_vectors(&corpus);
        let (jd_vector, resume_vectors) = vectors.split_at(1);

        let results = resumes
            .iter()
            .zip(resume_vectors)
            .map(|(doc, vector)| {
                let resume_skills: BTreeSet<String> = self
                    .matcher
                    .extract_skills(&doc.normalized, &jd.terms)
                    .into_iter()
                    .collect();
                let similarity = cosine_similarity(&jd_vector[0], vector);
                universe.score(doc, similarity, &resume_skills)
            })
            .collect();

        Ok(RankedRun {
            results: rank_results(results, top_n),
            jd_info,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// AiPipeline
// ────────────────────────────────────────────────────────────────────────────

/// LLM requirement extraction, embedding similarity, and LLM explanations
/// for the top-ranked candidates. Any upstream failure aborts the pipeline.
pub struct AiPipeline {
    client: LlmClient,
    settings: AiSettings,
    matcher: SkillMatcher,
}

impl AiPipeline {
    /// Fails with `MissingApiKey` when no credential is configured.
    pub fn from_config(config: &Config, matcher: SkillMatcher) -> Result<Self, MatchError> {
        let settings = config.ai_settings()?;
        let client = LlmClient::new(&settings)?;
        Ok(Self {
            client,
            settings,
            matcher,
        })
    }

    /// LLM skills when it returned any; otherwise the cue-line classifier and
    /// lexicon. The general list always includes the lexicon-derived JD skills.
    fn skill_universe(&self, jd: &JobDescription, jd_info: &JDExtract) -> SkillUniverse {
        let (must, nice, other) = if jd_info.skills_must.is_empty()
            && jd_info.skills_nice.is_empty()
            && jd_info.skills_other.is_empty()
        {
            let split = classify_must_nice(&jd.raw, &self.matcher);
            (split.must, split.nice, jd.skills.clone())
        } else {
            (
                clean_skill_list(jd_info.skills_must.clone()),
                clean_skill_list(jd_info.skills_nice.clone()),
                clean_skill_list(jd_info.skills_other.clone()),
            )
        };
        let general = merge_unique(&[&must, &nice, &other, &jd.skills]);
        SkillUniverse {
            must,
            nice,
            general,
        }
    }

    /// One averaged vector per document, `None` for documents with no usable chunks.
    async fn embed_documents(&self, docs: &[&str]) -> Result<Vec<Option<Vec<f64>>>, LlmError> {
        let mut chunks: Vec<String> = Vec::new();
        let mut spans = Vec::with_capacity(docs.len());
        for doc in docs {
            let start = chunks.len();
            chunks.extend(chunk_by_words(doc, self.settings.embed_chunk_words));
            spans.push(start..chunks.len());
        }
        if chunks.is_empty() {
            return Ok(vec![None; docs.len()]);
        }

        let embeddings = self.client.embed_texts(&chunks).await?;
        Ok(spans
            .into_iter()
            .map(|span| {
                let usable: Vec<Vec<f64>> = embeddings[span]
                    .iter()
                    .filter(|v| !v.is_empty())
                    .cloned()
                    .collect();
                average_embeddings(&usable)
            })
            .collect())
    }
}

#[async_trait]
impl MatchPipeline for AiPipeline {
    fn backend(&self) -> &'static str {
        "openai"
    }

    async fn rank(
        &self,
        jd: &JobDescription,
        resumes: &[ResumeDocument],
        top_n: usize,
    ) -> Result<RankedRun, MatchError> {
        let jd_info = extract_jd_info(&self.client, &jd.redacted).await?;
        let universe = self.skill_universe(jd, &jd_info);

        let texts: Vec<&str> = std::iter::once(jd.redacted.as_str())
            .chain(resumes.iter().map(|doc| doc.redacted.as_str()))
            .collect();
        let vectors = self.embed_documents(&texts).await?;
        let (jd_vector, resume_vectors) = vectors.split_at(1);
        let jd_vector = jd_vector[0].as_deref().unwrap_or_default();

        let results = resumes
            .iter()
            .zip(resume_vectors)
            .map(|(doc, vector)| {
                let resume_skills = self
                    .matcher
                    .skills_in_text(&doc.normalized, &universe.general);
                let similarity = dense_cosine(jd_vector, vector.as_deref().unwrap_or_default());
                universe.score(doc, similarity, &resume_skills)
            })
            .collect();

        let mut results = rank_results(results, top_n);
        let explain_n = explain_count(self.settings.explain_top_n, top_n, results.len());
        info!("Explaining top {explain_n} of {} results", results.len());
        enrich_top_results(
            &self.client,
            &jd_info,
            &mut results[..explain_n],
            resumes,
            self.settings.explain_max_chars,
        )
        .await;

        Ok(RankedRun { results, jd_info })
    }
}

/// `min(explain_top_n, top_n, result_count)`, where `top_n == 0` means no cutoff.
fn explain_count(explain_top_n: usize, top_n: usize, result_count: usize) -> usize {
    let mut n = explain_top_n.min(result_count);
    if top_n > 0 {
        n = n.min(top_n);
    }
    n
}
