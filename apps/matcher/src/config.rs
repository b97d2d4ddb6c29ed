use std::time::Duration;

use crate::errors::MatchError;
use crate::skills::MatchMode;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_EMBED_MODEL: &str = "text-embedding-3-large";
const DEFAULT_LLM_MODEL: &str = "gpt-4o";

/// Fixed per-request timeout for every upstream call.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(90);

/// Matcher configuration, read once at startup and passed down by reference.
/// Malformed values fall back to their defaults instead of failing the run.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub embed_model: String,
    pub llm_model: String,
    pub explain_top_n: usize,
    pub embed_batch_size: usize,
    pub embed_chunk_words: usize,
    pub explain_max_chars: usize,
    pub temperature: f64,
    pub require_ai: bool,
    pub skill_match: MatchMode,
    pub rust_log: String,
}

/// The subset of `Config` the AI pipeline needs, only constructible when a
/// credential is present.
#[derive(Debug, Clone)]
pub struct AiSettings {
    pub api_key: String,
    pub base_url: String,
    pub embed_model: String,
    pub llm_model: String,
    pub explain_top_n: usize,
    pub embed_batch_size: usize,
    pub embed_chunk_words: usize,
    pub explain_max_chars: usize,
    pub temperature: f64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let base_url = get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Config {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: base_url.trim_end_matches('/').to_string(),
            embed_model: get("RESUMEGPT_EMBED_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBED_MODEL.to_string()),
            llm_model: get("RESUMEGPT_LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            explain_top_n: positive_int(get("RESUMEGPT_EXPLAIN_TOPN"), 20),
            embed_batch_size: positive_int(get("RESUMEGPT_EMBED_BATCH"), 96).max(1),
            embed_chunk_words: positive_int(get("RESUMEGPT_EMBED_CHUNK_WORDS"), 2000).max(500),
            explain_max_chars: positive_int(get("RESUMEGPT_EXPLAIN_MAX_CHARS"), 12000).max(2000),
            temperature: get("RESUMEGPT_LLM_TEMPERATURE")
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .unwrap_or(0.2)
                .clamp(0.0, 1.0),
            require_ai: flag(get("RESUMEGPT_REQUIRE_OPENAI"), false),
            skill_match: get("RESUMEGPT_SKILL_MATCH")
                .and_then(|v| MatchMode::parse(&v))
                .unwrap_or_default(),
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        }
    }

    /// Returns the AI settings, or `MissingApiKey` when no credential is configured.
    pub fn ai_settings(&self) -> Result<AiSettings, MatchError> {
        let api_key = self
            .openai_api_key
            .clone()
            .ok_or(MatchError::MissingApiKey)?;

        Ok(AiSettings {
            api_key,
            base_url: self.openai_base_url.clone(),
            embed_model: self.embed_model.clone(),
            llm_model: self.llm_model.clone(),
            explain_top_n: self.explain_top_n,
            embed_batch_size: self.embed_batch_size,
            embed_chunk_words: self.embed_chunk_words,
            explain_max_chars: self.explain_max_chars,
            temperature: self.temperature,
        })
    }
}

fn positive_int(raw: Option<String>, default: usize) -> usize {
    raw.and_then(|v| v.parse::<i64>().ok())
        .filter(|v| *v > 0)
        .map(|v| v as usize)
        .unwrap_or(default)
}

fn flag(raw: Option<String>, default: bool) -> bool {
    match raw.map(|v| v.to_lowercase()).as_deref() {
        Some("1" | "true" | "yes" | "y" | "on") => true,
        Some("0" | "false" | "no" | "n" | "off") => false,
        _ => default,
    }
}
