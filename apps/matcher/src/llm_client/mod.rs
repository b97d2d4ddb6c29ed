//! LLM client: the single point of entry for every upstream AI call.
//!
//! Talks to an OpenAI-compatible API: `/chat/completions` with a strict
//! JSON-schema response format, and `/embeddings`. Calls are issued one at a
//! time with a fixed timeout and are never retried; the caller decides whether
//! a failure is fatal.
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::{AiSettings, HTTP_TIMEOUT};

pub mod schema;

pub use schema::StructuredOutput;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}{}", kind_suffix(.kind))]
    Api {
        status: u16,
        message: String,
        kind: Option<String>,
    },

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model refused: {0}")]
    Refusal(String),

    #[error("LLM returned no choices")]
    EmptyResponse,

    #[error("LLM returned empty content")]
    EmptyContent,
}

fn kind_suffix(kind: &Option<String>) -> String {
    kind.as_deref()
        .filter(|k| !k.is_empty())
        .map(|k| format!(" ({k})"))
        .unwrap_or_default()
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat<'a>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'a str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    description: &'a str,
    schema: serde_json::Value,
    strict: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// Structured-extraction and embedding client. Built once per run.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    llm_model: String,
    embed_model: String,
    temperature: f64,
    embed_batch_size: usize,
}

impl LlmClient {
    pub fn new(settings: &AiSettings) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(HTTP_TIMEOUT).build()?,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.clone(),
            llm_model: settings.llm_model.clone(),
            embed_model: settings.embed_model.clone(),
            temperature: settings.temperature,
            embed_batch_size: settings.embed_batch_size.max(1),
        })
    }

    /// Requests a completion constrained to `T`'s JSON schema and returns the
    /// parsed, sanitised value. Refusals, empty content and JSON that does not
    /// fit `T` are errors.
    pub async fn complete_structured<T: StructuredOutput>(
        &self,
        system: &str,
        user: &str,
    ) -> Result<T, LlmError> {
        let request = ChatRequest {
            model: &self.llm_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: T::SCHEMA_NAME,
                    description: "Return only valid JSON for the schema.",
                    schema: T::json_schema(),
                    strict: true,
                },
            },
            temperature: self.temperature,
        };

        let response: ChatResponse = self.post_json("/chat/completions", &request).await?;
        let message = response
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?
            .message;

        if let Some(refusal) = message.refusal.filter(|r| !r.trim().is_empty()) {
            return Err(LlmError::Refusal(refusal));
        }
        let content = message.content.unwrap_or_default();
        let content = strip_json_fences(&content);
        if content.is_empty() {
            return Err(LlmError::EmptyContent);
        }

        let parsed: T = serde_json::from_str(content)?;
        debug!("Structured completion '{}' parsed", T::SCHEMA_NAME);
        Ok(parsed.sanitize())
    }

    /// Embeds `texts` in sequential batches. The result is positionally aligned
    /// with the input; an index the API never returned stays an empty vector.
    pub async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, LlmError> {
        let cleaned: Vec<String> = texts
            .iter()
            .map(|t| {
                let trimmed = t.trim();
                if trimmed.is_empty() {
                    "empty".to_string()
                } else {
                    trimmed.to_string()
                }
            })
            .collect();

        let mut out = vec![Vec::new(); cleaned.len()];
        for (batch_index, batch) in cleaned.chunks(self.embed_batch_size).enumerate() {
            let offset = batch_index * self.embed_batch_size;
            let request = EmbeddingsRequest {
                model: &self.embed_model,
                input: batch,
            };
            let response: EmbeddingsResponse = self.post_json("/embeddings", &request).await?;
            for item in response.data {
                if let Some(slot) = out.get_mut(offset + item.index) {
                    *slot = item.embedding;
                }
            }
            debug!("Embedded batch {} ({} inputs)", batch_index + 1, batch.len());
        }
        Ok(out)
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, LlmError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Surfaces the upstream error message and type when the body carries them,
/// otherwise the raw status and body.
fn api_error(status: u16, body: String) -> LlmError {
    match serde_json::from_str::<ApiErrorEnvelope>(&body) {
        Ok(envelope) if !envelope.error.message.is_empty() => LlmError::Api {
            status,
            message: envelope.error.message,
            kind: envelope.error.kind,
        },
        _ => LlmError::Api {
            status,
            message: format!("http {status}: {}", body.trim()),
            kind: None,
        },
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
