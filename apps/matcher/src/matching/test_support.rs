//! Fixtures shared by the matching tests: an in-process stand-in for the
//! OpenAI-compatible API and small document/config builders.

use std::collections::HashMap;
use std::path::PathBuf;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::config::Config;
use crate::documents::ResumeDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// Every call succeeds.
    Healthy,
    /// JD extraction and embeddings succeed; every resume analysis is refused.
    RefuseAnalysis,
    /// Every call answers 500 with an error body.
    FailAll,
}

/// Starts the mock on an ephemeral port and returns its base URL.
pub async fn spawn_openai_mock(behavior: MockBehavior) -> String {
    let app = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .route("/v1/embeddings", post(embeddings))
        .with_state(behavior);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1")
}

pub fn ai_config(base_url: &str, extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("OPENAI_API_KEY".to_string(), "sk-test".to_string()),
        ("OPENAI_BASE_URL".to_string(), base_url.to_string()),
    ]);
    vars.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    Config::from_lookup(|key| vars.get(key).cloned())
}

pub fn resume(path: &str, text: &str) -> ResumeDocument {
    ResumeDocument::from_text(PathBuf::from(path), text.to_string())
}

async fn chat_completions(
    State(behavior): State<MockBehavior>,
    Json(body): Json<Value>,
) -> Response {
    if behavior == MockBehavior::FailAll {
        return upstream_error();
    }

    let content = match body["response_format"]["json_schema"]["name"].as_str() {
        // Fenced on purpose; the client has to unwrap it.
        Some("jd_extract") => format!(
            "```json\n{}\n```",
            json!({
                "role_title": " Backend Engineer ",
                "skills_must": ["Python", "SQL", "python"],
                "skills_nice": ["Docker"],
                "skills_other": [],
                "years_experience_min": -1,
                "education": [],
                "certifications": [],
                "titles": ["Backend Engineer"],
                "responsibilities": ["Ship features"]
            })
        ),
        Some("resume_analysis") if behavior == MockBehavior::RefuseAnalysis => {
            return Json(json!({
                "choices": [{
                    "message": {"role": "assistant", "content": null, "refusal": "I can't help with that."}
                }]
            }))
            .into_response();
        }
        Some("resume_analysis") => {
            let user = body["messages"][1]["content"].as_str().unwrap_or_default();
            let resume = user.split("Resume:\n").nth(1).unwrap_or_default().to_lowercase();
            let (strengths, weaknesses) = if resume.contains("python") {
                (vec!["Python", "SQL"], Vec::new())
            } else {
                (Vec::new(), vec!["No Python", "No SQL"])
            };
            json!({
                "strengths": strengths,
                "weaknesses": weaknesses,
                "summary": "Reviewed against the requirements.",
                "skills": ["Python"],
                "years_experience": 4,
                "education": [],
                "certifications": [],
                "titles": []
            })
            .to_string()
        }
        _ => return (StatusCode::BAD_REQUEST, "unknown schema").into_response(),
    };

    Json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
    .into_response()
}

/// Embeds each input as keyword indicators plus a constant, returned in
/// reverse order so callers must honour `index`.
async fn embeddings(State(behavior): State<MockBehavior>, Json(body): Json<Value>) -> Response {
    if behavior == MockBehavior::FailAll {
        return upstream_error();
    }

    let inputs = body["input"].as_array().cloned().unwrap_or_default();
    let data: Vec<Value> = inputs
        .iter()
        .enumerate()
        .rev()
        .map(|(index, input)| {
            let text = input.as_str().unwrap_or_default().to_lowercase();
            let mut vector: Vec<f64> = ["python", "sql", "docker", "java"]
                .iter()
                .map(|k| if text.contains(k) { 1.0 } else { 0.0 })
                .collect();
            vector.push(0.1);
            json!({"object": "embedding", "index": index, "embedding": vector})
        })
        .collect();

    Json(json!({"object": "list", "data": data})).into_response()
}

fn upstream_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": {"message": "upstream exploded", "type": "server_error"}})),
    )
        .into_response()
}
