//! Generative narrative via the OpenAI chat-completions API.

use chrono::Utc;
use osprey_core::{Findings, OspreyError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Per-request budget for the model call
const GENERATE_TIMEOUT: Duration = Duration::from_secs(30);

/// Token budget for the completion
const MAX_TOKENS: u32 = 400;

const SYSTEM_PROMPT: &str = "You are a defensive security analyst. \
    Generate a concise intelligence report. Be brief and actionable.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}

/// Produces the optional model-generated narrative.
///
/// Attempted at most once per request, after the deterministic narrative
/// has already been rendered: this path is pure upside and never a
/// single point of failure for the response.
#[derive(Debug, Clone)]
pub struct Narrator {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl Narrator {
    /// Create a narrator for the default model
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(GENERATE_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the API endpoint (useful for testing)
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the model identifier
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Generate a narrative for the findings.
    pub async fn generate(&self, target: &str, findings: &Findings) -> Result<String> {
        debug!(target, model = %self.model, "requesting generative narrative");

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(target, findings),
                },
            ],
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OspreyError::Timeout {
                        provider: "OpenAI",
                        seconds: GENERATE_TIMEOUT.as_secs(),
                    }
                } else {
                    OspreyError::Http {
                        provider: "OpenAI",
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Surface the API's own message so quota phrasing is kept intact.
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| {
                    v.pointer("/error/message")
                        .and_then(Value::as_str)
                        .map(String::from)
                })
                .unwrap_or_else(|| status.to_string());
            return Err(OspreyError::Api {
                provider: "OpenAI",
                message,
            });
        }

        let completion: ChatResponse = response.json().await.map_err(|e| OspreyError::Http {
            provider: "OpenAI",
            message: e.to_string(),
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(OspreyError::Api {
                provider: "OpenAI",
                message: "empty completion".to_string(),
            })
    }
}

/// Bounded prompt summarizing source presence and headline counts.
fn build_prompt(target: &str, findings: &Findings) -> String {
    let whois = if findings.whois.is_some() {
        "Available".to_string()
    } else {
        "No data".to_string()
    };
    let threat = if findings.threat.is_some() {
        format!("{} detections", findings.threat_positives())
    } else {
        "No data".to_string()
    };
    let network = findings.network.as_ref().map_or_else(
        || "No data".to_string(),
        |record| format!("{} ports", record.ports.len()),
    );

    format!(
        "Target: {target}\n\
         Scanned: {}\n\n\
         Data Summary:\n\
         - WHOIS: {whois}\n\
         - Threat Scan: {threat}\n\
         - Network Intel: {network}\n\n\
         Provide:\n\
         1. Risk Level (LOW/MEDIUM/HIGH/CRITICAL)\n\
         2. Key Findings (2-3 points)\n\
         3. Top 3 Recommendations\n\n\
         Keep under 300 words.",
        Utc::now().format("%Y-%m-%d")
    )
}

/// Whether an error message indicates quota/billing exhaustion.
pub(crate) fn is_quota_error(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    ["quota", "billing", "exceeded", "limit"]
        .iter()
        .any(|keyword| message.contains(keyword))
}
