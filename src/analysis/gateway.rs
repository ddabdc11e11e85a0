use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::types::LlmClient;
use super::GatewayError;
use crate::config::{GatewayConfig, GATEWAY_KEY_ENV};

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct GatewayClient {
    url: String,
    model: String,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

impl GatewayClient {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            url: config.url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            timeout_secs: config.timeout_secs,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Blocking client, built per call so it never lives inside the async
    /// runtime. Callers on the runtime must go through `spawn_blocking`.
    fn http_client(&self) -> Result<reqwest::blocking::Client, GatewayError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder
            .build()
            .map_err(|e| GatewayError::HttpClient(e.to_string()))
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Deserialize)]
struct ChatReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

impl LlmClient for GatewayClient {
    fn complete(&self, system: &str, user: &str) -> Result<String, GatewayError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GatewayError::MissingApiKey(GATEWAY_KEY_ENV))?;

        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let response = self
            .http_client()?
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    GatewayError::Connection(self.url.clone())
                } else if e.is_timeout() {
                    GatewayError::Timeout(self.timeout_secs.unwrap_or_default())
                } else {
                    GatewayError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| GatewayError::ResponseParsing(e.to_string()))?;

        // An empty choice list is treated as an empty reply.
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

enum MockReply {
    Text(String),
    Status(u16, String),
    Unreachable,
    MissingKey,
}

/// Mock LLM client for testing: returns a configured reply and records
/// every prompt pair it receives.
pub struct MockLlmClient {
    reply: MockReply,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self::with_reply(MockReply::Text(response.to_string()))
    }

    /// Gateway answering with a non-success status.
    pub fn failing_status(status: u16, body: &str) -> Self {
        Self::with_reply(MockReply::Status(status, body.to_string()))
    }

    pub fn unreachable() -> Self {
        Self::with_reply(MockReply::Unreachable)
    }

    pub fn without_key() -> Self {
        Self::with_reply(MockReply::MissingKey)
    }

    fn with_reply(reply: MockReply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// (system, user) prompt pairs received so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

impl LlmClient for MockLlmClient {
    fn complete(&self, system: &str, user: &str) -> Result<String, GatewayError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((system.to_string(), user.to_string()));
        }
        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Status(status, body) => Err(GatewayError::Status {
                status: *status,
                body: body.clone(),
            }),
            MockReply::Unreachable => Err(GatewayError::Connection("mock://gateway".into())),
            MockReply::MissingKey => Err(GatewayError::MissingApiKey(GATEWAY_KEY_ENV)),
        }
    }
}
