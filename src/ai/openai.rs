// src/ai/openai.rs

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{AiError, ChatMessage, CompletionProvider, Role};

/// Talks to any OpenAI-compatible `/chat/completions` endpoint (Groq by default).
pub struct OpenAiCompatibleProvider {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: Role,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompatibleProvider {
    pub fn new(
        base_url: Url,
        api_key: String,
        model: String,
        timeout_secs: u64,
    ) -> Result<Self, AiError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            endpoint: completions_endpoint(&base_url),
            api_key,
            model,
        })
    }
}

fn completions_endpoint(base_url: &Url) -> String {
    format!("{}/chat/completions", base_url.as_str().trim_end_matches('/'))
}

fn build_request<'a>(
    model: &'a str,
    system: Option<&'a str>,
    messages: &'a [ChatMessage],
) -> ChatCompletionRequest<'a> {
    let mut wire = Vec::with_capacity(messages.len() + 1);
    if let Some(system) = system {
        wire.push(WireMessage {
            role: Role::System,
            content: system,
        });
    }
    wire.extend(messages.iter().map(|m| WireMessage {
        role: m.role,
        content: &m.content,
    }));

    ChatCompletionRequest {
        model,
        messages: wire,
        temperature: 0.7,
    }
}

fn first_reply(response: ChatCompletionResponse) -> Result<String, AiError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(AiError::EmptyReply)
}

#[async_trait]
impl CompletionProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn complete(
        &self,
        system: Option<&str>,
        messages: &[ChatMessage],
    ) -> Result<String, AiError> {
        let request = build_request(&self.model, system, messages);

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status { status, body });
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        first_reply(parsed)
    }
}
