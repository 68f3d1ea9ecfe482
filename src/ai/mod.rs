// src/ai/mod.rs

//! Completion providers used for recommendations, exam insights and the chat assistant.

pub mod openai;
pub mod prompts;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AiConfig;

pub use openai::OpenAiCompatibleProvider;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("no completion provider is configured")]
    NotConfigured,

    #[error("request to completion provider failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("completion provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion provider returned an empty reply")]
    EmptyReply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A backend able to turn a conversation into one assistant reply.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    async fn complete(
        &self,
        system: Option<&str>,
        messages: &[ChatMessage],
    ) -> Result<String, AiError>;
}

pub type SharedProvider = Arc<dyn CompletionProvider>;

/// Used when no API key is configured. Every call fails, so callers serve their fallbacks.
#[derive(Debug, Default, Clone)]
pub struct DisabledProvider;

#[async_trait]
impl CompletionProvider for DisabledProvider {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn complete(
        &self,
        _system: Option<&str>,
        _messages: &[ChatMessage],
    ) -> Result<String, AiError> {
        Err(AiError::NotConfigured)
    }
}

/// Picks the provider for the given settings.
pub fn provider_from_config(config: &AiConfig) -> Result<SharedProvider, AiError> {
    match &config.api_key {
        Some(key) => {
            let provider = OpenAiCompatibleProvider::new(
                config.base_url.clone(),
                key.clone(),
                config.model.clone(),
                config.timeout_secs,
            )?;
            tracing::info!(
                "Completion provider: {} ({})",
                config.base_url,
                config.model
            );
            Ok(Arc::new(provider))
        }
        None => {
            tracing::warn!("No AI API key configured; AI features will use fallbacks");
            Ok(Arc::new(DisabledProvider))
        }
    }
}
