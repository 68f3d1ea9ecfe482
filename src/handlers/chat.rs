// src/handlers/chat.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

use crate::{
    ai::{ChatMessage, Role, SharedProvider, prompts},
    analytics,
    error::AppError,
    handlers::{
        mock_tests::{Order, fetch_questions, fetch_tests},
        profile::fetch_user,
    },
    utils::jwt::Claims,
};

/// The assistant sees this many most recent tests.
const CHAT_RECENT_TESTS: i64 = 5;
const MAX_MESSAGES: usize = 50;
const MAX_MESSAGE_CHARS: usize = 4000;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// Conversation must be non-empty, bounded, free of client-supplied system turns,
    /// and end with the student speaking.
    fn check(&self) -> Result<(), AppError> {
        if self.messages.is_empty() || self.messages.len() > MAX_MESSAGES {
            return Err(AppError::BadRequest(format!(
                "Between 1 and {} messages are required",
                MAX_MESSAGES
            )));
        }
        if self.messages.iter().any(|m| m.role == Role::System) {
            return Err(AppError::BadRequest(
                "System messages are not accepted".to_string(),
            ));
        }
        if self
            .messages
            .iter()
            .any(|m| m.content.trim().is_empty() || m.content.chars().count() > MAX_MESSAGE_CHARS)
        {
            return Err(AppError::BadRequest(format!(
                "Messages must be between 1 and {} characters",
                MAX_MESSAGE_CHARS
            )));
        }
        if self.messages.last().map(|m| m.role) != Some(Role::User) {
            return Err(AppError::BadRequest(
                "The last message must come from the user".to_string(),
            ));
        }
        Ok(())
    }
}

/// Answers the student's latest message using their own performance data as context.
pub async fn chat(
    State(pool): State<PgPool>,
    State(ai): State<SharedProvider>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.check()?;
    let user_id = claims.user_id()?;

    let user = fetch_user(&pool, user_id).await?;
    let recent = fetch_tests(&pool, user_id, Order::NewestFirst, Some(CHAT_RECENT_TESTS)).await?;
    let questions = fetch_questions(&pool, user_id).await?;
    let weak = analytics::weak_topics(&analytics::topic_performance(&questions));

    let system = prompts::chat_system_prompt(&user, &recent, &weak);
    let reply = ai.complete(Some(&system), &req.messages).await?;

    Ok(Json(json!({
        "message": ChatMessage::assistant(reply)
    })))
}
