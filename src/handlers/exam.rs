// src/handlers/exam.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    ai::{ChatMessage, SharedProvider, prompts},
    analytics::{self, mistakes},
    error::AppError,
    handlers::{
        profile::fetch_user,
        mock_tests::{Order, fetch_tests},
    },
    models::{
        exam::{DEFAULT_EXAM, EXAM_TYPES},
        user::SelectExamRequest,
    },
    utils::jwt::Claims,
};

/// Insights are based on this many most recent tests.
const INSIGHTS_RECENT_TESTS: i64 = 5;

/// Lists the supported exams.
pub async fn list_exams() -> impl IntoResponse {
    Json(EXAM_TYPES)
}

/// Lists the mistake taxonomy shown next to the mistake-pattern chart.
pub async fn list_mistake_types() -> impl IntoResponse {
    Json(mistakes::taxonomy())
}

/// Records the student's target exam and completes onboarding.
pub async fn select_exam(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SelectExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|_| AppError::BadRequest("Exam type required".to_string()))?;

    let result = sqlx::query(
        r#"
        UPDATE users
        SET selected_exam = $1, onboarded = TRUE, updated_at = NOW()
        WHERE id = $2
        "#,
    )
    .bind(&payload.exam_type)
    .bind(claims.user_id()?)
    .execute(&pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Profile not found".to_string()));
    }

    Ok(Json(json!({ "success": true })))
}

/// AI-generated overview of the target exam, with a fixed fallback.
pub async fn exam_insights(
    State(pool): State<PgPool>,
    State(ai): State<SharedProvider>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let user = fetch_user(&pool, user_id).await?;
    let exam_type = user
        .selected_exam
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_EXAM.to_string());

    let recent = fetch_tests(&pool, user_id, Order::NewestFirst, Some(INSIGHTS_RECENT_TESTS)).await?;
    let avg_accuracy = analytics::average_accuracy(&recent);

    let prompt = prompts::insights_prompt(&exam_type, avg_accuracy, recent.len());
    let insights = match ai.complete(None, &[ChatMessage::user(prompt)]).await {
        Ok(reply) => match prompts::parse_json_reply::<prompts::ExamInsights>(&reply) {
            Ok(insights) => insights,
            Err(e) => {
                tracing::warn!("Unparseable insights reply from {}: {}", ai.name(), e);
                prompts::fallback_insights(&exam_type, avg_accuracy)
            }
        },
        Err(e) => {
            tracing::warn!("Insights generation failed: {}", e);
            prompts::fallback_insights(&exam_type, avg_accuracy)
        }
    };

    Ok(Json(json!({
        "insights": insights,
        "examType": exam_type
    })))
}
