// src/handlers/analytics.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde::Serialize;
use sqlx::PgPool;

use crate::{
    ai::{ChatMessage, SharedProvider, prompts},
    analytics::{self, PerformanceReport},
    error::AppError,
    handlers::{
        profile::fetch_user,
        mock_tests::{Order, fetch_questions, fetch_tests},
    },
    models::mock_test::TestSession,
    utils::jwt::Claims,
};

/// Recommendations weigh this many most recent tests.
const RECOMMENDATION_RECENT_TESTS: i64 = 10;

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    /// Raw tests, oldest first.
    pub tests: Vec<TestSession>,
    #[serde(flatten)]
    pub report: PerformanceReport,
}

/// Full performance breakdown for the dashboard, recomputed on every call.
pub async fn get_analytics(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let tests = fetch_tests(&pool, user_id, Order::OldestFirst, None).await?;
    let questions = fetch_questions(&pool, user_id).await?;

    let report = analytics::analyze(&tests, &questions);

    tracing::debug!(
        "Analytics for user {}: {} tests, {} questions, readiness {}",
        user_id,
        tests.len(),
        questions.len(),
        report.readiness
    );

    Ok(Json(AnalyticsResponse { tests, report }))
}

/// Personalized study recommendations, falling back to a fixed list.
pub async fn get_recommendations(
    State(pool): State<PgPool>,
    State(ai): State<SharedProvider>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let user = fetch_user(&pool, user_id).await?;

    let recent = fetch_tests(
        &pool,
        user_id,
        Order::NewestFirst,
        Some(RECOMMENDATION_RECENT_TESTS),
    )
    .await?;
    let questions = fetch_questions(&pool, user_id).await?;

    let topics = analytics::topic_performance(&questions);
    let weak = analytics::weak_topics(&topics);
    let avg_accuracy = analytics::average_accuracy(&recent);

    let prompt = prompts::recommendations_prompt(
        user.selected_exam.as_deref(),
        recent.len(),
        avg_accuracy,
        &weak,
    );

    let recommendations = match ai.complete(None, &[ChatMessage::user(prompt)]).await {
        Ok(reply) => match prompts::parse_json_reply::<Vec<prompts::Recommendation>>(&reply) {
            Ok(recs) if !recs.is_empty() => recs,
            Ok(_) => prompts::fallback_recommendations(&weak),
            Err(e) => {
                tracing::warn!("Unparseable recommendations reply from {}: {}", ai.name(), e);
                prompts::fallback_recommendations(&weak)
            }
        },
        Err(e) => {
            tracing::warn!("Recommendation generation failed: {}", e);
            prompts::fallback_recommendations(&weak)
        }
    };

    Ok(Json(serde_json::json!({ "recommendations": recommendations })))
}
