// src/handlers/profile.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{UpdateProfileRequest, User},
    utils::{html::clean_text, jwt::Claims},
};

/// Loads one user row; a token for a deleted account reads as 404.
pub(crate) async fn fetch_user(pool: &PgPool, user_id: i64) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password, display_name, selected_exam,
               onboarded, dark_mode, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Profile not found".to_string()))
}

/// Get current user's profile.
pub async fn get_profile(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = fetch_user(&pool, claims.user_id()?).await?;
    Ok(Json(user))
}

/// Partially updates the profile; fields left out of the body keep their value.
pub async fn update_profile(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user_id = claims.user_id()?;

    let display_name = payload.display_name.as_deref().map(clean_text);
    if display_name.as_deref() == Some("") {
        return Err(AppError::BadRequest(
            "Display name cannot be empty".to_string(),
        ));
    }

    let result = sqlx::query(
        r#"
        UPDATE users SET
            display_name = COALESCE($1, display_name),
            selected_exam = COALESCE($2, selected_exam),
            dark_mode = COALESCE($3, dark_mode),
            updated_at = NOW()
        WHERE id = $4
        "#,
    )
    .bind(display_name)
    .bind(payload.selected_exam)
    .bind(payload.dark_mode)
    .bind(user_id)
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to update profile: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Profile not found".to_string()));
    }

    Ok(Json(json!({ "success": true })))
}
