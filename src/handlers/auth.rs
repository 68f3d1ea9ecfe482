// src/handlers/auth.rs

use axum::{
    Extension, Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    handlers::profile::fetch_user,
    models::user::{LoginRequest, SignupRequest, User},
    utils::{
        hash::{hash_password, verify_password},
        html::clean_text,
        jwt::{Claims, clear_session_cookie, session_cookie, sign_jwt},
    },
};

/// Creates an account and starts a session.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created with the new user id; the session token is set as a cookie.
pub async fn signup(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let email = payload.email.trim().to_lowercase();
    let name = clean_text(&payload.name);
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    let hashed_password = hash_password(&payload.password)?;

    let user_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users (name, email, password, display_name)
        VALUES ($1, $2, $3, $1)
        RETURNING id
        "#,
    )
    .bind(&name)
    .bind(&email)
    .bind(&hashed_password)
    .fetch_one(&pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Email already registered".to_string())
        }
        other => {
            tracing::error!("Failed to register user: {:?}", other);
            AppError::from(other)
        }
    })?;

    tracing::info!("New account created: user {}", user_id);

    let token = sign_jwt(user_id, &config.jwt_secret, config.jwt_expiration)?;
    let cookie = session_cookie(&token, config.jwt_expiration, config.secure_cookies);

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "success": true,
            "userId": user_id,
            "onboarded": false
        })),
    ))
}

/// Authenticates a user and starts a session.
///
/// Unknown email and wrong password produce the same 401 message.
/// The token is set as a cookie and also returned for API clients.
pub async fn login(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password, display_name, selected_exam,
               onboarded, dark_mode, created_at, updated_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(payload.email.trim().to_lowercase())
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?
    .ok_or(AppError::AuthError("Invalid credentials".to_string()))?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(AppError::AuthError("Invalid credentials".to_string()));
    }

    let token = sign_jwt(user.id, &config.jwt_secret, config.jwt_expiration)?;
    let cookie = session_cookie(&token, config.jwt_expiration, config.secure_cookies);

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "success": true,
            "userId": user.id,
            "onboarded": user.onboarded,
            "selectedExam": user.selected_exam,
            "token": token
        })),
    ))
}

/// Ends the session by expiring the cookie.
pub async fn logout(State(config): State<Config>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_session_cookie(config.secure_cookies))],
        Json(json!({ "success": true })),
    )
}

/// Returns the signed-in user's profile.
pub async fn me(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = fetch_user(&pool, claims.user_id()?).await?;
    Ok(Json(json!({ "user": user })))
}
