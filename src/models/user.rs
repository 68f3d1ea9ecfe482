// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::exam::validate_exam_type;

/// Represents the 'users' table in the database.
/// Account credentials and the student's profile live on the same row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    pub name: String,

    /// Unique login email.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub display_name: Option<String>,

    /// Exam catalogue code chosen during onboarding.
    pub selected_exam: Option<String>,

    /// Set once an exam has been selected.
    pub onboarded: bool,

    pub dark_mode: bool,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl User {
    /// Name used when addressing the student in prompts.
    pub fn preferred_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.name)
    }
}

/// DTO for creating a new account.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required."))]
    pub name: String,
    #[validate(email(message = "A valid email is required."))]
    pub email: String,
    #[validate(length(
        min = 6,
        max = 128,
        message = "Password length must be between 6 and 128 characters."
    ))]
    pub password: String,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254, message = "Email and password required"))]
    pub email: String,
    #[validate(length(min = 1, max = 128, message = "Email and password required"))]
    pub password: String,
}

/// DTO for a partial profile update; absent fields keep their stored value.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    #[validate(custom(function = validate_exam_type))]
    pub selected_exam: Option<String>,
    pub dark_mode: Option<bool>,
}

/// DTO for choosing the target exam during onboarding.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SelectExamRequest {
    #[serde(default)]
    #[validate(custom(function = validate_exam_type))]
    pub exam_type: String,
}
