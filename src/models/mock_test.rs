// src/models/mock_test.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::exam::validate_exam_type;

pub const DEFAULT_DIFFICULTY: &str = "medium";

/// Represents the 'mock_tests' table in the database.
/// One uploaded mock test; never updated after upload.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct TestSession {
    pub id: i64,
    pub user_id: i64,
    pub test_name: String,

    /// Exam catalogue code, e.g. "jee".
    pub exam_type: String,

    pub total_score: i32,
    pub max_score: i32,

    /// Percentage of correct answers, 0-100 with one decimal.
    pub accuracy: f64,

    pub time_taken_minutes: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Represents the 'test_questions' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct GradedQuestion {
    pub id: i64,
    pub test_id: i64,
    pub question_number: i32,

    /// Free text, grouped by exact string equality.
    pub subject: String,
    pub topic: String,

    pub is_correct: bool,
    pub time_spent_seconds: i32,
    pub difficulty: String,
}

/// DTO for uploading a graded mock test.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadTestRequest {
    #[validate(length(min = 1, max = 200, message = "Test name is required (max 200 characters)."))]
    pub test_name: String,

    #[validate(custom(function = validate_exam_type))]
    pub exam_type: String,

    #[validate(
        length(min = 1, max = 500, message = "A test needs between 1 and 500 questions."),
        nested
    )]
    pub questions: Vec<UploadQuestion>,
}

/// A single graded question inside an upload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UploadQuestion {
    /// Defaults to the 1-based position in the upload.
    pub question_number: Option<i32>,

    #[validate(length(min = 1, max = 100))]
    pub subject: String,

    #[validate(length(min = 1, max = 100))]
    pub topic: String,

    pub is_correct: bool,

    #[serde(default)]
    #[validate(range(min = 0, max = 86_400))]
    pub time_spent_seconds: i32,

    #[validate(length(min = 1, max = 20))]
    pub difficulty: Option<String>,
}

/// Summary figures stored on the `mock_tests` row, derived from the uploaded questions.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadSummary {
    pub total_score: i32,
    pub max_score: i32,
    pub accuracy: f64,
    pub time_taken_minutes: i32,
}

impl UploadSummary {
    pub fn from_questions(questions: &[UploadQuestion]) -> Self {
        let max_score = questions.len() as i32;
        let total_score = questions.iter().filter(|q| q.is_correct).count() as i32;
        let total_seconds: i64 = questions.iter().map(|q| q.time_spent_seconds as i64).sum();

        let accuracy = if max_score > 0 {
            let raw = total_score as f64 / max_score as f64 * 100.0;
            (raw * 10.0).round() / 10.0
        } else {
            0.0
        };

        Self {
            total_score,
            max_score,
            accuracy,
            time_taken_minutes: (total_seconds as f64 / 60.0).round() as i32,
        }
    }
}

/// Response item for a created upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTestResponse {
    pub success: bool,
    pub test_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(is_correct: bool, secs: i32) -> UploadQuestion {
        UploadQuestion {
            question_number: None,
            subject: "Physics".to_string(),
            topic: "Optics".to_string(),
            is_correct,
            time_spent_seconds: secs,
            difficulty: None,
        }
    }

    #[test]
    fn test_summary_one_decimal_accuracy() {
        let qs = vec![question(true, 40), question(false, 50), question(false, 30)];
        let summary = UploadSummary::from_questions(&qs);
        assert_eq!(summary.total_score, 1);
        assert_eq!(summary.max_score, 3);
        assert_eq!(summary.accuracy, 33.3);
        assert_eq!(summary.time_taken_minutes, 2);
    }

    #[test]
    fn test_upload_request_validation() {
        let valid = UploadTestRequest {
            test_name: "Mock 1".to_string(),
            exam_type: "jee".to_string(),
            questions: vec![question(true, 30)],
        };
        assert!(valid.validate().is_ok());

        let no_questions = UploadTestRequest {
            test_name: "Mock 1".to_string(),
            exam_type: "jee".to_string(),
            questions: vec![],
        };
        assert!(no_questions.validate().is_err());

        let unknown_exam = UploadTestRequest {
            test_name: "Mock 1".to_string(),
            exam_type: "bar-exam".to_string(),
            questions: vec![question(true, 30)],
        };
        assert!(unknown_exam.validate().is_err());

        let mut blank_topic = question(false, 30);
        blank_topic.topic = String::new();
        let nested = UploadTestRequest {
            test_name: "Mock 1".to_string(),
            exam_type: "neet".to_string(),
            questions: vec![blank_topic],
        };
        assert!(nested.validate().is_err());
    }

    #[test]
    fn test_negative_time_rejected() {
        let req = UploadTestRequest {
            test_name: "Mock".to_string(),
            exam_type: "cat".to_string(),
            questions: vec![question(true, -5)],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_question_count_error_carries_rejected_list() {
        let too_many = UploadTestRequest {
            test_name: "Mock".to_string(),
            exam_type: "jee".to_string(),
            questions: (0..501).map(|_| question(true, 10)).collect(),
        };
        let errors = too_many.validate().unwrap_err();
        let field_errors = errors.field_errors();
        let count_errors = field_errors.get("questions").expect("questions error");
        assert_eq!(count_errors[0].code, "length");

        let value = serde_json::to_value(question(false, 12)).unwrap();
        assert_eq!(value["is_correct"], false);
        assert_eq!(value["time_spent_seconds"], 12);
    }
}
