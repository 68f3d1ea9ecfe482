// src/models/exam.rs

use serde::Serialize;

/// One entry of the supported exam catalogue.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExamType {
    pub value: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub const EXAM_TYPES: &[ExamType] = &[
    ExamType {
        value: "jee",
        label: "JEE (Main + Advanced)",
        description: "Engineering entrance exam",
    },
    ExamType {
        value: "neet",
        label: "NEET",
        description: "Medical entrance exam",
    },
    ExamType {
        value: "upsc",
        label: "UPSC CSE",
        description: "Civil services examination",
    },
    ExamType {
        value: "cat",
        label: "CAT",
        description: "Management entrance exam",
    },
    ExamType {
        value: "gate",
        label: "GATE",
        description: "Graduate aptitude test",
    },
    ExamType {
        value: "ssc",
        label: "SSC CGL",
        description: "Staff selection commission",
    },
    ExamType {
        value: "banking",
        label: "Banking (IBPS/SBI)",
        description: "Banking sector exams",
    },
    ExamType {
        value: "other",
        label: "Other",
        description: "Custom competitive exam",
    },
];

/// Exam assumed for insights when the student has not picked one.
pub const DEFAULT_EXAM: &str = "jee";

pub fn find_exam(code: &str) -> Option<&'static ExamType> {
    EXAM_TYPES.iter().find(|e| e.value == code)
}

pub fn validate_exam_type(code: &str) -> Result<(), validator::ValidationError> {
    if find_exam(code).is_none() {
        return Err(validator::ValidationError::new("unknown_exam_type"));
    }
    Ok(())
}
