// src/ai/prompts.rs

//! Prompt construction and reply parsing for the AI-backed endpoints.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    analytics::TopicStat,
    models::{mock_test::TestSession, user::User},
};

/// Recommendations and insights prompts cite at most this many weak topics.
pub const RECOMMENDATION_WEAK_TOPICS: usize = 5;
pub const CHAT_WEAK_TOPICS: usize = 10;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?").expect("valid code fence pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Study,
    Practice,
    Strategy,
    Revision,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamInsights {
    pub overview: String,
    pub syllabus: Vec<String>,
    pub high_weightage_topics: Vec<String>,
    pub common_mistakes: Vec<String>,
    pub preparation_strategy: String,
    pub readiness_assessment: String,
}

fn exam_label(selected_exam: Option<&str>, default: &str) -> String {
    selected_exam
        .filter(|e| !e.is_empty())
        .map(str::to_uppercase)
        .unwrap_or_else(|| default.to_string())
}

/// Removes markdown code fences models like to wrap JSON in, then parses the rest.
pub fn parse_json_reply<T: DeserializeOwned>(reply: &str) -> Result<T, serde_json::Error> {
    let cleaned = CODE_FENCE.replace_all(reply, "");
    serde_json::from_str(cleaned.trim())
}

pub fn recommendations_prompt(
    selected_exam: Option<&str>,
    tests_taken: usize,
    avg_accuracy: u32,
    weak_topics: &[TopicStat],
) -> String {
    let weak_areas = if weak_topics.is_empty() {
        "No data yet".to_string()
    } else {
        weak_topics
            .iter()
            .take(RECOMMENDATION_WEAK_TOPICS)
            .map(|t| format!("{} > {} ({}%)", t.subject, t.topic, t.accuracy))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        r#"Generate 5 personalized study recommendations for a {exam} aspirant.

Performance:
- Tests taken: {tests_taken}
- Average Accuracy: {avg_accuracy}%
- Weak Areas: {weak_areas}

Return ONLY a valid JSON array, no markdown, no extra text:
[{{"title": "...", "description": "...", "priority": "high", "category": "study"}}]

priority must be: high, medium, or low
category must be: study, practice, strategy, or revision"#,
        exam = exam_label(selected_exam, "competitive exam"),
    )
}

pub fn fallback_recommendations(weak_topics: &[TopicStat]) -> Vec<Recommendation> {
    let focus = if weak_topics.is_empty() {
        "Upload tests to identify weak areas.".to_string()
    } else {
        let names: Vec<String> = weak_topics
            .iter()
            .take(RECOMMENDATION_WEAK_TOPICS)
            .map(|t| format!("{} > {}", t.subject, t.topic))
            .collect();
        format!("Focus on: {}", names.join(", "))
    };

    vec![
        Recommendation {
            title: "Take More Practice Tests".into(),
            description: "Upload at least 3 mock tests to get personalized insights.".into(),
            priority: Priority::High,
            category: Category::Practice,
        },
        Recommendation {
            title: "Focus on Weak Areas".into(),
            description: focus,
            priority: Priority::High,
            category: Category::Study,
        },
        Recommendation {
            title: "Review Mistakes".into(),
            description: "Analyze your mistake patterns to understand conceptual gaps vs calculation errors.".into(),
            priority: Priority::Medium,
            category: Category::Revision,
        },
        Recommendation {
            title: "Time Management".into(),
            description: "Practice solving questions within time limits to improve speed.".into(),
            priority: Priority::Medium,
            category: Category::Strategy,
        },
        Recommendation {
            title: "Track Progress".into(),
            description: "Compare your scores over time to see improvement trends.".into(),
            priority: Priority::Low,
            category: Category::Strategy,
        },
    ]
}

pub fn insights_prompt(exam_type: &str, avg_accuracy: u32, tests_taken: usize) -> String {
    let exam = exam_type.to_uppercase();
    format!(
        r#"Generate exam insights for the {exam} competitive exam.
Student's current average accuracy: {avg_accuracy}% across {tests_taken} tests.

Return ONLY a valid JSON object, no markdown, no code blocks, no extra text:
{{
  "overview": "Brief exam overview (2-3 sentences)",
  "syllabus": ["Key subject 1", "Key subject 2", "Key subject 3"],
  "highWeightageTopics": ["Topic 1", "Topic 2", "Topic 3", "Topic 4"],
  "commonMistakes": ["Mistake 1", "Mistake 2", "Mistake 3"],
  "preparationStrategy": "Detailed strategy paragraph",
  "readinessAssessment": "Assessment based on their {avg_accuracy}% accuracy"
}}

Be specific to {exam}."#
    )
}

pub fn fallback_insights(exam_type: &str, avg_accuracy: u32) -> ExamInsights {
    let exam = exam_type.to_uppercase();
    ExamInsights {
        overview: format!(
            "The {} is one of the most competitive exams in India, requiring thorough preparation across multiple subjects.",
            exam
        ),
        syllabus: vec![
            "Mathematics".into(),
            "Physics".into(),
            "Chemistry".into(),
            "General Aptitude".into(),
        ],
        high_weightage_topics: vec![
            "Calculus".into(),
            "Mechanics".into(),
            "Organic Chemistry".into(),
            "Algebra".into(),
        ],
        common_mistakes: vec![
            "Poor time management".into(),
            "Skipping easy questions".into(),
            "Not reading questions carefully".into(),
        ],
        preparation_strategy: "Focus on building strong fundamentals, practice regularly with timed mock tests, and analyze your mistakes after each test.".into(),
        readiness_assessment: if avg_accuracy > 0 {
            format!(
                "With {}% accuracy, you need to improve weak areas systematically.",
                avg_accuracy
            )
        } else {
            "Take mock tests to assess your readiness.".into()
        },
    }
}

/// System prompt grounding the chat assistant in the student's own results.
/// `recent_tests` are expected newest first.
pub fn chat_system_prompt(
    user: &User,
    recent_tests: &[TestSession],
    weak_topics: &[TopicStat],
) -> String {
    let selected = user.selected_exam.as_deref();

    let tests = if recent_tests.is_empty() {
        "No tests taken yet.".to_string()
    } else {
        recent_tests
            .iter()
            .map(|t| {
                format!(
                    "- {}: Score {}/{}, Accuracy {:.1}%",
                    t.test_name, t.total_score, t.max_score, t.accuracy
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let weak = if weak_topics.is_empty() {
        "No data yet.".to_string()
    } else {
        weak_topics
            .iter()
            .take(CHAT_WEAK_TOPICS)
            .map(|t| format!("- {} > {}: {}/{} correct", t.subject, t.topic, t.correct, t.total))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"You are an exam preparation assistant for the {platform} platform.
You help students understand their performance, improve their scores, and prepare effectively.

Student Profile:
- Name: {name}
- Target Exam: {target}

Recent Test Performance:
{tests}

Weak Topics:
{weak}

Guidelines:
- Provide clear, actionable advice
- Be encouraging but realistic
- Reference their actual performance data
- Suggest specific study strategies
- Keep responses focused and structured with bullet points
- Label all insights as "AI-assisted guidance based on available performance data""#,
        platform = exam_label(selected, "competitive exam"),
        name = user.preferred_name(),
        target = exam_label(selected, "Not selected"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(subject: &str, topic: &str, correct: u32, total: u32) -> TopicStat {
        let accuracy = (correct as f64 / total as f64 * 100.0).round() as u32;
        TopicStat {
            topic: topic.into(),
            subject: subject.into(),
            accuracy,
            total,
            correct,
            mastery: accuracy,
        }
    }

    #[test]
    fn test_parse_json_reply_strips_fences() {
        let reply = "```json\n[{\"title\":\"Drill kinematics\",\"description\":\"Daily sets\",\"priority\":\"high\",\"category\":\"practice\"}]\n```";
        let recs: Vec<Recommendation> = parse_json_reply(reply).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].priority, Priority::High);
        assert_eq!(recs[0].category, Category::Practice);
    }

    #[test]
    fn test_parse_json_reply_rejects_unknown_enum_values() {
        let reply = r#"[{"title":"x","description":"y","priority":"urgent","category":"study"}]"#;
        assert!(parse_json_reply::<Vec<Recommendation>>(reply).is_err());
        assert!(parse_json_reply::<ExamInsights>("Sure! Here are insights").is_err());
    }

    #[test]
    fn test_insights_reply_uses_camel_case() {
        let reply = r#"{"overview":"o","syllabus":["a"],"highWeightageTopics":["b"],"commonMistakes":["c"],"preparationStrategy":"p","readinessAssessment":"r"}"#;
        let insights: ExamInsights = parse_json_reply(reply).unwrap();
        assert_eq!(insights.high_weightage_topics, vec!["b"]);
    }

    #[test]
    fn test_recommendations_prompt_lists_weak_areas() {
        let weak = vec![topic("Physics", "Optics", 1, 4), topic("Math", "Vectors", 2, 5)];
        let prompt = recommendations_prompt(Some("neet"), 3, 58, &weak);
        assert!(prompt.contains("for a NEET aspirant"));
        assert!(prompt.contains("Average Accuracy: 58%"));
        assert!(prompt.contains("Physics > Optics (25%), Math > Vectors (40%)"));

        let empty = recommendations_prompt(None, 0, 0, &[]);
        assert!(empty.contains("competitive exam aspirant"));
        assert!(empty.contains("Weak Areas: No data yet"));
    }

    #[test]
    fn test_fallback_recommendations_mention_weak_topics() {
        let recs = fallback_recommendations(&[topic("Chemistry", "Organic", 0, 3)]);
        assert_eq!(recs.len(), 5);
        assert_eq!(recs[1].description, "Focus on: Chemistry > Organic");

        let recs = fallback_recommendations(&[]);
        assert_eq!(recs[1].description, "Upload tests to identify weak areas.");
    }

    #[test]
    fn test_fallback_insights_readiness_text() {
        assert_eq!(
            fallback_insights("jee", 0).readiness_assessment,
            "Take mock tests to assess your readiness."
        );
        let insights = fallback_insights("gate", 64);
        assert!(insights.overview.starts_with("The GATE"));
        assert!(insights.readiness_assessment.contains("64%"));
    }

    #[test]
    fn test_chat_prompt_includes_profile_tests_and_topics() {
        let user = User {
            id: 7,
            name: "Ravi Kumar".into(),
            email: "ravi@example.com".into(),
            password: String::new(),
            display_name: Some("Ravi".into()),
            selected_exam: Some("cat".into()),
            onboarded: true,
            dark_mode: false,
            created_at: None,
            updated_at: None,
        };
        let tests = vec![TestSession {
            id: 1,
            user_id: 7,
            test_name: "Sectional 2".into(),
            exam_type: "cat".into(),
            total_score: 14,
            max_score: 20,
            accuracy: 70.0,
            time_taken_minutes: 40,
            created_at: chrono::Utc::now(),
        }];
        let weak = vec![topic("Quant", "Geometry", 1, 5)];

        let prompt = chat_system_prompt(&user, &tests, &weak);
        assert!(prompt.contains("for the CAT platform"));
        assert!(prompt.contains("- Name: Ravi"));
        assert!(prompt.contains("- Sectional 2: Score 14/20, Accuracy 70.0%"));
        assert!(prompt.contains("- Quant > Geometry: 1/5 correct"));
    }
}
