// src/analytics/mod.rs

//! Performance analytics over one student's uploaded mock tests.
//!
//! Everything here is a pure function of the records passed in: callers fetch
//! the student's tests and questions, call [`analyze`], and serialize the
//! resulting [`PerformanceReport`]. Nothing is cached between calls.

pub mod mistakes;

use std::collections::HashMap;

use serde::Serialize;

use crate::models::mock_test::{GradedQuestion, TestSession};

pub use mistakes::{DEFAULT_AVG_TIME_SECS, MistakeKind, MistakeTally};

/// Topics strictly below this accuracy are weak.
pub const WEAK_TOPIC_THRESHOLD: u32 = 50;

/// Topics at or above this accuracy are strong.
pub const STRONG_TOPIC_THRESHOLD: u32 = 75;

/// Sample size at which the subject mastery boost doubles the accuracy.
const MASTERY_SAMPLE_SIZE: f64 = 50.0;

/// Test volume stops adding to readiness after this many tests.
const READINESS_TEST_CAP: usize = 20;
const READINESS_ACCURACY_WEIGHT: f64 = 0.4;
const READINESS_VOLUME_POINTS: f64 = 30.0;
const READINESS_BREADTH_POINTS: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectStat {
    pub subject: String,
    pub accuracy: u32,
    pub total: u32,
    pub correct: u32,
    /// Mean seconds per question.
    pub avg_time: u32,
    /// Accuracy boosted by sample size, capped at 100.
    pub mastery: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicStat {
    pub topic: String,
    pub subject: String,
    pub accuracy: u32,
    pub total: u32,
    pub correct: u32,
    pub mastery: u32,
}

/// One point of the score trend chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPoint {
    pub name: String,
    pub accuracy: f64,
    pub score: i32,
    pub max_score: i32,
    pub date: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_tests: u32,
    pub avg_accuracy: u32,
    pub total_questions: u32,
    pub total_correct: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    pub subject_performance: Vec<SubjectStat>,
    pub topic_performance: Vec<TopicStat>,
    pub weak_topics: Vec<TopicStat>,
    pub strong_topics: Vec<TopicStat>,
    pub mistake_patterns: MistakeTally,
    pub progress_data: Vec<ProgressPoint>,
    /// Composite 0-100 preparedness indicator.
    pub readiness: u32,
    pub stats: OverallStats,
}

#[derive(Debug, Default)]
struct Tally {
    correct: u32,
    total: u32,
    total_time: f64,
}

impl Tally {
    fn add(&mut self, q: &GradedQuestion) {
        self.total += 1;
        self.total_time += seconds(q);
        if q.is_correct {
            self.correct += 1;
        }
    }

    fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64 * 100.0
    }

    fn accuracy(&self) -> u32 {
        round(self.percent())
    }
}

/// Groups items by key, keeping groups in order of first appearance.
struct Grouped<K> {
    index: HashMap<K, usize>,
    groups: Vec<(K, Tally)>,
}

impl<K: std::hash::Hash + Eq + Clone> Grouped<K> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    fn entry(&mut self, key: K) -> &mut Tally {
        let slot = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                self.groups.push((key.clone(), Tally::default()));
                self.index.insert(key, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        &mut self.groups[slot].1
    }
}

fn seconds(q: &GradedQuestion) -> f64 {
    q.time_spent_seconds.max(0) as f64
}

/// Rounds half up, like the dashboard's charting code expects. Inputs are never negative.
fn round(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

/// Rounded mean accuracy of a set of tests, 0 when there are none.
pub fn average_accuracy(tests: &[TestSession]) -> u32 {
    if tests.is_empty() {
        return 0;
    }
    let sum: f64 = tests.iter().map(|t| t.accuracy).sum();
    round(sum / tests.len() as f64)
}

pub fn subject_performance(questions: &[GradedQuestion]) -> Vec<SubjectStat> {
    let mut by_subject = Grouped::new();
    for q in questions {
        by_subject.entry(q.subject.as_str()).add(q);
    }

    by_subject
        .groups
        .into_iter()
        .map(|(subject, t)| {
            let boosted = t.percent() * (1.0 + t.total as f64 / MASTERY_SAMPLE_SIZE);
            SubjectStat {
                subject: subject.to_string(),
                accuracy: t.accuracy(),
                total: t.total,
                correct: t.correct,
                avg_time: if t.total > 0 {
                    round(t.total_time / t.total as f64)
                } else {
                    0
                },
                mastery: round(boosted).min(100),
            }
        })
        .collect()
}

pub fn topic_performance(questions: &[GradedQuestion]) -> Vec<TopicStat> {
    let mut by_topic = Grouped::new();
    for q in questions {
        by_topic.entry((q.subject.as_str(), q.topic.as_str())).add(q);
    }

    by_topic
        .groups
        .into_iter()
        .map(|((subject, topic), t)| TopicStat {
            topic: topic.to_string(),
            subject: subject.to_string(),
            accuracy: t.accuracy(),
            total: t.total,
            correct: t.correct,
            mastery: t.accuracy().min(100),
        })
        .collect()
}

/// Topics below 50% accuracy, worst first.
pub fn weak_topics(topics: &[TopicStat]) -> Vec<TopicStat> {
    let mut weak: Vec<TopicStat> = topics
        .iter()
        .filter(|t| t.accuracy < WEAK_TOPIC_THRESHOLD)
        .cloned()
        .collect();
    weak.sort_by_key(|t| t.accuracy);
    weak
}

/// Topics at or above 75% accuracy, best first.
pub fn strong_topics(topics: &[TopicStat]) -> Vec<TopicStat> {
    let mut strong: Vec<TopicStat> = topics
        .iter()
        .filter(|t| t.accuracy >= STRONG_TOPIC_THRESHOLD)
        .cloned()
        .collect();
    strong.sort_by(|a, b| b.accuracy.cmp(&a.accuracy));
    strong
}

/// Classifies every wrong answer against the mean time over all answers.
pub fn mistake_patterns(questions: &[GradedQuestion]) -> MistakeTally {
    let avg_time = if questions.is_empty() {
        DEFAULT_AVG_TIME_SECS
    } else {
        questions.iter().map(seconds).sum::<f64>() / questions.len() as f64
    };

    let mut tally = MistakeTally::default();
    for q in questions {
        if let Some(kind) = MistakeKind::classify(seconds(q), q.is_correct, avg_time) {
            tally.record(kind);
        }
    }
    tally
}

/// Tests oldest first; ties keep their input order.
pub fn progress_data(tests: &[TestSession]) -> Vec<ProgressPoint> {
    let mut ordered: Vec<&TestSession> = tests.iter().collect();
    ordered.sort_by_key(|t| t.created_at);

    ordered
        .into_iter()
        .map(|t| ProgressPoint {
            name: t.test_name.clone(),
            accuracy: t.accuracy,
            score: t.total_score,
            max_score: t.max_score,
            date: t.created_at,
        })
        .collect()
}

/// 40% average accuracy, up to 30 points for test volume, up to 30 for the share of strong topics.
pub fn readiness(avg_accuracy: u32, total_tests: usize, strong: usize, topics: usize) -> u32 {
    let accuracy_part = avg_accuracy as f64 * READINESS_ACCURACY_WEIGHT;
    let volume_part =
        total_tests.min(READINESS_TEST_CAP) as f64 / READINESS_TEST_CAP as f64 * READINESS_VOLUME_POINTS;
    let breadth_part = strong as f64 / topics.max(1) as f64 * READINESS_BREADTH_POINTS;

    round(accuracy_part + volume_part + breadth_part).min(100)
}

/// Computes every derived statistic for one student's tests and questions.
pub fn analyze(tests: &[TestSession], questions: &[GradedQuestion]) -> PerformanceReport {
    let subject_performance = subject_performance(questions);
    let topic_performance = topic_performance(questions);
    let weak_topics = weak_topics(&topic_performance);
    let strong_topics = strong_topics(&topic_performance);

    let avg_accuracy = average_accuracy(tests);
    let stats = OverallStats {
        total_tests: tests.len() as u32,
        avg_accuracy,
        total_questions: questions.len() as u32,
        total_correct: questions.iter().filter(|q| q.is_correct).count() as u32,
    };

    let readiness = readiness(
        avg_accuracy,
        tests.len(),
        strong_topics.len(),
        topic_performance.len(),
    );

    PerformanceReport {
        mistake_patterns: mistake_patterns(questions),
        progress_data: progress_data(tests),
        subject_performance,
        topic_performance,
        weak_topics,
        strong_topics,
        readiness,
        stats,
    }
}
