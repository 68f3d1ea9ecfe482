// tests/analytics_props.rs

use chrono::{TimeZone, Utc};
use exam_analytics::analytics::{self, mistakes::MistakeKind};
use exam_analytics::models::mock_test::{GradedQuestion, TestSession};
use proptest::prelude::*;

const SUBJECTS: &[&str] = &["Math", "Physics", "Chemistry"];
const TOPICS: &[&str] = &["Algebra", "Optics", "Kinetics", "Mechanics"];

fn question() -> impl Strategy<Value = GradedQuestion> {
    (
        0..SUBJECTS.len(),
        0..TOPICS.len(),
        any::<bool>(),
        0i32..600,
    )
        .prop_map(|(s, t, is_correct, secs)| GradedQuestion {
            id: 0,
            test_id: 1,
            question_number: 1,
            subject: SUBJECTS[s].to_string(),
            topic: TOPICS[t].to_string(),
            is_correct,
            time_spent_seconds: secs,
            difficulty: "medium".to_string(),
        })
}

fn test_session() -> impl Strategy<Value = TestSession> {
    (0u32..=1000, 0i64..1_000_000).prop_map(|(tenths, offset)| TestSession {
        id: offset,
        user_id: 1,
        test_name: format!("Mock {}", offset),
        exam_type: "jee".to_string(),
        total_score: 0,
        max_score: 0,
        accuracy: tenths as f64 / 10.0,
        time_taken_minutes: 0,
        created_at: Utc.timestamp_opt(1_700_000_000 + offset, 0).unwrap(),
    })
}

proptest! {
    #[test]
    fn subject_totals_cover_every_question(questions in prop::collection::vec(question(), 0..80)) {
        let subjects = analytics::subject_performance(&questions);

        let total: u32 = subjects.iter().map(|s| s.total).sum();
        let correct: u32 = subjects.iter().map(|s| s.correct).sum();
        prop_assert_eq!(total as usize, questions.len());
        prop_assert_eq!(correct as usize, questions.iter().filter(|q| q.is_correct).count());

        for s in &subjects {
            prop_assert!(s.accuracy <= 100);
            prop_assert!(s.mastery <= 100);
            prop_assert!(s.correct <= s.total);
        }
    }

    #[test]
    fn weak_and_strong_never_overlap(questions in prop::collection::vec(question(), 0..80)) {
        let topics = analytics::topic_performance(&questions);
        let weak = analytics::weak_topics(&topics);
        let strong = analytics::strong_topics(&topics);

        prop_assert!(weak.iter().all(|t| t.accuracy < 50));
        prop_assert!(strong.iter().all(|t| t.accuracy >= 75));
        prop_assert!(weak.windows(2).all(|w| w[0].accuracy <= w[1].accuracy));
        prop_assert!(strong.windows(2).all(|w| w[0].accuracy >= w[1].accuracy));

        let middle = topics.iter().filter(|t| (50..75).contains(&t.accuracy)).count();
        prop_assert_eq!(weak.len() + strong.len() + middle, topics.len());
    }

    #[test]
    fn every_wrong_answer_is_classified(questions in prop::collection::vec(question(), 0..80)) {
        let tally = analytics::mistake_patterns(&questions);
        let wrong = questions.iter().filter(|q| !q.is_correct).count();

        prop_assert_eq!(tally.total() as usize, wrong);
        prop_assert_eq!(tally.count(MistakeKind::TimePressure), 0);
    }

    #[test]
    fn readiness_stays_in_range(
        avg in 0u32..=100,
        tests in 0usize..200,
        topics in 0usize..50,
        strong_share in 0.0f64..=1.0,
    ) {
        let strong = (topics as f64 * strong_share) as usize;
        prop_assert!(analytics::readiness(avg, tests, strong, topics) <= 100);
    }

    #[test]
    fn analyze_is_deterministic(
        tests in prop::collection::vec(test_session(), 0..10),
        questions in prop::collection::vec(question(), 0..60),
    ) {
        let first = analytics::analyze(&tests, &questions);
        let second = analytics::analyze(&tests, &questions);

        prop_assert!(first.stats.avg_accuracy <= 100);
        prop_assert_eq!(first.progress_data.len(), tests.len());
        prop_assert!(
            first.progress_data.windows(2).all(|w| w[0].date <= w[1].date)
        );
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
