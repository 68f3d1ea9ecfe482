// src/analytics/mistakes.rs

use std::collections::BTreeMap;

use serde::Serialize;

/// Baseline average time (seconds) used when there are no questions at all.
pub const DEFAULT_AVG_TIME_SECS: f64 = 60.0;

/// Below this fraction of the average time, a wrong answer counts as a guess.
const GUESSING_RATIO: f64 = 0.3;

/// Below this fraction (and above the guessing one), a wrong answer counts as a slip.
const CALCULATION_RATIO: f64 = 0.7;

/// Heuristic category of a wrong answer, inferred from response time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MistakeKind {
    Conceptual,
    Calculation,
    Guessing,
    /// Part of the published taxonomy but never produced by [`MistakeKind::classify`].
    TimePressure,
}

impl MistakeKind {
    pub const ALL: [MistakeKind; 4] = [
        MistakeKind::Conceptual,
        MistakeKind::Calculation,
        MistakeKind::Guessing,
        MistakeKind::TimePressure,
    ];

    /// Classifies one answer against the student's average time per question.
    /// Correct answers are never mistakes.
    pub fn classify(time_spent_secs: f64, is_correct: bool, avg_time_secs: f64) -> Option<Self> {
        if is_correct {
            return None;
        }

        if time_spent_secs < avg_time_secs * GUESSING_RATIO {
            Some(MistakeKind::Guessing)
        } else if time_spent_secs < avg_time_secs * CALCULATION_RATIO {
            Some(MistakeKind::Calculation)
        } else {
            Some(MistakeKind::Conceptual)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MistakeKind::Conceptual => "conceptual",
            MistakeKind::Calculation => "calculation",
            MistakeKind::Guessing => "guessing",
            MistakeKind::TimePressure => "time_pressure",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MistakeKind::Conceptual => "Conceptual Error",
            MistakeKind::Calculation => "Calculation Error",
            MistakeKind::Guessing => "Guessing",
            MistakeKind::TimePressure => "Time Pressure",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MistakeKind::Conceptual => "Long time + incorrect answer",
            MistakeKind::Calculation => "Short time + incorrect answer",
            MistakeKind::Guessing => "Very short time + incorrect answer",
            MistakeKind::TimePressure => "Accuracy drop in final phase",
        }
    }
}

/// Occurrence count per mistake kind. Kinds that never occurred are absent.
///
/// Backed by an ordered map so the serialized form is stable between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MistakeTally(BTreeMap<MistakeKind, u32>);

impl MistakeTally {
    pub fn record(&mut self, kind: MistakeKind) {
        *self.0.entry(kind).or_insert(0) += 1;
    }

    pub fn count(&self, kind: MistakeKind) -> u32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MistakeKind, u32)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

/// Taxonomy entry exposed to clients.
#[derive(Debug, Serialize)]
pub struct MistakeKindInfo {
    pub value: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub fn taxonomy() -> Vec<MistakeKindInfo> {
    MistakeKind::ALL
        .iter()
        .map(|k| MistakeKindInfo {
            value: k.as_str(),
            label: k.label(),
            description: k.description(),
        })
        .collect()
}
