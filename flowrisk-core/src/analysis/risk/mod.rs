//! Risk scoring: streak and statistics signals mapped to a risk category.
//!
//! Three policies share one entry point, selected when the scorer is built:
//! - **BandedStreak**: step function of the current streak length (0–10)
//! - **AdditiveMultiFactor**: independent weighted rules, clamped at 10
//! - **FiveLevelGauge**: sub-scores summed into a 1–5 gauge
//!
//! The 0–10 policies produce a [`RiskAssessment`]; the gauge produces a
//! [`GaugeAssessment`]. The two scales never mix.

pub mod additive;
pub mod banded;
pub mod gauge;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::stats::{calculate_stats, StatsSummary};
use super::streak::{detect_streaks, StreakAnalysis};
use crate::domain::{sort_by_date, DailyFlowRecord};

pub use gauge::{GaugeAssessment, GaugeLevel};

/// Upper bound of the 0–10 score scale.
pub const MAX_SCORE: u8 = 10;

/// Factor emitted when no rule fires.
pub const NO_SIGNAL_FACTOR: &str = "특이 리스크 신호 없음";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskPolicy {
    #[default]
    BandedStreak,
    AdditiveMultiFactor,
    FiveLevelGauge,
}

impl RiskPolicy {
    pub const ALL: [RiskPolicy; 3] = [
        Self::BandedStreak,
        Self::AdditiveMultiFactor,
        Self::FiveLevelGauge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BandedStreak => "banded_streak",
            Self::AdditiveMultiFactor => "additive_multi_factor",
            Self::FiveLevelGauge => "five_level_gauge",
        }
    }
}

impl fmt::Display for RiskPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown risk policy '{0}' (expected banded_streak, additive_multi_factor or five_level_gauge)")]
pub struct UnknownPolicy(pub String);

impl FromStr for RiskPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| UnknownPolicy(s.to_string()))
    }
}

/// Category shared by both 0–10 policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Normal,
    Caution,
    Warning,
    Danger,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=1 => Self::Normal,
            2..=3 => Self::Caution,
            4..=5 => Self::Warning,
            _ => Self::Danger,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "정상",
            Self::Caution => "경계",
            Self::Warning => "위험",
            Self::Danger => "고위험",
        }
    }
}

/// 0–10 assessment. `factors` lists one justification per triggered rule,
/// in evaluation order, and is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub score: u8,
    pub level: RiskLevel,
    pub label: String,
    pub factors: Vec<String>,
}

impl RiskAssessment {
    /// Clamp `score`, derive the level and fall back to the no-signal factor.
    pub(crate) fn from_parts(score: u32, mut factors: Vec<String>) -> Self {
        let score = score.min(MAX_SCORE as u32) as u8;
        if factors.is_empty() {
            factors.push(NO_SIGNAL_FACTOR.to_string());
        }
        let level = RiskLevel::from_score(score);
        Self {
            score,
            level,
            label: level.label().to_string(),
            factors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scale", rename_all = "snake_case")]
pub enum RiskOutcome {
    Bounded(RiskAssessment),
    Gauge(GaugeAssessment),
}

impl RiskOutcome {
    pub fn label(&self) -> &str {
        match self {
            Self::Bounded(a) => &a.label,
            Self::Gauge(g) => &g.label,
        }
    }

    /// Score on the outcome's own scale (0–10 or 1–5).
    pub fn score(&self) -> f64 {
        match self {
            Self::Bounded(a) => a.score as f64,
            Self::Gauge(g) => g.level.value() as f64,
        }
    }

    pub fn factors(&self) -> Vec<String> {
        match self {
            Self::Bounded(a) => a.factors.clone(),
            Self::Gauge(g) => vec![g.description.clone()],
        }
    }

    pub fn as_bounded(&self) -> Option<&RiskAssessment> {
        match self {
            Self::Bounded(a) => Some(a),
            Self::Gauge(_) => None,
        }
    }

    pub fn as_gauge(&self) -> Option<&GaugeAssessment> {
        match self {
            Self::Gauge(g) => Some(g),
            Self::Bounded(_) => None,
        }
    }
}

/// Risk scorer with its policy fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RiskScorer {
    policy: RiskPolicy,
}

impl RiskScorer {
    pub fn new(policy: RiskPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RiskPolicy {
        self.policy
    }

    /// Assess a raw (possibly unsorted) sequence.
    pub fn assess(&self, records: &[DailyFlowRecord]) -> RiskOutcome {
        let sorted = sort_by_date(records);
        let streaks = detect_streaks(&sorted);
        let stats = calculate_stats(&sorted);
        self.assess_analyzed(&sorted, &streaks, &stats)
    }

    /// Assess from precomputed streak and statistics output.
    ///
    /// `sorted` must be the date-sorted sequence the inputs were computed from.
    pub fn assess_analyzed(
        &self,
        sorted: &[DailyFlowRecord],
        streaks: &StreakAnalysis,
        stats: &StatsSummary,
    ) -> RiskOutcome {
        match self.policy {
            RiskPolicy::BandedStreak => RiskOutcome::Bounded(banded::score(streaks)),
            RiskPolicy::AdditiveMultiFactor => {
                RiskOutcome::Bounded(additive::score(sorted, streaks, stats))
            }
            RiskPolicy::FiveLevelGauge => RiskOutcome::Gauge(gauge::score(sorted, streaks)),
        }
    }
}
