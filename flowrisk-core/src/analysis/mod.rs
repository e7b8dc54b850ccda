//! The analysis engine.
//!
//! Every component is a pure function over a record sequence:
//! - `range`: inclusive date window selection
//! - `stats`: descriptive statistics of the financial-investment flow
//! - `streak`: consecutive net-selling runs
//! - `risk`: streak/statistics signals mapped to a risk score under a policy
//! - `series`: cumulative and moving-average chart series
//!
//! Empty input is valid everywhere and degrades to zero/neutral outputs.

pub mod range;
pub mod risk;
pub mod series;
pub mod stats;
pub mod streak;

pub use range::{filter_range, trailing_days, DateRange};
pub use risk::{
    GaugeAssessment, GaugeLevel, RiskAssessment, RiskLevel, RiskOutcome, RiskPolicy, RiskScorer,
};
pub use series::{trailing_mean, transform_series, FlowPoint};
pub use stats::{calculate_stats, StatsSummary};
pub use streak::{detect_streaks, StreakAnalysis, StreakInterval};

/// Build consecutive weekday records carrying only a financial-investment flow.
#[cfg(test)]
pub fn make_records(flows: &[f64]) -> Vec<crate::domain::DailyFlowRecord> {
    use crate::domain::DailyFlowRecord;
    use chrono::{Datelike, Weekday};

    let mut date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    flows
        .iter()
        .map(|&fi| {
            while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                date = date.succ_opt().unwrap();
            }
            let mut record = DailyFlowRecord::empty(date);
            record.financial_investment = fi;
            record.institution = fi;
            date = date.succ_opt().unwrap();
            record
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-9;
