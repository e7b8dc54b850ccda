//! One-shot analysis pipeline.
//!
//! filter → sort → (statistics, streaks) → risk → series. Pure: the input is
//! never mutated and nothing is retained between calls, so the pipeline is
//! safe to call repeatedly and from several threads.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{
    calculate_stats, detect_streaks, filter_range, transform_series, DateRange, FlowPoint,
    RiskOutcome, RiskScorer, StatsSummary, StreakAnalysis,
};
use crate::domain::{sort_by_date, DailyFlowRecord};

/// Every engine output for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowAnalysis {
    /// The requested window, if any.
    pub range: Option<DateRange>,
    pub stats: StatsSummary,
    pub streaks: StreakAnalysis,
    pub risk: RiskOutcome,
    pub series: Vec<FlowPoint>,
}

impl FlowAnalysis {
    pub fn trading_days(&self) -> usize {
        self.stats.trading_days
    }
}

/// Run the full engine over `records`, optionally narrowed to `range`.
pub fn analyze(
    records: &[DailyFlowRecord],
    range: Option<DateRange>,
    scorer: &RiskScorer,
) -> FlowAnalysis {
    let window = match &range {
        Some(r) => filter_range(records, r),
        None => records.to_vec(),
    };
    let sorted = sort_by_date(&window);
    debug!(
        input = records.len(),
        window = sorted.len(),
        "range filter applied"
    );

    let stats = calculate_stats(&sorted);
    let streaks = detect_streaks(&sorted);
    debug!(
        structural = streaks.structural_streak_count,
        max_streak = streaks.max_streak,
        current_streak = streaks.current_streak,
        "streaks detected"
    );

    let risk = scorer.assess_analyzed(&sorted, &streaks, &stats);
    debug!(policy = %scorer.policy(), label = risk.label(), "risk assessed");

    let series = transform_series(&sorted);

    FlowAnalysis {
        range,
        stats,
        streaks,
        risk,
        series,
    }
}
