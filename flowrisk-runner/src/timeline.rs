//! Risk timeline: the risk outcome as of every date in a history.
//!
//! Each point scores the prefix of records ending at that date, so the
//! timeline shows how the assessment evolved. Prefixes are independent and
//! scored in parallel with rayon; output stays in date order.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use flowrisk_core::analysis::{calculate_stats, detect_streaks, RiskOutcome, RiskScorer};
use flowrisk_core::domain::{sort_by_date, DailyFlowRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    pub date: NaiveDate,
    /// Records in the prefix ending at `date`.
    pub history: usize,
    pub financial_investment: f64,
    pub current_streak: usize,
    pub risk: RiskOutcome,
}

/// Score every prefix of at least `min_history` records (minimum 1).
pub fn risk_timeline(
    records: &[DailyFlowRecord],
    scorer: &RiskScorer,
    min_history: usize,
) -> Vec<TimelinePoint> {
    let sorted = sort_by_date(records);
    let first = min_history.max(1);
    if sorted.len() < first {
        return Vec::new();
    }

    (first..=sorted.len())
        .into_par_iter()
        .map(|end| {
            let prefix = &sorted[..end];
            let streaks = detect_streaks(prefix);
            let stats = calculate_stats(prefix);
            let risk = scorer.assess_analyzed(prefix, &streaks, &stats);
            let last = &prefix[end - 1];
            TimelinePoint {
                date: last.date,
                history: end,
                financial_investment: last.financial_investment,
                current_streak: streaks.current_streak,
                risk,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowrisk_core::analysis::RiskPolicy;
    use flowrisk_core::data::MockFlowGenerator;

    fn records() -> Vec<DailyFlowRecord> {
        MockFlowGenerator::new(17)
            .with_sell_bias(0.7)
            .generate(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            )
    }

    #[test]
    fn one_point_per_prefix_in_date_order() {
        let records = records();
        let timeline = risk_timeline(&records, &RiskScorer::default(), 5);
        assert_eq!(timeline.len(), records.len() - 4);
        assert_eq!(timeline[0].history, 5);
        assert!(timeline.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn last_point_matches_full_assessment() {
        let records = records();
        for policy in RiskPolicy::ALL {
            let scorer = RiskScorer::new(policy);
            let timeline = risk_timeline(&records, &scorer, 1);
            let last = timeline.last().unwrap();
            assert_eq!(last.risk, scorer.assess(&records));
        }
    }

    #[test]
    fn banded_score_tracks_current_streak() {
        let timeline = risk_timeline(&records(), &RiskScorer::default(), 1);
        for point in &timeline {
            assert_eq!(point.current_streak > 0, point.financial_investment < 0.0);
            if point.current_streak == 0 {
                assert_eq!(point.risk.score(), 0.0);
            }
        }
    }

    #[test]
    fn short_history_yields_nothing() {
        let records = records();
        assert!(risk_timeline(&records[..3], &RiskScorer::default(), 10).is_empty());
        assert!(risk_timeline(&[], &RiskScorer::default(), 0).is_empty());
    }
}
