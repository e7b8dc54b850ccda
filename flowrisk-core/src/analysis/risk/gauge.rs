//! Five-level gauge policy.
//!
//! Three sub-scores (streak length, recent average sell size, share of the
//! last day's selling) are summed to at most 8 points and mapped to a 1–5
//! gauge level with a fixed label, color and description.

use serde::{Deserialize, Serialize};

use crate::analysis::streak::StreakAnalysis;
use crate::domain::DailyFlowRecord;

/// Number of most recent days averaged for the sell-size sub-score.
pub const RECENT_DAYS: usize = 10;

/// Gauge level, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct GaugeLevel(u8);

impl GaugeLevel {
    pub const MIN: GaugeLevel = GaugeLevel(1);
    pub const MAX: GaugeLevel = GaugeLevel(5);

    pub fn new(level: u8) -> Option<Self> {
        (1..=5).contains(&level).then_some(Self(level))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    fn from_points(points: f64) -> Self {
        let level = if points >= 7.0 {
            5
        } else if points >= 5.5 {
            4
        } else if points >= 4.0 {
            3
        } else if points >= 2.0 {
            2
        } else {
            1
        };
        Self(level)
    }

    pub fn label(&self) -> &'static str {
        match self.0 {
            1 => "안전",
            2 => "관심",
            3 => "주의",
            4 => "경고",
            _ => "위험",
        }
    }

    pub fn color(&self) -> &'static str {
        match self.0 {
            1 => "#22c55e",
            2 => "#84cc16",
            3 => "#eab308",
            4 => "#f97316",
            _ => "#ef4444",
        }
    }

    pub fn description(&self) -> &'static str {
        match self.0 {
            1 => "금융투자 매도 압력이 낮은 안정 구간입니다.",
            2 => "단기 매도 신호가 관찰됩니다. 추이를 지켜보세요.",
            3 => "연속 매도와 매도 비중이 커지고 있습니다.",
            4 => "구조적 매도 패턴이 뚜렷합니다. 변동성 확대에 유의하세요.",
            _ => "장기 연속 대규모 매도가 진행 중인 고위험 구간입니다.",
        }
    }
}

impl TryFrom<u8> for GaugeLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("gauge level {value} outside 1..=5"))
    }
}

impl From<GaugeLevel> for u8 {
    fn from(level: GaugeLevel) -> u8 {
        level.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeAssessment {
    pub level: GaugeLevel,
    pub label: String,
    pub color: String,
    pub description: String,
    pub consecutive_sell_days: usize,
    /// Mean absolute flow over selling days within the recent window.
    pub avg_sell_amount: f64,
    /// Financial-investment share (%) of the last day's total selling.
    pub sell_ratio: f64,
    /// Sum of the three sub-scores.
    pub points: f64,
}

fn streak_points(days: usize) -> f64 {
    match days {
        d if d >= 10 => 3.0,
        d if d >= 7 => 2.5,
        d if d >= 5 => 2.0,
        d if d >= 3 => 1.0,
        _ => 0.0,
    }
}

fn amount_points(avg: f64) -> f64 {
    if avg >= 2_000.0 {
        3.0
    } else if avg >= 1_500.0 {
        2.5
    } else if avg >= 1_000.0 {
        2.0
    } else if avg >= 500.0 {
        1.0
    } else {
        0.0
    }
}

fn ratio_points(ratio: f64) -> f64 {
    if ratio >= 40.0 {
        2.0
    } else if ratio >= 30.0 {
        1.5
    } else if ratio >= 20.0 {
        1.0
    } else if ratio >= 10.0 {
        0.5
    } else {
        0.0
    }
}

/// Mean |flow| over selling days among the last `RECENT_DAYS` records.
fn recent_avg_sell(sorted: &[DailyFlowRecord]) -> f64 {
    let skip = sorted.len().saturating_sub(RECENT_DAYS);
    let sells: Vec<f64> = sorted[skip..]
        .iter()
        .filter(|r| r.is_financial_sell())
        .map(|r| r.financial_investment.abs())
        .collect();
    if sells.is_empty() {
        return 0.0;
    }
    sells.iter().sum::<f64>() / sells.len() as f64
}

pub fn score(sorted: &[DailyFlowRecord], streaks: &StreakAnalysis) -> GaugeAssessment {
    let consecutive_sell_days = streaks.current_streak;
    let avg_sell_amount = recent_avg_sell(sorted);
    let sell_ratio = sorted
        .last()
        .map(DailyFlowRecord::financial_sell_ratio_pct)
        .unwrap_or(0.0);

    let points = streak_points(consecutive_sell_days)
        + amount_points(avg_sell_amount)
        + ratio_points(sell_ratio);
    let level = GaugeLevel::from_points(points);

    GaugeAssessment {
        level,
        label: level.label().to_string(),
        color: level.color().to_string(),
        description: level.description().to_string(),
        consecutive_sell_days,
        avg_sell_amount,
        sell_ratio,
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{assert_approx, detect_streaks, make_records, DEFAULT_EPSILON};

    fn assess(records: &[DailyFlowRecord]) -> GaugeAssessment {
        score(records, &detect_streaks(records))
    }

    #[test]
    fn sub_score_breakpoints() {
        assert_eq!(streak_points(2), 0.0);
        assert_eq!(streak_points(3), 1.0);
        assert_eq!(streak_points(5), 2.0);
        assert_eq!(streak_points(7), 2.5);
        assert_eq!(streak_points(10), 3.0);
        assert_eq!(amount_points(499.0), 0.0);
        assert_eq!(amount_points(500.0), 1.0);
        assert_eq!(amount_points(1_500.0), 2.5);
        assert_eq!(amount_points(2_000.0), 3.0);
        assert_eq!(ratio_points(9.9), 0.0);
        assert_eq!(ratio_points(10.0), 0.5);
        assert_eq!(ratio_points(30.0), 1.5);
        assert_eq!(ratio_points(40.0), 2.0);
    }

    #[test]
    fn level_breakpoints() {
        assert_eq!(GaugeLevel::from_points(0.0).value(), 1);
        assert_eq!(GaugeLevel::from_points(1.5).value(), 1);
        assert_eq!(GaugeLevel::from_points(2.0).value(), 2);
        assert_eq!(GaugeLevel::from_points(4.0).value(), 3);
        assert_eq!(GaugeLevel::from_points(5.5).value(), 4);
        assert_eq!(GaugeLevel::from_points(7.0).value(), 5);
        assert_eq!(GaugeLevel::from_points(8.0), GaugeLevel::MAX);
    }

    #[test]
    fn empty_input_is_level_one() {
        let g = assess(&[]);
        assert_eq!(g.level, GaugeLevel::MIN);
        assert_eq!(g.label, "안전");
        assert_eq!(g.points, 0.0);
    }

    #[test]
    fn heavy_selling_reaches_top_level() {
        // make_records mirrors the flow into institution, halving the share.
        let g = assess(&make_records(&[-2_500.0; 12]));
        assert_eq!(g.consecutive_sell_days, 12);
        assert_approx(g.avg_sell_amount, 2_500.0, DEFAULT_EPSILON);
        assert_approx(g.sell_ratio, 50.0, DEFAULT_EPSILON);
        assert_approx(g.points, 8.0, DEFAULT_EPSILON);
        assert_eq!(g.level, GaugeLevel::MAX);
        assert_eq!(g.color, "#ef4444");
    }

    #[test]
    fn avg_sell_only_looks_at_recent_window() {
        let mut flows = vec![-9_000.0; 5];
        flows.extend([100.0, -600.0, 100.0, -400.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0]);
        let g = assess(&make_records(&flows));
        assert_approx(g.avg_sell_amount, 500.0, DEFAULT_EPSILON);
        assert_eq!(g.consecutive_sell_days, 0);
        assert_eq!(g.sell_ratio, 0.0);
    }

    #[test]
    fn level_rejects_out_of_range() {
        assert!(GaugeLevel::new(0).is_none());
        assert!(GaugeLevel::new(6).is_none());
        assert!(serde_json::from_str::<GaugeLevel>("9").is_err());
        assert_eq!(serde_json::from_str::<GaugeLevel>("3").unwrap().value(), 3);
    }
}
