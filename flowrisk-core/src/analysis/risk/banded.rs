//! Banded streak policy: the score is a step function of the current streak.

use super::RiskAssessment;
use crate::analysis::streak::StreakAnalysis;

/// Score band for a current-streak length. Monotonic non-decreasing.
pub fn band_score(current_streak: usize) -> u32 {
    match current_streak {
        0 => 0,
        1 => 1,
        2 => 2,
        3..=4 => 4,
        5..=6 => 7,
        _ => 10,
    }
}

fn category(current_streak: usize) -> &'static str {
    match current_streak {
        1..=2 => "단기 매도",
        3..=4 => "구조적 매도",
        5..=6 => "고위험 매도",
        _ => "장기 구조적 매도",
    }
}

pub fn score(streaks: &StreakAnalysis) -> RiskAssessment {
    let days = streaks.current_streak;
    let mut factors = Vec::new();

    if days >= 1 {
        factors.push(format!(
            "금융투자 {days}일 연속 순매도 ({})",
            category(days)
        ));
    }
    if days >= 2 {
        factors.push(format!(
            "연속 순매도 누적 금액 {:.0}",
            streaks.current_streak_amount
        ));
    }

    RiskAssessment::from_parts(band_score(days), factors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::risk::{RiskLevel, NO_SIGNAL_FACTOR};

    fn with_current(days: usize, amount: f64) -> StreakAnalysis {
        StreakAnalysis {
            current_streak: days,
            current_streak_amount: amount,
            ..StreakAnalysis::default()
        }
    }

    #[test]
    fn six_day_streak_scores_seven() {
        let a = score(&with_current(6, -6_000.0));
        assert_eq!(a.score, 7);
        // warning tops out at 5 under the shared level thresholds
        assert_eq!(a.level, RiskLevel::Danger);
        assert_eq!(score(&with_current(4, -4_000.0)).level, RiskLevel::Warning);
    }

    #[test]
    fn bands() {
        let expected = [(0, 0), (1, 1), (2, 2), (3, 4), (4, 4), (5, 7), (6, 7), (7, 10), (30, 10)];
        for (days, s) in expected {
            assert_eq!(band_score(days), s, "streak {days}");
        }
    }

    #[test]
    fn no_streak_emits_placeholder() {
        let a = score(&with_current(0, 0.0));
        assert_eq!(a.score, 0);
        assert_eq!(a.level, RiskLevel::Normal);
        assert_eq!(a.factors, vec![NO_SIGNAL_FACTOR.to_string()]);
    }

    #[test]
    fn amount_factor_from_two_days() {
        assert_eq!(score(&with_current(1, -10.0)).factors.len(), 1);
        let a = score(&with_current(2, -30.0));
        assert_eq!(a.factors.len(), 2);
        assert!(a.factors[1].contains("-30"));
    }
}
