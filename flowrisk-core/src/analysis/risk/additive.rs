//! Additive multi-factor policy.
//!
//! Each rule is independent; every rule that holds adds its weight and one
//! factor string. The total is clamped at [`super::MAX_SCORE`].

use super::RiskAssessment;
use crate::analysis::stats::StatsSummary;
use crate::analysis::streak::StreakAnalysis;
use crate::domain::DailyFlowRecord;

const VOLATILITY_THRESHOLD: f64 = 2_000.0;
const RECENT_WINDOW: usize = 3;
const RECENT_SELL_THRESHOLD: f64 = -5_000.0;
const LARGE_SELL_THRESHOLD: f64 = -10_000.0;

/// `sorted` is the date-ascending sequence the streaks and stats came from.
pub fn score(
    sorted: &[DailyFlowRecord],
    streaks: &StreakAnalysis,
    stats: &StatsSummary,
) -> RiskAssessment {
    let mut score = 0u32;
    let mut factors = Vec::new();
    let days = streaks.current_streak;

    if days >= 3 {
        score += 1;
        factors.push(format!("금융투자 {days}일 연속 순매도 (3일 이상)"));
    }
    if days >= 5 {
        score += 2;
        factors.push("연속 순매도 5일 이상".to_string());
    }
    if days >= 7 {
        score += 1;
        factors.push("연속 순매도 7일 이상".to_string());
    }

    if stats.average_daily_net_buy < 0.0 {
        score += 1;
        factors.push(format!(
            "일평균 순매수 음수 ({:.0})",
            stats.average_daily_net_buy
        ));
    }

    if stats.standard_deviation > VOLATILITY_THRESHOLD {
        score += 1;
        factors.push(format!(
            "순매수 변동성 확대 (표준편차 {:.0})",
            stats.standard_deviation
        ));
    }

    let skip = sorted.len().saturating_sub(RECENT_WINDOW);
    let recent_sum: f64 = sorted[skip..].iter().map(|r| r.financial_investment).sum();
    if recent_sum < RECENT_SELL_THRESHOLD {
        score += 2;
        factors.push(format!("최근 3일 누적 순매도 {recent_sum:.0}"));
    }

    if stats.max_net_sell < LARGE_SELL_THRESHOLD {
        score += 1;
        factors.push(format!("단일일 대규모 순매도 ({:.0})", stats.max_net_sell));
    }

    if let Some(last) = sorted.last() {
        if last.financial_investment < 0.0 && last.foreign < 0.0 {
            score += 1;
            factors.push("최근일 금융투자·외국인 동반 순매도".to_string());
        }
    }

    RiskAssessment::from_parts(score, factors)
}
