//! Consecutive net-selling streak detection.
//!
//! A streak is a maximal run of records (in date order) whose
//! financial-investment flow is negative. Runs of at least
//! [`STRUCTURAL_MIN_DAYS`] are "structural" and are the only ones reported in
//! the streak list; `max_streak` and the current streak still see every run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{sort_by_date, DailyFlowRecord};

/// Minimum run length reported as a structural streak.
pub const STRUCTURAL_MIN_DAYS: usize = 3;

/// Minimum run length counted as a high-risk streak.
pub const HIGH_RISK_MIN_DAYS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakInterval {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: usize,
    /// Signed sum of the run's flows; always <= 0.
    pub total_amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakAnalysis {
    /// Structural streaks, longest first (ties keep date order).
    pub streaks: Vec<StreakInterval>,
    /// Longest run of any length, structural or not.
    pub max_streak: usize,
    pub structural_streak_count: usize,
    pub high_risk_streak_count: usize,
    /// Sum over structural streaks of `days - 2`.
    pub repeat_strength: usize,
    pub structural_coverage_pct: f64,
    /// Length of the run ending at the last record; 0 if that record is not selling.
    pub current_streak: usize,
    pub current_streak_amount: f64,
}

impl StreakAnalysis {
    pub fn longest(&self) -> Option<&StreakInterval> {
        self.streaks.first()
    }
}

/// Running accumulator for an open streak.
struct OpenRun {
    start: NaiveDate,
    end: NaiveDate,
    days: usize,
    sum: f64,
}

impl OpenRun {
    fn close(self) -> StreakInterval {
        StreakInterval {
            start_date: self.start,
            end_date: self.end,
            days: self.days,
            total_amount: self.sum,
        }
    }
}

/// Detect streaks over `records`. Input need not be sorted.
pub fn detect_streaks(records: &[DailyFlowRecord]) -> StreakAnalysis {
    let sorted = sort_by_date(records);
    let runs = scan_runs(&sorted);

    let max_streak = runs.iter().map(|r| r.days).max().unwrap_or(0);

    // The run still open at the end of the scan is the current streak.
    let (current_streak, current_streak_amount) = match (sorted.last(), runs.last()) {
        (Some(last), Some(run)) if last.is_financial_sell() && run.end_date == last.date => {
            (run.days, run.total_amount)
        }
        _ => (0, 0.0),
    };

    let mut streaks: Vec<StreakInterval> = runs
        .into_iter()
        .filter(|r| r.days >= STRUCTURAL_MIN_DAYS)
        .collect();

    let structural_streak_count = streaks.len();
    let high_risk_streak_count = streaks
        .iter()
        .filter(|s| s.days >= HIGH_RISK_MIN_DAYS)
        .count();
    let repeat_strength = streaks.iter().map(|s| s.days - 2).sum();
    let covered: usize = streaks.iter().map(|s| s.days).sum();
    let structural_coverage_pct = if sorted.is_empty() {
        0.0
    } else {
        covered as f64 / sorted.len() as f64 * 100.0
    };

    streaks.sort_by(|a, b| b.days.cmp(&a.days));

    StreakAnalysis {
        streaks,
        max_streak,
        structural_streak_count,
        high_risk_streak_count,
        repeat_strength,
        structural_coverage_pct,
        current_streak,
        current_streak_amount,
    }
}

/// Every maximal selling run in date order, regardless of length.
fn scan_runs(sorted: &[DailyFlowRecord]) -> Vec<StreakInterval> {
    let mut runs = Vec::new();
    let mut open: Option<OpenRun> = None;

    for record in sorted {
        if record.is_financial_sell() {
            let run = open.get_or_insert(OpenRun {
                start: record.date,
                end: record.date,
                days: 0,
                sum: 0.0,
            });
            run.end = record.date;
            run.days += 1;
            run.sum += record.financial_investment;
        } else if let Some(run) = open.take() {
            runs.push(run.close());
        }
    }

    if let Some(run) = open {
        runs.push(run.close());
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{assert_approx, make_records, DEFAULT_EPSILON};

    #[test]
    fn empty_input() {
        let a = detect_streaks(&[]);
        assert_eq!(a, StreakAnalysis::default());
        assert!(a.longest().is_none());
    }

    #[test]
    fn five_day_example() {
        let records = make_records(&[-100.0, -200.0, -150.0, 300.0, -50.0]);
        let a = detect_streaks(&records);

        assert_eq!(a.structural_streak_count, 1);
        assert_eq!(a.streaks.len(), 1);
        let s = &a.streaks[0];
        assert_eq!(s.days, 3);
        assert_eq!(s.start_date, records[0].date);
        assert_eq!(s.end_date, records[2].date);
        assert_approx(s.total_amount, -450.0, DEFAULT_EPSILON);

        assert_eq!(a.max_streak, 3);
        assert_eq!(a.current_streak, 1);
        assert_approx(a.current_streak_amount, -50.0, DEFAULT_EPSILON);
        assert_eq!(a.repeat_strength, 1);
        assert_approx(a.structural_coverage_pct, 60.0, DEFAULT_EPSILON);
    }

    #[test]
    fn single_selling_record() {
        let a = detect_streaks(&make_records(&[-10.0]));
        assert_eq!(a.max_streak, 1);
        assert_eq!(a.current_streak, 1);
        assert!(a.streaks.is_empty());
    }

    #[test]
    fn zero_flow_breaks_a_streak() {
        let a = detect_streaks(&make_records(&[-1.0, -1.0, 0.0, -1.0, -1.0]));
        assert_eq!(a.max_streak, 2);
        assert_eq!(a.structural_streak_count, 0);
        assert_eq!(a.current_streak, 2);
    }

    #[test]
    fn max_streak_counts_short_runs() {
        let a = detect_streaks(&make_records(&[-1.0, -1.0, 5.0]));
        assert_eq!(a.max_streak, 2);
        assert_eq!(a.structural_streak_count, 0);
        assert_eq!(a.current_streak, 0);
        assert_eq!(a.current_streak_amount, 0.0);
    }

    #[test]
    fn streaks_sorted_longest_first_stable() {
        let flows = [
            -1.0, -1.0, -1.0, 1.0, // 3
            -1.0, -1.0, -1.0, -1.0, -1.0, 1.0, // 5
            -2.0, -2.0, -2.0, 1.0, // 3
        ];
        let records = make_records(&flows);
        let a = detect_streaks(&records);
        let days: Vec<usize> = a.streaks.iter().map(|s| s.days).collect();
        assert_eq!(days, vec![5, 3, 3]);
        // ties keep date order
        assert!(a.streaks[1].start_date < a.streaks[2].start_date);
        assert_eq!(a.high_risk_streak_count, 1);
        assert_eq!(a.repeat_strength, 1 + 3 + 1);
        assert_eq!(a.longest().map(|s| s.days), Some(5));
    }

    #[test]
    fn unsorted_input_is_sorted_first() {
        let mut records = make_records(&[-1.0, -1.0, -1.0, 2.0]);
        records.reverse();
        let a = detect_streaks(&records);
        assert_eq!(a.structural_streak_count, 1);
        assert_eq!(a.current_streak, 0);
    }

    #[test]
    fn trailing_structural_streak_is_current() {
        let a = detect_streaks(&make_records(&[3.0, -1.0, -2.0, -3.0, -4.0]));
        assert_eq!(a.current_streak, 4);
        assert_approx(a.current_streak_amount, -10.0, DEFAULT_EPSILON);
        assert_eq!(a.streaks[0].days, 4);
        assert_approx(a.structural_coverage_pct, 80.0, DEFAULT_EPSILON);
    }
}
