//! Inclusive date-window selection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::DailyFlowRecord;

/// Inclusive `[start, end]` window. Always ordered: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a window, swapping the bounds if they arrive inverted.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Records whose date lies within `range`, in their original relative order.
pub fn filter_range(records: &[DailyFlowRecord], range: &DateRange) -> Vec<DailyFlowRecord> {
    records
        .iter()
        .filter(|r| range.contains(r.date))
        .cloned()
        .collect()
}

/// The last `n` records by date, ascending. Fewer if the input is shorter.
pub fn trailing_days(records: &[DailyFlowRecord], n: usize) -> Vec<DailyFlowRecord> {
    let sorted = crate::domain::sort_by_date(records);
    let skip = sorted.len().saturating_sub(n);
    sorted.into_iter().skip(skip).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::make_records;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn inverted_bounds_are_swapped() {
        let r = DateRange::new(d(2024, 2, 1), d(2024, 1, 1));
        assert_eq!(r.start(), d(2024, 1, 1));
        assert_eq!(r.end(), d(2024, 2, 1));
    }

    #[test]
    fn bounds_are_inclusive() {
        // 2024-01-02 (Tue) .. 2024-01-08 (Mon)
        let records = make_records(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let range = DateRange::new(d(2024, 1, 3), d(2024, 1, 5));
        let out = filter_range(&records, &range);
        let flows: Vec<f64> = out.iter().map(|r| r.financial_investment).collect();
        assert_eq!(flows, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn preserves_input_order() {
        let mut records = make_records(&[1.0, 2.0, 3.0]);
        records.reverse();
        let range = DateRange::new(d(2024, 1, 1), d(2024, 12, 31));
        let out = filter_range(&records, &range);
        let flows: Vec<f64> = out.iter().map(|r| r.financial_investment).collect();
        assert_eq!(flows, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn empty_input_and_empty_result() {
        let range = DateRange::new(d(2024, 1, 1), d(2024, 1, 31));
        assert!(filter_range(&[], &range).is_empty());

        let records = make_records(&[1.0, 2.0]);
        let far = DateRange::new(d(2030, 1, 1), d(2030, 1, 31));
        assert!(filter_range(&records, &far).is_empty());
    }

    #[test]
    fn trailing_days_takes_latest() {
        let mut records = make_records(&[1.0, 2.0, 3.0, 4.0]);
        records.swap(0, 3);
        let out = trailing_days(&records, 2);
        let flows: Vec<f64> = out.iter().map(|r| r.financial_investment).collect();
        assert_eq!(flows, vec![3.0, 4.0]);
        assert_eq!(trailing_days(&records, 10).len(), 4);
    }
}
