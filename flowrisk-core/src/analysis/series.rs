//! Chart series: daily flow, running cumulative sum and trailing moving averages.
//!
//! Moving averages use a fixed trailing window with no padding: the first
//! `window - 1` points have no value.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{sort_by_date, DailyFlowRecord};

pub const SHORT_WINDOW: usize = 5;
pub const LONG_WINDOW: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub cumulative: f64,
    pub ma5: Option<f64>,
    pub ma20: Option<f64>,
    pub is_sell: bool,
}

/// Rolling mean over the trailing `window` values ending at each index.
///
/// Each window is summed afresh, so a mean never carries rounding residue
/// from values that have already left the window.
pub fn trailing_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    assert!(window >= 1, "moving average window must be >= 1");
    let mut result = vec![None; values.len()];
    for (slot, w) in result
        .iter_mut()
        .skip(window - 1)
        .zip(values.windows(window))
    {
        *slot = Some(w.iter().sum::<f64>() / window as f64);
    }
    result
}

/// Build one point per record, in ascending date order.
pub fn transform_series(records: &[DailyFlowRecord]) -> Vec<FlowPoint> {
    let sorted = sort_by_date(records);
    let values: Vec<f64> = sorted.iter().map(|r| r.financial_investment).collect();
    let ma5 = trailing_mean(&values, SHORT_WINDOW);
    let ma20 = trailing_mean(&values, LONG_WINDOW);

    let mut cumulative = 0.0;
    sorted
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let value = r.financial_investment;
            cumulative += value;
            FlowPoint {
                date: r.date,
                value,
                cumulative,
                ma5: ma5[i],
                ma20: ma20[i],
                is_sell: value < 0.0,
            }
        })
        .collect()
}
