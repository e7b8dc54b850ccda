//! Row adapter for the Naver mobile KOSPI index API.
//!
//! Converts already-fetched `price` and `trend` payloads into flow records.
//! No network access happens here. The trend endpoint only reports the
//! individual / foreign / institutional split, so the whole institutional
//! figure is attributed to financial investment, the other institution
//! sub-classes are zeroed, and `otherCorporation` closes the cross-section.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::DailyFlowRecord;

/// One row of `/api/index/KOSPI/price`.
///
/// Rows without a usable `localTradedAt` deserialize with `None` and are
/// skipped by [`merge_price_pages`] and [`build_rows`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRow {
    #[serde(default, deserialize_with = "lenient_date")]
    pub local_traded_at: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub close_price: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub compare_to_previous_close_price: Option<String>,
}

/// Body of `/api/index/KOSPI/trend?bizdate=YYYYMMDD`.
///
/// Values arrive as formatted strings (`"+1,234"`) or bare numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendRow {
    #[serde(default, deserialize_with = "lenient_text")]
    pub personal_value: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub foreign_value: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub institutional_value: Option<String>,
}

/// Strings pass through, numbers are rendered as text, anything else is `None`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// `YYYY-MM-DD`, or `None` for null, empty or malformed dates.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.and_then(|s| s.trim().parse().ok()))
}

/// Parse a formatted amount such as `"+1,234"` or `"-56"`.
///
/// Thousands separators and a leading `+` are stripped, the value is
/// truncated toward zero, and anything unparseable becomes 0.
pub fn parse_amount(value: Option<&str>) -> f64 {
    parse_decimal(value).map(f64::trunc).unwrap_or(0.0)
}

/// Parse a formatted decimal such as `"2,612.34"`, keeping the fraction.
pub fn parse_decimal(value: Option<&str>) -> Option<f64> {
    let normalized: String = value?
        .chars()
        .filter(|c| *c != ',' && *c != '+')
        .collect();
    let normalized = normalized.trim();
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Compact `YYYYMMDD` business-date key used by the trend endpoint.
pub fn to_bizdate(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Merge paged price responses, keeping the last row seen per date,
/// ascending by date.
pub fn merge_price_pages(pages: impl IntoIterator<Item = Vec<PriceRow>>) -> Vec<PriceRow> {
    let mut seen: BTreeMap<NaiveDate, PriceRow> = BTreeMap::new();
    for row in pages.into_iter().flatten() {
        if let Some(date) = row.local_traded_at {
            seen.insert(date, row);
        }
    }
    seen.into_values().collect()
}

/// Build one record per dated price row. Dates missing from `trends` get
/// zero flows.
pub fn build_rows(prices: &[PriceRow], trends: &HashMap<String, TrendRow>) -> Vec<DailyFlowRecord> {
    let empty = TrendRow::default();
    let mut rows: Vec<DailyFlowRecord> = prices
        .iter()
        .filter_map(|price| price.local_traded_at.map(|date| (date, price)))
        .map(|(date, price)| {
            let trend = trends.get(&to_bizdate(date)).unwrap_or(&empty);

            let individual = parse_amount(trend.personal_value.as_deref());
            let foreign = parse_amount(trend.foreign_value.as_deref());
            let institution = parse_amount(trend.institutional_value.as_deref());

            let mut record = DailyFlowRecord::empty(date);
            record.kospi_index = parse_decimal(price.close_price.as_deref());
            record.kospi_change = parse_decimal(price.compare_to_previous_close_price.as_deref());
            record.individual = individual;
            record.foreign = foreign;
            record.institution = institution;
            record.financial_investment = institution;
            record.other_corporation = -(individual + foreign + institution);
            record
        })
        .collect();

    rows.sort_by_key(|r| r.date);
    rows
}
