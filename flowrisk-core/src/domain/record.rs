//! DailyFlowRecord: one trading day of KOSPI investor net-buy amounts.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::investor::InvestorClass;

/// Net-buy amounts per investor class for a single trading day.
///
/// Positive values are net buys, negative values net sells. Every flow field
/// defaults to 0 when missing from the producer (live feeds without the
/// class-level breakdown leave the institution sub-classes at 0).
///
/// `institution` is itself an aggregate of the six institution sub-classes,
/// so it is excluded from cross-section sums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyFlowRecord {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kospi_index: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kospi_change: Option<f64>,
    #[serde(default, deserialize_with = "flow_or_zero")]
    pub individual: f64,
    #[serde(default, deserialize_with = "flow_or_zero")]
    pub foreign: f64,
    #[serde(default, deserialize_with = "flow_or_zero")]
    pub institution: f64,
    #[serde(default, deserialize_with = "flow_or_zero")]
    pub financial_investment: f64,
    #[serde(default, deserialize_with = "flow_or_zero")]
    pub insurance: f64,
    #[serde(default, deserialize_with = "flow_or_zero")]
    pub investment_trust: f64,
    #[serde(default, deserialize_with = "flow_or_zero")]
    pub bank: f64,
    #[serde(default, deserialize_with = "flow_or_zero")]
    pub other_financial: f64,
    #[serde(default, deserialize_with = "flow_or_zero")]
    pub pension: f64,
    #[serde(default, deserialize_with = "flow_or_zero")]
    pub other_corporation: f64,
}

/// A missing or `null` flow reads as 0.
fn flow_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl DailyFlowRecord {
    /// A record with every flow at zero and no index data.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            kospi_index: None,
            kospi_change: None,
            individual: 0.0,
            foreign: 0.0,
            institution: 0.0,
            financial_investment: 0.0,
            insurance: 0.0,
            investment_trust: 0.0,
            bank: 0.0,
            other_financial: 0.0,
            pension: 0.0,
            other_corporation: 0.0,
        }
    }

    /// Net-buy amount of a single investor class.
    pub fn flow(&self, class: InvestorClass) -> f64 {
        match class {
            InvestorClass::Individual => self.individual,
            InvestorClass::Foreign => self.foreign,
            InvestorClass::Institution => self.institution,
            InvestorClass::FinancialInvestment => self.financial_investment,
            InvestorClass::Insurance => self.insurance,
            InvestorClass::InvestmentTrust => self.investment_trust,
            InvestorClass::Bank => self.bank,
            InvestorClass::OtherFinancial => self.other_financial,
            InvestorClass::Pension => self.pension,
            InvestorClass::OtherCorporation => self.other_corporation,
        }
    }

    /// True when the financial-investment class was a net seller.
    pub fn is_financial_sell(&self) -> bool {
        self.financial_investment < 0.0
    }

    /// Sum of the six institution sub-classes.
    pub fn institution_components(&self) -> f64 {
        InvestorClass::INSTITUTION_COMPONENTS
            .iter()
            .map(|&c| self.flow(c))
            .sum()
    }

    /// `institution - institution_components()`. Near zero for producers that
    /// carry the full breakdown.
    pub fn institution_gap(&self) -> f64 {
        self.institution - self.institution_components()
    }

    /// Net flow across all participants, counting institution through its
    /// components. Flows are net-zero market-wide, so this should sit near 0.
    pub fn net_cross_section(&self) -> f64 {
        self.individual + self.foreign + self.institution_components() + self.other_corporation
    }

    /// Sum of absolute net-sell amounts across every investor class field.
    pub fn total_sell_amount(&self) -> f64 {
        InvestorClass::ALL
            .iter()
            .map(|&c| self.flow(c))
            .filter(|v| *v < 0.0)
            .map(f64::abs)
            .sum()
    }

    /// Financial-investment selling as a percentage of the day's total
    /// selling. 0 when nothing was sold.
    pub fn financial_sell_ratio_pct(&self) -> f64 {
        let total = self.total_sell_amount();
        if total <= 0.0 || !self.is_financial_sell() {
            return 0.0;
        }
        self.financial_investment.abs() / total * 100.0
    }
}

/// Stable ascending sort by date, returning a new vector.
pub fn sort_by_date(records: &[DailyFlowRecord]) -> Vec<DailyFlowRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by_key(|r| r.date);
    sorted
}

/// Dates that occur more than once, ascending.
///
/// The engine never deduplicates; callers use this to report data quality.
pub fn duplicate_dates(records: &[DailyFlowRecord]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
    dates.sort();
    let mut dups: Vec<NaiveDate> = dates
        .windows(2)
        .filter(|w| w[0] == w[1])
        .map(|w| w[0])
        .collect();
    dups.dedup();
    dups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> DailyFlowRecord {
        DailyFlowRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            kospi_index: Some(2_650.0),
            kospi_change: Some(-12.5),
            individual: 3_000.0,
            foreign: -1_000.0,
            institution: -1_500.0,
            financial_investment: -1_200.0,
            insurance: -100.0,
            investment_trust: -300.0,
            bank: 50.0,
            other_financial: -50.0,
            pension: 100.0,
            other_corporation: -500.0,
        }
    }

    #[test]
    fn institution_components_match_aggregate() {
        let r = sample_record();
        assert_eq!(r.institution_components(), -1_500.0);
        assert_eq!(r.institution_gap(), 0.0);
    }

    #[test]
    fn cross_section_nets_to_zero() {
        let r = sample_record();
        assert_eq!(r.net_cross_section(), 0.0);
    }

    #[test]
    fn sell_ratio_uses_every_class_field() {
        let r = sample_record();
        // sells: foreign 1000, institution 1500, fi 1200, insurance 100,
        // trust 300, other_financial 50, other_corp 500
        assert_eq!(r.total_sell_amount(), 4_650.0);
        let expected = 1_200.0 / 4_650.0 * 100.0;
        assert!((r.financial_sell_ratio_pct() - expected).abs() < 1e-9);
    }

    #[test]
    fn sell_ratio_zero_when_nothing_sold() {
        let r = DailyFlowRecord::empty(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(r.financial_sell_ratio_pct(), 0.0);
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let json = r#"{"date":"2024-03-04","individual":10,"financialInvestment":-5}"#;
        let r: DailyFlowRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.individual, 10.0);
        assert_eq!(r.financial_investment, -5.0);
        assert_eq!(r.pension, 0.0);
        assert!(r.kospi_index.is_none());
    }

    #[test]
    fn null_fields_read_as_zero() {
        let json = r#"{"date":"2024-03-04","pension":null,"bank":null,"foreign":-7,"kospiIndex":null}"#;
        let r: DailyFlowRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.pension, 0.0);
        assert_eq!(r.bank, 0.0);
        assert_eq!(r.foreign, -7.0);
        assert!(r.kospi_index.is_none());
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_string(&sample_record()).unwrap();
        assert!(json.contains("\"financialInvestment\":-1200.0"));
        assert!(json.contains("\"kospiIndex\":2650.0"));
        assert!(json.contains("\"date\":\"2024-03-04\""));
    }

    #[test]
    fn duplicate_dates_reported_once() {
        let a = sample_record();
        let mut b = sample_record();
        b.date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let dups = duplicate_dates(&[a.clone(), b, a.clone(), a]);
        assert_eq!(dups, vec![NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()]);
    }

    #[test]
    fn sort_is_stable_and_ascending() {
        let mut late = sample_record();
        late.date = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        let mut early = sample_record();
        early.individual = 1.0;
        let mut early_twin = sample_record();
        early_twin.individual = 2.0;

        let sorted = sort_by_date(&[late, early, early_twin]);
        assert_eq!(sorted[0].individual, 1.0);
        assert_eq!(sorted[1].individual, 2.0);
        assert_eq!(sorted[2].date, NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
    }
}
