//! Descriptive statistics of the financial-investment flow over a window.
//!
//! Empty input yields the all-zero summary, never NaN: consumers render
//! these numbers directly.

use serde::{Deserialize, Serialize};

use crate::domain::{DailyFlowRecord, InvestorClass};

/// Buy-side totals per investor class: the sum of `max(0, flow)`.
/// Selling days contribute 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyAmounts {
    pub individual: f64,
    pub foreign: f64,
    pub institution: f64,
    pub financial_investment: f64,
    pub insurance: f64,
    pub investment_trust: f64,
    pub bank: f64,
    pub other_financial: f64,
    pub pension: f64,
    pub other_corporation: f64,
}

impl BuyAmounts {
    pub fn get(&self, class: InvestorClass) -> f64 {
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

    fn slot(&mut self, class: InvestorClass) -> &mut f64 {
        match class {
            InvestorClass::Individual => &mut self.individual,
            InvestorClass::Foreign => &mut self.foreign,
            InvestorClass::Institution => &mut self.institution,
            InvestorClass::FinancialInvestment => &mut self.financial_investment,
            InvestorClass::Insurance => &mut self.insurance,
            InvestorClass::InvestmentTrust => &mut self.investment_trust,
            InvestorClass::Bank => &mut self.bank,
            InvestorClass::OtherFinancial => &mut self.other_financial,
            InvestorClass::Pension => &mut self.pension,
            InvestorClass::OtherCorporation => &mut self.other_corporation,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub trading_days: usize,
    pub total_net_buy: f64,
    pub average_daily_net_buy: f64,
    pub buy_amounts: BuyAmounts,
    /// Buy-side total over the four headline classes only
    /// (individual, foreign, institution, other corporation).
    pub total_buy_amount: f64,
    pub financial_buy_share_pct: f64,
    pub net_buy_days: usize,
    pub net_sell_days: usize,
    pub max_net_buy: f64,
    pub max_net_sell: f64,
    /// Population standard deviation of the daily financial-investment flow.
    pub standard_deviation: f64,
}

/// Compute the summary for an already range-filtered sequence.
pub fn calculate_stats(records: &[DailyFlowRecord]) -> StatsSummary {
    if records.is_empty() {
        return StatsSummary::default();
    }

    let count = records.len();
    let n = count as f64;

    let mut total_net_buy = 0.0;
    let mut buy_amounts = BuyAmounts::default();
    let mut net_buy_days = 0;
    let mut net_sell_days = 0;
    let mut max_net_buy = f64::NEG_INFINITY;
    let mut max_net_sell = f64::INFINITY;

    for record in records {
        let fi = record.financial_investment;
        total_net_buy += fi;
        if fi > 0.0 {
            net_buy_days += 1;
        } else if fi < 0.0 {
            net_sell_days += 1;
        }
        max_net_buy = max_net_buy.max(fi);
        max_net_sell = max_net_sell.min(fi);

        for class in InvestorClass::ALL {
            *buy_amounts.slot(class) += record.flow(class).max(0.0);
        }
    }

    let average_daily_net_buy = total_net_buy / n;

    let variance = records
        .iter()
        .map(|r| (r.financial_investment - average_daily_net_buy).powi(2))
        .sum::<f64>()
        / n;

    let total_buy_amount: f64 = InvestorClass::HEADLINE
        .iter()
        .map(|&c| buy_amounts.get(c))
        .sum();

    let financial_buy_share_pct = if total_buy_amount == 0.0 {
        0.0
    } else {
        buy_amounts.financial_investment / total_buy_amount * 100.0
    };

    StatsSummary {
        trading_days: count,
        total_net_buy,
        average_daily_net_buy,
        buy_amounts,
        total_buy_amount,
        financial_buy_share_pct,
        net_buy_days,
        net_sell_days,
        max_net_buy,
        max_net_sell,
        standard_deviation: variance.sqrt(),
    }
}
