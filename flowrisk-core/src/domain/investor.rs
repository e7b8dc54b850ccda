//! Investor classes reported by the KRX investor-flow breakdown.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InvestorClass {
    Individual,
    Foreign,
    /// Aggregate of the six institution sub-classes below.
    Institution,
    /// Securities firms' proprietary and program trading (금융투자).
    FinancialInvestment,
    Insurance,
    InvestmentTrust,
    Bank,
    OtherFinancial,
    Pension,
    OtherCorporation,
}

impl InvestorClass {
    pub const ALL: [InvestorClass; 10] = [
        Self::Individual,
        Self::Foreign,
        Self::Institution,
        Self::FinancialInvestment,
        Self::Insurance,
        Self::InvestmentTrust,
        Self::Bank,
        Self::OtherFinancial,
        Self::Pension,
        Self::OtherCorporation,
    ];

    pub const INSTITUTION_COMPONENTS: [InvestorClass; 6] = [
        Self::FinancialInvestment,
        Self::Insurance,
        Self::InvestmentTrust,
        Self::Bank,
        Self::OtherFinancial,
        Self::Pension,
    ];

    /// Headline classes forming the `totalBuyAmount` denominator.
    pub const HEADLINE: [InvestorClass; 4] = [
        Self::Individual,
        Self::Foreign,
        Self::Institution,
        Self::OtherCorporation,
    ];

    /// Korean display label used by the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Individual => "개인",
            Self::Foreign => "외국인",
            Self::Institution => "기관",
            Self::FinancialInvestment => "금융투자",
            Self::Insurance => "보험",
            Self::InvestmentTrust => "투신",
            Self::Bank => "은행",
            Self::OtherFinancial => "기타금융",
            Self::Pension => "연기금",
            Self::OtherCorporation => "기타법인",
        }
    }
}
