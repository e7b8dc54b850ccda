//! FlowRisk Core: domain records, the analysis engine and record producers.
//!
//! This crate contains the pure part of the KOSPI investor-flow risk engine:
//! - Domain types (daily flow records, investor classes)
//! - Date-range selection, descriptive statistics, streak detection
//! - Risk scoring under three interchangeable policies
//! - Chart series (cumulative flow, 5/20-day moving averages)
//! - Seeded mock generator, JSON snapshots and the live-feed row adapter
//!
//! Nothing here touches the network or holds global state.

pub mod analysis;
pub mod data;
pub mod domain;
pub mod pipeline;

pub use pipeline::{analyze, FlowAnalysis};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: every engine output can cross thread boundaries.
    ///
    /// The runner scores timelines on a rayon pool; if any type stops being
    /// Send + Sync the build breaks here first.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::DailyFlowRecord>();
        require_sync::<domain::DailyFlowRecord>();
        require_send::<domain::InvestorClass>();
        require_sync::<domain::InvestorClass>();

        // Analysis outputs
        require_send::<analysis::DateRange>();
        require_sync::<analysis::DateRange>();
        require_send::<analysis::StatsSummary>();
        require_sync::<analysis::StatsSummary>();
        require_send::<analysis::StreakAnalysis>();
        require_sync::<analysis::StreakAnalysis>();
        require_send::<analysis::FlowPoint>();
        require_sync::<analysis::FlowPoint>();
        require_send::<analysis::RiskOutcome>();
        require_sync::<analysis::RiskOutcome>();
        require_send::<analysis::RiskScorer>();
        require_sync::<analysis::RiskScorer>();
        require_send::<FlowAnalysis>();
        require_sync::<FlowAnalysis>();

        // Producers
        require_send::<data::MockFlowGenerator>();
        require_sync::<data::MockFlowGenerator>();
        require_send::<data::FlowSnapshot>();
        require_sync::<data::FlowSnapshot>();
    }

    /// The scorer is a plain value: copying it never shares state.
    #[test]
    fn scorer_is_copy() {
        fn require_copy<T: Copy>() {}
        require_copy::<analysis::RiskScorer>();
        require_copy::<analysis::RiskPolicy>();
    }
}
