//! Domain types: the daily investor-flow record and investor classes.

pub mod investor;
pub mod record;

pub use investor::InvestorClass;
pub use record::{duplicate_dates, sort_by_date, DailyFlowRecord};
