//! Record producers: seeded mock generator, JSON snapshot files and the
//! live-feed row adapter.

pub mod mock;
pub mod naver;
pub mod snapshot;

pub use mock::MockFlowGenerator;
pub use naver::{build_rows, merge_price_pages, parse_amount, PriceRow, TrendRow};
pub use snapshot::{records_from_file, records_from_json, FlowSnapshot, SnapshotError, SnapshotMeta};
