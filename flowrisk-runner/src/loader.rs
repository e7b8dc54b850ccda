//! Record loading and data resolution for the runner.
//!
//! Implements the fallback policy:
//! 1. If a data path is set and readable → use it (snapshot or bare array)
//! 2. If not and `synthetic` is enabled → generate seeded mock records (tagged)
//! 3. Otherwise → fail with a clear error
//!
//! Synthetic data is a developer-only mode. Reports built on it carry
//! `has_synthetic = true`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use flowrisk_core::data::{records_from_file, MockFlowGenerator, SnapshotError, SnapshotMeta};
use flowrisk_core::domain::{duplicate_dates, sort_by_date, DailyFlowRecord, InvestorClass};

/// Institution vs. sub-class sum differences above this are reported.
const INSTITUTION_GAP_TOLERANCE: f64 = 1.0;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no data path given (use --synthetic for mock data)")]
    NoData,

    #[error("failed to load '{path}': {source}")]
    Snapshot {
        path: String,
        #[source]
        source: SnapshotError,
    },
}

/// Options controlling how records are loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    pub path: Option<PathBuf>,
    /// Generate mock records when `path` is missing or unreadable.
    pub synthetic: bool,
    pub seed: u64,
    pub sell_bias: Option<f64>,
    pub synthetic_start: NaiveDate,
    pub synthetic_end: NaiveDate,
}

/// Where the records came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    Snapshot { path: String },
    RecordArray { path: String },
    Synthetic { seed: u64 },
}

/// Result of loading records, including provenance.
#[derive(Debug, Clone)]
pub struct LoadedData {
    /// Records sorted by date.
    pub records: Vec<DailyFlowRecord>,
    pub source: DataSource,
    /// Snapshot metadata when the file carried one.
    pub meta: Option<SnapshotMeta>,
    /// BLAKE3 over dates and flow values in date order.
    pub dataset_hash: String,
    pub has_synthetic: bool,
    /// Data-quality findings. Never fatal.
    pub warnings: Vec<String>,
}

/// Load records from `opts.path`, falling back to mock data when allowed.
pub fn load_records(opts: &LoadOptions) -> Result<LoadedData, LoadError> {
    // Step 1: file
    if let Some(path) = &opts.path {
        match records_from_file(path) {
            Ok((records, meta)) => {
                let source = match meta {
                    Some(_) => DataSource::Snapshot {
                        path: path.display().to_string(),
                    },
                    None => DataSource::RecordArray {
                        path: path.display().to_string(),
                    },
                };
                info!(path = %path.display(), records = records.len(), "loaded flow records");
                return Ok(finish(records, source, meta, false));
            }
            Err(source) if opts.synthetic => {
                warn!(path = %path.display(), error = %source, "data file unusable, using synthetic records");
            }
            Err(source) => {
                return Err(LoadError::Snapshot {
                    path: path.display().to_string(),
                    source,
                })
            }
        }
    }

    // Step 2: synthetic fallback
    if opts.synthetic {
        warn!(seed = opts.seed, "generating synthetic records; results will be tagged as synthetic");
        let mut generator = MockFlowGenerator::new(opts.seed);
        if let Some(bias) = opts.sell_bias {
            generator = generator.with_sell_bias(bias);
        }
        let records = generator.generate(opts.synthetic_start, opts.synthetic_end);
        return Ok(finish(
            records,
            DataSource::Synthetic { seed: opts.seed },
            None,
            true,
        ));
    }

    // Step 3: fail
    Err(LoadError::NoData)
}

/// Load a single file with no fallback.
pub fn load_file(path: &Path) -> Result<LoadedData, LoadError> {
    load_records(&LoadOptions {
        path: Some(path.to_path_buf()),
        synthetic: false,
        seed: 0,
        sell_bias: None,
        synthetic_start: NaiveDate::MIN,
        synthetic_end: NaiveDate::MIN,
    })
}

fn finish(
    records: Vec<DailyFlowRecord>,
    source: DataSource,
    meta: Option<SnapshotMeta>,
    has_synthetic: bool,
) -> LoadedData {
    let records = sort_by_date(&records);
    let warnings = quality_warnings(&records);
    for w in &warnings {
        warn!("{w}");
    }
    let dataset_hash = compute_dataset_hash(&records);

    LoadedData {
        records,
        source,
        meta,
        dataset_hash,
        has_synthetic,
        warnings,
    }
}

/// Duplicate dates and inconsistent institution totals. `records` must be sorted.
fn quality_warnings(records: &[DailyFlowRecord]) -> Vec<String> {
    let mut warnings = Vec::new();

    if records.is_empty() {
        warnings.push("dataset is empty".to_string());
        return warnings;
    }

    let dupes = duplicate_dates(records);
    if !dupes.is_empty() {
        let listed: Vec<String> = dupes.iter().take(5).map(|d| d.to_string()).collect();
        warnings.push(format!(
            "{} duplicate date(s) kept as-is: {}{}",
            dupes.len(),
            listed.join(", "),
            if dupes.len() > 5 { ", ..." } else { "" }
        ));
    }

    let gaps = records
        .iter()
        .filter(|r| r.institution_gap().abs() > INSTITUTION_GAP_TOLERANCE)
        .count();
    if gaps > 0 {
        warnings.push(format!(
            "{gaps} record(s) where institution differs from the sum of its sub-classes"
        ));
    }

    warnings
}

/// Compute a deterministic BLAKE3 hash over sorted records.
///
/// Covers the date and every investor-class flow in a fixed class order.
pub fn compute_dataset_hash(records: &[DailyFlowRecord]) -> String {
    let mut hasher = blake3::Hasher::new();
    for record in records {
        hasher.update(record.date.to_string().as_bytes());
        for class in InvestorClass::ALL {
            hasher.update(&record.flow(class).to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}
