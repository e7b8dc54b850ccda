//! Analysis runner: wires together config, loading and the core pipeline.
//!
//! Two entry points:
//! - `run_analysis()`: validates the config, loads records, then analyzes. Used by CLI.
//! - `analyze_loaded()`: takes pre-loaded data. No I/O.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use flowrisk_core::analysis::{filter_range, trailing_days, DateRange, RiskPolicy, RiskScorer};
use flowrisk_core::data::SnapshotMeta;
use flowrisk_core::{analyze, FlowAnalysis};

use crate::config::{AnalysisConfig, ConfigError, WindowConfig};
use crate::loader::{load_records, DataSource, LoadError, LoadedData};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub dataset_hash: String,
    pub has_synthetic: bool,
    pub source: DataSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SnapshotMeta>,
    pub policy: RiskPolicy,
    /// Records in the loaded dataset, before window selection.
    pub record_count: usize,
    pub analysis: FlowAnalysis,
    pub warnings: Vec<String>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Run one analysis from a config (loads data per `[data]`).
pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisReport, RunError> {
    config.validate()?;
    let loaded = load_records(&config.load_options())?;
    Ok(analyze_loaded(&loaded, &config.analysis))
}

/// Analyze pre-loaded data over `window`. Never fails.
pub fn analyze_loaded(loaded: &LoadedData, window: &WindowConfig) -> AnalysisReport {
    let policy = window.policy;
    let scorer = RiskScorer::new(policy);
    let range = window.date_range();

    let analysis = match window.last_days {
        Some(n) => {
            let in_range = match &range {
                Some(r) => filter_range(&loaded.records, r),
                None => loaded.records.clone(),
            };
            let tail = trailing_days(&in_range, n);
            // Record the span actually analyzed.
            let tail_range = match (tail.first(), tail.last()) {
                (Some(first), Some(last)) => Some(DateRange::new(first.date, last.date)),
                _ => range,
            };
            analyze(&tail, tail_range, &scorer)
        }
        None => analyze(&loaded.records, range, &scorer),
    };

    let mut warnings = loaded.warnings.clone();
    if analysis.trading_days() == 0 && !loaded.records.is_empty() {
        let msg = "selected window contains no records".to_string();
        warn!("{msg}");
        warnings.push(msg);
    }

    info!(
        policy = %policy,
        records = loaded.records.len(),
        window = analysis.trading_days(),
        risk = analysis.risk.label(),
        "analysis complete"
    );

    AnalysisReport {
        schema_version: SCHEMA_VERSION,
        dataset_hash: loaded.dataset_hash.clone(),
        has_synthetic: loaded.has_synthetic,
        source: loaded.source.clone(),
        snapshot: loaded.meta.clone(),
        policy,
        record_count: loaded.records.len(),
        analysis,
        warnings,
    }
}
