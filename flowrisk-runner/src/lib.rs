//! FlowRisk Runner: analysis orchestration, risk timelines, artifact export.
//!
//! This crate builds on `flowrisk-core` to provide:
//! - TOML analysis configuration
//! - Record loading with snapshot/array/synthetic fallback and dataset hashing
//! - Single-run analysis producing a schema-versioned report
//! - Parallel per-date risk timelines
//! - JSON, CSV and Markdown export

pub mod config;
pub mod export;
pub mod loader;
pub mod markdown;
pub mod runner;
pub mod timeline;

pub use config::{AnalysisConfig, ConfigError, DataConfig, ReportConfig, WindowConfig};
pub use export::{
    export_json, export_series_csv, export_streaks_csv, export_timeline_csv, import_json,
    load_artifacts, save_artifacts, save_selected,
};
pub use loader::{compute_dataset_hash, load_file, load_records, DataSource, LoadError, LoadOptions, LoadedData};
pub use markdown::MarkdownReport;
pub use runner::{analyze_loaded, run_analysis, AnalysisReport, RunError, SCHEMA_VERSION};
pub use timeline::{risk_timeline, TimelinePoint};
