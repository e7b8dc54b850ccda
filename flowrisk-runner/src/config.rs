//! TOML analysis configuration.
//!
//! ```toml
//! [data]
//! path = "data/flows.json"     # snapshot or bare record array
//! synthetic = false            # fall back to seeded mock data
//! seed = 42
//!
//! [analysis]
//! start_date = "2024-01-01"    # dates are quoted ISO strings
//! end_date = "2024-06-30"
//! last_days = 20               # optional: trailing trading days only
//! policy = "banded_streak"
//!
//! [report]
//! output_dir = "reports"
//! markdown = true
//! csv = true
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use flowrisk_core::analysis::{DateRange, RiskPolicy};

use crate::loader::LoadOptions;

pub const DEFAULT_SEED: u64 = 42;

/// Errors from loading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no data source: set [data].path or enable [data].synthetic")]
    NoDataSource,

    #[error("sell bias {0} outside [0, 1]")]
    InvalidSellBias(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Snapshot JSON or bare record array.
    pub path: Option<PathBuf>,
    /// Generate seeded mock records when `path` is missing or unreadable.
    pub synthetic: bool,
    pub seed: u64,
    pub sell_bias: Option<f64>,
    pub synthetic_start: Option<NaiveDate>,
    pub synthetic_end: Option<NaiveDate>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: None,
            synthetic: false,
            seed: DEFAULT_SEED,
            sell_bias: None,
            synthetic_start: None,
            synthetic_end: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Keep only the last N trading days of the window.
    pub last_days: Option<usize>,
    pub policy: RiskPolicy,
}

impl WindowConfig {
    /// The requested window. A missing bound is open-ended; inverted bounds
    /// are swapped.
    pub fn date_range(&self) -> Option<DateRange> {
        match (self.start_date, self.end_date) {
            (None, None) => None,
            (start, end) => {
                let (open_start, open_end) = open_bounds();
                Some(DateRange::new(
                    start.unwrap_or(open_start),
                    end.unwrap_or(open_end),
                ))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Artifacts are only written when set.
    pub output_dir: Option<PathBuf>,
    pub markdown: bool,
    pub csv: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            markdown: true,
            csv: true,
        }
    }
}

/// Full configuration for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub data: DataConfig,
    pub analysis: WindowConfig,
    pub report: ReportConfig,
}

impl AnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.path.is_none() && !self.data.synthetic {
            return Err(ConfigError::NoDataSource);
        }
        if let Some(bias) = self.data.sell_bias {
            if !(0.0..=1.0).contains(&bias) {
                return Err(ConfigError::InvalidSellBias(bias));
            }
        }
        Ok(())
    }

    /// Loader options. The synthetic span defaults to the analysis window,
    /// then to [`default_synthetic_span`].
    pub fn load_options(&self) -> LoadOptions {
        let (default_start, default_end) = default_synthetic_span();
        let start = self
            .data
            .synthetic_start
            .or(self.analysis.start_date)
            .unwrap_or(default_start);
        let end = self
            .data
            .synthetic_end
            .or(self.analysis.end_date)
            .unwrap_or(default_end);

        LoadOptions {
            path: self.data.path.clone(),
            synthetic: self.data.synthetic,
            seed: self.data.seed,
            sell_bias: self.data.sell_bias,
            synthetic_start: start,
            synthetic_end: end,
        }
    }
}

/// Stand-ins for a missing window bound. Four-digit years keep them
/// serializable as plain ISO dates.
fn open_bounds() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN),
        NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX),
    )
}

/// Calendar year 2024. Fixed so synthetic runs stay reproducible.
pub fn default_synthetic_span() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN),
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or(NaiveDate::MAX),
    )
}
