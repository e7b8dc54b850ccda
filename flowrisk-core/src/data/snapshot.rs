//! Static JSON snapshot of investor-flow records.
//!
//! The refresh pipeline writes `{ "meta": {...}, "data": [...] }`. Loaders
//! also accept a bare array of records.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::DailyFlowRecord;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    pub source: String,
    /// Local (KST) wall-clock time of the refresh, `YYYY-MM-DD HH:MM:SS`.
    pub updated_at_kst: String,
    pub latest_trading_date: Option<NaiveDate>,
    pub refresh_interval_hours: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowSnapshot {
    pub meta: SnapshotMeta,
    pub data: Vec<DailyFlowRecord>,
}

impl FlowSnapshot {
    /// Wrap rows in a payload; rows are sorted by date and the latest
    /// trading date is taken from the last one.
    pub fn from_rows(
        rows: Vec<DailyFlowRecord>,
        source: impl Into<String>,
        refresh_interval_hours: u32,
        updated_at: NaiveDateTime,
    ) -> Self {
        let mut data = rows;
        data.sort_by_key(|r| r.date);
        Self {
            meta: SnapshotMeta {
                source: source.into(),
                updated_at_kst: updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                latest_trading_date: data.last().map(|r| r.date),
                refresh_interval_hours,
            },
            data,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, SnapshotError> {
        let content = read(path)?;
        Self::from_json(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

/// Parse either a full snapshot or a bare record array.
///
/// Returns the records and the snapshot metadata when present.
pub fn records_from_json(
    json: &str,
) -> Result<(Vec<DailyFlowRecord>, Option<SnapshotMeta>), SnapshotError> {
    if json.trim_start().starts_with('[') {
        let records: Vec<DailyFlowRecord> = serde_json::from_str(json)?;
        return Ok((records, None));
    }
    let snapshot = FlowSnapshot::from_json(json)?;
    Ok((snapshot.data, Some(snapshot.meta)))
}

pub fn records_from_file(
    path: &Path,
) -> Result<(Vec<DailyFlowRecord>, Option<SnapshotMeta>), SnapshotError> {
    let content = read(path)?;
    records_from_json(&content)
}

fn read(path: &Path) -> Result<String, SnapshotError> {
    std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.display().to_string(),
        source,
    })
}
