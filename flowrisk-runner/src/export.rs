//! Reporting and export: JSON, CSV, and Markdown artifact generation.
//!
//! All persisted JSON includes a `schema_version` field. Newer versions are
//! rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;

use flowrisk_core::analysis::{FlowPoint, StreakAnalysis};

use crate::config::ReportConfig;
use crate::markdown::MarkdownReport;
use crate::runner::{AnalysisReport, SCHEMA_VERSION};
use crate::timeline::TimelinePoint;

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize an `AnalysisReport` to pretty JSON.
pub fn export_json(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize AnalysisReport to JSON")
}

/// Deserialize an `AnalysisReport`, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<AnalysisReport> {
    let report: AnalysisReport =
        serde_json::from_str(json).context("failed to deserialize AnalysisReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

fn opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.2}")).unwrap_or_default()
}

fn finish_csv(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export the chart series.
///
/// Columns: date, value, cumulative, ma5, ma20, is_sell. Missing moving
/// averages are empty cells.
pub fn export_series_csv(series: &[FlowPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "value", "cumulative", "ma5", "ma20", "is_sell"])?;
    for p in series {
        wtr.write_record([
            &p.date.to_string(),
            &format!("{:.2}", p.value),
            &format!("{:.2}", p.cumulative),
            &opt(p.ma5),
            &opt(p.ma20),
            &p.is_sell.to_string(),
        ])?;
    }
    finish_csv(wtr)
}

/// Export structural streaks, longest first.
pub fn export_streaks_csv(streaks: &StreakAnalysis) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["start_date", "end_date", "days", "total_amount"])?;
    for s in &streaks.streaks {
        wtr.write_record([
            &s.start_date.to_string(),
            &s.end_date.to_string(),
            &s.days.to_string(),
            &format!("{:.2}", s.total_amount),
        ])?;
    }
    finish_csv(wtr)
}

/// Export a risk timeline.
///
/// Columns: date, history, financial_investment, current_streak, score, label.
pub fn export_timeline_csv(timeline: &[TimelinePoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "date",
        "history",
        "financial_investment",
        "current_streak",
        "score",
        "label",
    ])?;
    for p in timeline {
        wtr.write_record([
            &p.date.to_string(),
            &p.history.to_string(),
            &format!("{:.2}", p.financial_investment),
            &p.current_streak.to_string(),
            &p.risk.score().to_string(),
            &p.risk.label().to_string(),
        ])?;
    }
    finish_csv(wtr)
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save every artifact for one run. See [`save_selected`].
pub fn save_artifacts(report: &AnalysisReport, output_dir: &Path) -> Result<PathBuf> {
    save_selected(report, output_dir, &ReportConfig::default())
}

/// Save the artifact set for one run.
///
/// Creates `{policy}_{timestamp}/` under `output_dir` containing
/// `report.json` always, plus `series.csv` and `streaks.csv` when `csv` is
/// set and `report.md` when `markdown` is set.
///
/// Returns the path to the created directory.
pub fn save_selected(
    report: &AnalysisReport,
    output_dir: &Path,
    opts: &ReportConfig,
) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}",
        report.policy,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    write(&run_dir.join("report.json"), &export_json(report)?)?;

    if opts.csv {
        write(
            &run_dir.join("series.csv"),
            &export_series_csv(&report.analysis.series)?,
        )?;
        write(
            &run_dir.join("streaks.csv"),
            &export_streaks_csv(&report.analysis.streaks)?,
        )?;
    }

    if opts.markdown {
        write(&run_dir.join("report.md"), &MarkdownReport::generate(report))?;
    }

    info!(dir = %run_dir.display(), "artifacts saved");
    Ok(run_dir)
}

/// Load an `AnalysisReport` from an artifact directory's report.json.
pub fn load_artifacts(dir: &Path) -> Result<AnalysisReport> {
    let path = dir.join("report.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

fn write(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
