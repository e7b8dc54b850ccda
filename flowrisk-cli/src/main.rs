//! FlowRisk CLI.
//!
//! Commands:
//! - `analyze`: run the analysis engine over a snapshot or mock data
//! - `generate`: write a seeded mock snapshot
//! - `timeline`: print the per-date risk score history
//! - `convert`: turn saved price/trend API payloads into a snapshot

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use flowrisk_core::analysis::{RiskOutcome, RiskPolicy, RiskScorer};
use flowrisk_core::data::naver::to_bizdate;
use flowrisk_core::data::{
    build_rows, merge_price_pages, FlowSnapshot, MockFlowGenerator, PriceRow, TrendRow,
};
use flowrisk_runner::{
    export_json, export_timeline_csv, load_records, risk_timeline, run_analysis, save_selected,
    AnalysisConfig, AnalysisReport,
};

const DEFAULT_LOG_FILTER: &str = "flowrisk=info,flowrisk_core=info,flowrisk_runner=info";
const KST_OFFSET_SECS: i32 = 9 * 3600;
const NAVER_SOURCE: &str = "Naver Mobile API";

#[derive(Parser)]
#[command(
    name = "flowrisk",
    about = "FlowRisk CLI: KOSPI financial-investment flow risk analysis"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a flow snapshot (or mock data) and print the risk summary.
    Analyze {
        /// Path to a TOML config file. Flags below override it.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Snapshot JSON or bare record array.
        #[arg(long)]
        data: Option<PathBuf>,

        /// Use seeded mock data when no data file is usable.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Seed for mock data.
        #[arg(long)]
        seed: Option<u64>,

        /// Window start (YYYY-MM-DD).
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Window end (YYYY-MM-DD).
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Keep only the last N trading days of the window.
        #[arg(long)]
        last: Option<usize>,

        /// banded_streak, additive_multi_factor or five_level_gauge.
        #[arg(long)]
        policy: Option<RiskPolicy>,

        /// Save report.json / series.csv / streaks.csv / report.md here.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Print the full report as JSON instead of a summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write a seeded mock snapshot.
    Generate {
        #[arg(long)]
        start: NaiveDate,

        #[arg(long)]
        end: NaiveDate,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Probability of a financial-investment selling day (0..=0.95).
        #[arg(long)]
        sell_bias: Option<f64>,

        #[arg(long)]
        out: PathBuf,
    },
    /// Print the risk score as of every date.
    Timeline {
        #[arg(long)]
        data: Option<PathBuf>,

        #[arg(long, default_value_t = false)]
        synthetic: bool,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(long, default_value_t = RiskPolicy::BandedStreak)]
        policy: RiskPolicy,

        /// Skip dates with fewer records of history.
        #[arg(long, default_value_t = 5)]
        min_history: usize,

        /// Also write the timeline as CSV.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Convert saved price/trend API payloads into a snapshot.
    Convert {
        /// JSON array of price rows.
        #[arg(long)]
        prices: PathBuf,

        /// JSON object mapping bizdate (YYYYMMDD) to trend payloads.
        #[arg(long)]
        trends: PathBuf,

        #[arg(long)]
        out: PathBuf,

        #[arg(long, default_value_t = 6)]
        refresh_hours: u32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            config,
            data,
            synthetic,
            seed,
            start,
            end,
            last,
            policy,
            output_dir,
            json,
        } => {
            let mut cfg = match config {
                Some(path) => AnalysisConfig::from_file(&path)?,
                None => AnalysisConfig::default(),
            };
            if data.is_some() {
                cfg.data.path = data;
            }
            cfg.data.synthetic |= synthetic;
            if let Some(seed) = seed {
                cfg.data.seed = seed;
            }
            if start.is_some() {
                cfg.analysis.start_date = start;
            }
            if end.is_some() {
                cfg.analysis.end_date = end;
            }
            if last.is_some() {
                cfg.analysis.last_days = last;
            }
            if let Some(policy) = policy {
                cfg.analysis.policy = policy;
            }
            if output_dir.is_some() {
                cfg.report.output_dir = output_dir;
            }
            run_analyze_cmd(&cfg, json)
        }
        Commands::Generate {
            start,
            end,
            seed,
            sell_bias,
            out,
        } => run_generate(start, end, seed, sell_bias, &out),
        Commands::Timeline {
            data,
            synthetic,
            seed,
            policy,
            min_history,
            csv,
        } => run_timeline_cmd(data, synthetic, seed, policy, min_history, csv.as_deref()),
        Commands::Convert {
            prices,
            trends,
            out,
            refresh_hours,
        } => run_convert(&prices, &trends, &out, refresh_hours),
    }
}

fn run_analyze_cmd(cfg: &AnalysisConfig, json: bool) -> Result<()> {
    let report = run_analysis(cfg)?;

    if json {
        println!("{}", export_json(&report)?);
    } else {
        print_summary(&report);
    }

    if let Some(dir) = &cfg.report.output_dir {
        let run_dir = save_selected(&report, dir, &cfg.report)?;
        eprintln!("Artifacts saved to: {}", run_dir.display());
    }

    Ok(())
}

fn print_summary(report: &AnalysisReport) {
    let a = &report.analysis;
    println!("=== FlowRisk Analysis ===");
    println!(
        "Trading days:     {} of {} loaded",
        a.trading_days(),
        report.record_count
    );
    if let (Some(first), Some(last)) = (a.series.first(), a.series.last()) {
        println!("Window:           {} to {}", first.date, last.date);
    }
    if report.has_synthetic {
        println!("Data:             SYNTHETIC");
    }
    println!("Policy:           {}", report.policy);
    match &a.risk {
        RiskOutcome::Bounded(r) => println!("Risk:             {} (score {}/10)", r.label, r.score),
        RiskOutcome::Gauge(g) => {
            println!("Risk:             {} (level {}/5)", g.label, g.level.value())
        }
    }
    for factor in a.risk.factors() {
        println!("  - {factor}");
    }
    println!("Total net buy:    {:.0}", a.stats.total_net_buy);
    println!("Avg daily:        {:.1}", a.stats.average_daily_net_buy);
    println!(
        "Buy/sell days:    {} / {}",
        a.stats.net_buy_days, a.stats.net_sell_days
    );
    println!("Std dev:          {:.1}", a.stats.standard_deviation);
    println!(
        "Streaks:          current {}, longest {}, structural {}",
        a.streaks.current_streak, a.streaks.max_streak, a.streaks.structural_streak_count
    );
    println!("Dataset hash:     {}", &report.dataset_hash[..16.min(report.dataset_hash.len())]);
    for w in &report.warnings {
        println!("Warning:          {w}");
    }
}

fn run_generate(
    start: NaiveDate,
    end: NaiveDate,
    seed: u64,
    sell_bias: Option<f64>,
    out: &Path,
) -> Result<()> {
    let mut generator = MockFlowGenerator::new(seed);
    if let Some(bias) = sell_bias {
        if !(0.0..=1.0).contains(&bias) {
            bail!("--sell-bias {bias} outside [0, 1]");
        }
        generator = generator.with_sell_bias(bias);
    }
    let records = generator.generate(start, end);
    let count = records.len();

    let snapshot = FlowSnapshot::from_rows(
        records,
        format!("mock generator (seed {seed})"),
        0,
        now_kst()?,
    );
    write_snapshot(&snapshot, out)?;
    println!("Wrote {count} records to {}", out.display());
    Ok(())
}

fn run_timeline_cmd(
    data: Option<PathBuf>,
    synthetic: bool,
    seed: u64,
    policy: RiskPolicy,
    min_history: usize,
    csv_out: Option<&Path>,
) -> Result<()> {
    let mut cfg = AnalysisConfig::default();
    cfg.data.path = data;
    cfg.data.synthetic = synthetic;
    cfg.data.seed = seed;
    cfg.validate()?;

    let loaded = load_records(&cfg.load_options())?;
    let timeline = risk_timeline(&loaded.records, &RiskScorer::new(policy), min_history);

    println!("{:<12} {:>10} {:>7} {:>6}  Label", "Date", "FinInv", "Streak", "Score");
    for p in &timeline {
        println!(
            "{:<12} {:>10.0} {:>7} {:>6}  {}",
            p.date.to_string(),
            p.financial_investment,
            p.current_streak,
            p.risk.score(),
            p.risk.label()
        );
    }

    if let Some(path) = csv_out {
        std::fs::write(path, export_timeline_csv(&timeline)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("Timeline saved to: {}", path.display());
    }
    Ok(())
}

fn run_convert(prices: &Path, trends: &Path, out: &Path, refresh_hours: u32) -> Result<()> {
    let price_rows: Vec<PriceRow> = read_json(prices)?;
    let trend_rows: HashMap<String, TrendRow> = read_json(trends)?;
    let total = price_rows.len();

    let merged = merge_price_pages([price_rows]);
    if merged.is_empty() {
        bail!("no dated price rows in {}", prices.display());
    }
    let dropped = total - merged.len();
    if dropped > 0 {
        tracing::warn!(dropped, "dropped undated or repeated price rows");
    }
    let missing = merged
        .iter()
        .filter_map(|p| p.local_traded_at)
        .filter(|date| !trend_rows.contains_key(&to_bizdate(*date)))
        .count();
    let rows = build_rows(&merged, &trend_rows);
    if missing > 0 {
        tracing::warn!(missing, "dates without trend data were filled with zero flows");
    }

    let count = rows.len();
    let snapshot = FlowSnapshot::from_rows(rows, NAVER_SOURCE, refresh_hours, now_kst()?);
    write_snapshot(&snapshot, out)?;
    println!("Wrote {count} records to {}", out.display());
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn write_snapshot(snapshot: &FlowSnapshot, out: &Path) -> Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, snapshot.to_json_pretty()?)
        .with_context(|| format!("failed to write {}", out.display()))
}

fn now_kst() -> Result<NaiveDateTime> {
    let kst = FixedOffset::east_opt(KST_OFFSET_SECS).context("invalid KST offset")?;
    Ok(Utc::now().with_timezone(&kst).naive_local())
}
