//! Markdown report generator.

use flowrisk_core::analysis::{RiskOutcome, StatsSummary, StreakAnalysis};
use flowrisk_core::domain::InvestorClass;

use crate::loader::DataSource;
use crate::runner::AnalysisReport;

/// Streak rows shown in the report; the CSV carries all of them.
const MAX_STREAK_ROWS: usize = 10;
/// Trailing series points shown in the report.
const RECENT_ROWS: usize = 5;

pub struct MarkdownReport;

impl MarkdownReport {
    pub fn generate(report: &AnalysisReport) -> String {
        let mut md = String::with_capacity(4096);
        let analysis = &report.analysis;

        md.push_str("# 금융투자 수급 리스크 리포트\n\n");

        // Metadata
        md.push_str("## Metadata\n\n");
        md.push_str("| Field | Value |\n");
        md.push_str("| --- | --- |\n");
        md.push_str(&format!("| Source | {} |\n", describe_source(&report.source)));
        if let Some(meta) = &report.snapshot {
            md.push_str(&format!("| Updated (KST) | {} |\n", meta.updated_at_kst));
        }
        let window = match (analysis.series.first(), analysis.series.last()) {
            (Some(first), Some(last)) => format!("{} to {}", first.date, last.date),
            _ => "empty".to_string(),
        };
        md.push_str(&format!("| Window | {window} |\n"));
        md.push_str(&format!(
            "| Trading Days | {} of {} |\n",
            analysis.trading_days(),
            report.record_count
        ));
        md.push_str(&format!("| Policy | {} |\n", report.policy));
        md.push_str(&format!("| Dataset Hash | {} |\n", report.dataset_hash));
        if report.has_synthetic {
            md.push_str("| Data | **SYNTHETIC** |\n");
        }
        md.push('\n');

        push_risk(&mut md, &analysis.risk);
        push_stats(&mut md, &analysis.stats);
        push_streaks(&mut md, &analysis.streaks);

        // Recent flow
        if !analysis.series.is_empty() {
            md.push_str("## Recent Flow\n\n");
            md.push_str("| Date | Net Buy | Cumulative | MA5 | MA20 |\n");
            md.push_str("| --- | ---: | ---: | ---: | ---: |\n");
            let skip = analysis.series.len().saturating_sub(RECENT_ROWS);
            for p in &analysis.series[skip..] {
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {} |\n",
                    p.date,
                    signed(p.value),
                    signed(p.cumulative),
                    p.ma5.map(signed).unwrap_or_else(|| "-".into()),
                    p.ma20.map(signed).unwrap_or_else(|| "-".into()),
                ));
            }
            md.push('\n');
        }

        if !report.warnings.is_empty() {
            md.push_str("## Warnings\n\n");
            for w in &report.warnings {
                md.push_str(&format!("- {w}\n"));
            }
            md.push('\n');
        }

        md
    }
}

fn describe_source(source: &DataSource) -> String {
    match source {
        DataSource::Snapshot { path } => format!("snapshot `{path}`"),
        DataSource::RecordArray { path } => format!("records `{path}`"),
        DataSource::Synthetic { seed } => format!("mock generator (seed {seed})"),
    }
}

fn push_risk(md: &mut String, risk: &RiskOutcome) {
    md.push_str("## Risk\n\n");
    match risk {
        RiskOutcome::Bounded(a) => {
            md.push_str(&format!(
                "**{} ({})**, score {}/10\n\n",
                a.label,
                format!("{:?}", a.level).to_lowercase(),
                a.score
            ));
        }
        RiskOutcome::Gauge(g) => {
            md.push_str(&format!(
                "**{}**, level {}/5 ({})\n\n",
                g.label,
                g.level.value(),
                g.color
            ));
            md.push_str(&format!(
                "- Consecutive sell days: {}\n- Recent avg sell: {}\n- Sell ratio: {:.1}%\n- Points: {:.1}\n\n",
                g.consecutive_sell_days,
                grouped(g.avg_sell_amount),
                g.sell_ratio,
                g.points
            ));
        }
    }
    md.push_str("### Factors\n\n");
    for factor in risk.factors() {
        md.push_str(&format!("- {factor}\n"));
    }
    md.push('\n');
}

fn push_stats(md: &mut String, stats: &StatsSummary) {
    md.push_str("## Statistics\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("| --- | ---: |\n");
    md.push_str(&format!("| Total Net Buy | {} |\n", signed(stats.total_net_buy)));
    md.push_str(&format!(
        "| Avg Daily Net Buy | {} |\n",
        signed(stats.average_daily_net_buy)
    ));
    md.push_str(&format!(
        "| Buy / Sell Days | {} / {} |\n",
        stats.net_buy_days, stats.net_sell_days
    ));
    md.push_str(&format!("| Max Net Buy | {} |\n", signed(stats.max_net_buy)));
    md.push_str(&format!("| Max Net Sell | {} |\n", signed(stats.max_net_sell)));
    md.push_str(&format!("| Std Dev | {} |\n", grouped(stats.standard_deviation)));
    md.push_str(&format!(
        "| Financial Buy Share | {:.1}% |\n\n",
        stats.financial_buy_share_pct
    ));

    md.push_str("### Buy Amounts\n\n");
    md.push_str("| Class | Buy |\n");
    md.push_str("| --- | ---: |\n");
    for class in InvestorClass::ALL {
        md.push_str(&format!(
            "| {} | {} |\n",
            class.label(),
            grouped(stats.buy_amounts.get(class))
        ));
    }
    md.push('\n');
}

fn push_streaks(md: &mut String, streaks: &StreakAnalysis) {
    md.push_str("## Selling Streaks\n\n");
    md.push_str(&format!(
        "- Current: {} day(s), {}\n- Longest: {} day(s)\n- Structural (≥3): {}, high-risk (≥5): {}\n- Repeat strength: {}, coverage {:.1}%\n\n",
        streaks.current_streak,
        signed(streaks.current_streak_amount),
        streaks.max_streak,
        streaks.structural_streak_count,
        streaks.high_risk_streak_count,
        streaks.repeat_strength,
        streaks.structural_coverage_pct,
    ));

    if streaks.streaks.is_empty() {
        return;
    }
    md.push_str("| Start | End | Days | Amount |\n");
    md.push_str("| --- | --- | ---: | ---: |\n");
    for s in streaks.streaks.iter().take(MAX_STREAK_ROWS) {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            s.start_date,
            s.end_date,
            s.days,
            signed(s.total_amount)
        ));
    }
    md.push('\n');
}

/// `1234567.4` → `1,234,567`.
fn grouped(v: f64) -> String {
    let rounded = v.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if rounded < 0.0 {
        out.insert(0, '-');
    }
    out
}

/// Grouped with an explicit `+` on positive values.
fn signed(v: f64) -> String {
    if v.round() > 0.0 {
        format!("+{}", grouped(v))
    } else {
        grouped(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WindowConfig;
    use crate::loader::{load_records, LoadOptions};
    use crate::runner::analyze_loaded;
    use chrono::NaiveDate;
    use flowrisk_core::analysis::RiskPolicy;

    fn report(policy: RiskPolicy) -> AnalysisReport {
        let loaded = load_records(&LoadOptions {
            path: None,
            synthetic: true,
            seed: 8,
            sell_bias: Some(0.7),
            synthetic_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            synthetic_end: NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
        })
        .unwrap();
        let window = WindowConfig {
            policy,
            ..WindowConfig::default()
        };
        analyze_loaded(&loaded, &window)
    }

    #[test]
    fn number_grouping() {
        assert_eq!(grouped(0.0), "0");
        assert_eq!(grouped(999.0), "999");
        assert_eq!(grouped(1_234.4), "1,234");
        assert_eq!(grouped(-1_234_567.0), "-1,234,567");
        assert_eq!(signed(1_500.0), "+1,500");
        assert_eq!(signed(-0.2), "0");
    }

    #[test]
    fn bounded_report_sections() {
        let md = MarkdownReport::generate(&report(RiskPolicy::AdditiveMultiFactor));
        assert!(md.starts_with("# 금융투자 수급 리스크 리포트"));
        for section in ["## Metadata", "## Risk", "### Factors", "## Statistics", "## Selling Streaks", "## Recent Flow"] {
            assert!(md.contains(section), "missing {section}");
        }
        assert!(md.contains("score "));
        assert!(md.contains("**SYNTHETIC**"));
        assert!(md.contains("금융투자"));
    }

    #[test]
    fn gauge_report_shows_level() {
        let md = MarkdownReport::generate(&report(RiskPolicy::FiveLevelGauge));
        assert!(md.contains("/5 (#"));
        assert!(md.contains("Sell ratio"));
    }
}
