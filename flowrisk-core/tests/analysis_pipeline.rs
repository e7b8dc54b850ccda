//! End-to-end engine checks over generated and hand-built data.

use chrono::NaiveDate;
use flowrisk_core::analysis::{DateRange, RiskLevel, RiskOutcome, RiskPolicy, RiskScorer};
use flowrisk_core::data::{build_rows, FlowSnapshot, MockFlowGenerator, PriceRow, TrendRow};
use flowrisk_core::domain::DailyFlowRecord;
use flowrisk_core::analyze;
use std::collections::HashMap;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn with_fi(date: NaiveDate, fi: f64) -> DailyFlowRecord {
    let mut r = DailyFlowRecord::empty(date);
    r.financial_investment = fi;
    r.institution = fi;
    r
}

#[test]
fn worked_streak_example() {
    let flows = [-100.0, -200.0, -150.0, 300.0, -50.0];
    let records: Vec<_> = flows
        .iter()
        .enumerate()
        .map(|(i, &v)| with_fi(d(2024, 3, 4 + i as u32), v))
        .collect();

    let a = analyze(&records, None, &RiskScorer::default());
    assert_eq!(a.streaks.max_streak, 3);
    assert_eq!(a.streaks.structural_streak_count, 1);
    assert_eq!(a.streaks.streaks[0].total_amount, -450.0);
    assert_eq!(a.streaks.current_streak, 1);
    assert_eq!(a.streaks.current_streak_amount, -50.0);

    let risk = a.risk.as_bounded().unwrap();
    assert_eq!(risk.score, 1);
    assert_eq!(risk.level, RiskLevel::Normal);
}

#[test]
fn unsorted_input_matches_sorted() {
    let records = MockFlowGenerator::new(21).generate(d(2024, 1, 1), d(2024, 4, 30));
    let mut reversed = records.clone();
    reversed.reverse();

    for policy in RiskPolicy::ALL {
        let scorer = RiskScorer::new(policy);
        let a = analyze(&records, None, &scorer);
        let b = analyze(&reversed, None, &scorer);
        assert_eq!(a.streaks, b.streaks);
        assert_eq!(a.risk, b.risk);
        assert_eq!(a.series, b.series);
        assert_eq!(a.stats.trading_days, b.stats.trading_days);
    }
}

#[test]
fn window_selection_narrows_generated_year() {
    let records = MockFlowGenerator::new(5).generate(d(2024, 1, 1), d(2024, 12, 31));
    let range = DateRange::new(d(2024, 3, 31), d(2024, 3, 1));

    let a = analyze(&records, Some(range), &RiskScorer::default());
    // March 2024 has 21 weekdays
    assert_eq!(a.trading_days(), 21);
    assert!(a.series.iter().all(|p| range.contains(p.date)));
    assert!(a.series[4].ma5.is_some());
    assert!(a.series.iter().all(|p| p.ma20.is_none() == (p.date < a.series[19].date)));
}

#[test]
fn gauge_policy_reports_on_its_own_scale() {
    let records = MockFlowGenerator::new(9)
        .with_sell_bias(0.95)
        .generate(d(2024, 1, 1), d(2024, 2, 29));
    let a = analyze(&records, None, &RiskScorer::new(RiskPolicy::FiveLevelGauge));

    match &a.risk {
        RiskOutcome::Gauge(g) => {
            assert!((1..=5).contains(&g.level.value()));
            assert_eq!(g.consecutive_sell_days, a.streaks.current_streak);
        }
        RiskOutcome::Bounded(_) => panic!("gauge policy produced a bounded score"),
    }
}

#[test]
fn analysis_serializes_with_scale_tag() {
    let records = MockFlowGenerator::new(1).generate(d(2024, 5, 1), d(2024, 5, 31));
    let a = analyze(&records, None, &RiskScorer::new(RiskPolicy::AdditiveMultiFactor));

    let json = serde_json::to_value(&a).unwrap();
    assert_eq!(json["risk"]["scale"], "bounded");
    assert!(json["stats"]["tradingDays"].is_u64());
    assert!(json["series"][0]["ma5"].is_null());
}

#[test]
fn live_rows_flow_through_snapshot_into_engine() {
    let prices: Vec<PriceRow> = (0..6)
        .map(|i| PriceRow {
            local_traded_at: Some(d(2025, 2, 10 + i)),
            close_price: Some(format!("2,6{i}0.00")),
            compare_to_previous_close_price: Some("-3.5".into()),
        })
        .collect();
    let trends: HashMap<String, TrendRow> = (0..6)
        .map(|i| {
            (
                format!("202502{:02}", 10 + i),
                TrendRow {
                    personal_value: Some("+2,000".into()),
                    foreign_value: Some("-1,200".into()),
                    institutional_value: Some(format!("-{}", 100 * (i + 1))),
                },
            )
        })
        .collect();

    let rows = build_rows(&prices, &trends);
    let at = d(2025, 2, 15).and_hms_opt(18, 0, 0).unwrap();
    let snapshot = FlowSnapshot::from_rows(rows, "test", 6, at);
    let reloaded = FlowSnapshot::from_json(&snapshot.to_json_pretty().unwrap()).unwrap();

    let a = analyze(&reloaded.data, None, &RiskScorer::default());
    assert_eq!(a.streaks.current_streak, 6);
    assert_eq!(a.risk.as_bounded().unwrap().score, 7);
    assert_eq!(a.stats.total_net_buy, -2_100.0);
}
