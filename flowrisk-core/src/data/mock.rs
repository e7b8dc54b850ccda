//! Seeded mock investor-flow generator.
//!
//! Produces plausible weekday records for tests, demos and the synthetic
//! fallback. Randomness always comes from an explicitly seeded `StdRng`, so
//! the same seed and date span yield identical records.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::DailyFlowRecord;

const DEFAULT_START_INDEX: f64 = 2_600.0;
const DEFAULT_SELL_BIAS: f64 = 0.5;
/// Extra sell probability on the day after a selling day, producing runs.
const PERSISTENCE: f64 = 0.15;

#[derive(Debug, Clone)]
pub struct MockFlowGenerator {
    rng: StdRng,
    sell_bias: f64,
    index: f64,
}

impl MockFlowGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            sell_bias: DEFAULT_SELL_BIAS,
            index: DEFAULT_START_INDEX,
        }
    }

    /// Probability that the financial-investment class sells on a fresh day.
    /// Clamped to `[0.0, 0.95]`; a non-finite bias keeps the default.
    pub fn with_sell_bias(mut self, bias: f64) -> Self {
        self.sell_bias = if bias.is_finite() {
            bias.clamp(0.0, 0.95)
        } else {
            DEFAULT_SELL_BIAS
        };
        self
    }

    /// One record per weekday in `[start, end]` (bounds swapped if inverted).
    pub fn generate(&mut self, start: NaiveDate, end: NaiveDate) -> Vec<DailyFlowRecord> {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let mut records = Vec::new();
        let mut prev_sell = false;

        for date in start.iter_days().take_while(|d| *d <= end) {
            if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                continue;
            }
            let record = self.next_record(date, prev_sell);
            prev_sell = record.is_financial_sell();
            records.push(record);
        }

        records
    }

    fn amount(&mut self, lo: f64, hi: f64) -> f64 {
        self.rng.gen_range(lo..hi).round()
    }

    fn next_record(&mut self, date: NaiveDate, prev_sell: bool) -> DailyFlowRecord {
        let sell_prob = if prev_sell {
            (self.sell_bias + PERSISTENCE).min(0.95)
        } else {
            self.sell_bias
        };
        let magnitude = self.amount(200.0, 3_000.0);
        let financial_investment = if self.rng.gen_bool(sell_prob) {
            -magnitude
        } else {
            magnitude
        };

        let insurance = self.amount(-300.0, 300.0);
        let investment_trust = self.amount(-500.0, 500.0);
        let bank = self.amount(-150.0, 150.0);
        let other_financial = self.amount(-100.0, 100.0);
        let pension = self.amount(-600.0, 600.0);
        let institution =
            financial_investment + insurance + investment_trust + bank + other_financial + pension;

        let individual = self.amount(-4_000.0, 4_000.0);
        let foreign = self.amount(-4_000.0, 4_000.0);
        let other_corporation = -(individual + foreign + institution);

        let pct: f64 = self.rng.gen_range(-0.02..0.02);
        let change = (self.index * pct * 100.0).round() / 100.0;
        self.index = ((self.index + change).max(0.0) * 100.0).round() / 100.0;

        DailyFlowRecord {
            date,
            kospi_index: Some(self.index),
            kospi_change: Some(change),
            individual,
            foreign,
            institution,
            financial_investment,
            insurance,
            investment_trust,
            bank,
            other_financial,
            pension,
            other_corporation,
        }
    }
}
