//! Asset schedules: purchases, replacement cycles, trade-ins, holding costs

use crate::assumptions::RateSet;
use crate::projection::{solve_required_capital, AssetBreakdown, CapitalResult, ProjectionEngine};

/// A physical asset funded from its own portfolio: an up-front purchase,
/// periodic replacements net of trade-in, and annual holding costs.
///
/// Fees are reported but not deducted from the balance. Drawdowns are
/// signed: trade-in proceeds return to the portfolio as negative entries.
#[derive(Debug, Clone)]
pub struct AssetPlan {
    pub start_year: i32,
    pub duration_years: u32,
    pub defer_years: u32,
    pub purchase_value: f64,
    /// Years between replacements; 0 means the asset is never replaced
    pub replacement_cycle: u32,
    pub annual_holding_cost: f64,
    /// Value recovered when the old asset is sold
    pub trade_in_value: f64,
    /// Decimal annual inflation applied to purchase, trade-in and holding
    pub inflation: f64,
    /// Credit one final trade-in when the horizon ends, unless that year
    /// already replaced the asset
    pub sell_at_end: bool,
    pub p1_age: i32,
    pub p2_age: i32,
}

impl AssetPlan {
    fn years(&self) -> Vec<i32> {
        let total = (self.defer_years + self.duration_years) as i32;
        (0..total).map(|i| self.start_year + i).collect()
    }

    /// Signed cash-flow schedule plus the per-year component columns
    pub fn schedules(&self) -> (Vec<f64>, AssetBreakdown) {
        let total = (self.defer_years + self.duration_years) as usize;
        let mut drawdowns = Vec::with_capacity(total);
        let mut breakdown = AssetBreakdown::with_capacity(total);

        for _ in 0..self.defer_years {
            drawdowns.push(0.0);
            breakdown.push(0.0, 0.0, 0.0);
        }

        for i in 0..self.duration_years {
            let factor = (1.0 + self.inflation).powi(i as i32);
            let inflated_holding = self.annual_holding_cost * factor;
            let inflated_purchase = self.purchase_value * factor;
            let inflated_trade_in = self.trade_in_value * factor;

            let mut purchase = 0.0;
            let mut trade_in = 0.0;
            let mut cash_flow = inflated_holding;

            // Year 0 counts as a replacement year whenever a cycle is set,
            // 0 % cycle == 0
            let on_cycle = self.replacement_cycle > 0 && i % self.replacement_cycle == 0;

            if i == 0 {
                purchase = inflated_purchase;
                cash_flow += purchase;
            } else if on_cycle {
                trade_in = inflated_trade_in;
                purchase = inflated_purchase;
                cash_flow += purchase - trade_in;
            }

            // Final-year sale credits the trade-in once, never on top of a
            // replacement that already sold the old asset
            if self.sell_at_end && i == self.duration_years - 1 && !on_cycle {
                trade_in += inflated_trade_in;
                cash_flow -= inflated_trade_in;
            }

            drawdowns.push(cash_flow);
            breakdown.push(purchase, trade_in, inflated_holding);
        }

        (drawdowns, breakdown)
    }

    /// Size the portfolio (unless `start_capital` is given) and project it.
    ///
    /// The sizing pass floors inflows to zero: future sale proceeds cannot
    /// fund earlier costs. The projected rows keep the signed schedule.
    pub fn compute(&self, rates: &RateSet, start_capital: Option<f64>) -> CapitalResult {
        let years = self.years();
        let (drawdowns, breakdown) = self.schedules();
        let engine = ProjectionEngine::new(rates.clone(), false);

        let capital = start_capital.unwrap_or_else(|| {
            let cost_only: Vec<f64> = drawdowns.iter().map(|&d| d.max(0.0)).collect();
            solve_required_capital(&engine, years.len(), &cost_only)
        });

        let rows = engine.project(
            capital,
            &years,
            &drawdowns,
            Some(self.p1_age),
            Some(self.p2_age),
        );

        CapitalResult {
            starting_capital: capital,
            rows,
            breakdown: Some(breakdown),
        }
    }
}
