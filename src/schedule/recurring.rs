//! Recurring outlay schedules: travel budgets, medical buffers

use crate::assumptions::RateSet;
use crate::projection::{solve_required_capital, CapitalResult, ProjectionEngine};

/// A cost repeated every `frequency_years`, funded from its own portfolio.
///
/// Fees are reported but not deducted from the balance. Off-cycle years
/// draw nothing; a frequency of 0 produces an all-zero schedule.
#[derive(Debug, Clone)]
pub struct RecurringOutlay {
    pub start_year: i32,
    pub duration_years: u32,
    pub defer_years: u32,
    /// Cost of one occurrence at today's prices
    pub base_cost: f64,
    /// Years between occurrences; 0 disables the outlay entirely
    pub frequency_years: u32,
    /// Decimal annual inflation applied per active year
    pub inflation: f64,
    pub p1_age: Option<i32>,
    pub p2_age: Option<i32>,
}

impl RecurringOutlay {
    fn years(&self) -> Vec<i32> {
        let total = (self.defer_years + self.duration_years) as i32;
        (0..total).map(|i| self.start_year + i).collect()
    }

    /// Deferral zeros, then the inflated cost on every on-cycle year
    pub fn drawdown_schedule(&self) -> Vec<f64> {
        let mut drawdowns = Vec::with_capacity((self.defer_years + self.duration_years) as usize);

        for _ in 0..self.defer_years {
            drawdowns.push(0.0);
        }
        for i in 0..self.duration_years {
            let on_cycle = self.frequency_years > 0 && i % self.frequency_years == 0;
            if on_cycle {
                drawdowns.push(self.base_cost * (1.0 + self.inflation).powi(i as i32));
            } else {
                drawdowns.push(0.0);
            }
        }

        drawdowns
    }

    /// Size the portfolio (unless `start_capital` is given) and project it
    pub fn compute(&self, rates: &RateSet, start_capital: Option<f64>) -> CapitalResult {
        let years = self.years();
        let drawdowns = self.drawdown_schedule();
        let engine = ProjectionEngine::new(rates.clone(), false);

        let capital = start_capital
            .unwrap_or_else(|| solve_required_capital(&engine, years.len(), &drawdowns));

        let rows = engine.project(capital, &years, &drawdowns, self.p1_age, self.p2_age);

        CapitalResult {
            starting_capital: capital,
            rows,
            breakdown: None,
        }
    }
}
