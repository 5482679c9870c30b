//! Income stream schedules: inflation-escalated annual drawdowns

use crate::assumptions::RateSet;
use crate::projection::{solve_required_capital, CapitalResult, ProjectionEngine};

/// An annual income drawn from its own portfolio, optionally deferred.
///
/// Fees are deducted from the balance. During deferral the capital grows
/// untouched; the inflation clock restarts at the first drawdown year, so
/// the requested amount is the face value paid in that year.
#[derive(Debug, Clone)]
pub struct IncomeStream {
    pub start_year: i32,
    pub duration_years: u32,
    pub defer_years: u32,
    /// Amount paid in the first active year
    pub initial_drawdown: f64,
    /// Decimal annual escalation applied from the second active year on
    pub inflation: f64,
    pub p1_age: i32,
    pub p2_age: i32,
}

impl IncomeStream {
    fn years(&self) -> Vec<i32> {
        let total = (self.defer_years + self.duration_years) as i32;
        (0..total).map(|i| self.start_year + i).collect()
    }

    /// Deferral zeros followed by inflation-escalated drawdowns
    pub fn drawdown_schedule(&self) -> Vec<f64> {
        let mut drawdowns = Vec::with_capacity((self.defer_years + self.duration_years) as usize);

        for _ in 0..self.defer_years {
            drawdowns.push(0.0);
        }
        for i in 0..self.duration_years {
            drawdowns.push(self.initial_drawdown * (1.0 + self.inflation).powi(i as i32));
        }

        drawdowns
    }

    /// Size the portfolio (unless `start_capital` is given) and project it
    pub fn compute(&self, rates: &RateSet, start_capital: Option<f64>) -> CapitalResult {
        let years = self.years();
        let drawdowns = self.drawdown_schedule();
        let engine = ProjectionEngine::new(rates.clone(), true);

        let capital = start_capital
            .unwrap_or_else(|| solve_required_capital(&engine, years.len(), &drawdowns));

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
            breakdown: None,
        }
    }
}
