//! Core projection engine for annual portfolio balance recurrences

use crate::assumptions::RateSet;

use super::rows::ProjectionRow;

/// Main projection engine.
///
/// Holds the rate assumptions and the fee convention for one portfolio:
/// income schedules deduct fees from the balance, asset and outlay
/// schedules report them without deducting.
pub struct ProjectionEngine {
    rates: RateSet,
    subtract_fees: bool,
}

impl ProjectionEngine {
    /// Create a new projection engine with given rates and fee convention
    pub fn new(rates: RateSet, subtract_fees: bool) -> Self {
        Self {
            rates,
            subtract_fees,
        }
    }

    /// Project the balance over `years`, withdrawing per `drawdowns`.
    ///
    /// Each year: fees, income return and growth accrue on the opening
    /// balance; tax applies to income at that year's schedule rate; the
    /// drawdown then leaves the portfolio. Years beyond the end of
    /// `drawdowns` withdraw nothing. Ages, when supplied, increment per row.
    pub fn project(
        &self,
        start_capital: f64,
        years: &[i32],
        drawdowns: &[f64],
        p1_age: Option<i32>,
        p2_age: Option<i32>,
    ) -> Vec<ProjectionRow> {
        let mut rows = Vec::with_capacity(years.len());
        let mut balance = start_capital;

        for (i, &year) in years.iter().enumerate() {
            let fees = balance * self.rates.fee_rate;

            let income = balance * self.rates.income_return;
            let tax = income * self.rates.tax.rate_for_year(i);
            let income_net = income - tax;
            let growth = balance * self.rates.growth_return;

            let drawdown = drawdowns.get(i).copied().unwrap_or(0.0);

            let mut closing = balance + growth + income_net - drawdown;
            if self.subtract_fees {
                closing -= fees;
            }

            rows.push(ProjectionRow {
                year,
                p1_age: p1_age.map(|a| a + i as i32),
                p2_age: p2_age.map(|a| a + i as i32),
                opening_balance: balance,
                income_return: income,
                tax,
                income_net,
                growth,
                fees,
                drawdown,
                closing_balance: closing,
            });

            balance = closing;
        }

        rows
    }

    /// Final closing balance of the same recurrence, without materialising
    /// rows. Used by the capital solver on every bisection probe.
    pub fn terminal_balance(&self, start_capital: f64, n_years: usize, drawdowns: &[f64]) -> f64 {
        let mut balance = start_capital;

        for i in 0..n_years {
            let fees = balance * self.rates.fee_rate;
            let income = balance * self.rates.income_return;
            let income_net = income - income * self.rates.tax.rate_for_year(i);
            let growth = balance * self.rates.growth_return;
            let drawdown = drawdowns.get(i).copied().unwrap_or(0.0);

            balance = balance + growth + income_net - drawdown;
            if self.subtract_fees {
                balance -= fees;
            }
        }

        balance
    }
}
