//! Required-capital solver

use super::engine::ProjectionEngine;

/// Solve for the starting capital required to survive a drawdown schedule.
///
/// Bisects between 0 and 20x the total drawdown (1,000,000 when the
/// schedule nets to nothing) for a fixed 100 iterations, accepting any
/// capital whose terminal balance is at least -0.01. If the upper bound
/// itself cannot fund the schedule, that bound is returned as-is with no
/// signal to the caller; sizing the bound is not attempted here.
pub fn solve_required_capital(engine: &ProjectionEngine, n_years: usize, drawdowns: &[f64]) -> f64 {
    let total_drawdown: f64 = drawdowns.iter().sum();
    let mut low = 0.0_f64;
    let mut high = if total_drawdown > 0.0 {
        total_drawdown * 20.0
    } else {
        1_000_000.0
    };

    let mut required_capital = high;

    for _ in 0..100 {
        let mid = (low + high) / 2.0;
        let final_balance = engine.terminal_balance(mid, n_years, drawdowns);

        // Slightly negative still counts as funded, float precision
        if final_balance >= -0.01 {
            required_capital = mid;
            high = mid;
        } else {
            low = mid;
        }
    }

    required_capital
}
