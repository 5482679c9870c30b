//! Projection output structures

use serde::{Deserialize, Serialize};

/// A single year of projection output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub year: i32,
    pub p1_age: Option<i32>,
    pub p2_age: Option<i32>,
    pub opening_balance: f64,
    pub income_return: f64,
    pub tax: f64,
    pub income_net: f64,
    pub growth: f64,
    pub fees: f64,
    pub drawdown: f64,
    pub closing_balance: f64,
}

impl ProjectionRow {
    /// Zero-balance row for years before funding starts
    pub fn zero(year: i32, p1_age: Option<i32>, p2_age: Option<i32>) -> Self {
        Self {
            year,
            p1_age,
            p2_age,
            opening_balance: 0.0,
            income_return: 0.0,
            tax: 0.0,
            income_net: 0.0,
            growth: 0.0,
            fees: 0.0,
            drawdown: 0.0,
            closing_balance: 0.0,
        }
    }
}

/// Per-year purchase, trade-in and holding columns for asset schedules,
/// aligned one-to-one with the projection rows
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetBreakdown {
    pub purchase_costs: Vec<f64>,
    pub trade_in_values: Vec<f64>,
    pub holding_costs: Vec<f64>,
}

impl AssetBreakdown {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            purchase_costs: Vec::with_capacity(n),
            trade_in_values: Vec::with_capacity(n),
            holding_costs: Vec::with_capacity(n),
        }
    }

    /// Record one year of asset cash-flow components
    pub fn push(&mut self, purchase: f64, trade_in: f64, holding: f64) {
        self.purchase_costs.push(purchase);
        self.trade_in_values.push(trade_in);
        self.holding_costs.push(holding);
    }

    /// Insert `n` zero years at the front, keeping alignment with padded rows
    pub fn pad_front(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        self.purchase_costs.splice(0..0, std::iter::repeat(0.0).take(n));
        self.trade_in_values.splice(0..0, std::iter::repeat(0.0).take(n));
        self.holding_costs.splice(0..0, std::iter::repeat(0.0).take(n));
    }
}

/// Result of sizing and projecting one portfolio
#[derive(Debug, Clone, Serialize)]
pub struct CapitalResult {
    /// Capital held at the first projected year
    pub starting_capital: f64,
    /// Year-by-year projection at that capital
    pub rows: Vec<ProjectionRow>,
    /// Asset cash-flow columns, present for asset schedules only
    pub breakdown: Option<AssetBreakdown>,
}

impl CapitalResult {
    /// Closing balance of the final projected year
    pub fn terminal_balance(&self) -> f64 {
        self.rows.last().map(|r| r.closing_balance).unwrap_or(0.0)
    }
}
