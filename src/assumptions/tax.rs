//! Year-indexed tax rate schedules

use serde::{Deserialize, Serialize};

/// Tax rate applied to income return, indexed by projection year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TaxSchedule {
    /// Same rate for every year
    Flat(f64),
    /// Explicit per-year rates; years beyond the last entry are untaxed
    PerYear(Vec<f64>),
}

impl TaxSchedule {
    /// Rate for projection year `i` (0-indexed), as a decimal
    pub fn rate_for_year(&self, i: usize) -> f64 {
        match self {
            TaxSchedule::Flat(rate) => *rate,
            TaxSchedule::PerYear(rates) => rates.get(i).copied().unwrap_or(0.0),
        }
    }

    /// Build a schedule that drops to 0% from the year the client's age
    /// reaches `tax_free_age`. `flat_rate` is a decimal; `start_age` is the
    /// client's age in year 0. Without a threshold the schedule stays flat.
    pub fn with_tax_free_age(
        flat_rate: f64,
        start_age: i32,
        total_years: usize,
        tax_free_age: Option<i32>,
    ) -> Self {
        match tax_free_age {
            None => TaxSchedule::Flat(flat_rate),
            Some(threshold) => {
                let rates = (0..total_years)
                    .map(|yr| {
                        if start_age + yr as i32 >= threshold {
                            0.0
                        } else {
                            flat_rate
                        }
                    })
                    .collect();
                TaxSchedule::PerYear(rates)
            }
        }
    }
}
