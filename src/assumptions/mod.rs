//! Planning assumptions: global defaults, portfolio presets, tax schedules,
//! and per-item rate resolution

mod presets;
mod tax;

pub use presets::PortfolioPreset;
pub use tax::TaxSchedule;

use serde::{Deserialize, Serialize};

/// Document-level assumption block. All rates are percentage points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalAssumptions {
    /// Annual income return applied when no preset or override resolves
    pub income_return: f64,
    /// Annual growth return applied when no preset or override resolves
    pub growth_return: f64,
    /// Tax rate on income return
    pub tax_rate: f64,
    /// Annual inflation rate
    pub inflation: f64,
    /// Annual fee load on the balance
    pub fee_load: f64,
    /// Age from which income return is untaxed
    #[serde(default)]
    pub tax_free_age: Option<i32>,
}

/// Optional per-item rate overrides, in percentage points
#[derive(Debug, Clone, Copy, Default)]
pub struct RateOverrides {
    pub income_return: Option<f64>,
    pub growth_return: Option<f64>,
    pub tax_rate: Option<f64>,
    pub fee_load: Option<f64>,
}

/// Rates resolved for a single item, still in percentage points
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedRates {
    pub income_return: f64,
    pub growth_return: f64,
    pub tax_rate: f64,
    pub fee_load: f64,
    pub portfolio: PortfolioPreset,
}

impl ResolvedRates {
    /// Resolve rates for one item.
    ///
    /// Priority: per-item override > declared preset > duration-based auto
    /// preset > global assumption. Tax and fees have no preset component and
    /// fall through to the globals unless overridden.
    pub fn resolve(
        globals: &GlobalAssumptions,
        declared: Option<PortfolioPreset>,
        overrides: &RateOverrides,
        duration: i32,
    ) -> Self {
        let portfolio = declared.unwrap_or_else(|| PortfolioPreset::for_duration(duration));

        let mut rates = Self {
            income_return: portfolio.income_return(),
            growth_return: portfolio.growth_return(),
            tax_rate: globals.tax_rate,
            fee_load: globals.fee_load,
            portfolio,
        };

        if let Some(ir) = overrides.income_return {
            rates.income_return = ir;
        }
        if let Some(gr) = overrides.growth_return {
            rates.growth_return = gr;
        }
        if let Some(tax) = overrides.tax_rate {
            rates.tax_rate = tax;
        }
        if let Some(fee) = overrides.fee_load {
            rates.fee_load = fee;
        }

        rates
    }

    /// Convert to engine decimals, pairing with a year-indexed tax schedule
    pub fn to_rate_set(&self, tax: TaxSchedule) -> RateSet {
        RateSet {
            income_return: self.income_return / 100.0,
            growth_return: self.growth_return / 100.0,
            tax,
            fee_rate: self.fee_load / 100.0,
        }
    }
}

/// Decimal rates consumed by the projection engine
#[derive(Debug, Clone)]
pub struct RateSet {
    pub income_return: f64,
    pub growth_return: f64,
    pub tax: TaxSchedule,
    pub fee_rate: f64,
}
