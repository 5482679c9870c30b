//! Scenario document structures

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::assumptions::{GlobalAssumptions, PortfolioPreset, RateOverrides};

/// Household being planned for. P2 is optional; a missing date of birth
/// falls back to P1's for age arithmetic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseholdProfile {
    #[serde(default)]
    pub p1_name: String,
    pub p1_dob: NaiveDate,
    #[serde(default)]
    pub p2_name: String,
    #[serde(default)]
    pub p2_dob: Option<NaiveDate>,
}

impl HouseholdProfile {
    pub fn p1_birth_year(&self) -> i32 {
        self.p1_dob.year()
    }

    pub fn p2_birth_year(&self) -> i32 {
        self.p2_dob.map_or_else(|| self.p1_dob.year(), |d| d.year())
    }
}

/// One lifestyle item. The same shape serves every category; each category
/// reads the fields it needs and ignores the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanItem {
    pub name: String,
    /// Annual amount for income stages, at today's prices
    #[serde(default)]
    pub income: f64,
    /// Age at which the need begins
    #[serde(default)]
    pub start: i32,
    /// Age at which the need ends
    #[serde(default)]
    pub end: i32,
    /// Purchase or per-year cost, at today's prices
    #[serde(default)]
    pub cost: f64,
    /// Replacement cycle in years, vehicles only
    #[serde(default)]
    pub cycle: u32,
    /// Annual holding cost, vehicles and assets
    #[serde(default)]
    pub holding: f64,
    /// End-of-plan resale value, assets only
    #[serde(default)]
    pub resale: f64,
    /// Trade-in value per replacement; 0 means 30% of the inflated cost
    #[serde(default)]
    pub tradein: f64,
    /// Age at which funding starts, when earlier than the start age
    #[serde(default)]
    pub funding_start: Option<i32>,
    #[serde(default = "default_true")]
    pub apply_inflation: bool,
    #[serde(default)]
    pub portfolio: Option<PortfolioPreset>,
    #[serde(default)]
    pub income_return: Option<f64>,
    #[serde(default)]
    pub growth_return: Option<f64>,
    #[serde(default)]
    pub tax_rate: Option<f64>,
    #[serde(default)]
    pub fee_load: Option<f64>,
}

impl PlanItem {
    pub fn rate_overrides(&self) -> RateOverrides {
        RateOverrides {
            income_return: self.income_return,
            growth_return: self.growth_return,
            tax_rate: self.tax_rate,
            fee_load: self.fee_load,
        }
    }
}

/// Annual medical cost buffer; one per scenario, disabled when cost is 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalBuffer {
    #[serde(default)]
    pub cost: f64,
    #[serde(default = "default_medical_start")]
    pub start: i32,
    #[serde(default = "default_medical_end")]
    pub end: i32,
    #[serde(default)]
    pub funding_start: Option<i32>,
    #[serde(default)]
    pub portfolio: Option<PortfolioPreset>,
    #[serde(default)]
    pub income_return: Option<f64>,
    #[serde(default)]
    pub growth_return: Option<f64>,
    #[serde(default)]
    pub tax_rate: Option<f64>,
    #[serde(default)]
    pub fee_load: Option<f64>,
}

impl MedicalBuffer {
    pub fn rate_overrides(&self) -> RateOverrides {
        RateOverrides {
            income_return: self.income_return,
            growth_return: self.growth_return,
            tax_rate: self.tax_rate,
            fee_load: self.fee_load,
        }
    }
}

impl Default for MedicalBuffer {
    fn default() -> Self {
        Self {
            cost: 0.0,
            start: default_medical_start(),
            end: default_medical_end(),
            funding_start: None,
            portfolio: None,
            income_return: None,
            growth_return: None,
            tax_rate: None,
            fee_load: None,
        }
    }
}

/// Full scenario document: profile, global assumptions and item lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub profile: HouseholdProfile,
    pub assumptions: GlobalAssumptions,
    #[serde(default)]
    pub incomes: Vec<PlanItem>,
    #[serde(default)]
    pub cars: Vec<PlanItem>,
    #[serde(default)]
    pub assets: Vec<PlanItem>,
    #[serde(default)]
    pub travel: Vec<PlanItem>,
    #[serde(default)]
    pub medical: MedicalBuffer,
    /// Funding age applied to every item, overriding per-item funding starts
    #[serde(default)]
    pub universal_fund_age: Option<i32>,
}

fn default_true() -> bool {
    true
}

fn default_medical_start() -> i32 {
    70
}

fn default_medical_end() -> i32 {
    100
}
