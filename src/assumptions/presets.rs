//! Portfolio presets mapping allocation profiles to return assumptions

use serde::{Deserialize, Serialize};

/// Named allocation profile determining an item's income and growth returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortfolioPreset {
    Conservative,
    Balanced,
    Growth,
}

impl PortfolioPreset {
    /// Annual income return in percentage points
    pub fn income_return(&self) -> f64 {
        match self {
            PortfolioPreset::Conservative => 4.5,
            PortfolioPreset::Balanced => 3.5,
            PortfolioPreset::Growth => 2.5,
        }
    }

    /// Annual growth return in percentage points
    pub fn growth_return(&self) -> f64 {
        match self {
            PortfolioPreset::Conservative => 0.5,
            PortfolioPreset::Balanced => 4.5,
            PortfolioPreset::Growth => 6.5,
        }
    }

    /// Default preset for an item funded over `duration` years:
    /// over 14 years growth, 6-14 balanced, under 6 conservative.
    pub fn for_duration(duration: i32) -> Self {
        if duration > 14 {
            PortfolioPreset::Growth
        } else if duration >= 6 {
            PortfolioPreset::Balanced
        } else {
            PortfolioPreset::Conservative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PortfolioPreset::Conservative => "conservative",
            PortfolioPreset::Balanced => "balanced",
            PortfolioPreset::Growth => "growth",
        }
    }
}
