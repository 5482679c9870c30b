//! Capital Planner - deterministic capital-sufficiency engine for household lifestyle plans
//!
//! This library provides:
//! - Year-by-year portfolio projection under fixed rate, tax and fee assumptions
//! - Bisection sizing of the starting capital required to fund a drawdown schedule
//! - Schedule builders for income streams, replaceable assets and recurring outlays
//! - Scenario aggregation with per-item rate presets, funding ages and present-value totals

pub mod assumptions;
pub mod plan;
pub mod planner;
pub mod projection;
pub mod schedule;

// Re-export commonly used types
pub use assumptions::{GlobalAssumptions, PortfolioPreset, RateSet, ResolvedRates, TaxSchedule};
pub use plan::{load_scenario, Scenario, ScenarioError};
pub use planner::{process_scenario, ItemResult, PlanOutcome};
pub use projection::{CapitalResult, ProjectionEngine, ProjectionRow};
pub use schedule::{AssetPlan, IncomeStream, RecurringOutlay};
