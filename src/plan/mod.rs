//! Scenario documents and their JSON loader

mod data;
mod loader;

pub use data::{HouseholdProfile, MedicalBuffer, PlanItem, Scenario};
pub use loader::{load_scenario, load_scenario_from_reader, ScenarioError};
