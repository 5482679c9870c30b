//! Load scenario documents from JSON files

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use thiserror::Error;

use super::Scenario;

/// Errors raised while loading a scenario document
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scenario document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load a scenario from a JSON file
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<Scenario, ScenarioError> {
    let file = File::open(path)?;
    load_scenario_from_reader(BufReader::new(file))
}

/// Load a scenario from any reader (e.g., string buffer, network stream)
pub fn load_scenario_from_reader<R: Read>(reader: R) -> Result<Scenario, ScenarioError> {
    let scenario = serde_json::from_reader(reader)?;
    Ok(scenario)
}
