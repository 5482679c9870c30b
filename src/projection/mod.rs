//! Annual balance projection and capital sizing

mod engine;
mod rows;
mod solver;

pub use engine::ProjectionEngine;
pub use rows::{AssetBreakdown, CapitalResult, ProjectionRow};
pub use solver::solve_required_capital;
