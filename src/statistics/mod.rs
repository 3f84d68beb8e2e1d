//! Distribution summaries and the sampling engine that feeds them.

pub mod aggregate;
pub mod monte_carlo;

pub use aggregate::{aggregate, round_to, StatisticsResult, DECIMAL_PLACES, PERCENTILE_RANKS};
pub use monte_carlo::{MonteCarloEngine, SimulationError, SimulationReport, SimulationResult};
