mod property_test;
mod resolver_test;
mod simulation_test;

use dicestat::DiceConfig;

/// Small, fast configuration for end-to-end runs.
pub fn test_config(iterations: usize) -> DiceConfig {
    let mut config = DiceConfig::default();
    config.simulation.iterations = iterations;
    config.simulation.workers = Some(2);
    config
}
