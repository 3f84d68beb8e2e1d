//! # dicestat
//!
//! Dice-expression statistics with tiered result resolution.
//!
//! An expression such as `3d6`, `d%` or `42` is parsed into an [`Expression`],
//! rolled once for a concrete outcome, and summarized by a Monte Carlo
//! simulation whose [`StatisticsResult`] is cached in front of a durable store.
//!
//! ```no_run
//! use dicestat::{DiceConfig, Resolver};
//!
//! # async fn example() -> dicestat::DiceResult<()> {
//! let resolver = Resolver::in_memory(&DiceConfig::default());
//! let resolved = resolver.resolve("3d6").await?;
//! println!("{} rolled {} ({})", resolved.expression, resolved.value, resolved.source);
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod ast;
pub mod codec;
pub mod config;
pub mod error;
pub mod eval;
pub mod preprocessor;
pub mod resolver;
pub mod statistics;
pub mod storage;
pub mod timing;
pub mod tokenizer;

// Re-exports
pub use analyzer::parse;
pub use ast::{Dice, Expression, Sides, PERCENT_SIDES};
pub use config::DiceConfig;
pub use error::{DiceResult, Error};
pub use eval::{evaluate, EvaluationOutcome, Evaluator};
pub use resolver::{ResolvedResult, ResultSource, Resolver};
pub use statistics::{aggregate, MonteCarloEngine, StatisticsResult};
