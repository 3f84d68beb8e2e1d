use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ast::{Dice, Expression};

/// Upper bound on dice rolled by a single expression.
pub const MAX_DICE_COUNT: u32 = 100_000;

/// One concrete roll of an expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub value: i64,
    /// Individual die faces in roll order; `[value]` for a literal number.
    pub breakdown: Vec<i64>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("Invalid dice count: {0}")]
    InvalidCount(u32),
    #[error("Invalid dice sides: {0}")]
    InvalidSides(u32),
    #[error("Too many dice: {count} exceeds the limit of {max}")]
    TooManyDice { count: u32, max: u32 },
}

pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Rolls the expression once using the thread-local generator.
    ///
    /// # Errors
    /// * [`EvalError::InvalidCount`] / [`EvalError::InvalidSides`] - On a zero count or side count
    /// * [`EvalError::TooManyDice`] - When the count exceeds [`MAX_DICE_COUNT`] (100,000),
    ///   so `100001d6` is rejected even though it parses
    pub fn evaluate(&self, expression: &Expression) -> EvalResult<EvaluationOutcome> {
        self.evaluate_with(expression, &mut rand::thread_rng())
    }

    pub fn evaluate_with<R: Rng>(
        &self,
        expression: &Expression,
        rng: &mut R,
    ) -> EvalResult<EvaluationOutcome> {
        match expression {
            Expression::Number { value } => Ok(EvaluationOutcome {
                value: *value,
                breakdown: vec![*value],
            }),
            Expression::Dice(dice) => {
                let (count, faces) = Self::resolve(dice)?;
                let breakdown: Vec<i64> = (0..count)
                    .map(|_| i64::from(rng.gen_range(1..=faces)))
                    .collect();
                Ok(EvaluationOutcome {
                    value: breakdown.iter().sum(),
                    breakdown,
                })
            }
        }
    }

    /// Total of one roll without building the breakdown; used for sampling.
    pub fn roll_total<R: Rng>(&self, expression: &Expression, rng: &mut R) -> EvalResult<i64> {
        match expression {
            Expression::Number { value } => Ok(*value),
            Expression::Dice(dice) => {
                let (count, faces) = Self::resolve(dice)?;
                Ok((0..count).map(|_| i64::from(rng.gen_range(1..=faces))).sum())
            }
        }
    }

    /// Checks a tree that may not have come from the parser.
    pub fn validate(&self, expression: &Expression) -> EvalResult<()> {
        match expression {
            Expression::Number { .. } => Ok(()),
            Expression::Dice(dice) => Self::resolve(dice).map(|_| ()),
        }
    }

    fn resolve(dice: &Dice) -> EvalResult<(u32, u32)> {
        let count = dice.count();
        if count == 0 {
            return Err(EvalError::InvalidCount(count));
        }
        if count > MAX_DICE_COUNT {
            return Err(EvalError::TooManyDice {
                count,
                max: MAX_DICE_COUNT,
            });
        }
        let faces = dice.sides.faces();
        if faces == 0 {
            return Err(EvalError::InvalidSides(faces));
        }
        Ok((count, faces))
    }
}
