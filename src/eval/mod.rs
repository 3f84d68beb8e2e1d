pub mod evaluator;

pub use evaluator::{EvalError, EvalResult, EvaluationOutcome, Evaluator, MAX_DICE_COUNT};

use crate::ast::Expression;

/// Rolls `expression` once with the default evaluator.
///
/// Fails with [`EvalError::TooManyDice`] when a dice term asks for more than
/// [`MAX_DICE_COUNT`] (100,000) dice, e.g. `100001d6`.
pub fn evaluate(expression: &Expression) -> EvalResult<EvaluationOutcome> {
    Evaluator::new().evaluate(expression)
}
