//! # Analyzer
//!
//! Turns the token stream into an [`Expression`]. Built from small
//! combinators over token slices ([`core::Parser`]); the dice grammar lives
//! in [`parsers`].

pub mod combinators;
pub mod core;
pub mod parsers;
pub mod prelude;

pub use self::core::ParseError;
pub use self::core::ParseResult;
pub use self::core::Parser;

use tracing::debug;

use crate::{
    ast::Expression,
    preprocessor::{Preprocessor, TokenPreprocessor},
    tokenizer::token::Tokenizer,
};

/// Parses a dice expression such as `3d6`, `d%` or `42`.
///
/// Counts and sides are accepted up to `u32::MAX`. The dice count cap,
/// [`MAX_DICE_COUNT`](crate::eval::MAX_DICE_COUNT), is enforced at evaluation,
/// so `100001d6` parses but [`evaluate`](crate::eval::evaluate) rejects it
/// with [`EvalError::TooManyDice`](crate::eval::EvalError::TooManyDice).
///
/// ```
/// use dicestat::{analyzer::parse, evaluate, Expression, Sides};
///
/// assert_eq!(parse("3d6").unwrap(), Expression::dice(Some(3), Sides::Integer(6)));
/// assert!(parse("3.14").is_err());
/// assert!(evaluate(&parse("100001d6").unwrap()).is_err());
/// ```
#[tracing::instrument(level = "debug")]
pub fn parse(text: &str) -> Result<Expression, ParseError> {
    let spans = Tokenizer::new().tokenize(text)?;
    let tokens = TokenPreprocessor::new().process(spans);
    let (_, expression) = parsers::parse_root().parse(&tokens, 0)?;
    debug!(%expression, "parsed");
    Ok(expression)
}
