use nom::{character::complete::digit1, combinator::map, error::context};

use super::token::{ParserResult, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Raw decimal digits; range checks happen in the analyzer where the span is known.
    Integer(String),
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Integer(digits) => write!(f, "{}", digits),
        }
    }
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_integer_literal(input: &str) -> ParserResult<Literal> {
    context(
        "integer literal",
        map(digit1, |digits: &str| Literal::Integer(digits.to_string())),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_literal(input: &str) -> ParserResult<Token> {
    context("literal", map(parse_integer_literal, Token::Literal))(input)
}
