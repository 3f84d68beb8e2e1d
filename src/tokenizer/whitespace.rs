//! # Whitespace Token Handling
//!
//! Whitespace is insignificant in dice expressions but is still tokenized so
//! that spans reported in errors point at the original input. The
//! [`preprocessor`](crate::preprocessor) drops these tokens before parsing.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    combinator::map,
    error::context,
};

use super::token::{ParserResult, Token};

/// Parses a run of spaces and tabs into a [`Token::Whitespace`].
///
/// ```
/// # use dicestat::tokenizer::whitespace::parse_whitespace;
/// # use dicestat::tokenizer::token::Token;
/// let (rest, token) = parse_whitespace("  d6").unwrap();
/// assert_eq!(token, Token::Whitespace("  ".to_string()));
/// assert_eq!(rest, "d6");
/// ```
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_whitespace(input: &str) -> ParserResult<Token> {
    context(
        "whitespace expected",
        map(take_while1(|c| c == ' ' || c == '\t' || c == '\r'), |ws: &str| {
            Token::Whitespace(ws.to_string())
        }),
    )(input)
}

/// Parses `\n` or `\r\n` into a [`Token::Newline`].
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_newline(input: &str) -> ParserResult<Token> {
    context(
        "newline expected",
        map(alt((tag("\r\n"), tag("\n"))), |_| Token::Newline),
    )(input)
}
