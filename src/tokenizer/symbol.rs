//! # Symbol Token Handling
//!
//! The dice grammar knows two symbols: the die marker `d` and the percentile
//! sides marker `%`. Anything else is rejected by the tokenizer.

use strum::{AsRefStr, Display, EnumString};

use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{map, value},
    error::context,
};

use super::token::{ParserResult, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
pub enum Symbol {
    /// Die marker (`d`)
    #[strum(serialize = "d")]
    Dice,
    /// Percentile sides (`%`)
    #[strum(serialize = "%")]
    Percent,
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_symbol(input: &str) -> ParserResult<Token> {
    context(
        "symbol",
        map(
            alt((
                value(Symbol::Dice, tag("d")),
                value(Symbol::Percent, tag("%")),
            )),
            Token::Symbol,
        ),
    )(input)
}
