//! Dice grammar over preprocessed tokens.
//!
//! ```text
//! Expression := Dice | Integer
//! Dice       := Integer? "d" Sides
//! Sides      := "%" | Integer
//! ```
//!
//! Once the `d` marker has been consumed the parser commits to a dice term,
//! so `3d` or `3d0` report a sides error instead of falling back to `3`.

use crate::{
    ast::{Dice, Expression, Sides},
    tokenizer::{
        literal::Literal,
        symbol::Symbol,
        token::{Token, TokenSpan},
    },
};

use super::{
    core::{Located, ParseError, Parser},
    prelude::*,
};

impl Located for TokenSpan {
    fn found(&self) -> String {
        self.token.to_string()
    }

    fn column(&self) -> usize {
        self.column
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Digits {
    text: String,
    column: usize,
}

impl Digits {
    fn invalid(&self, message: impl Into<String>) -> ParseError {
        ParseError::ParseError {
            message: message.into(),
            found: self.text.clone(),
            column: self.column,
        }
    }

    fn to_positive(&self, what: &str) -> Result<u32, ParseError> {
        match self.text.parse::<u32>() {
            Ok(0) => Err(self.invalid(format!("{} must be positive", what))),
            Ok(n) => Ok(n),
            Err(_) => Err(self.invalid(format!("{} is out of range", what))),
        }
    }
}

fn parse_integer() -> impl Parser<TokenSpan, Digits> {
    satisfy(|span: &TokenSpan| match &span.token {
        Token::Literal(Literal::Integer(digits)) => Some(Digits {
            text: digits.clone(),
            column: span.column,
        }),
        _ => None,
    })
}

fn parse_symbol(symbol: Symbol) -> impl Parser<TokenSpan, Symbol> {
    satisfy(move |span: &TokenSpan| match &span.token {
        Token::Symbol(found) if *found == symbol => Some(*found),
        _ => None,
    })
}

fn parse_sides() -> impl Parser<TokenSpan, Sides> {
    with_context(
        choice(vec![
            Box::new(map(parse_symbol(Symbol::Percent), |_: Symbol| Sides::Percent)),
            Box::new(map_res(parse_integer(), |digits: Digits| {
                digits.to_positive("sides").map(Sides::Integer)
            })),
        ]),
        "dice sides",
    )
}

fn parse_dice() -> impl Parser<TokenSpan, Expression> {
    map_res(
        tuple2(
            optional(parse_integer()),
            preceded(parse_symbol(Symbol::Dice), cut(parse_sides())),
        ),
        |(count, sides): (Option<Digits>, Sides)| {
            let count = count
                .map(|digits| digits.to_positive("dice count"))
                .transpose()?;
            Ok(Expression::Dice(Dice { count, sides }))
        },
    )
}

fn parse_number() -> impl Parser<TokenSpan, Expression> {
    map_res(parse_integer(), |digits: Digits| {
        digits
            .text
            .parse::<i64>()
            .map(Expression::number)
            .map_err(|_| digits.invalid("number is out of range"))
    })
}

pub fn parse_expression() -> impl Parser<TokenSpan, Expression> {
    with_context(
        choice(vec![Box::new(parse_dice()), Box::new(parse_number())]),
        "expression",
    )
}

/// Whole-input parser: every token must belong to the expression.
pub fn parse_root() -> impl Parser<TokenSpan, Expression> {
    cut(all_consuming(parse_expression()))
}
