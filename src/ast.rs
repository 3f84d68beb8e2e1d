use core::fmt;

use serde::{Deserialize, Serialize};

/// Sides used by the percentile die (`d%`).
pub const PERCENT_SIDES: u32 = 100;

// Root of a parsed dice expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expression {
    Dice(Dice),
    Number { value: i64 },
}

impl Expression {
    pub fn number(value: i64) -> Self {
        Expression::Number { value }
    }

    pub fn dice(count: Option<u32>, sides: Sides) -> Self {
        Expression::Dice(Dice { count, sides })
    }

    pub fn is_dice(&self) -> bool {
        matches!(self, Expression::Dice(_))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Dice(dice) => write!(f, "{}", dice),
            Expression::Number { value } => write!(f, "{}", value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dice {
    /// Number of dice; `None` means a single die was written as `dX`.
    pub count: Option<u32>,
    pub sides: Sides,
}

impl Dice {
    pub fn count(&self) -> u32 {
        self.count.unwrap_or(1)
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(count) = self.count {
            write!(f, "{}", count)?;
        }
        write!(f, "d{}", self.sides)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sides {
    Percent,
    Integer(u32),
}

impl Sides {
    /// Number of faces on the die.
    pub fn faces(&self) -> u32 {
        match self {
            Sides::Percent => PERCENT_SIDES,
            Sides::Integer(n) => *n,
        }
    }
}

impl fmt::Display for Sides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sides::Percent => write!(f, "%"),
            Sides::Integer(n) => write!(f, "{}", n),
        }
    }
}
