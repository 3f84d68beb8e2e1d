//! # Preprocessor
//!
//! Sits between the tokenizer and the analyzer:
//!
//! ```text
//! Expression text → Tokenizer → Preprocessor → Analyzer → Evaluator
//! ```
//!
//! Whitespace is insignificant in the dice grammar, so the token
//! preprocessor drops formatting tokens while keeping spans of the rest.

use crate::tokenizer::token::TokenSpan;

/// A trait for preprocessing different types of input
pub trait Preprocessor<T, U = T> {
    fn process(&self, input: T) -> U;
}

/// Token-specific preprocessor implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenPreprocessor;

impl TokenPreprocessor {
    pub fn new() -> Self {
        Self
    }
}

impl Preprocessor<Vec<TokenSpan>> for TokenPreprocessor {
    fn process(&self, input: Vec<TokenSpan>) -> Vec<TokenSpan> {
        input
            .into_iter()
            .filter(|span| !span.token.is_formatting())
            .collect()
    }
}
