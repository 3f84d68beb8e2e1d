//! # Tokenizer Component
//!
//! Lexical analysis of dice expressions. Raw text is turned into a stream of
//! [`TokenSpan`](token::TokenSpan)s, each carrying its byte range and
//! line/column so that the analyzer can report precise errors.
//!
//! * [`token`]: token types and the [`Tokenizer`](token::Tokenizer)
//! * [`literal`]: integer literals
//! * [`symbol`]: the `d` and `%` markers
//! * [`whitespace`]: spaces, tabs and newlines
//!
//! Characters outside digits, `d`, `%` and whitespace produce a
//! [`TokenizerError`](token::TokenizerError).

pub mod literal;
pub mod symbol;
pub mod token;
pub mod whitespace;
