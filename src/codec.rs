//! URL-safe transport encoding for expressions.
//!
//! Expressions such as `d%` are not path-safe, so callers embedding them in
//! URLs pass the padded URL-safe base64 form instead.

use base64::{engine::general_purpose::URL_SAFE, Engine};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Failed to decode expression: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("Decoded expression is not valid UTF-8")]
    Utf8,
}

pub fn encode_expression(expression: &str) -> String {
    URL_SAFE.encode(expression.as_bytes())
}

pub fn decode_expression(encoded: &str) -> Result<String, CodecError> {
    let bytes = URL_SAFE.decode(encoded.trim())?;
    String::from_utf8(bytes).map_err(|_| CodecError::Utf8)
}
