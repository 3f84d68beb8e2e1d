use thiserror::Error;

use crate::analyzer::ParseError;
use crate::codec::CodecError;
use crate::config::ConfigError;
use crate::eval::EvalError;
use crate::statistics::SimulationError;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum Error {
    // client input
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvalError),
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    // server side
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DiceResult<T> = Result<T, Error>;

impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }

    /// True when the request itself was at fault and retrying it unchanged
    /// cannot succeed.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            Error::Parse(_) | Error::Evaluation(_) | Error::Codec(_)
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Simulation(SimulationError::Timeout { .. }))
    }
}
