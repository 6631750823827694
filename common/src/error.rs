use thiserror::Error;

use crate::gas::GasId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown gas identifier: {0}")]
    UnknownGas(String),

    #[error("invalid threshold for {gas}: {value}")]
    InvalidThreshold { gas: GasId, value: f64 },

    #[error("invalid concentration for {gas}: {value} ppm")]
    InvalidConcentration { gas: GasId, value: f64 },

    #[error("unsupported feed event type: {0}")]
    UnsupportedEvent(String),

    #[error("malformed feed event: {0}")]
    MalformedEvent(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
