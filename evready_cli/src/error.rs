use evready::error::EvreadyError;

#[derive(thiserror::Error, Debug)]
pub enum EvreadyCliError {
    #[error("Anyhow error")]
    Anyhow(#[from] anyhow::Error),
    #[error("serde JSON error")]
    SerdeJSONError(#[from] serde_json::Error),
    #[error("evready error")]
    EvreadyError(#[from] EvreadyError),
    #[error("std IO error")]
    IOError(#[from] std::io::Error),
}

pub type EvreadyCliResult<T> = Result<T, EvreadyCliError>;
