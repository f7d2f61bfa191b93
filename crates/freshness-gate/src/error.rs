use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Scrape trigger failed: {0}")]
    Trigger(String),

    #[error("Marker store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type GateResult<T> = Result<T, GateError>;
