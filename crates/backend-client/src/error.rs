use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Error: {code} - {reason}")]
    Status { code: u16, reason: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Single line shown in place of the failed section
    pub fn user_message(&self) -> String {
        match self {
            ClientError::RequestFailed(e) if e.is_decode() => {
                format!("Invalid response: {}", e)
            }
            ClientError::RequestFailed(_) => "Network error occurred".to_string(),
            other => other.to_string(),
        }
    }

    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        ClientError::Status {
            code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
