use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpongeError>;

#[derive(Error, Debug)]
pub enum SpongeError {
    #[error("API response is empty. Reason: {detail}")]
    NotFound { detail: String },
    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("JSON deserialization error: {0}. Raw response: {1}")]
    Decode(#[source] serde_json::Error, String),
    #[error("Response body is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("Unexpected response payload: {0}")]
    InvalidPayload(String),
    #[error("HTTP error: {0}")]
    Transport(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SpongeError {
    /// True when the server answered 404, i.e. nothing matched the filters.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
