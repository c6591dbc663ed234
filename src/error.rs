use crate::upload::FileId;
use thiserror::Error;

/// Failure of a whole batch request. The display text is what every file of
/// the batch shows as its error message.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to send request: {0}")]
    Request(reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Upload failed with status: {0}")]
    Status(u16),

    #[error("Failed to parse upload response: {0}")]
    Decode(String),

    #[error("Invalid media type '{0}'")]
    InvalidMediaType(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Request(err)
        }
    }
}

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("No file at index {index} (list has {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Unknown file {0}")]
    UnknownFile(FileId),

    #[error("Not every file has been uploaded successfully")]
    NotReady,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, IntakeError>;
