use thiserror::Error;

/// Failure of the item source. The deck session does not distinguish
/// between variants; they exist for logging.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("data service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid item payload: {0}")]
    Decode(String),
}

pub type FetchResult<T> = Result<T, FetchError>;
