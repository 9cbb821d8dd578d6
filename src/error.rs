/// Failures surfaced by the catalog client and the favorites store.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Network, DNS, timeout or an unexpected HTTP status.
    #[error("transport error: {0}")]
    Transport(String),
    /// The response body did not decode into the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// The caller supplied malformed input.
    #[error("validation error: {0}")]
    Validation(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CoreError::Parse(e.to_string())
        } else {
            CoreError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Parse(e.to_string())
    }
}
