use thiserror::Error;

/// Errors returned by [`crate::PandaClient`].
#[derive(Debug, Error)]
pub enum PandaError {
    /// The API answered with a non-success status.
    #[error("PANDA API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request never produced a response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, PandaError>;
