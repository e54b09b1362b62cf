//! Error types for the `scholar-model` crate.

use thiserror::Error;

/// Errors that can occur when talking to a language model backend.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The backend API returned an error response.
    #[error("{provider} API error: {message}")]
    Api {
        /// The provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The HTTP request itself failed (connection, TLS, timeout).
    #[error("request failed: {0}")]
    Http(String),

    /// The backend replied with a body the client could not interpret.
    #[error("failed to parse model response: {0}")]
    Parse(String),

    /// No API key was provided and none was found in the environment.
    #[error("{0} API key is missing")]
    MissingApiKey(String),
}

/// A convenience result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
