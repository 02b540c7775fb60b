//! Error types for the Pokémon API client.
//!
//! `NotFound` gets a dedicated variant because an unknown name is the common
//! failure. All other non-2xx responses land in `HttpError` with the raw status
//! and body for debugging.

use thiserror::Error;

/// Errors returned while fetching or parsing an upstream record.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The name cannot be a single upstream path segment. No request was sent.
    #[error("invalid pokemon name: {0:?}")]
    InvalidName(String),

    /// The upstream API returned 404 for the requested name.
    #[error("resource not found")]
    NotFound,

    /// The upstream API returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the upstream shape.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request never produced a response (connect failure, timeout, ...).
    #[error("transport failed: {0}")]
    TransportError(String),
}
