//! Error types for the fetch client.
//!
//! # Design
//! Builders never fail; errors only arise once a request leaves the builder
//! world. `NotFound` gets a dedicated variant because callers frequently
//! distinguish "the resource does not exist" from "the server returned an
//! unexpected status." All other non-2xx responses land in `HttpError` with
//! the raw status code and body. Transport failures are boxed as-is.

use thiserror::Error;

/// Errors returned while dispatching a request and decoding its response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The transport itself failed; the original error is the source.
    #[error("transport failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}
