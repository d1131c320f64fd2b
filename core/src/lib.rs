//! Immutable, chainable builders for HTTP request descriptors.
//!
//! # Overview
//! Three builders compose by nesting: a [`Query`] is owned by an
//! [`Endpoint`], and an `Endpoint` is owned by a [`Request`]. A request
//! resolves to a flat [`RequestConfiguration`], which a [`Client`] turns into
//! an [`HttpRequest`] for an [`HttpTransport`] to execute.
//!
//! # Design
//! - Every setter takes `&self` and returns a new value, so builders can be
//!   shared between tasks and reused as templates.
//! - Mapping setters treat an absent value as "remove the key".
//! - The core never performs I/O; the caller supplies the transport
//!   (host-does-IO), keeping the builders deterministic and testable.

pub mod blueprint;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod params;
pub mod query;
pub mod request;
pub mod transport;

pub use blueprint::Blueprint;
pub use client::Client;
pub use endpoint::Endpoint;
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse, Method, ResponseBody, ResponseType};
pub use params::{MaybeCallback, MaybeValue, Params};
pub use query::Query;
pub use request::{Request, RequestConfiguration};
pub use transport::{HttpTransport, RequestSource, RequestStream};
