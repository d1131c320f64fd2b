//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! builders resolve to a `RequestConfiguration`, which is turned into an
//! `HttpRequest` here; the transport executes it and hands back an
//! `HttpResponse`. Nothing in this module touches the network.
//!
//! All fields use owned types (`String`, `Vec`) so values can move freely
//! between tasks and across the transport boundary.

use std::fmt;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::request::RequestConfiguration;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the response body is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    #[default]
    Json,
    Text,
    Blob,
}

/// An HTTP request described as plain data.
///
/// The body is the JSON serialization of the configuration's `data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub response_type: ResponseType,
    pub user: Option<String>,
    pub password: Option<String>,
    pub with_credentials: bool,
    pub timeout: Option<Duration>,
    pub cross_domain: bool,
}

impl HttpRequest {
    /// Adapt a resolved configuration to the transport's shape.
    pub fn from_configuration<D: Serialize>(
        configuration: RequestConfiguration<D>,
    ) -> Result<Self, ApiError> {
        let body = configuration
            .data
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: configuration.method,
            url: configuration.url,
            headers: configuration
                .headers
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            body,
            response_type: configuration.response_type,
            user: configuration.user,
            password: configuration.password,
            with_credentials: configuration.with_credentials.unwrap_or(false),
            timeout: configuration.timeout.map(Duration::from_millis),
            cross_domain: configuration.cross_domain.unwrap_or(false),
        })
    }

    /// `Authorization` header value for the user/password pair, if a user
    /// is set. A missing password is sent as empty.
    pub fn basic_auth(&self) -> Option<String> {
        let user = self.user.as_deref()?;
        let password = self.password.as_deref().unwrap_or("");
        Some(format!("Basic {}", STANDARD.encode(format!("{user}:{password}"))))
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Interpret the body according to `response_type`.
    pub fn into_body(self, response_type: ResponseType) -> Result<ResponseBody, ApiError> {
        match response_type {
            ResponseType::Json if self.body.iter().all(u8::is_ascii_whitespace) => {
                Ok(ResponseBody::Json(serde_json::Value::Null))
            }
            ResponseType::Json => serde_json::from_slice(&self.body)
                .map(ResponseBody::Json)
                .map_err(|e| ApiError::DeserializationError(e.to_string())),
            ResponseType::Text => String::from_utf8(self.body)
                .map(ResponseBody::Text)
                .map_err(|e| ApiError::DeserializationError(e.to_string())),
            ResponseType::Blob => Ok(ResponseBody::Blob(self.body)),
        }
    }
}

/// A response payload decoded per `ResponseType`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
    Blob(Vec<u8>),
}

impl ResponseBody {
    /// Convert the payload into the caller's resource type. Text maps to a
    /// JSON string and blobs to an array of bytes, so `String` and `Vec<u8>`
    /// are the natural targets for those response types.
    pub fn into_resource<R: DeserializeOwned>(self) -> Result<R, ApiError> {
        let value = match self {
            ResponseBody::Json(value) => value,
            ResponseBody::Text(text) => serde_json::Value::String(text),
            ResponseBody::Blob(bytes) => bytes.into_iter().map(serde_json::Value::from).collect(),
        };
        serde_json::from_value(value).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }
}
