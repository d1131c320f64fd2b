//! Immutable request builder and the flat configuration it resolves to.
//!
//! # Design
//! A `Request` pairs an `Endpoint` with a `RequestConfiguration` whose `url`
//! is only filled in on resolution: [`Request::get`] clones the stored
//! configuration and splices in the endpoint's full URL. Setters copy the
//! builder and change exactly one field, so any builder can be shared and
//! reused as a template.
//!
//! Defaults (`GET`, JSON response, `content-type: application/json`) are
//! baked in at construction. An explicit header removal drops the default
//! like any other header.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::endpoint::Endpoint;
use crate::http::{Method, ResponseType};
use crate::params::{MaybeValue, Params};

/// The flat record handed to the transport.
///
/// Serializes to `{ url, method, data?, headers, responseType, user?,
/// password?, withCredentials?, timeout?, crossDomain? }`. `timeout` is in
/// milliseconds; both it and `crossDomain` are passed to the transport
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestConfiguration<D = serde_json::Value> {
    pub url: String,
    pub method: Method,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<D>,
    pub headers: Params,
    pub response_type: ResponseType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_credentials: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_domain: Option<bool>,
}

impl<D> Default for RequestConfiguration<D> {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: Method::Get,
            data: None,
            headers: Params::new().merge([("content-type", "application/json")]),
            response_type: ResponseType::Json,
            user: None,
            password: None,
            with_credentials: None,
            timeout: None,
            cross_domain: None,
        }
    }
}

impl<D> RequestConfiguration<D> {
    fn with_data<E>(self, data: Option<E>) -> RequestConfiguration<E> {
        RequestConfiguration {
            url: self.url,
            method: self.method,
            data,
            headers: self.headers,
            response_type: self.response_type,
            user: self.user,
            password: self.password,
            with_credentials: self.with_credentials,
            timeout: self.timeout,
            cross_domain: self.cross_domain,
        }
    }
}

/// Builder for a single HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request<D = serde_json::Value> {
    endpoint: Endpoint,
    configuration: RequestConfiguration<D>,
}

impl Default for Request {
    fn default() -> Self {
        Request::new(Endpoint::default())
    }
}

impl Request {
    /// A request to `endpoint` with default settings and no body.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            configuration: RequestConfiguration::default(),
        }
    }
}

impl<D> From<Endpoint> for Request<D> {
    fn from(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            configuration: RequestConfiguration::default(),
        }
    }
}

impl<D> From<RequestConfiguration<D>> for Request<D> {
    fn from(configuration: RequestConfiguration<D>) -> Self {
        Self {
            endpoint: Endpoint::new(configuration.url.clone()),
            configuration,
        }
    }
}

impl<D> Request<D> {
    pub fn target(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Resolve to the flat configuration.
    pub fn get(&self) -> RequestConfiguration<D>
    where
        D: Clone,
    {
        RequestConfiguration {
            url: self.endpoint.url(),
            ..self.configuration.clone()
        }
    }

    /// Resolve and hand the configuration to `transformer`, returning its
    /// output instead.
    pub fn get_with<T>(&self, transformer: impl FnOnce(RequestConfiguration<D>) -> T) -> T
    where
        D: Clone,
    {
        transformer(self.get())
    }
}

impl<D: Clone> Request<D> {
    fn update(&self, f: impl FnOnce(&mut RequestConfiguration<D>)) -> Self {
        let mut configuration = self.configuration.clone();
        f(&mut configuration);
        Self {
            endpoint: self.endpoint.clone(),
            configuration,
        }
    }

    #[must_use]
    pub fn endpoint(&self, endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            configuration: self.configuration.clone(),
        }
    }

    /// Target a raw URL instead of a built endpoint.
    #[must_use]
    pub fn url(&self, url: impl Into<String>) -> Self {
        self.endpoint(Endpoint::new(url))
    }

    #[must_use]
    pub fn method(&self, method: Method) -> Self {
        self.update(|c| c.method = method)
    }

    #[must_use]
    pub fn response_type(&self, response_type: ResponseType) -> Self {
        self.update(|c| c.response_type = response_type)
    }

    /// Set the body. The payload type may change.
    #[must_use]
    pub fn data<E>(&self, data: E) -> Request<E> {
        Request {
            endpoint: self.endpoint.clone(),
            configuration: self.configuration.clone().with_data(Some(data)),
        }
    }

    #[must_use]
    pub fn without_data(&self) -> Self {
        self.update(|c| c.data = None)
    }

    /// Set one header. An absent value removes the header.
    #[must_use]
    pub fn header(&self, name: impl Into<String>, value: impl MaybeValue) -> Self {
        self.headers([(name, value)])
    }

    /// Merge a group of headers into the current ones; absent values remove.
    #[must_use]
    pub fn headers<I, K, V>(&self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: MaybeValue,
    {
        self.update(|c| c.headers = c.headers.merge(headers))
    }

    #[must_use]
    pub fn remove_header(&self, name: impl Into<String>) -> Self {
        self.header(name, None::<String>)
    }

    #[must_use]
    pub fn user(&self, user: impl MaybeValue) -> Self {
        self.update(|c| c.user = user.into_value())
    }

    #[must_use]
    pub fn password(&self, password: impl MaybeValue) -> Self {
        self.update(|c| c.password = password.into_value())
    }

    /// `None` returns the flag to unset.
    #[must_use]
    pub fn with_credentials(&self, with_credentials: impl Into<Option<bool>>) -> Self {
        let with_credentials = with_credentials.into();
        self.update(|c| c.with_credentials = with_credentials)
    }

    /// Request timeout, stored in whole milliseconds. `None` leaves it to
    /// the transport.
    #[must_use]
    pub fn timeout(&self, timeout: impl Into<Option<Duration>>) -> Self {
        let millis = timeout
            .into()
            .map(|timeout| u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self.update(|c| c.timeout = millis)
    }

    #[must_use]
    pub fn cross_domain(&self, cross_domain: impl Into<Option<bool>>) -> Self {
        let cross_domain = cross_domain.into();
        self.update(|c| c.cross_domain = cross_domain)
    }
}

fn alias<D: Clone>(request: impl Into<Request<D>>, method: Method) -> Request<D> {
    request.into().method(method)
}

/// A `GET` request built from an endpoint, a configuration or a request.
pub fn get<D: Clone>(request: impl Into<Request<D>>) -> Request<D> {
    alias(request, Method::Get)
}

pub fn post<D: Clone>(request: impl Into<Request<D>>) -> Request<D> {
    alias(request, Method::Post)
}

pub fn put<D: Clone>(request: impl Into<Request<D>>) -> Request<D> {
    alias(request, Method::Put)
}

pub fn patch<D: Clone>(request: impl Into<Request<D>>) -> Request<D> {
    alias(request, Method::Patch)
}

pub fn delete<D: Clone>(request: impl Into<Request<D>>) -> Request<D> {
    alias(request, Method::Delete)
}
