//! Immutable endpoint builder.
//!
//! An `Endpoint` is a URL path plus the query parameters attached to it.
//! Nesting (`many`, `one`, `by_id`) joins segments with a single `/` and
//! carries the current query and request pre-configuration forward. The
//! terminal verbs (`get`, `post`, ...) turn the endpoint into a `Request`.

use std::fmt;
use std::sync::Arc;

use crate::http::Method;
use crate::params::MaybeCallback;
use crate::query::Query;
use crate::request::Request;

/// A URL path with its query parameters.
///
/// The path never contains a query string; query data lives in `query` only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Endpoint {
    url: String,
    query: Query,
    configuration: Option<Arc<Request>>,
}

impl Endpoint {
    /// An endpoint at `url`. A query string in `url` is moved into the
    /// endpoint's query so the path stays free of it.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        match url.split_once('?') {
            Some((path, query)) => Self {
                url: path.to_string(),
                query: Query::parse(query),
                configuration: None,
            },
            None => Self {
                url,
                ..Self::default()
            },
        }
    }

    /// A deeper endpoint at `path` below this one.
    #[must_use]
    pub fn many(&self, path: impl fmt::Display) -> Self {
        self.nested(format!("{}/{path}", self.url))
    }

    /// A deeper endpoint pointing at the resource `id` of collection `path`.
    #[must_use]
    pub fn one(&self, path: impl fmt::Display, id: impl fmt::Display) -> Self {
        self.nested(format!("{}/{path}/{id}", self.url))
    }

    /// A deeper endpoint pointing at resource `id` of this collection.
    #[must_use]
    pub fn by_id(&self, id: impl fmt::Display) -> Self {
        self.many(id)
    }

    fn nested(&self, url: String) -> Self {
        Self {
            url,
            query: self.query.clone(),
            configuration: self.configuration.clone(),
        }
    }

    /// Replace the query, or transform the current one.
    ///
    /// A plain `Query` discards what is stored; a transform receives the
    /// stored query and its result is adopted.
    #[must_use]
    pub fn query<'a>(&self, value: impl Into<MaybeCallback<'a, Query>>) -> Self {
        Self {
            url: self.url.clone(),
            query: value.into().resolve(self.query.clone()),
            configuration: self.configuration.clone(),
        }
    }

    #[must_use]
    pub fn query_with(&self, f: impl FnOnce(Query) -> Query) -> Self {
        self.query(MaybeCallback::transform(f))
    }

    /// Pre-configure the requests produced by the terminal verbs. Same
    /// replace-or-transform rule as [`Endpoint::query`].
    #[must_use]
    pub fn configure<'a>(&self, value: impl Into<MaybeCallback<'a, Request>>) -> Self {
        let current = self.configuration.as_deref().cloned().unwrap_or_default();
        Self {
            url: self.url.clone(),
            query: self.query.clone(),
            configuration: Some(Arc::new(value.into().resolve(current))),
        }
    }

    #[must_use]
    pub fn configure_with(&self, f: impl FnOnce(Request) -> Request) -> Self {
        self.configure(MaybeCallback::transform(f))
    }

    /// The path without query parameters.
    pub fn path(&self) -> &str {
        &self.url
    }

    pub fn query_ref(&self) -> &Query {
        &self.query
    }

    /// The full URL: the path, followed by `?` and the query string when
    /// the query is not empty.
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            self.url.clone()
        } else {
            format!("{}?{}", self.url, self.query.get())
        }
    }

    /// A reusable function of `args` that builds on this endpoint.
    pub fn template<A, T, F>(&self, factory: F) -> impl Fn(A) -> T
    where
        F: Fn(&Endpoint, A) -> T,
    {
        let base = self.clone();
        move |args| factory(&base, args)
    }

    /// A request to this endpoint carrying the stored pre-configuration.
    pub fn request(&self) -> Request {
        let detached = Self {
            url: self.url.clone(),
            query: self.query.clone(),
            configuration: None,
        };
        self.configuration
            .as_deref()
            .cloned()
            .unwrap_or_default()
            .endpoint(detached)
    }

    pub fn get(&self) -> Request {
        self.request().method(Method::Get)
    }

    pub fn post<D>(&self, data: D) -> Request<D> {
        self.request().method(Method::Post).data(data)
    }

    pub fn put<D>(&self, data: D) -> Request<D> {
        self.request().method(Method::Put).data(data)
    }

    pub fn patch<D>(&self, data: D) -> Request<D> {
        self.request().method(Method::Patch).data(data)
    }

    pub fn delete(&self) -> Request {
        self.request().method(Method::Delete)
    }
}

impl From<&str> for Endpoint {
    fn from(url: &str) -> Self {
        Endpoint::new(url)
    }
}

impl From<String> for Endpoint {
    fn from(url: String) -> Self {
        Endpoint::new(url)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}
