//! Executes built requests through an `HttpTransport` and decodes the
//! response bodies.
//!
//! # Design
//! `Client` holds only a shared transport and carries no mutable state
//! between calls. A request is resolved with
//! `get_with(HttpRequest::from_configuration)`, sent, status-checked and its
//! body decoded according to the request's response type. Requests coming
//! from a stream are executed one after another, in order.

use std::sync::Arc;

use futures::stream::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::blueprint::Blueprint;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::request::Request;
use crate::transport::{HttpTransport, RequestSource, RequestStream};

/// Fetches resources described by `Request` builders.
#[derive(Debug)]
pub struct Client<T> {
    transport: Arc<T>,
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: HttpTransport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self::from_shared(Arc::new(transport))
    }

    pub fn from_shared(transport: Arc<T>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a raw request and return the response if its status is 2xx.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        dispatch(self.transport.as_ref(), request).await
    }

    /// Fetch a single request and decode its body as `R`.
    pub async fn fetch<R, D>(&self, request: &Request<D>) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        D: Serialize + Clone,
    {
        fetch_request(self.transport.as_ref(), request).await
    }

    /// Fetch every request produced by `source`, in order.
    pub fn fetch_all<R, D>(
        &self,
        source: impl Into<RequestSource<D>>,
    ) -> impl Stream<Item = Result<R, ApiError>> + Send + 'static
    where
        T: 'static,
        R: DeserializeOwned + Send + 'static,
        D: Serialize + Clone + Send + Sync + 'static,
    {
        let transport = Arc::clone(&self.transport);
        source.into().into_stream().then(move |request| {
            let transport = Arc::clone(&transport);
            async move { fetch_request(transport.as_ref(), &request).await }
        })
    }

    /// A reusable request template: `factory` receives the stored request as
    /// a stream plus the call arguments and returns the requests to fetch.
    pub fn blueprint<D, A, S, F>(&self, request: Request<D>, factory: F) -> Blueprint<T, D, F>
    where
        F: Fn(RequestStream<D>, A) -> S,
        S: Stream,
    {
        Blueprint::new(self.clone(), request, factory)
    }
}

async fn fetch_request<T, R, D>(transport: &T, request: &Request<D>) -> Result<R, ApiError>
where
    T: HttpTransport,
    R: DeserializeOwned,
    D: Serialize + Clone,
{
    let request = request.get_with(HttpRequest::from_configuration)?;
    let response_type = request.response_type;
    let response = dispatch(transport, request).await?;
    response.into_body(response_type)?.into_resource()
}

async fn dispatch<T: HttpTransport>(
    transport: &T,
    request: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    debug!(method = %request.method, url = %request.url, "dispatching request");
    let response = transport
        .send(request)
        .await
        .map_err(|e| ApiError::Transport(Box::new(e)))?;
    debug!(status = response.status, "received response");
    check_status(response)
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }
    warn!(status = response.status, "request failed");
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: String::from_utf8_lossy(&response.body).into_owned(),
    })
}
