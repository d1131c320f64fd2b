//! The seam between resolved requests and whatever performs the I/O.

use std::future::Future;

use futures::stream::{self, BoxStream, Stream, StreamExt};

use crate::http::{HttpRequest, HttpResponse};
use crate::request::Request;

/// Executes plain-data HTTP requests.
///
/// Implementors own sockets, timeouts and cancellation. Errors are passed
/// through to the caller untouched, boxed inside `ApiError::Transport`.
pub trait HttpTransport: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send;
}

pub type RequestStream<D = serde_json::Value> = BoxStream<'static, Request<D>>;

/// A request that is already available, or an asynchronous producer of
/// requests.
pub enum RequestSource<D = serde_json::Value> {
    Ready(Request<D>),
    Stream(RequestStream<D>),
}

impl<D: Send + 'static> RequestSource<D> {
    pub fn from_stream(requests: impl Stream<Item = Request<D>> + Send + 'static) -> Self {
        RequestSource::Stream(requests.boxed())
    }

    /// Normalize to a single stream of requests.
    pub fn into_stream(self) -> RequestStream<D> {
        match self {
            RequestSource::Ready(request) => stream::iter([request]).boxed(),
            RequestSource::Stream(requests) => requests,
        }
    }
}

impl<D> From<Request<D>> for RequestSource<D> {
    fn from(request: Request<D>) -> Self {
        RequestSource::Ready(request)
    }
}

impl<D> From<RequestStream<D>> for RequestSource<D> {
    fn from(requests: RequestStream<D>) -> Self {
        RequestSource::Stream(requests)
    }
}
