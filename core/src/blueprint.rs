//! Parameterized, reusable request templates bound to a client.

use futures::stream::Stream;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::Client;
use crate::error::ApiError;
use crate::request::Request;
use crate::transport::{HttpTransport, RequestSource, RequestStream};

/// A stored request plus a factory that derives concrete requests from
/// call arguments.
///
/// Calling the blueprint feeds the stored request, as a one-item stream,
/// into the factory together with the arguments, then fetches whatever the
/// factory yields.
pub struct Blueprint<T, D, F> {
    client: Client<T>,
    request: Request<D>,
    factory: F,
}

impl<T, D, F> Blueprint<T, D, F> {
    pub(crate) fn new(client: Client<T>, request: Request<D>, factory: F) -> Self {
        Self {
            client,
            request,
            factory,
        }
    }

    pub fn request(&self) -> &Request<D> {
        &self.request
    }
}

impl<T, D, F> Blueprint<T, D, F>
where
    T: HttpTransport + 'static,
    D: Clone + Send + 'static,
{
    pub fn call<A, S, E, R>(&self, args: A) -> impl Stream<Item = Result<R, ApiError>> + Send + 'static
    where
        F: Fn(RequestStream<D>, A) -> S,
        S: Stream<Item = Request<E>> + Send + 'static,
        E: Serialize + Clone + Send + Sync + 'static,
        R: DeserializeOwned + Send + 'static,
    {
        let stored = RequestSource::from(self.request.clone()).into_stream();
        let requests = (self.factory)(stored, args);
        self.client.fetch_all(RequestSource::from_stream(requests))
    }
}
