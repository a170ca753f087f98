use std::error::Error;

use crate::error::ErrorKind;
use crate::request::ExchangeRequest;
use crate::response::ExchangeResponse;

/// The error type for an endpoint.
pub trait EndpointError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A remote party that answers chat messages.
///
/// Once the endpoint is created, it should behave like a stateless object.
/// It can still have internal state, but callers should not rely on it,
/// and the endpoint should be prepared for being dropped anytime.
pub trait Endpoint: Send + Sync {
    /// The error type that may be returned by the endpoint.
    type Error: EndpointError;

    /// Sends one message to the endpoint.
    ///
    /// The returned future must be fully independent of `self`. Exactly one
    /// outbound request is issued per call; implementations must not retry.
    fn send_request(
        &self,
        req: &ExchangeRequest,
    ) -> impl Future<Output = Result<ExchangeResponse, Self::Error>> + Send + 'static;
}
