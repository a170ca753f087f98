use std::pin::Pin;
use std::sync::Arc;

use chat_widget_protocol::{
    Endpoint, EndpointError, ExchangeRequest, ExchangeResponse,
};
use tracing::Instrument;

pub(crate) type SendRequestResult =
    Result<ExchangeResponse, Box<dyn EndpointError>>;
type BoxedSendRequestFuture =
    Pin<Box<dyn Future<Output = SendRequestResult> + Send>>;
type HandlerFn =
    Arc<dyn Fn(ExchangeRequest) -> BoxedSendRequestFuture + Send + Sync>;

/// A wrapper around an endpoint that provides a type-erased interface for
/// the other modules, so the endpoint can be swapped at runtime.
#[derive(Clone)]
pub struct EndpointClient {
    handler_fn: HandlerFn,
}

impl EndpointClient {
    #[inline]
    pub fn new<E: Endpoint + 'static>(endpoint: E) -> Self {
        // We have to erase the type `E`, since `EndpointClient` doesn't have
        // a generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            let fut = endpoint.send_request(&req);
            Box::pin(
                async move {
                    trace!("got a request: {:?}", req);
                    match fut.await {
                        Ok(resp) => {
                            trace!("got a response: {resp:?}");
                            Ok(resp)
                        }
                        Err(err) => {
                            error!("got an error: {err:?}");
                            Err(Box::new(err) as Box<dyn EndpointError>)
                        }
                    }
                }
                .instrument(trace_span!("endpoint req")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a request and waits for the answer.
    #[inline]
    pub async fn send_request(
        &self,
        req: ExchangeRequest,
    ) -> SendRequestResult {
        (self.handler_fn)(req).await
    }
}
