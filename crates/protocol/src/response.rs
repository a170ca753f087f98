/// A successful answer from the endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ExchangeResponse {
    /// The reply text, or `None` if the endpoint answered successfully but
    /// did not populate any field the widget accepts.
    pub reply: Option<String>,
}

impl ExchangeResponse {
    /// Creates a response carrying the given reply text.
    #[inline]
    pub fn with_reply<S: Into<String>>(reply: S) -> Self {
        Self {
            reply: Some(reply.into()),
        }
    }
}
