use chrono::{DateTime, Utc};

use crate::MessageEntry;

/// A request to be sent to the endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExchangeRequest {
    /// The text the user just sent.
    pub message: String,
    /// When the request was built.
    pub timestamp: DateTime<Utc>,
    /// The most recent transcript entries, oldest first. This includes
    /// the user entry for `message` itself.
    pub history: Vec<MessageEntry>,
}
