//! One round trip with the endpoint, from a user message to a bot entry.

use chat_widget_protocol::ErrorKind;

use crate::endpoint_client::SendRequestResult;

/// Whether an exchange is currently in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExchangeState {
    /// Ready to send.
    #[default]
    Idle,
    /// A message has been sent and its answer has not arrived yet. Further
    /// sends are dropped until the exchange completes.
    AwaitingResponse,
}

/// What happened to a send attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SendOutcome {
    /// The message was sent and an answer (or an error notice) has been
    /// appended to the transcript.
    Completed,
    /// The message was blank, or another exchange was in flight. Nothing
    /// was recorded or sent.
    Ignored,
}

/// Returns the notice shown to the user when an exchange fails.
pub fn failure_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Connectivity => {
            "I can't reach the server right now. Please check your \
             internet connection and try again."
        }
        ErrorKind::ServerError => {
            "The server ran into a problem. Please try again in a few \
             moments."
        }
        ErrorKind::NotFound => {
            "The chat service could not be found. Please try again later."
        }
        ErrorKind::Other => "Sorry, something went wrong. Please try again.",
    }
}

/// Maps the outcome of a request onto the text of the bot entry.
pub(crate) fn reply_text(result: SendRequestResult, fallback: &str) -> String {
    match result {
        Ok(resp) => resp.reply.unwrap_or_else(|| fallback.to_owned()),
        Err(err) => {
            debug!("exchange failed ({}): {err}", err.kind());
            failure_message(err.kind()).to_owned()
        }
    }
}
