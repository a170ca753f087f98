use chat_widget_protocol::ErrorKind;
use serde::{Deserialize, Serialize};

/// How the endpoint answers one request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetReply {
    /// A successful answer with the given reply text.
    #[serde(rename = "reply")]
    Reply(String),
    /// A successful answer with no accepted reply field.
    #[serde(rename = "empty")]
    Empty,
    /// A failed exchange of the given kind.
    #[serde(rename = "failure")]
    Failure(ErrorKind),
}

impl PresetReply {
    /// Creates a `PresetReply::Reply` from anything string-like.
    #[inline]
    pub fn reply<S: Into<String>>(text: S) -> Self {
        Self::Reply(text.into())
    }
}
