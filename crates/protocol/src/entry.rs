use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a transcript entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sender {
    /// The person typing into the widget.
    User,
    /// The remote endpoint, or the widget speaking on its behalf
    /// (greetings and error notices).
    Bot,
}

/// One record of the transcript.
///
/// Entries are immutable once created. The serialized form is
/// `{"message": .., "isUser": .., "timestamp": ..}`, which is shared by
/// the durable storage and the request history.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageEntry {
    #[serde(rename = "message")]
    text: String,
    #[serde(rename = "isUser", with = "sender_flag")]
    sender: Sender,
    #[serde(with = "crate::iso8601")]
    timestamp: DateTime<Utc>,
}

impl MessageEntry {
    /// Creates a new entry stamped with the current time.
    #[inline]
    pub fn new<S: Into<String>>(text: S, sender: Sender) -> Self {
        Self::with_timestamp(text, sender, crate::iso8601::now())
    }

    /// Creates a new entry with an explicit timestamp.
    #[inline]
    pub fn with_timestamp<S: Into<String>>(
        text: S,
        sender: Sender,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            text: text.into(),
            sender,
            timestamp,
        }
    }

    /// Returns the text of this entry.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the author of this entry.
    #[inline]
    pub fn sender(&self) -> Sender {
        self.sender
    }

    /// Returns whether this entry was written by the user.
    #[inline]
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    /// Returns when this entry was created.
    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

mod sender_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Sender;

    pub fn serialize<S: Serializer>(
        sender: &Sender,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(*sender == Sender::User)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Sender, D::Error> {
        let is_user = bool::deserialize(deserializer)?;
        Ok(if is_user { Sender::User } else { Sender::Bot })
    }
}
