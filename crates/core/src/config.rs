//! Widget configuration.

use std::time::Duration;

/// Welcome messages used when none are configured.
pub const DEFAULT_GREETINGS: [&str; 3] = [
    "Hi there! How can I help you today?",
    "Hello! What can I do for you?",
    "Welcome! Ask me anything.",
];

/// Reply used when the endpoint answers without any usable text.
pub const DEFAULT_FALLBACK_REPLY: &str =
    "Sorry, I could not process your request.";

/// Builder for [`WidgetConfig`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct WidgetConfigBuilder {
    storage_key: Option<String>,
    max_entries: Option<usize>,
    history_context: Option<usize>,
    response_delay: Option<Duration>,
    greetings: Option<Vec<String>>,
    fallback_reply: Option<String>,
}

impl WidgetConfigBuilder {
    /// Creates a builder with every setting at its default.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the key the transcript is stored under.
    #[inline]
    pub fn with_storage_key<S: Into<String>>(mut self, key: S) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    /// Sets the maximum number of entries kept in the transcript.
    #[inline]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    /// Sets how many recent entries are sent along with a message.
    #[inline]
    pub fn with_history_context(mut self, count: usize) -> Self {
        self.history_context = Some(count);
        self
    }

    /// Sets the pause before a message is sent to the endpoint.
    #[inline]
    pub fn with_response_delay(mut self, delay: Duration) -> Self {
        self.response_delay = Some(delay);
        self
    }

    /// Sets the welcome messages, one of which is picked at random
    /// whenever the transcript is reset.
    #[inline]
    pub fn with_greetings<I, S>(mut self, greetings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.greetings = Some(greetings.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the reply used when the endpoint answers without usable text.
    #[inline]
    pub fn with_fallback_reply<S: Into<String>>(mut self, reply: S) -> Self {
        self.fallback_reply = Some(reply.into());
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> WidgetConfig {
        let greetings = self
            .greetings
            .filter(|greetings| !greetings.is_empty())
            .unwrap_or_else(|| {
                DEFAULT_GREETINGS.iter().map(|g| g.to_string()).collect()
            });
        WidgetConfig {
            storage_key: self
                .storage_key
                .unwrap_or_else(|| "chat_widget_history".to_string()),
            // A zero cap would make every append vanish immediately.
            max_entries: self.max_entries.unwrap_or(50).max(1),
            history_context: self.history_context.unwrap_or(5),
            response_delay: self
                .response_delay
                .unwrap_or(Duration::from_millis(500)),
            greetings,
            fallback_reply: self
                .fallback_reply
                .unwrap_or_else(|| DEFAULT_FALLBACK_REPLY.to_string()),
        }
    }
}

/// Configuration for a [`crate::Widget`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WidgetConfig {
    pub(crate) storage_key: String,
    pub(crate) max_entries: usize,
    pub(crate) history_context: usize,
    pub(crate) response_delay: Duration,
    pub(crate) greetings: Vec<String>,
    pub(crate) fallback_reply: String,
}

impl Default for WidgetConfig {
    #[inline]
    fn default() -> Self {
        WidgetConfigBuilder::new().build()
    }
}

impl WidgetConfig {
    /// Returns the key the transcript is stored under.
    #[inline]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Returns the maximum number of entries kept in the transcript.
    #[inline]
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Returns how many recent entries are sent along with a message.
    #[inline]
    pub fn history_context(&self) -> usize {
        self.history_context
    }

    /// Returns the pause before a message is sent to the endpoint.
    #[inline]
    pub fn response_delay(&self) -> Duration {
        self.response_delay
    }

    /// Returns the welcome messages.
    #[inline]
    pub fn greetings(&self) -> &[String] {
        &self.greetings
    }

    /// Returns the reply used when the endpoint answers without usable
    /// text.
    #[inline]
    pub fn fallback_reply(&self) -> &str {
        &self.fallback_reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WidgetConfig::default();
        assert_eq!(config.storage_key(), "chat_widget_history");
        assert_eq!(config.max_entries(), 50);
        assert_eq!(config.history_context(), 5);
        assert_eq!(config.response_delay(), Duration::from_millis(500));
        assert_eq!(config.greetings().len(), DEFAULT_GREETINGS.len());
        assert_eq!(config.fallback_reply(), DEFAULT_FALLBACK_REPLY);
    }

    #[test]
    fn test_empty_greetings_fall_back() {
        let config = WidgetConfigBuilder::new()
            .with_greetings(Vec::<String>::new())
            .with_max_entries(0)
            .build();
        assert_eq!(config.greetings(), DEFAULT_GREETINGS);
        assert_eq!(config.max_entries(), 1);
    }
}
