use std::path::PathBuf;

use chat_widget_core::{
    FileStorage, SendOutcome, Transcript, Widget, WidgetBuilder, WidgetConfig,
};
use chat_widget_http::{HttpEndpoint, HttpEndpointConfigBuilder};
use chat_widget_protocol::MessageEntry;

type EntryCallback = Box<dyn Fn(&MessageEntry) + Send + Sync>;
type TypingCallback = Box<dyn Fn(bool) + Send + Sync>;

/// Errors that can occur while building a [`Session`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No storage directory was given and the platform has no data
    /// directory either.
    #[error("no data directory available, set a storage directory explicitly")]
    NoDataDir,
}

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    endpoint: HttpEndpointConfigBuilder,
    storage_dir: Option<PathBuf>,
    config: WidgetConfig,
    on_entry: Option<EntryCallback>,
    on_typing: Option<TypingCallback>,
}

impl SessionBuilder {
    /// Creates a session builder posting messages to `url`.
    pub fn with_endpoint_url<S: Into<String>>(url: S) -> Self {
        Self {
            endpoint: HttpEndpointConfigBuilder::with_url(url),
            storage_dir: None,
            config: WidgetConfig::default(),
            on_entry: None,
            on_typing: None,
        }
    }

    /// Sets the response fields that may carry the reply text, in
    /// priority order.
    #[inline]
    pub fn with_reply_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoint = self.endpoint.with_reply_fields(fields);
        self
    }

    /// Sets the directory the transcript is stored in. Defaults to a
    /// `chat-widget` directory inside the platform data directory.
    #[inline]
    pub fn with_storage_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    /// Replaces the default widget configuration.
    #[inline]
    pub fn with_config(mut self, config: WidgetConfig) -> Self {
        self.config = config;
        self
    }

    /// Attaches a callback to be invoked whenever an entry is appended.
    #[inline]
    pub fn on_entry(
        mut self,
        on_entry: impl Fn(&MessageEntry) + Send + Sync + 'static,
    ) -> Self {
        self.on_entry = Some(Box::new(on_entry));
        self
    }

    /// Attaches a callback to be invoked when the typing indicator is shown
    /// or hidden.
    #[inline]
    pub fn on_typing(
        mut self,
        on_typing: impl Fn(bool) + Send + Sync + 'static,
    ) -> Self {
        self.on_typing = Some(Box::new(on_typing));
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Result<Session, SessionError> {
        let storage_dir = match self.storage_dir {
            Some(dir) => dir,
            None => dirs::data_dir()
                .ok_or(SessionError::NoDataDir)?
                .join("chat-widget"),
        };
        debug!("storing transcript in {}", storage_dir.display());

        let endpoint = HttpEndpoint::new(self.endpoint.build());
        let mut widget_builder = WidgetBuilder::with_endpoint(
            endpoint.clone(),
            FileStorage::new(storage_dir),
        )
        .with_config(self.config);
        if let Some(on_entry) = self.on_entry {
            widget_builder = widget_builder.on_entry(on_entry);
        }
        if let Some(on_typing) = self.on_typing {
            widget_builder = widget_builder.on_typing(on_typing);
        }

        Ok(Session {
            widget: widget_builder.build(),
            endpoint,
        })
    }
}

/// A chat session, like a panel that displays messages and has an input
/// box.
///
/// The session holds a fully configured widget that you can use directly,
/// and it is basically a wrapper around [`Widget`].
pub struct Session {
    widget: Widget,
    endpoint: HttpEndpoint,
}

impl Session {
    /// Sends a message and waits for the answer to be recorded.
    #[inline]
    pub async fn send_message(&self, message: &str) -> SendOutcome {
        self.widget.send_message(message).await
    }

    /// Resets the transcript to a single welcome entry.
    #[inline]
    pub fn clear_history(&self) -> MessageEntry {
        self.widget.clear_history()
    }

    /// Returns a snapshot of the transcript.
    #[inline]
    pub fn history(&self) -> Transcript {
        self.widget.history()
    }

    /// Points the session at another URL, keeping every other endpoint
    /// setting.
    pub fn set_endpoint_url<S: Into<String>>(&mut self, url: S) {
        self.endpoint = self.endpoint.with_url(url);
        self.widget.set_endpoint(self.endpoint.clone());
        info!("endpoint set to {}", self.endpoint.config().url());
    }

    /// Returns the URL messages are posted to.
    #[inline]
    pub fn endpoint_url(&self) -> &str {
        self.endpoint.config().url()
    }

    /// Returns the underlying widget.
    #[inline]
    pub fn widget(&self) -> &Widget {
        &self.widget
    }
}
