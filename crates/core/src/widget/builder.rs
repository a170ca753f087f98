use chat_widget_protocol::{Endpoint, MessageEntry};

use super::{EntryCallback, FlagCallback, Widget};
use crate::config::WidgetConfig;
use crate::endpoint_client::EndpointClient;
use crate::storage::Storage;
use crate::transcript::TranscriptStore;

/// [`Widget`] builder.
pub struct WidgetBuilder {
    endpoint: EndpointClient,
    storage: Box<dyn Storage>,
    config: WidgetConfig,
    on_entry: Option<EntryCallback>,
    on_typing: Option<FlagCallback>,
    on_toggle: Option<FlagCallback>,
}

impl WidgetBuilder {
    /// Creates a new builder with the specified endpoint and storage.
    #[inline]
    pub fn with_endpoint<E: Endpoint + 'static, S: Storage>(
        endpoint: E,
        storage: S,
    ) -> Self {
        Self {
            endpoint: EndpointClient::new(endpoint),
            storage: Box::new(storage),
            config: WidgetConfig::default(),
            on_entry: None,
            on_typing: None,
            on_toggle: None,
        }
    }

    /// Replaces the default configuration.
    #[inline]
    pub fn with_config(mut self, config: WidgetConfig) -> Self {
        self.config = config;
        self
    }

    /// Attaches a callback to be invoked whenever an entry is appended.
    ///
    /// Entries restored from the storage when the widget is built are not
    /// reported, read them with [`Widget::history`].
    #[inline]
    pub fn on_entry(
        mut self,
        on_entry: impl Fn(&MessageEntry) + Send + Sync + 'static,
    ) -> Self {
        self.on_entry = Some(Box::new(on_entry));
        self
    }

    /// Attaches a callback to be invoked when the typing indicator is
    /// shown (`true`) or hidden (`false`).
    #[inline]
    pub fn on_typing(
        mut self,
        on_typing: impl Fn(bool) + Send + Sync + 'static,
    ) -> Self {
        self.on_typing = Some(Box::new(on_typing));
        self
    }

    /// Attaches a callback to be invoked when the panel opens or closes.
    #[inline]
    pub fn on_toggle(
        mut self,
        on_toggle: impl Fn(bool) + Send + Sync + 'static,
    ) -> Self {
        self.on_toggle = Some(Box::new(on_toggle));
        self
    }

    /// Builds the widget, restoring the transcript from the storage.
    ///
    /// An empty transcript is seeded with a welcome entry.
    pub fn build(self) -> Widget {
        let Self {
            endpoint,
            storage,
            config,
            on_entry,
            on_typing,
            on_toggle,
        } = self;

        let mut store = TranscriptStore::open(storage, &config);
        if store.transcript().is_empty() {
            store.clear();
        }
        Widget::from_parts(
            store, endpoint, config, on_entry, on_typing, on_toggle,
        )
    }
}
