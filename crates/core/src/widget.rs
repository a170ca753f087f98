mod builder;
#[cfg(test)]
mod tests;

use std::sync::{Arc, Mutex, MutexGuard};

use chat_widget_protocol::{
    Endpoint, ExchangeRequest, MessageEntry, Sender, iso8601,
};
use tokio::time::sleep;

pub use builder::WidgetBuilder;

use crate::config::WidgetConfig;
use crate::endpoint_client::EndpointClient;
use crate::exchange::{self, ExchangeState, SendOutcome};
use crate::transcript::{Transcript, TranscriptStore};

type EntryCallback = Box<dyn Fn(&MessageEntry) + Send + Sync>;
type FlagCallback = Box<dyn Fn(bool) + Send + Sync>;

/// A chat widget instance: a transcript, an endpoint, and the state of
/// the panel around them.
///
/// `Widget` is a handle, clones refer to the same instance. At most one
/// exchange is in flight at a time; a send attempted meanwhile is dropped,
/// not queued. Failures of the endpoint or of the storage never surface as
/// errors, they end up as transcript content or log records.
#[derive(Clone)]
pub struct Widget {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<WidgetState>,
    config: WidgetConfig,
    on_entry: Option<EntryCallback>,
    on_typing: Option<FlagCallback>,
    on_toggle: Option<FlagCallback>,
}

struct WidgetState {
    store: TranscriptStore,
    endpoint: EndpointClient,
    exchange_state: ExchangeState,
    typing: bool,
    open: bool,
    input: String,
}

impl Widget {
    /// Appends a user entry without sending it anywhere.
    pub fn append_user_message<S: Into<String>>(
        &self,
        text: S,
    ) -> MessageEntry {
        let entry = self.lock().store.append(text, Sender::User);
        self.notify_entry(&entry);
        entry
    }

    /// Sends a message to the endpoint and records the answer.
    ///
    /// Resolves once the exchange has completed. A blank message, or one
    /// sent while another exchange is in flight, is ignored.
    ///
    /// An accepted exchange runs on its own task: dropping the returned
    /// future does not cancel it, the reply is still recorded.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let Some(started) = self.start_exchange(|_| text.trim().to_owned())
        else {
            return SendOutcome::Ignored;
        };
        self.spawn_exchange(started).await
    }

    /// Replaces the pending input text.
    pub fn set_input<S: Into<String>>(&self, text: S) {
        self.lock().input = text.into();
    }

    /// Returns the pending input text.
    pub fn input(&self) -> String {
        self.lock().input.clone()
    }

    /// Sends the pending input text, see [`Widget::send_message`].
    ///
    /// The input is cleared only if the send is accepted.
    pub async fn send_current_input(&self) -> SendOutcome {
        let Some(started) = self.start_exchange(|state| {
            let text = state.input.trim().to_owned();
            if !text.is_empty() {
                state.input.clear();
            }
            text
        }) else {
            return SendOutcome::Ignored;
        };
        self.spawn_exchange(started).await
    }

    /// Resets the transcript to a single welcome entry, which is returned.
    pub fn clear_history(&self) -> MessageEntry {
        let entry = self.lock().store.clear();
        debug!("history cleared");
        self.notify_entry(&entry);
        entry
    }

    /// Returns a snapshot of the transcript.
    pub fn history(&self) -> Transcript {
        self.lock().store.export()
    }

    /// Replaces the endpoint. An exchange already talking to the previous
    /// endpoint is not affected.
    pub fn set_endpoint<E: Endpoint + 'static>(&self, endpoint: E) {
        self.lock().endpoint = EndpointClient::new(endpoint);
    }

    /// Returns whether an exchange is in flight.
    #[inline]
    pub fn exchange_state(&self) -> ExchangeState {
        self.lock().exchange_state
    }

    /// Returns whether the typing indicator is shown.
    #[inline]
    pub fn is_typing(&self) -> bool {
        self.lock().typing
    }

    /// Returns whether the panel is open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    /// Opens the panel.
    pub fn open(&self) {
        self.set_open(|_| true);
    }

    /// Closes the panel.
    pub fn close(&self) {
        self.set_open(|_| false);
    }

    /// Flips the panel and returns whether it is now open.
    pub fn toggle(&self) -> bool {
        self.set_open(|open| !open)
    }

    /// Returns the configuration of this widget.
    #[inline]
    pub fn config(&self) -> &WidgetConfig {
        &self.inner.config
    }
}

struct StartedExchange {
    guard: ExchangeGuard,
    request: ExchangeRequest,
}

/// Returns the widget to idle when dropped, whichever way the exchange
/// ends.
struct ExchangeGuard {
    widget: Widget,
}

impl Drop for ExchangeGuard {
    fn drop(&mut self) {
        let Ok(mut state) = self.widget.inner.state.lock() else {
            return;
        };
        state.exchange_state = ExchangeState::Idle;
        state.typing = false;
        drop(state);
        trace!("exchange finished");

        if let Some(on_typing) = &self.widget.inner.on_typing {
            on_typing(false);
        }
    }
}

impl Widget {
    fn from_parts(
        store: TranscriptStore,
        endpoint: EndpointClient,
        config: WidgetConfig,
        on_entry: Option<EntryCallback>,
        on_typing: Option<FlagCallback>,
        on_toggle: Option<FlagCallback>,
    ) -> Self {
        let state = WidgetState {
            store,
            endpoint,
            exchange_state: Default::default(),
            typing: false,
            open: false,
            input: Default::default(),
        };
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                config,
                on_entry,
                on_typing,
                on_toggle,
            }),
        }
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, WidgetState> {
        self.inner.state.lock().expect("widget state is poisoned")
    }

    /// Records the user entry and moves to `AwaitingResponse`, or returns
    /// `None` if the send must be ignored.
    fn start_exchange(
        &self,
        take_text: impl FnOnce(&mut WidgetState) -> String,
    ) -> Option<StartedExchange> {
        let (entry, request) = {
            let mut state = self.lock();
            if state.exchange_state != ExchangeState::Idle {
                return None;
            }
            let text = take_text(&mut state);
            if text.is_empty() {
                return None;
            }

            let entry = state.store.append(text.clone(), Sender::User);
            state.exchange_state = ExchangeState::AwaitingResponse;
            state.typing = true;

            let history = state
                .store
                .transcript()
                .recent(self.inner.config.history_context)
                .to_vec();
            let request = ExchangeRequest {
                message: text,
                timestamp: iso8601::now(),
                history,
            };
            (entry, request)
        };
        let guard = ExchangeGuard {
            widget: self.clone(),
        };
        trace!("exchange started");

        self.notify_entry(&entry);
        if let Some(on_typing) = &self.inner.on_typing {
            on_typing(true);
        }
        Some(StartedExchange { guard, request })
    }

    async fn spawn_exchange(&self, started: StartedExchange) -> SendOutcome {
        let widget = self.clone();
        let handle = tokio::spawn(async move {
            widget.complete_exchange(started).await
        });
        match handle.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_panic() => {
                std::panic::resume_unwind(err.into_panic())
            }
            Err(err) => {
                warn!("exchange task did not finish: {err}");
                SendOutcome::Completed
            }
        }
    }

    async fn complete_exchange(&self, started: StartedExchange) -> SendOutcome {
        let StartedExchange { guard, request } = started;

        sleep(self.inner.config.response_delay).await;

        let endpoint = self.lock().endpoint.clone();
        let result = endpoint.send_request(request).await;
        let text =
            exchange::reply_text(result, &self.inner.config.fallback_reply);

        let entry = self.lock().store.append(text, Sender::Bot);
        self.notify_entry(&entry);

        drop(guard);
        SendOutcome::Completed
    }

    fn set_open(&self, f: impl FnOnce(bool) -> bool) -> bool {
        let (open, changed) = {
            let mut state = self.lock();
            let open = f(state.open);
            let changed = open != state.open;
            state.open = open;
            (open, changed)
        };
        if let Some(on_toggle) = &self.inner.on_toggle {
            if changed {
                on_toggle(open);
            }
        }
        open
    }

    #[inline]
    fn notify_entry(&self, entry: &MessageEntry) {
        if let Some(on_entry) = &self.inner.on_entry {
            on_entry(entry);
        }
    }
}
