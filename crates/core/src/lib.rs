//! Core logic of the chat widget: the transcript, its durable storage, and
//! the exchange of messages with an endpoint.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod config;
mod endpoint_client;
mod exchange;
pub mod storage;
pub mod transcript;
mod widget;

pub use config::{WidgetConfig, WidgetConfigBuilder};
pub use exchange::{ExchangeState, SendOutcome, failure_message};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use transcript::{Transcript, TranscriptStore};
pub use widget::{Widget, WidgetBuilder};
