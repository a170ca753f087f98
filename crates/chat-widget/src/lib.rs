//! An out-of-the-box chat widget talking to an HTTP endpoint and keeping
//! its transcript on disk.
//!
//! The crate includes a terminal front-end. You can also use it as a
//! library to bring the widget into your own host apps.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

mod session;

pub use session::{Session, SessionBuilder, SessionError};

/// Re-exports of [`chat_widget_core`] crate.
pub mod core {
    pub use chat_widget_core::*;
}

/// Re-exports of [`chat_widget_protocol`] crate.
pub mod protocol {
    pub use chat_widget_protocol::*;
}
