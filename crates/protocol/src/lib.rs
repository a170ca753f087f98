//! Shared vocabulary between the chat widget and the endpoints it talks to.
//!
//! This crate establishes one protocol for exchanging messages with a
//! remote chat endpoint, so that the widget can switch between a real
//! HTTP backend and a scripted one without touching the core logic.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod endpoint;
mod entry;
mod error;
pub mod iso8601;
mod request;
mod response;

pub use endpoint::*;
pub use entry::*;
pub use error::*;
pub use request::*;
pub use response::*;
