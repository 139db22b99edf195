//! Notification sinks for inbound message delivery.
//!
//! A [`Notifier`] receives a topic (the message service name) and an encoded
//! payload. [`HttpNotifier`] POSTs it to every configured webhook URL,
//! [`ChannelNotifier`] hands it to an in-process consumer and
//! [`NoopNotifier`] drops it.

pub mod channel;
pub mod error;
pub mod http;
pub mod notifier;

pub use {
    channel::{ChannelNotifier, Notification},
    error::{Error, Result},
    http::{DEFAULT_TIMEOUT, HttpNotifier},
    notifier::{NoopNotifier, Notifier},
};
