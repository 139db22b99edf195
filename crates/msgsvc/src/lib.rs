//! Criteria-based message services.
//!
//! A message service registers a name plus selection criteria (a message
//! type, a set of purposes, or both). For every inbound message the registry
//! asks each service whether it accepts the header, and the first one that
//! does packages the message into an [`InboundEnvelope`] and hands it to its
//! [`Notifier`](msgrelay_webhook::Notifier) under the service name.
//!
//! Matching policy (see [`Criteria::accept`]):
//! 1. No type and no purpose: reject everything
//! 2. Type and purpose: type must match and purposes must intersect
//! 3. Purpose only: purposes must intersect
//! 4. Type only: type must match

pub mod criteria;
pub mod envelope;
pub mod error;
pub mod registry;
pub mod service;

pub use {
    criteria::{Criteria, ServiceParams},
    envelope::InboundEnvelope,
    error::{Error, Result},
    registry::MessageServiceRegistry,
    service::{MessageHandler, MessageService},
};
