//! HTTP gateway for msgrelay.
//!
//! Exposes the message service registry over REST:
//! - `POST /message/register-service`
//! - `POST /message/unregister-service`
//! - `GET  /message/services`
//! - `POST /message/inbound`

pub mod message_routes;
#[cfg(feature = "metrics")]
pub mod metrics_middleware;
pub mod server;
pub mod state;
