use std::sync::Arc;

use {
    msgrelay_common::{InboundMessage, MessageHeader},
    tracing::{debug, info},
};

#[cfg(feature = "metrics")]
use msgrelay_metrics::{counter, gauge, labels, msgsvc as svc_metrics};

use crate::{Error, MessageHandler, Result};

/// Registered message services, kept in registration order.
///
/// Routing is first-match: the earliest registered service whose criteria
/// accept a header handles the message, later ones are never consulted.
#[derive(Default)]
pub struct MessageServiceRegistry {
    services: Vec<Arc<dyn MessageHandler>>,
}

impl MessageServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a service. Names must be non-empty and unique.
    pub fn register(&mut self, service: Arc<dyn MessageHandler>) -> Result<()> {
        let name = service.name();
        if name.trim().is_empty() {
            return Err(Error::invalid_params("service name is required"));
        }
        if self.get(name).is_some() {
            return Err(Error::AlreadyRegistered {
                name: name.to_string(),
            });
        }

        info!(service = name, "message service registered");
        self.services.push(service);
        #[cfg(feature = "metrics")]
        gauge!(svc_metrics::REGISTERED).set(self.services.len() as f64);
        Ok(())
    }

    /// Remove a service by name.
    pub fn unregister(&mut self, name: &str) -> Result<()> {
        let before = self.services.len();
        self.services.retain(|s| s.name() != name);
        if self.services.len() == before {
            return Err(Error::NotRegistered {
                name: name.to_string(),
            });
        }

        info!(service = name, "message service unregistered");
        #[cfg(feature = "metrics")]
        gauge!(svc_metrics::REGISTERED).set(self.services.len() as f64);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn MessageHandler>> {
        self.services.iter().find(|s| s.name() == name).cloned()
    }

    /// Names of all registered services, in registration order.
    pub fn services(&self) -> Vec<String> {
        self.services.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// First registered service that accepts `header`.
    pub fn find(&self, header: &MessageHeader) -> Option<Arc<dyn MessageHandler>> {
        let found = self.services.iter().find(|s| s.accept(header)).cloned();
        if found.is_none() {
            debug!(
                msg_type = header.message_type().unwrap_or(""),
                purpose = ?header.purpose,
                "no message service accepts header"
            );
        }
        found
    }

    /// Route an inbound message to the first accepting service.
    pub async fn dispatch(
        &self,
        message: &InboundMessage,
        sender_did: &str,
        recipient_did: &str,
    ) -> Result<String> {
        let Some(service) = self.find(message.header()) else {
            return Err(Self::unrouted(message.header()));
        };
        Self::deliver(&service, message, sender_did, recipient_did).await
    }

    /// Error for a header no registered service accepts. Counts the message
    /// as unrouted.
    pub fn unrouted(header: &MessageHeader) -> Error {
        #[cfg(feature = "metrics")]
        counter!(svc_metrics::UNROUTED_TOTAL).increment(1);
        Error::NoHandler {
            msg_type: header.message_type().unwrap_or("").to_string(),
        }
    }

    /// Hand a message to a service picked by [`find`](Self::find).
    ///
    /// Callers that hold the registry behind a lock can release it before
    /// awaiting this.
    pub async fn deliver(
        service: &Arc<dyn MessageHandler>,
        message: &InboundMessage,
        sender_did: &str,
        recipient_did: &str,
    ) -> Result<String> {
        let result = service
            .handle_inbound(message, sender_did, recipient_did)
            .await;
        #[cfg(feature = "metrics")]
        if let Err(ref e) = result {
            counter!(
                svc_metrics::DISPATCH_ERRORS_TOTAL,
                labels::SERVICE => service.name().to_string(),
                labels::ERROR_TYPE => e.kind()
            )
            .increment(1);
        }
        result
    }
}
