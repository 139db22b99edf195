use std::sync::Arc;

use {
    async_trait::async_trait,
    msgrelay_common::{InboundMessage, MessageHeader},
    msgrelay_webhook::Notifier,
    tracing::{debug, info, warn},
};

#[cfg(feature = "metrics")]
use msgrelay_metrics::{counter, labels, msgsvc as svc_metrics};

use crate::{Criteria, Error, InboundEnvelope, Result, ServiceParams};

/// A registered receiver of inbound messages.
///
/// `accept` is a pure predicate over the header. `handle_inbound` delivers an
/// accepted message and returns a reply message id, or an empty string when
/// the service does not reply.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    fn name(&self) -> &str;

    fn accept(&self, header: &MessageHeader) -> bool;

    async fn handle_inbound(
        &self,
        message: &InboundMessage,
        sender_did: &str,
        recipient_did: &str,
    ) -> Result<String>;
}

/// Message service that forwards accepted messages to a notifier, using its
/// name as the topic.
pub struct MessageService {
    params: ServiceParams,
    criteria: Criteria,
    notifier: Arc<dyn Notifier>,
}

impl MessageService {
    pub fn new(params: ServiceParams, notifier: Arc<dyn Notifier>) -> Self {
        let criteria = Criteria::from(&params);
        Self {
            params,
            criteria,
            notifier,
        }
    }

    pub fn params(&self) -> &ServiceParams {
        &self.params
    }

    fn topic(&self) -> Result<&str> {
        if self.params.name.trim().is_empty() {
            return Err(Error::TopicNotFound);
        }
        Ok(&self.params.name)
    }
}

impl std::fmt::Debug for MessageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageService")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MessageHandler for MessageService {
    fn name(&self) -> &str {
        &self.params.name
    }

    fn accept(&self, header: &MessageHeader) -> bool {
        let accepted = self.criteria.accept(header);
        debug!(
            service = %self.params.name,
            msg_type = header.message_type().unwrap_or(""),
            accepted,
            "message service criteria check"
        );
        accepted
    }

    async fn handle_inbound(
        &self,
        message: &InboundMessage,
        sender_did: &str,
        recipient_did: &str,
    ) -> Result<String> {
        let topic = self.topic()?;

        let payload = InboundEnvelope::new(message.clone(), sender_did, recipient_did).to_bytes()?;

        #[cfg(feature = "metrics")]
        counter!(svc_metrics::DISPATCH_TOTAL, labels::SERVICE => topic.to_string()).increment(1);

        if let Err(source) = self.notifier.notify(topic, &payload).await {
            warn!(topic, error = %source, "inbound message delivery failed");
            return Err(Error::delivery_failed(topic, source));
        }

        info!(
            topic,
            sender_did,
            recipient_did,
            bytes = payload.len(),
            "inbound message delivered"
        );
        Ok(String::new())
    }
}
