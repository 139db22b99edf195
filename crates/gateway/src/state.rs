use std::{sync::Arc, time::Duration};

use {
    msgrelay_config::{RelayConfig, Severity},
    msgrelay_msgsvc::{MessageHandler, MessageService, MessageServiceRegistry, ServiceParams},
    msgrelay_webhook::{HttpNotifier, NoopNotifier, Notifier},
    tokio::sync::RwLock,
    tracing::info,
};

/// Shared gateway state: the service registry and the notifier new services
/// deliver through.
pub struct GatewayState {
    pub version: String,
    registry: RwLock<MessageServiceRegistry>,
    notifier: Arc<dyn Notifier>,
}

impl GatewayState {
    pub fn new(notifier: Arc<dyn Notifier>) -> Arc<Self> {
        Arc::new(Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            registry: RwLock::new(MessageServiceRegistry::new()),
            notifier,
        })
    }

    /// Build state from config: pick the notifier and register the declared
    /// services. Fails if validation reports any error.
    pub async fn from_config(config: &RelayConfig) -> anyhow::Result<Arc<Self>> {
        let errors: Vec<String> = msgrelay_config::validate(config)
            .into_iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| d.to_string())
            .collect();
        if !errors.is_empty() {
            anyhow::bail!("invalid config: {}", errors.join("; "));
        }

        let notifier: Arc<dyn Notifier> = if config.webhook.urls.is_empty() {
            info!("no webhook urls configured, inbound messages will be dropped");
            Arc::new(NoopNotifier)
        } else {
            Arc::new(HttpNotifier::new(
                &config.webhook.urls,
                Duration::from_secs(config.webhook.timeout_secs),
            )?)
        };

        let state = Self::new(notifier);
        for entry in &config.services {
            state
                .register(ServiceParams {
                    name: entry.name.clone(),
                    msg_type: entry.msg_type.clone(),
                    purpose: entry.purpose.clone(),
                })
                .await?;
        }
        Ok(state)
    }

    /// Register a message service wired to this gateway's notifier.
    pub async fn register(&self, params: ServiceParams) -> msgrelay_msgsvc::Result<()> {
        let service: Arc<dyn MessageHandler> =
            Arc::new(MessageService::new(params, Arc::clone(&self.notifier)));
        self.registry.write().await.register(service)
    }

    pub async fn unregister(&self, name: &str) -> msgrelay_msgsvc::Result<()> {
        self.registry.write().await.unregister(name)
    }

    pub async fn services(&self) -> Vec<String> {
        self.registry.read().await.services()
    }

    /// Route an inbound message. The registry lock is released before the
    /// notifier is awaited.
    pub async fn dispatch(
        &self,
        message: &msgrelay_common::InboundMessage,
        sender_did: &str,
        recipient_did: &str,
    ) -> msgrelay_msgsvc::Result<String> {
        let service = self.registry.read().await.find(message.header());
        let Some(service) = service else {
            return Err(MessageServiceRegistry::unrouted(message.header()));
        };
        MessageServiceRegistry::deliver(&service, message, sender_did, recipient_did).await
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        msgrelay_common::{InboundMessage, MessageHeader},
        msgrelay_config::schema::ServiceEntry,
        msgrelay_msgsvc::{Error, InboundEnvelope},
        msgrelay_webhook::ChannelNotifier,
    };

    fn entry(name: &str, msg_type: &str) -> ServiceEntry {
        ServiceEntry {
            name: name.into(),
            msg_type: Some(msg_type.into()),
            purpose: Vec::new(),
        }
    }

    #[tokio::test]
    async fn from_config_registers_declared_services() {
        let config = RelayConfig {
            services: vec![entry("s1", "t1"), entry("s2", "t2")],
            ..Default::default()
        };

        let state = GatewayState::from_config(&config).await.unwrap();
        assert_eq!(state.services().await, vec!["s1", "s2"]);

        let msg = InboundMessage::new(MessageHeader::new().with_type("t2"), b"x".to_vec());
        assert_eq!(state.dispatch(&msg, "did-A", "did-B").await.unwrap(), "");
    }

    #[tokio::test]
    async fn from_config_rejects_duplicates_and_bad_urls() {
        let config = RelayConfig {
            services: vec![entry("s1", "t1"), entry("s1", "t2")],
            ..Default::default()
        };
        assert!(GatewayState::from_config(&config).await.is_err());

        let mut config = RelayConfig::default();
        config.webhook.urls = vec!["ftp://nope".into()];
        assert!(GatewayState::from_config(&config).await.is_err());
    }

    #[tokio::test]
    async fn from_config_rejects_zero_timeout() {
        let mut config = RelayConfig::default();
        config.webhook.urls = vec!["http://localhost:8080".into()];
        config.webhook.timeout_secs = 0;

        let err = GatewayState::from_config(&config).await.err().unwrap();
        assert!(err.to_string().contains("webhook.timeout_secs"));
    }

    #[tokio::test]
    async fn dispatch_delivers_through_first_accepting_service() {
        let (notifier, mut rx) = ChannelNotifier::new(4);
        let state = GatewayState::new(Arc::new(notifier));
        state
            .register(ServiceParams::new("by-purpose").with_purpose(["prp-01"]))
            .await
            .unwrap();
        state
            .register(ServiceParams::new("by-type").with_type("msg-type-01"))
            .await
            .unwrap();

        let msg = InboundMessage::new(
            MessageHeader::new()
                .with_type("msg-type-01")
                .with_purpose(["prp-01"]),
            b"hello".to_vec(),
        );
        let reply = state.dispatch(&msg, "did-A", "did-B").await.unwrap();
        assert!(reply.is_empty());

        let got = rx.recv().await.unwrap();
        assert_eq!(got.topic, "by-purpose");
        let envelope = InboundEnvelope::from_slice(&got.payload).unwrap();
        assert_eq!(envelope.message, msg);
        assert_eq!(envelope.sender_did, "did-A");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn dispatch_without_accepting_service_is_no_handler() {
        let (notifier, mut rx) = ChannelNotifier::new(1);
        let state = GatewayState::new(Arc::new(notifier));
        state
            .register(ServiceParams::new("s1").with_type("msg-type-01"))
            .await
            .unwrap();

        let msg = InboundMessage::new(MessageHeader::new().with_type("msg-type-02"), Vec::new());
        let err = state.dispatch(&msg, "did-A", "did-B").await.unwrap_err();
        assert!(matches!(err, Error::NoHandler { ref msg_type } if msg_type == "msg-type-02"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn dispatch_reports_delivery_failure() {
        let (notifier, rx) = ChannelNotifier::new(1);
        drop(rx);
        let state = GatewayState::new(Arc::new(notifier));
        state
            .register(ServiceParams::new("s1").with_type("msg-type-01"))
            .await
            .unwrap();

        let msg = InboundMessage::new(MessageHeader::new().with_type("msg-type-01"), Vec::new());
        let err = state.dispatch(&msg, "did-A", "did-B").await.unwrap_err();
        assert!(matches!(err, Error::DeliveryFailed { ref topic, .. } if topic == "s1"));
    }
}
