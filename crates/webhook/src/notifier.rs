use {async_trait::async_trait, tracing::debug};

use crate::Result;

/// Sink for delivering an encoded inbound message under a topic.
///
/// Implementations own their concurrency discipline; callers may invoke
/// `notify` concurrently and must not assume it returns quickly.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, topic: &str, payload: &[u8]) -> Result<()>;
}

/// Notifier that accepts and discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, topic: &str, payload: &[u8]) -> Result<()> {
        debug!(topic, bytes = payload.len(), "no webhook configured, dropping notification");
        Ok(())
    }
}
