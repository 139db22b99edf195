use {async_trait::async_trait, tokio::sync::mpsc};

use crate::{Error, Notifier, Result};

/// A notification captured by [`ChannelNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Forwards notifications into a bounded channel for an in-process consumer.
///
/// `notify` waits for capacity, so a slow consumer back-pressures the caller.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::Sender<Notification>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver its notifications arrive on.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(&self, topic: &str, payload: &[u8]) -> Result<()> {
        if topic.is_empty() {
            return Err(Error::EmptyTopic);
        }
        self.tx
            .send(Notification {
                topic: topic.to_string(),
                payload: payload.to_vec(),
            })
            .await
            .map_err(|_| Error::ChannelClosed)
    }
}
