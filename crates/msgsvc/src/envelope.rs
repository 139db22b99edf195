use {
    msgrelay_common::InboundMessage,
    serde::{Deserialize, Serialize},
};

use crate::Result;

/// What a webhook consumer receives for one inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEnvelope {
    pub message: InboundMessage,
    pub sender_did: String,
    pub recipient_did: String,
}

impl InboundEnvelope {
    #[must_use]
    pub fn new(
        message: InboundMessage,
        sender_did: impl Into<String>,
        recipient_did: impl Into<String>,
    ) -> Self {
        Self {
            message,
            sender_did: sender_did.into(),
            recipient_did: recipient_did.into(),
        }
    }

    /// Encode as JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode JSON bytes produced by [`to_bytes`](Self::to_bytes).
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
