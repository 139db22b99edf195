//! Inbound message types shared between the transport edge and message services.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Routing-relevant header fields of an inbound DIDComm-style message.
///
/// Field tags follow DIDComm conventions (`@id`, `@type`, `~purpose`) so a
/// header decoded from the wire can be fed straight into criteria matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeader {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub msg_type: Option<String>,
    #[serde(rename = "~purpose", default, skip_serializing_if = "Vec::is_empty")]
    pub purpose: Vec<String>,
}

impl MessageHeader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_type(mut self, msg_type: impl Into<String>) -> Self {
        self.msg_type = Some(msg_type.into());
        self
    }

    #[must_use]
    pub fn with_purpose<I, S>(mut self, purpose: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.purpose = purpose.into_iter().map(Into::into).collect();
        self
    }

    /// Message type, treating an empty string as absent.
    pub fn message_type(&self) -> Option<&str> {
        self.msg_type.as_deref().filter(|t| !t.is_empty())
    }

    /// Purpose labels as an unordered set.
    pub fn purposes(&self) -> HashSet<&str> {
        self.purpose.iter().map(String::as_str).collect()
    }
}

/// An inbound message: its header plus the opaque body bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    #[serde(flatten)]
    pub header: MessageHeader,
    #[serde(with = "base64_bytes")]
    pub payload: Vec<u8>,
}

impl InboundMessage {
    #[must_use]
    pub fn new(header: MessageHeader, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            header,
            payload: payload.into(),
        }
    }

    pub fn header(&self) -> &MessageHeader {
        &self.header
    }
}

/// Serde adapter encoding raw bytes as standard base64 text.
mod base64_bytes {
    use {
        base64::{Engine, engine::general_purpose::STANDARD},
        serde::{Deserialize, Deserializer, Serializer, de::Error as _},
    };

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded.as_bytes()).map_err(D::Error::custom)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_uses_didcomm_field_tags() {
        let header = MessageHeader::new()
            .with_type("msg-type-01")
            .with_purpose(["prp-01-01"]);
        let json = serde_json::to_value(&header).unwrap();
        assert_eq!(json["@type"], "msg-type-01");
        assert_eq!(json["~purpose"][0], "prp-01-01");
        assert!(json.get("@id").is_none());
    }

    #[test]
    fn empty_type_is_absent() {
        let header = MessageHeader::new().with_type("");
        assert_eq!(header.message_type(), None);
    }

    #[test]
    fn purposes_dedupe() {
        let header = MessageHeader::new().with_purpose(["a", "b", "a"]);
        assert_eq!(header.purposes().len(), 2);
    }

    #[test]
    fn payload_is_base64_text() {
        let msg = InboundMessage::new(MessageHeader::new().with_type("t"), b"hello".to_vec());
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["payload"], "aGVsbG8=");
        assert_eq!(json["@type"], "t");

        let back: InboundMessage = serde_json::from_value(json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn missing_header_fields_default() {
        let msg: InboundMessage = serde_json::from_str(r#"{"payload":""}"#).unwrap();
        assert_eq!(msg.header, MessageHeader::default());
        assert!(msg.payload.is_empty());
    }
}
