/// Crate-wide result type for message service operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while registering or dispatching to message services.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The service has no name to deliver under.
    #[error("topic not found: message service has no name")]
    TopicNotFound,

    /// The notifier rejected the envelope.
    #[error("failed to deliver inbound message to topic {topic}: {source}")]
    DeliveryFailed {
        topic: String,
        #[source]
        source: msgrelay_webhook::Error,
    },

    /// The envelope could not be encoded.
    #[error("failed to encode inbound envelope: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    /// Registration parameters are unusable.
    #[error("invalid message service params: {message}")]
    InvalidParams { message: String },

    #[error("message service already registered: {name}")]
    AlreadyRegistered { name: String },

    #[error("message service not registered: {name}")]
    NotRegistered { name: String },

    /// No registered service accepted the inbound message.
    #[error("no message service accepts message type {msg_type}")]
    NoHandler { msg_type: String },
}

impl Error {
    #[must_use]
    pub fn invalid_params(message: impl std::fmt::Display) -> Self {
        Self::InvalidParams {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn delivery_failed(topic: impl Into<String>, source: msgrelay_webhook::Error) -> Self {
        Self::DeliveryFailed {
            topic: topic.into(),
            source,
        }
    }

    /// Short label for the error kind, used for logs and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TopicNotFound => "topic_not_found",
            Self::DeliveryFailed { .. } => "delivery_failed",
            Self::SerializationFailed(_) => "serialization_failed",
            Self::InvalidParams { .. } => "invalid_params",
            Self::AlreadyRegistered { .. } => "already_registered",
            Self::NotRegistered { .. } => "not_registered",
            Self::NoHandler { .. } => "no_handler",
        }
    }
}
