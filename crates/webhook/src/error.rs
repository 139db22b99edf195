use std::error::Error as StdError;

/// Crate-wide result type for notification delivery.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed delivery errors shared by all notifiers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The notifier was asked to deliver without a topic.
    #[error("webhook topic is empty")]
    EmptyTopic,

    /// A configured webhook URL could not be parsed or is not http(s).
    #[error("invalid webhook url {url}: {message}")]
    InvalidUrl { url: String, message: String },

    /// A zero request timeout would fail every delivery.
    #[error("webhook timeout must be greater than zero")]
    ZeroTimeout,

    /// One or more webhook endpoints rejected or failed the delivery.
    #[error("webhook delivery failed for topic {topic}: {}", .failures.join("; "))]
    Delivery {
        topic: String,
        failures: Vec<String>,
    },

    /// The in-process consumer dropped its receiver.
    #[error("notification channel closed")]
    ChannelClosed,

    /// Wrapped source error from an external dependency.
    #[error("{context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn external(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }
}
