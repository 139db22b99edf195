//! HTTP webhook delivery.

use std::time::{Duration, Instant};

use {
    async_trait::async_trait,
    reqwest::Client,
    tracing::{debug, warn},
    url::Url,
};

#[cfg(feature = "metrics")]
use msgrelay_metrics::{counter, histogram, labels, webhook as wh_metrics};

use crate::{Error, Notifier, Result};

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// POSTs each notification to `{url}/{topic}` on every configured webhook.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    urls: Vec<Url>,
    client: Client,
}

impl HttpNotifier {
    /// Build a notifier for the given webhook base URLs.
    ///
    /// Every URL must parse and use `http` or `https`, and `timeout` must be
    /// non-zero.
    pub fn new<I, S>(urls: I, timeout: Duration) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if timeout.is_zero() {
            return Err(Error::ZeroTimeout);
        }
        let urls = urls
            .into_iter()
            .map(|raw| parse_webhook_url(raw.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| Error::external("failed to build webhook client", source))?;
        Ok(Self { urls, client })
    }

    pub fn urls(&self) -> &[Url] {
        &self.urls
    }

    async fn post(&self, base: &Url, topic: &str, payload: &[u8]) -> std::result::Result<(), String> {
        let target = topic_url(base, topic)?;
        let resp = self
            .client
            .post(target.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload.to_vec())
            .send()
            .await
            .map_err(|e| format!("{target}: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(format!("{target}: HTTP {status}: {body}"));
        }
        debug!(url = %target, %status, "webhook delivered");
        Ok(())
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, topic: &str, payload: &[u8]) -> Result<()> {
        if topic.is_empty() {
            return Err(Error::EmptyTopic);
        }

        let started = Instant::now();
        let mut failures = Vec::new();
        for base in &self.urls {
            if let Err(failure) = self.post(base, topic, payload).await {
                warn!(topic, error = %failure, "webhook delivery failed");
                failures.push(failure);
            }
        }

        #[cfg(feature = "metrics")]
        {
            histogram!(wh_metrics::DELIVERY_DURATION_SECONDS)
                .record(started.elapsed().as_secs_f64());
            let status = if failures.is_empty() { "ok" } else { "error" };
            counter!(wh_metrics::DELIVERIES_TOTAL, labels::STATUS => status).increment(1);
        }
        debug!(
            topic,
            targets = self.urls.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "webhook notify finished"
        );

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Delivery {
                topic: topic.to_string(),
                failures,
            })
        }
    }
}

fn parse_webhook_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| Error::invalid_url(raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::invalid_url(raw, format!("unsupported scheme {other}"))),
    }
}

/// Append `topic` as a single, percent-encoded path segment.
fn topic_url(base: &Url, topic: &str) -> std::result::Result<Url, String> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| format!("{base}: cannot be a base url"))?
        .pop_if_empty()
        .push(topic);
    Ok(url)
}
