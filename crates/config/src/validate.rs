//! Semantic checks on a loaded [`RelayConfig`].

use std::collections::HashSet;

use url::Url;

use crate::schema::RelayConfig;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "services[1].name"
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            path: path.into(),
            message: message.into(),
        }
    }

    fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.path, self.message)
    }
}

/// Check a config for problems the serde layer cannot catch.
pub fn validate(config: &RelayConfig) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    for (i, raw) in config.webhook.urls.iter().enumerate() {
        let path = format!("webhook.urls[{i}]");
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {},
            Ok(url) => out.push(Diagnostic::error(
                path,
                format!("unsupported scheme {}", url.scheme()),
            )),
            Err(e) => out.push(Diagnostic::error(path, format!("invalid url: {e}"))),
        }
    }
    if config.webhook.timeout_secs == 0 {
        out.push(Diagnostic::error(
            "webhook.timeout_secs",
            "timeout must be greater than zero",
        ));
    }
    if config.webhook.urls.is_empty() && !config.services.is_empty() {
        out.push(Diagnostic::warning(
            "webhook.urls",
            "no webhook configured, inbound messages will be dropped",
        ));
    }

    let mut seen = HashSet::new();
    for (i, svc) in config.services.iter().enumerate() {
        let path = format!("services[{i}]");
        if svc.name.trim().is_empty() {
            out.push(Diagnostic::error(format!("{path}.name"), "name is required"));
            continue;
        }
        if !seen.insert(svc.name.as_str()) {
            out.push(Diagnostic::error(
                format!("{path}.name"),
                format!("duplicate service name {}", svc.name),
            ));
        }
        let has_type = svc.msg_type.as_deref().is_some_and(|t| !t.is_empty());
        if !has_type && svc.purpose.is_empty() {
            out.push(Diagnostic::warning(
                path,
                format!("service {} has no type or purpose and will accept nothing", svc.name),
            ));
        }
    }

    out
}
