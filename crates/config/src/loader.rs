use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    Error, Result,
    env_subst::substitute_env,
    error::Context,
    schema::RelayConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "msgrelay.toml",
    "msgrelay.yaml",
    "msgrelay.yml",
    "msgrelay.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<RelayConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_config(&substitute_env(&raw), path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./msgrelay.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/msgrelay/msgrelay.{toml,yaml,yml,json}` (user-global)
///
/// Returns `RelayConfig::default()` if no file is found or it fails to parse.
pub fn discover_and_load() -> RelayConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    RelayConfig::default()
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    let local = CONFIG_FILENAMES.iter().map(PathBuf::from);
    let global = config_dir()
        .into_iter()
        .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)));
    local.chain(global).find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/msgrelay/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "msgrelay").map(|d| d.config_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> Result<RelayConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        other => Err(Error::UnsupportedFormat(other.to_string())),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_toml_with_services() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msgrelay.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9090

[webhook]
urls = ["${MSGRELAY_TEST_UNSET_HOOK:-http://localhost:8080}"]

[[services]]
name = "s1"
type = "msg-type-01"
purpose = ["prp-01-01", "prp-01-02"]

[[services]]
name = "s2"
"#,
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.bind, "127.0.0.1");
        assert_eq!(cfg.webhook.urls, vec!["http://localhost:8080"]);
        assert_eq!(cfg.webhook.timeout_secs, 10);
        assert_eq!(cfg.services.len(), 2);
        assert_eq!(cfg.services[0].msg_type.as_deref(), Some("msg-type-01"));
        assert!(cfg.services[1].purpose.is_empty());
    }

    #[test]
    fn loads_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = dir.path().join("msgrelay.yaml");
        std::fs::write(
            &yaml,
            "metrics:\n  enabled: true\n  labels:\n    instance: relay-01\n",
        )
        .unwrap();
        let cfg = load_config(&yaml).unwrap();
        assert!(cfg.metrics.enabled);
        assert_eq!(
            cfg.metrics.labels.get("instance").map(String::as_str),
            Some("relay-01")
        );

        let json = dir.path().join("msgrelay.json");
        std::fs::write(&json, r#"{"services":[{"name":"j","purpose":["p"]}]}"#).unwrap();
        assert_eq!(load_config(&json).unwrap().services[0].purpose, vec!["p"]);
    }

    #[test]
    fn unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msgrelay.ini");
        std::fs::write(&path, "x=1").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(Error::UnsupportedFormat(ref ext)) if ext == "ini"
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config(Path::new("/nonexistent/msgrelay.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read /nonexistent/msgrelay.toml"));
    }
}
