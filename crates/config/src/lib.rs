//! Configuration loading, env substitution and validation.
//!
//! Config files: `msgrelay.toml`, `msgrelay.yaml`, `msgrelay.yml` or
//! `msgrelay.json`, searched in `./` then `~/.config/msgrelay/`.
//!
//! String values may reference `${ENV_VAR}` or `${ENV_VAR:-fallback}`.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{config_dir, discover_and_load, find_config_file, load_config},
    schema::{MetricsConfig, RelayConfig, ServerConfig, WebhookConfig},
    validate::{Diagnostic, Severity, validate},
};
