use crate::prelude::Result;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;

/// Connection settings for the hypervisor API, loaded once at startup.
///
/// # Fields
///
/// * `base_url`: Root of the REST API.
/// * `user`, `password`: Basic-auth credentials configured with
///   `vmrest --config`.
/// * `parent_id`: ID of the VM that clones are created from, if any.
/// * `insecure`: Accept self-signed TLS certificates.
/// * `debug_level`: Textual log level, one of `NONE`, `ERROR`, `INFO`,
///   `DEBUG`.
///
#[derive(Debug, Deserialize)]
pub struct Config {
    pub base_url: String,
    pub user: String,
    pub password: SecretString,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub insecure: bool,
    #[serde(default = "default_debug_level")]
    pub debug_level: String,
}

fn default_debug_level() -> String {
    "NONE".to_owned()
}

impl Config {
    /// Loads the configuration from `WSAPI_`-prefixed environment variables,
    /// with `.env` support.
    ///
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("WSAPI"))
            .build()?
            .try_deserialize::<Config>()?;

        tracing::info!(target: "config", ?config, "Configuration loaded from environment");
        Ok(config)
    }

    /// Loads the configuration from a file, with `WSAPI_`-prefixed
    /// environment variables layered on top.
    ///
    /// # Arguments
    ///
    /// * `path`: Configuration file; the format is inferred from the
    ///   extension.
    ///
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref().to_path_buf()))
            .add_source(config::Environment::with_prefix("WSAPI"))
            .build()?
            .try_deserialize::<Config>()?;

        tracing::info!(target: "config", ?config, "Configuration loaded");
        Ok(config)
    }
}
