use crate::config::Config;
use crate::net::NetService;
use crate::net::manager::NetManager;
use crate::prelude::Result;
use crate::transport::HttpTransport;
use crate::vm::VmService;
use crate::vm::manager::VmManager;
use secrecy::SecretString;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8697/api";
pub const DEFAULT_USER: &str = "Admin";
pub const DEFAULT_PASSWORD: &str = "Adm1n#00";
pub const DEFAULT_INSECURE: bool = true;
pub const DEFAULT_DEBUG_LEVEL: &str = "NONE";

/// Entry point of the library: one shared transport behind the VM and
/// network service traits.
///
/// The client is immutable after construction (apart from [`configure`])
/// and can be shared freely; callers serialize their own multi-step
/// operations.
///
/// [`configure`]: WorkstationClient::configure
pub struct WorkstationClient {
    vms: Arc<dyn VmService + Send + Sync>,
    network: Arc<dyn NetService + Send + Sync>,
    debug_level: String,
}

impl WorkstationClient {
    /// Creates a ready-to-use client. The only failure mode is an
    /// unparsable base URL.
    ///
    /// # Arguments
    ///
    /// * `base_url`: Root of the REST API, e.g. `http://localhost:8697/api`.
    /// * `user`: Basic-auth user configured with `vmrest --config`.
    /// * `password`: Basic-auth password.
    /// * `insecure`: Accept self-signed TLS certificates.
    /// * `debug_level`: Textual log level (`NONE`, `ERROR`, `INFO`, `DEBUG`)
    ///   for the host to feed into [`crate::telemetry::get_subscriber`].
    ///
    pub fn new(
        base_url: &str,
        user: &str,
        password: SecretString,
        insecure: bool,
        debug_level: &str,
    ) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(base_url, user, password, insecure)?);
        Ok(Self {
            vms: Arc::new(VmManager::new(Arc::clone(&transport))),
            network: Arc::new(NetManager::new(transport)),
            debug_level: debug_level.to_uppercase(),
        })
    }

    /// Creates a client against the documented defaults of a fresh local
    /// installation. A real deployment must override the credentials.
    ///
    pub fn with_defaults() -> Result<Self> {
        Self::new(
            DEFAULT_BASE_URL,
            DEFAULT_USER,
            DEFAULT_PASSWORD.into(),
            DEFAULT_INSECURE,
            DEFAULT_DEBUG_LEVEL,
        )
    }

    /// Creates a client from the loaded configuration surface.
    ///
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.base_url,
            &config.user,
            config.password.clone(),
            config.insecure,
            &config.debug_level,
        )
    }

    /// Reconfigures the client in place, replacing transport and services.
    ///
    pub fn configure(
        &mut self,
        base_url: &str,
        user: &str,
        password: SecretString,
        insecure: bool,
        debug_level: &str,
    ) -> Result<()> {
        *self = Self::new(base_url, user, password, insecure, debug_level)?;
        Ok(())
    }

    /// VM lifecycle operations.
    ///
    pub fn vms(&self) -> &Arc<dyn VmService + Send + Sync> {
        &self.vms
    }

    /// Network/NIC operations.
    ///
    pub fn network(&self) -> &Arc<dyn NetService + Send + Sync> {
        &self.network
    }

    /// The configured textual debug level.
    ///
    pub fn debug_level(&self) -> &str {
        &self.debug_level
    }
}

impl Debug for WorkstationClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkstationClient")
            .field("vms", &"Arc<dyn VmService>")
            .field("network", &"Arc<dyn NetService>")
            .field("debug_level", &self.debug_level)
            .finish()
    }
}
