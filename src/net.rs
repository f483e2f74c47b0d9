pub mod manager;
pub mod types;

// -----------------------------------------------------------------------------

use crate::net::types::{Nic, NicIps, NicList};
use crate::prelude::Result;
use async_trait::async_trait;

/// Network operations of the hypervisor API.
///
/// Adapters are never updated in place: the API offers no atomic
/// modification, so any "change" is a delete followed by a re-create.
///
#[async_trait]
pub trait NetService {
    /// Lists the adapters attached to a VM.
    async fn nics(&self, vm_id: &str) -> Result<NicList>;
    /// Attaches a new adapter and returns it as the hypervisor sees it.
    async fn create_nic(&self, vm_id: &str, kind: &str, vmnet: &str) -> Result<Nic>;
    /// Detaches the adapter at `index`.
    async fn delete_nic(&self, vm_id: &str, index: i32) -> Result<()>;
    /// Reads the guest-reported MAC/IP addresses and DNS configuration.
    async fn nic_addresses(&self, vm_id: &str) -> Result<NicIps>;
    /// Regenerates the MAC of the VM's first adapter by recreating it.
    async fn renew_mac(&self, vm_id: &str) -> Result<()>;
}
