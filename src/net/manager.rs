use crate::net::NetService;
use crate::net::types::{Nic, NicIps, NicList, NicPayload};
use crate::prelude::{Error, Result};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use reqwest::Method;
use std::sync::Arc;

/// Concrete implementation of the `NetService` trait on top of the shared
/// transport.
///
pub struct NetManager {
    transport: Arc<HttpTransport>,
}

impl NetManager {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl NetService for NetManager {
    async fn nics(&self, vm_id: &str) -> Result<NicList> {
        let text = self
            .transport
            .call(Method::GET, &format!("vms/{vm_id}/nic"), None)
            .await?;
        let list: NicList = serde_json::from_str(&text)?;
        tracing::debug!(target: "net", vm_id, num = list.num, "Listed network adapters");
        Ok(list)
    }

    async fn create_nic(&self, vm_id: &str, kind: &str, vmnet: &str) -> Result<Nic> {
        let payload = NicPayload {
            kind: kind.to_owned(),
            vmnet: vmnet.to_owned(),
        };
        let body = serde_json::to_string(&payload)?;
        let text = self
            .transport
            .call(Method::POST, &format!("vms/{vm_id}/nic"), Some(body))
            .await?;
        let nic: Nic = serde_json::from_str(&text)?;
        tracing::info!(target: "net", vm_id, index = nic.index, "Network adapter created");
        Ok(nic)
    }

    async fn delete_nic(&self, vm_id: &str, index: i32) -> Result<()> {
        self.transport
            .call(Method::DELETE, &format!("vms/{vm_id}/nic/{index}"), None)
            .await?;
        tracing::info!(target: "net", vm_id, index, "Network adapter deleted");
        Ok(())
    }

    async fn nic_addresses(&self, vm_id: &str) -> Result<NicIps> {
        let text = self
            .transport
            .call(Method::GET, &format!("vms/{vm_id}/nicips"), None)
            .await?;
        let addresses: NicIps = serde_json::from_str(&text)?;
        tracing::debug!(target: "net", vm_id, "Read guest network addresses");
        Ok(addresses)
    }

    /// The API has no "regenerate MAC" endpoint, so the first adapter is
    /// deleted and re-created with its previous settings; the hypervisor
    /// assigns a fresh MAC on creation. A `bridged` adapter is re-created
    /// with an empty `vmnet`, the API rejects the combination otherwise.
    ///
    async fn renew_mac(&self, vm_id: &str) -> Result<()> {
        let list = self.nics(vm_id).await?;
        let Some(nic) = list.nics.first() else {
            return Err(Error::NotFound(format!("network adapter on VM {vm_id}")));
        };

        self.delete_nic(vm_id, nic.index).await?;
        let vmnet = if nic.kind == "bridged" {
            ""
        } else {
            nic.vmnet.as_str()
        };
        self.create_nic(vm_id, &nic.kind, vmnet).await?;

        tracing::info!(target: "net", vm_id, "Adapter recreated with a fresh MAC address");
        Ok(())
    }
}
