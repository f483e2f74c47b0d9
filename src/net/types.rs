use serde::{Deserialize, Serialize};

/// Network adapter list as reported by `GET /vms/{id}/nic`.
///
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NicList {
    #[serde(default)]
    pub num: i32,
    #[serde(default)]
    pub nics: Vec<Nic>,
}

/// One network adapter of a VM, identified by an index local to that VM.
///
/// # Fields
///
/// * `index`: 1-based adapter slot on the VM.
/// * `kind`: Adapter type (`bridged`, `nat`, `hostonly`, `custom`).
/// * `vmnet`: Virtual network the adapter connects to; empty for `bridged`.
/// * `mac`: MAC address assigned by the hypervisor.
///
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Nic {
    pub index: i32,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub vmnet: String,
    #[serde(rename = "macAddress", default)]
    pub mac: String,
}

/// Request body for `POST /vms/{id}/nic`. The API offers no partial update
/// of an adapter, so this is also the whole "settings" surface.
///
#[derive(Debug, Serialize)]
pub(crate) struct NicPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub vmnet: String,
}

// -----------------------------------------------------------------------------

/// Guest addresses as reported by `GET /vms/{id}/nicips`. Only available
/// while the VM runs and guest tools are installed.
///
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NicIps {
    #[serde(default)]
    pub nics: Vec<NicAddress>,
    #[serde(default)]
    pub dns: Dns,
}

/// Addresses of one adapter: its MAC and the IPs the guest reports for it.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NicAddress {
    #[serde(default)]
    pub mac: String,
    #[serde(rename = "ip", default)]
    pub ips: Vec<String>,
}

/// DNS configuration of the guest, reported alongside the NIC addresses.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dns {
    #[serde(default)]
    pub hostname: String,
    #[serde(rename = "domainname", default)]
    pub domain_name: String,
    #[serde(rename = "server", default)]
    pub servers: Vec<String>,
}
