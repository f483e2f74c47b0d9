use crate::net::NetService;
use crate::net::manager::NetManager;
use crate::prelude::{Error, Result};
use crate::transport::HttpTransport;
use crate::vm::VmService;
use crate::vm::types::{
    ClonePayload, NewVm, ParamPayload, PowerAction, PowerState, PowerStatePayload, RegisterPayload,
    SettingsPayload, Vm, VmInfoPayload, VmUpdate,
};
use async_trait::async_trait;
use reqwest::Method;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const LOCK_RETRY_ATTEMPTS: u32 = 3;
const LOCK_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Re-runs an operation while it fails with one of the transient lock codes
/// (`109`, `147`), waiting a fixed delay between attempts. Once the attempts
/// are exhausted the last lock error is returned as-is, so callers can still
/// tell "locked" apart from other failures.
///
async fn retry_while_locked<T, F, Fut>(operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Err(error) if error.is_lock() && attempt < LOCK_RETRY_ATTEMPTS => {
                tracing::debug!(target: "vm", attempt, "The VM is locked, retrying");
                attempt += 1;
                tokio::time::sleep(LOCK_RETRY_DELAY).await;
            }
            other => return other,
        }
    }
}

// -----------------------------------------------------------------------------

/// Concrete implementation of the `VmService` trait on top of the shared
/// transport.
///
/// Each record is assembled from several independent endpoints; the `GET
/// /vms` enumeration is the only source of the definition-file path, so every
/// lookup starts there.
///
pub struct VmManager {
    transport: Arc<HttpTransport>,
    network: NetManager,
}

impl VmManager {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self {
            network: NetManager::new(Arc::clone(&transport)),
            transport,
        }
    }

    /// Scans the VM list for an id. A missing id is an explicit `NotFound`,
    /// never a zero-valued record.
    ///
    async fn find_vm(&self, id: &str) -> Result<Vm> {
        let text = self.transport.call(Method::GET, "vms", None).await?;
        let vms: Vec<Vm> = serde_json::from_str(&text)?;
        tracing::debug!(target: "vm", total = vms.len(), "Listed VMs");
        vms.into_iter()
            .find(|vm| vm.id == id)
            .ok_or_else(|| Error::NotFound(format!("VM with id {id}")))
    }

    /// Scans the VM list for a display name. The list endpoint does not
    /// return names, so each candidate costs one `params` round-trip.
    ///
    async fn find_vm_by_name(&self, name: &str) -> Result<Vm> {
        let text = self.transport.call(Method::GET, "vms", None).await?;
        let vms: Vec<Vm> = serde_json::from_str(&text)?;
        for mut vm in vms {
            let display_name = self.fetch_param(&vm.id, "displayName").await?;
            if display_name == name {
                vm.display_name = display_name;
                return Ok(vm);
            }
        }
        Err(Error::NotFound(format!("VM named {name}")))
    }

    async fn fetch_param(&self, vm_id: &str, name: &str) -> Result<String> {
        let text = self
            .transport
            .call(Method::GET, &format!("vms/{vm_id}/params/{name}"), None)
            .await?;
        let param: ParamPayload = serde_json::from_str(&text)?;
        Ok(param.value)
    }

    async fn fetch_basic_info(&self, vm: &mut Vm) -> Result<()> {
        let text = self
            .transport
            .call(Method::GET, &format!("vms/{}", vm.id), None)
            .await?;
        let info: VmInfoPayload = serde_json::from_str(&text)?;
        vm.processors = info.cpu.processors;
        vm.memory = info.memory;
        Ok(())
    }

    async fn fetch_denomination(&self, vm: &mut Vm) -> Result<()> {
        vm.display_name = self.fetch_param(&vm.id, "displayName").await?;
        vm.description = self.fetch_param(&vm.id, "annotation").await?;
        Ok(())
    }

    async fn fetch_power_state(&self, vm: &mut Vm) -> Result<()> {
        let text = self
            .transport
            .call(Method::GET, &format!("vms/{}/power", vm.id), None)
            .await?;
        let payload: PowerStatePayload = serde_json::from_str(&text)?;
        vm.power_state = PowerState::from_api(&payload.power_state);
        Ok(())
    }

    /// Guest addresses can only be reported for a running VM.
    ///
    async fn fetch_network(&self, vm: &mut Vm) -> Result<()> {
        let addresses = self.network.nic_addresses(&vm.id).await?;
        vm.nics = addresses.nics;
        vm.dns = addresses.dns;
        Ok(())
    }

    /// Fills in every assembled field of a record that already carries its
    /// `id` and `path`. Any failing step aborts the whole assembly.
    ///
    async fn assemble(&self, vm: &mut Vm) -> Result<()> {
        self.fetch_basic_info(vm).await?;
        self.fetch_denomination(vm).await?;
        self.fetch_power_state(vm).await?;
        if vm.power_state == PowerState::On {
            self.fetch_network(vm).await?;
        }
        tracing::debug!(target: "vm", id = %vm.id, "VM record assembled");
        Ok(())
    }

    async fn put_settings(&self, vm_id: &str, processors: i32, memory: i32) -> Result<()> {
        let body = serde_json::to_string(&SettingsPayload { processors, memory })?;
        let path = format!("vms/{vm_id}");
        let transport = &self.transport;
        retry_while_locked(|| {
            let path = path.clone();
            let body = body.clone();
            async move { transport.call(Method::PUT, &path, Some(body)).await }
        })
        .await?;
        tracing::debug!(target: "vm", vm_id, processors, memory, "Hardware settings applied");
        Ok(())
    }
}

#[async_trait]
impl VmService for VmManager {
    async fn all_vms(&self) -> Result<Vec<Vm>> {
        let text = self.transport.call(Method::GET, "vms", None).await?;
        let mut vms: Vec<Vm> = serde_json::from_str(&text)?;
        tracing::info!(target: "vm", total = vms.len(), "Assembling all VM records");
        for vm in &mut vms {
            self.assemble(vm).await?;
        }
        Ok(vms)
    }

    async fn vm(&self, id: &str) -> Result<Vm> {
        let mut vm = self.find_vm(id).await?;
        self.assemble(&mut vm).await?;
        tracing::info!(target: "vm", id, "VM loaded");
        Ok(vm)
    }

    async fn vm_by_name(&self, name: &str) -> Result<Vm> {
        let mut vm = self.find_vm_by_name(name).await?;
        self.assemble(&mut vm).await?;
        tracing::info!(target: "vm", name, id = %vm.id, "VM loaded");
        Ok(vm)
    }

    async fn create(&self, new_vm: NewVm) -> Result<Vm> {
        let body = serde_json::to_string(&ClonePayload {
            name: new_vm.name.clone(),
            parent_id: new_vm.parent_id.clone(),
        })?;
        let transport = &self.transport;
        let text = retry_while_locked(|| {
            let body = body.clone();
            async move { transport.call(Method::POST, "vms", Some(body)).await }
        })
        .await?;
        let created: Vm = serde_json::from_str(&text)?;
        tracing::debug!(target: "vm", id = %created.id, "Clone request accepted");

        // The clone response does not reliably carry the assigned path, the
        // list endpoint is the authoritative source.
        let mut vm = self.find_vm(&created.id).await?;

        self.put_settings(&vm.id, new_vm.processors, new_vm.memory)
            .await?;
        vm.processors = new_vm.processors;
        vm.memory = new_vm.memory;

        // A clone inherits the parent's MAC address, which collides as soon
        // as both VMs are powered on.
        self.network.renew_mac(&vm.id).await?;

        vm.display_name = new_vm.name;
        vm.description = new_vm.description;
        match new_vm.power {
            Some(action) => self.power_switch(&mut vm, action).await?,
            None => self.fetch_power_state(&mut vm).await?,
        }

        tracing::info!(target: "vm", id = %vm.id, "VM created");
        Ok(vm)
    }

    async fn update(&self, vm: &mut Vm, update: VmUpdate) -> Result<()> {
        let target = match update.power {
            Some(action) => action,
            None => PowerAction::try_from(vm.power_state)?,
        };

        // The API rejects hardware changes on a running VM.
        self.power_switch(vm, PowerAction::Off).await?;
        self.put_settings(&vm.id, update.processors, update.memory)
            .await?;
        self.power_switch(vm, target).await?;

        self.fetch_basic_info(vm).await?;
        self.fetch_denomination(vm).await?;

        tracing::info!(target: "vm", id = %vm.id, "VM updated");
        Ok(())
    }

    async fn register(&self, name: &str, path: &str) -> Result<Vm> {
        let body = serde_json::to_string(&RegisterPayload {
            name: name.to_owned(),
            path: path.to_owned(),
        })?;
        let text = self
            .transport
            .call(Method::POST, "vms/registration", Some(body))
            .await?;
        let mut vm: Vm = serde_json::from_str(&text)?;
        vm.display_name = name.to_owned();
        tracing::info!(target: "vm", id = %vm.id, "VM registered in the GUI inventory");
        Ok(vm)
    }

    async fn delete(&self, vm: &Vm) -> Result<()> {
        let mut vm = vm.clone();
        self.power_switch(&mut vm, PowerAction::Off).await?;
        self.transport
            .call(Method::DELETE, &format!("vms/{}", vm.id), None)
            .await?;
        tracing::info!(target: "vm", id = %vm.id, "VM deleted");
        Ok(())
    }

    async fn power_switch(&self, vm: &mut Vm, action: PowerAction) -> Result<()> {
        let text = self
            .transport
            .call(
                Method::PUT,
                &format!("vms/{}/power", vm.id),
                Some(action.as_str().to_owned()),
            )
            .await?;
        let payload: PowerStatePayload = serde_json::from_str(&text)?;
        vm.power_state = PowerState::from_api(&payload.power_state);
        tracing::info!(target: "vm", id = %vm.id, state = ?vm.power_state, "Power state changed");
        Ok(())
    }

    async fn set_parameter(&self, vm: &Vm, name: &str, value: &str) -> Result<()> {
        let body = serde_json::to_string(&ParamPayload {
            name: name.to_owned(),
            value: value.to_owned(),
        })?;
        self.transport
            .call(
                Method::PUT,
                &format!("vms/{}/configparams", vm.id),
                Some(body),
            )
            .await?;
        tracing::info!(target: "vm", id = %vm.id, name, "Config parameter written");
        Ok(())
    }
}
