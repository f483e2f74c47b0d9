pub mod manager;
pub mod types;

// -----------------------------------------------------------------------------

use crate::prelude::Result;
use crate::vm::types::{NewVm, PowerAction, Vm, VmUpdate};
use async_trait::async_trait;

/// VM lifecycle operations of the hypervisor API.
///
/// Reads assemble one consistent [`Vm`] record out of several independent
/// endpoints; mutations are strict sequences of dependent calls with no
/// rollback, a failed step aborts with that step's error and leaves the
/// remote VM in whatever state the previous steps produced.
///
#[async_trait]
pub trait VmService {
    /// Lists every VM and assembles the full record for each.
    async fn all_vms(&self) -> Result<Vec<Vm>>;
    /// Loads one VM by its identifier.
    async fn vm(&self, id: &str) -> Result<Vm>;
    /// Loads one VM by display name; costs one extra round-trip per
    /// candidate because the list endpoint does not return names.
    async fn vm_by_name(&self, name: &str) -> Result<Vm>;
    /// Clones a parent VM and applies the requested settings.
    async fn create(&self, new_vm: NewVm) -> Result<Vm>;
    /// Applies new settings to an existing VM, power-cycling as needed.
    async fn update(&self, vm: &mut Vm, update: VmUpdate) -> Result<()>;
    /// Registers a VM definition file with the GUI inventory.
    async fn register(&self, name: &str, path: &str) -> Result<Vm>;
    /// Powers a VM off and removes it.
    async fn delete(&self, vm: &Vm) -> Result<()>;
    /// Switches the power state and records the resulting state.
    async fn power_switch(&self, vm: &mut Vm, action: PowerAction) -> Result<()>;
    /// Writes one config parameter of the VM's definition file.
    ///
    /// The upstream endpoint does not reliably accept writes (notably for
    /// `displayName` and `annotation`); the call may be accepted and still
    /// have no effect on the real service.
    async fn set_parameter(&self, vm: &Vm, name: &str, value: &str) -> Result<()>;
}
