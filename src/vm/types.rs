use crate::net::types::{Dns, NicAddress};
use crate::prelude::Error;
use serde::{Deserialize, Serialize};

/// One virtual machine known to the hypervisor.
///
/// `id` and `path` come from the `GET /vms` enumeration and are the join key
/// for every per-field lookup; everything else is merged in from the
/// single-field endpoints by the record assembler.
///
/// # Fields
///
/// * `id`: Opaque identifier assigned by the hypervisor, immutable.
/// * `path`: Path to the VM's `.vmx` definition file, immutable.
/// * `display_name`: Name shown in the GUI.
/// * `description`: Free-text annotation.
/// * `processors`: Number of virtual CPUs; changes require a powered-off VM.
/// * `memory`: Memory in megabytes; changes require a powered-off VM.
/// * `power_state`: Normalized power state.
/// * `nics`: Guest adapter addresses, populated only while powered on.
/// * `dns`: Guest DNS configuration, populated alongside `nics`.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vm {
    pub id: String,
    pub path: String,
    pub display_name: String,
    pub description: String,
    pub processors: i32,
    pub memory: i32,
    pub power_state: PowerState,
    pub nics: Vec<NicAddress>,
    pub dns: Dns,
}

/// Normalized power state of a VM.
///
/// The hypervisor reports transitional vocabulary (`poweredOn`, `poweringOn`,
/// `poweredOff`, `poweringOff`) which collapses into this tri-state. Anything
/// unrecognized maps to `Invalid` rather than silently defaulting, and a
/// freshly listed VM starts out as `Invalid` until its state is fetched.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    Off,
    #[default]
    Invalid,
}

impl PowerState {
    /// Converts the hypervisor's native power vocabulary.
    ///
    pub fn from_api(raw: &str) -> Self {
        match raw {
            "poweredOn" | "poweringOn" => Self::On,
            "poweredOff" | "poweringOff" => Self::Off,
            _ => Self::Invalid,
        }
    }
}

/// Power transition accepted by `PUT /vms/{id}/power`, sent as a bare string.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    On,
    Off,
    Reset,
}

impl PowerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Reset => "reset",
        }
    }
}

impl TryFrom<PowerState> for PowerAction {
    type Error = Error;

    /// A current state can serve as a restore target, except `Invalid`,
    /// which would put garbage on the wire.
    ///
    fn try_from(state: PowerState) -> Result<Self, Self::Error> {
        match state {
            PowerState::On => Ok(Self::On),
            PowerState::Off => Ok(Self::Off),
            PowerState::Invalid => Err(Error::Any(
                "the VM reports an invalid power state".to_owned(),
            )),
        }
    }
}

// -----------------------------------------------------------------------------

/// Specification for a new VM cloned from a parent.
///
/// # Fields
///
/// * `parent_id`: ID of the VM to clone from.
/// * `name`: Name of the new VM.
/// * `description`: Annotation for the new VM; retained on the record but
///   not transmitted, the config-params endpoint does not reliably accept
///   writes.
/// * `processors`, `memory`: Hardware settings applied after the clone.
/// * `power`: Power action applied once the VM is fully set up, if any.
///
#[derive(Debug, Clone)]
pub struct NewVm {
    pub parent_id: String,
    pub name: String,
    pub description: String,
    pub processors: i32,
    pub memory: i32,
    pub power: Option<PowerAction>,
}

/// Requested changes for an existing VM.
///
/// `name` and `description` share the config-params limitation described on
/// [`NewVm`] and are not transmitted.
///
#[derive(Debug, Clone)]
pub struct VmUpdate {
    pub name: String,
    pub description: String,
    pub processors: i32,
    pub memory: i32,
    pub power: Option<PowerAction>,
}

// -----------------------------------------------------------------------------

/// Request body for the clone endpoint, `POST /vms`.
///
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClonePayload {
    pub name: String,
    pub parent_id: String,
}

/// Body of `PUT /vms/{id}`, the only mutable hardware settings.
///
#[derive(Debug, Serialize)]
pub(crate) struct SettingsPayload {
    pub processors: i32,
    pub memory: i32,
}

/// Response of `GET /vms/{id}`.
///
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct VmInfoPayload {
    pub cpu: CpuPayload,
    pub memory: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CpuPayload {
    pub processors: i32,
}

/// `{name, value}` pair used by the `params` and `configparams` endpoints.
///
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ParamPayload {
    pub name: String,
    pub value: String,
}

/// Response of `GET`/`PUT /vms/{id}/power`, carrying the native vocabulary.
///
#[derive(Debug, Deserialize)]
pub(crate) struct PowerStatePayload {
    pub power_state: String,
}

/// Request body for `POST /vms/registration`.
///
#[derive(Debug, Serialize)]
pub(crate) struct RegisterPayload {
    pub name: String,
    pub path: String,
}
