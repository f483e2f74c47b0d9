pub mod client;
pub mod config;
pub mod error;
pub mod net;
pub mod telemetry;
pub mod transport;
pub mod vm;

pub mod prelude {
    pub use crate::client::WorkstationClient;
    pub use crate::error::{ApiErrorKind, Error, Result};

    pub use crate::net::NetService;
    pub use crate::net::types::{Dns, Nic, NicAddress, NicIps, NicList};
    pub use crate::vm::VmService;
    pub use crate::vm::types::{NewVm, PowerAction, PowerState, Vm, VmUpdate};
}
