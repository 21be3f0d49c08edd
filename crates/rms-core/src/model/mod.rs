//! Wire types of the resource pool.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema`. Field
//! names match the JSON accepted by the apply endpoint.

mod host;
mod operation;
mod request;
mod spec;

pub use host::{DiskInfo, HostRecord};
pub use operation::{GroupAllocation, OperationRecord};
pub use request::{ActionInfo, Host, Hosts, ObjectDetail, RequestInputParam};
pub use spec::{DiskSpec, LocationSpec, MeasureRange, Spec};
