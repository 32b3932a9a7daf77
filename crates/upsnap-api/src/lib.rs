// upsnap-api: Async Rust client reconciling UpSnap devices and device groups
//
// - `transport`: one HTTP request per call, bearer token attached when present
// - `session`: password login yielding an immutable bearer-token session
// - `resource`: the `ResourceAdapter` capability and one adapter per kind
// - `record`: the caller-owned identifier slot driving the CRUD lifecycle

pub mod error;
pub mod record;
pub mod resource;
mod response;
pub mod session;
pub mod transport;

pub use error::Error;
pub use record::Record;
pub use resource::{
    DeviceAdapter, DeviceFields, DeviceGroupAdapter, DeviceGroupFields, ReadOutcome,
    ResourceAdapter, ResourceKind,
};
pub use session::{AUTH_PATH, Credentials, Session};
pub use transport::{RawResponse, TlsMode, Transport, TransportConfig};
