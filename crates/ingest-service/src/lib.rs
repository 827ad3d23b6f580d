pub mod errors;
pub mod metrics;
pub mod policy;
pub mod registry;
mod service;

pub use errors::{IngestErrKind, IngestError, IngestResult};
pub use policy::IngestPolicy;
pub use registry::{ChannelRegistrySink, RegistryEvent, RegistrySink, TracingRegistrySink};
pub use service::{IngestService, Upload};
