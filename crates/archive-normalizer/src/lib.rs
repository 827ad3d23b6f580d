pub mod classify;
pub mod collapse;
pub mod errors;
pub mod extract;
pub mod model;
pub mod policy;

mod normalizer;

pub use classify::{classify, PayloadKind};
pub use errors::{NormalizeErrKind, NormalizeError, NormalizeResult};
pub use model::{NormalizedEntry, NormalizedSite};
pub use normalizer::{normalize, Normalizer};
pub use policy::ArchiveLimits;
