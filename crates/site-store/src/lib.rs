pub mod api;
pub mod deadline;
pub mod errors;
pub mod fs;
pub mod memory;
pub mod policy;

pub use api::{object_key, SiteStore, SiteStoreBuilder, StoreResult};
pub use deadline::DeadlineStore;
pub use errors::{StoreErrKind, StoreError};
pub use fs::{FsSiteStore, STAGING_DIR};
pub use memory::InMemorySiteStore;
pub use policy::{IoCfg, StoreBackend, StorePolicyView};
