pub mod errors;
pub mod metrics;
pub mod policy;
pub mod resolver;
mod server;

pub use errors::{ServeErrKind, ServeError, ServeResult};
pub use policy::RoutingPolicy;
pub use resolver::{Resolved, ResolvedVia, Resolver};
pub use server::{Asset, AssetServer};
