pub mod auth;
pub mod locks;
mod router;
mod state;

pub use auth::{api_auth_middleware, AuthPolicy, TOKEN_HEADER};
pub use locks::{NamespaceGuard, NamespaceLocks};
pub use router::build_router;
pub use state::{HealthSnapshot, ServeHealth, ServeState};
