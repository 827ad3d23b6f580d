pub mod app;
pub mod commands;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod info;
pub mod output;
pub mod resolve;
pub mod runtime;
pub mod serve;
pub mod sites;

pub use resolve::{cmd_resolve, ResolveArgs};
pub use serve::{cmd_serve, ServeArgs};
pub use sites::{cmd_delete, cmd_deploy, cmd_list, cmd_rename, DeployArgs};
