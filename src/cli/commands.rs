use clap::Subcommand;

use super::resolve::ResolveArgs;
use super::serve::ServeArgs;
use super::sites::{DeleteArgs, DeployArgs, ListArgs, RenameArgs};

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Run the HTTP front door: upload API plus tenant site serving
    Serve(ServeArgs),

    /// Ingest a local page, file or ZIP archive into a namespace
    Deploy(DeployArgs),

    /// Move a site to another namespace
    Rename(RenameArgs),

    /// Remove every object of a namespace
    Delete(DeleteArgs),

    /// List the objects stored for a namespace
    Ls(ListArgs),

    /// Show which tenant and path a request would be served from
    Resolve(ResolveArgs),

    /// Show version, build and effective configuration
    Info,
}
