use anyhow::Result;

use super::commands::Commands;
use super::context::CliContext;
use super::env::CliArgs;
use super::info::cmd_info;
use super::resolve::cmd_resolve;
use super::serve::cmd_serve;
use super::sites::{cmd_delete, cmd_deploy, cmd_list, cmd_rename};

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    let output = cli.output;
    match cli.command.clone() {
        Commands::Serve(args) => cmd_serve(args, ctx).await,
        Commands::Deploy(args) => cmd_deploy(args, ctx, output).await,
        Commands::Rename(args) => cmd_rename(args, ctx, output).await,
        Commands::Delete(args) => cmd_delete(args, ctx, output).await,
        Commands::Ls(args) => cmd_list(args, ctx, output).await,
        Commands::Resolve(args) => cmd_resolve(args, ctx, output),
        Commands::Info => cmd_info(ctx, output),
    }
}
