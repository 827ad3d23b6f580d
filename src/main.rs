use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    sitehost_cli::cli::app::run().await
}
