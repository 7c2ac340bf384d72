//! `synthesis` binary entry point.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    synthesis_cli::run().await?;
    Ok(())
}
