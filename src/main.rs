use anyhow::Context;
use clap::Parser;
use ghcnd_trends::cli::{run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).await.context("ghcnd-trends failed")
}
