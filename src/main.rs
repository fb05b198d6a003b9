use clap::Parser;
use donatii_api::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = cli::load_and_merge_config(&cli)?;
    cli::init_logger_from_settings(&settings)?;

    cli::execute_command(&cli, settings).await.inspect_err(|e| {
        tracing::error!(error = %e, "Command failed");
    })
}
