//! Command executor for dispatching CLI commands

use super::handlers::{MigrateCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;

/// Run the command named on the command line; `serve` when none is given.
///
/// # Errors
/// Returns errors from the command handlers
pub async fn execute_command(cli: &Cli, settings: Settings) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings).execute(*dry_run).await
        }
        None => ServeCommandHandler::new(settings).execute(false).await,
        Some(Commands::Migrate { dry_run, rollback }) => {
            if let Some(steps) = rollback
                && *steps > 10
            {
                tracing::warn!(steps, "Rolling back many migrations at once");
            }
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await
                .map_err(anyhow::Error::from)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseBackend;
    use clap::Parser;

    fn memory_config() -> Settings {
        let mut config = Settings::default();
        config.database.backend = DatabaseBackend::Memory;
        config
    }

    #[tokio::test]
    async fn test_execute_serve_dry_run() {
        let cli = Cli::try_parse_from(["donatii", "serve", "--dry-run"]).unwrap();
        assert!(execute_command(&cli, memory_config()).await.is_ok());
    }

    #[tokio::test]
    async fn test_execute_migrate_on_memory_backend_fails() {
        let cli = Cli::try_parse_from(["donatii", "migrate"]).unwrap();
        assert!(execute_command(&cli, memory_config()).await.is_err());
    }
}
