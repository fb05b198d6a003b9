//! Migrate command handler
//!
//! Applies, previews or reverts the embedded PostgreSQL migrations.

use crate::config::DatabaseBackend;
use crate::config::settings::Settings;
use crate::db::{pending_migrations, revert_migrations, run_pending_migrations};
use crate::error::{AppError, AppResult};

/// Handler for the migrate command
pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the migrate command with dry-run and rollback support
    ///
    /// # Arguments
    /// * `dry_run` - If true, shows pending migrations without applying them
    /// * `rollback` - Optional number of migrations to roll back
    ///
    /// # Errors
    /// - The memory backend has no schema to migrate
    /// - Database connection or migration errors
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        if self.config.database.backend == DatabaseBackend::Memory {
            return Err(AppError::validation(
                "database.backend",
                "Migrations need the postgres backend",
            ));
        }
        self.config.database.validate()?;

        match rollback {
            Some(0) => Err(AppError::validation(
                "rollback_steps",
                "Number of rollback steps must be greater than 0",
            )),
            Some(steps) => self.rollback_migrations(steps).await,
            None if dry_run => self.show_pending_migrations().await,
            None => self.run_migrations().await,
        }
    }

    async fn show_pending_migrations(&self) -> AppResult<()> {
        let pending = pending_migrations(&self.config.database.url).await?;

        if pending.is_empty() {
            println!("✓ No pending migrations found - database is up to date");
        } else {
            println!("Found {} pending migration(s):", pending.len());
            for name in &pending {
                println!("  - {}", name);
            }
            println!("\nRun without --dry-run to apply these migrations");
        }
        Ok(())
    }

    async fn run_migrations(&self) -> AppResult<()> {
        let applied = run_pending_migrations(&self.config.database.url).await?;

        if applied.is_empty() {
            println!("✓ No migrations to apply - database is already up to date");
        } else {
            println!("✓ Applied {} migration(s):", applied.len());
            for version in &applied {
                println!("  - {}", version);
            }
        }
        tracing::info!(applied = applied.len(), "Database migrations applied");
        Ok(())
    }

    async fn rollback_migrations(&self, steps: u32) -> AppResult<()> {
        let reverted = revert_migrations(&self.config.database.url, steps).await?;

        if (reverted.len() as u32) < steps {
            println!(
                "Only {} migration(s) were applied; all of them were rolled back",
                reverted.len()
            );
        }
        println!("✓ Rolled back {} migration(s):", reverted.len());
        for version in &reverted {
            println!("  - {}", version);
        }
        tracing::info!(reverted = reverted.len(), "Database migrations reverted");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
