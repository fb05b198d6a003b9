//! Configuration merger for CLI arguments and config files
//!
//! CLI arguments have the last word: they are applied on top of the
//! settings loaded from files and `DONATII_*` variables.

use super::parser::{Cli, Commands};
use crate::config::ConfigLoader;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Applies CLI overrides to file-based settings
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the base settings the way the CLI asks for them.
    ///
    /// `--config` selects a single file and `--env` overrides
    /// `DONATII_APP_ENV`; otherwise the default loader behavior applies.
    ///
    /// # Errors
    /// Returns ConfigError if loading or validation fails
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;
        if let Some(path) = &cli.config {
            loader = loader.with_config_file(path);
        }
        if let Some(env) = cli.env {
            loader = loader.with_environment(env.into());
        }

        tracing::debug!(
            environment = %loader.environment(),
            config_dir = %loader.config_dir().display(),
            "Loading configuration"
        );

        Ok(Self::new(loader.load()?))
    }

    /// Merge CLI arguments with the base configuration and validate the result.
    ///
    /// Precedence for the log level, highest first: `serve --log-level`,
    /// `--verbose`/`--quiet`, then the configuration files.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            ..
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(level) = log_level {
                config.logger.level = level.as_str().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parser::Cli;
    use crate::config::DatabaseBackend;
    use clap::Parser;

    fn merger() -> ConfigurationMerger {
        let mut config = Settings::default();
        config.database.backend = DatabaseBackend::Memory;
        ConfigurationMerger::new(config)
    }

    fn merge(args: &[&str]) -> Result<Settings, ConfigError> {
        let cli = Cli::try_parse_from(args).unwrap();
        merger().merge_cli_args(&cli)
    }

    #[test]
    fn test_no_overrides_keeps_base() {
        let merged = merge(&["donatii"]).unwrap();
        assert_eq!(&merged, merger().config());
    }

    #[test]
    fn test_verbose_and_quiet_flags() {
        assert_eq!(merge(&["donatii", "--verbose"]).unwrap().logger.level, "debug");
        assert_eq!(merge(&["donatii", "--quiet"]).unwrap().logger.level, "error");
    }

    #[test]
    fn test_serve_overrides() {
        let merged = merge(&["donatii", "serve", "--host", "0.0.0.0", "--port", "8080"]).unwrap();
        assert_eq!(merged.server.host, "0.0.0.0");
        assert_eq!(merged.server.port, 8080);
    }

    #[test]
    fn test_command_log_level_overrides_global() {
        let merged = merge(&["donatii", "--verbose", "serve", "--log-level", "warn"]).unwrap();
        assert_eq!(merged.logger.level, "warn");
    }

    #[test]
    fn test_merged_settings_are_validated() {
        let mut config = Settings::default();
        config.database.url = String::new();
        let cli = Cli::try_parse_from(["donatii"]).unwrap();
        assert!(ConfigurationMerger::new(config).merge_cli_args(&cli).is_err());
    }
}
