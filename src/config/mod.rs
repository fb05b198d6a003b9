//! Configuration management
//!
//! Settings are layered from TOML files under `config/` and `DONATII_*`
//! environment variables, then validated before use.
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml`
//! 2. `{environment}.toml`, selected by `DONATII_APP_ENV` or `--env`
//! 3. `local.toml`, never committed
//! 4. `DONATII_*` environment variables, `__` separating nested keys

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use loader::ConfigLoader;
pub use settings::{
    ApiConfig, DatabaseBackend, DatabaseConfig, ServerConfig, Settings, StorageConfig,
};
