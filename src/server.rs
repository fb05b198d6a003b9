//! Server module for managing HTTP server lifecycle
//!
//! This module handles server initialization, startup, and graceful shutdown.

use crate::api::routes::create_router;
use crate::config::{DatabaseBackend, settings::Settings};
use crate::db::run_pending_migrations;
use crate::repositories::Repositories;
use crate::services::ImageStore;
use crate::state::AppState;
use tokio::net::TcpListener;
use tokio::signal;

/// HTTP server manager
pub struct Server {
    settings: Settings,
}

impl Server {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Start the server and run until shutdown signal
    ///
    /// This method:
    /// 1. Logs startup information
    /// 2. Builds the repositories of the configured backend, migrating first
    ///    when `database.auto_migrate` is set
    /// 3. Prepares the image directory
    /// 4. Binds to the configured address and serves with graceful shutdown
    ///
    /// # Errors
    /// - Migration or connection pool initialization errors
    /// - Image directory creation errors
    /// - Address binding errors
    pub async fn run(self) -> anyhow::Result<()> {
        let Settings {
            application,
            server,
            database,
            storage,
            api,
            logger,
        } = self.settings;

        tracing::info!(
            app_name = %application.name,
            app_version = %application.version,
            "Application starting"
        );

        tracing::info!(
            host = %server.host,
            port = %server.port,
            request_timeout = %server.request_timeout,
            max_body_size = %server.max_body_size,
            legacy_errors = %api.legacy_errors,
            "Server configuration loaded"
        );

        tracing::info!(
            level = %logger.level,
            console_enabled = %logger.console.enabled,
            file_enabled = %logger.file.enabled,
            "Logger configuration loaded"
        );

        // Connection details stay out of the logs.
        tracing::info!(
            backend = %database.backend.as_str(),
            max_connections = %database.max_connections,
            auto_migrate = %database.auto_migrate,
            "Database configuration loaded"
        );

        if database.backend == DatabaseBackend::Postgres && database.auto_migrate {
            let applied = run_pending_migrations(&database.url).await?;
            tracing::info!(applied = applied.len(), "Database migrations applied");
        }

        let repos = Repositories::from_config(&database).await?;
        tracing::info!(backend = %repos.health.backend_name(), "Repositories initialized");

        let images = ImageStore::new(&storage.images_dir);
        images.ensure_root().await?;
        tracing::info!(images_dir = %images.root().display(), "Image store ready");

        let state = AppState::new(repos, images, api);
        let router = create_router(state, &server);

        let address = server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Waits for Ctrl+C or SIGTERM.
///
/// A handler that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
