//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::repositories::{Repositories, StoreHealth};
use crate::services::{ImageStore, Services};

/// Application state containing all shared services and resources.
///
/// Cloning is cheap: services and the health probe are reference counted.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Reachability probe of the storage backend
    pub health: Arc<dyn StoreHealth>,
    /// HTTP behaviour switches
    pub api: ApiConfig,
}

impl AppState {
    /// Creates a new AppState from the repositories of the selected backend.
    ///
    /// # Example
    /// ```ignore
    /// let repos = Repositories::from_config(&settings.database).await?;
    /// let state = AppState::new(repos, ImageStore::new("assets/images/cases"), settings.api);
    /// ```
    pub fn new(repos: Repositories, images: ImageStore, api: ApiConfig) -> Self {
        let health = repos.health.clone();
        let services = Services::new(repos, images);
        Self {
            services,
            health,
            api,
        }
    }
}
