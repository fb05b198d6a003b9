//! Repository layer for data access operations.
//!
//! Services talk to storage through the traits below. Two backends exist:
//! PostgreSQL (`postgres`) for deployments and an in-process store
//! (`memory`) for local runs and tests, chosen by `database.backend`.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{PgCauzaRepository, PgStoreHealth, PgUserRepository};

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{DatabaseBackend, DatabaseConfig};
use crate::db::{AsyncDbPool, establish_async_connection_pool};
use crate::error::{AppError, AppResult};
use crate::models::{
    Cauza, CauzaChanges, CauzaFilter, Donation, NewCauza, NewDonation, NewUser, User,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    async fn find_by_id(&self, user_id: i64) -> AppResult<Option<User>>;

    /// All users ordered by id.
    async fn list_all(&self) -> AppResult<Vec<User>>;

    /// Donations made by the user, newest first.
    async fn list_donations(&self, user_id: i64) -> AppResult<Vec<Donation>>;
}

#[async_trait]
pub trait CauzaRepository: Send + Sync {
    /// Persist a case for an existing owner in one unit of work.
    ///
    /// # Errors
    /// `AppError::NotFound` for "User" when the owner does not exist; nothing
    /// is written in that case.
    async fn insert_for_owner(&self, new_cauza: NewCauza) -> AppResult<Cauza>;

    async fn find_by_id(&self, cauza_id: i64) -> AppResult<Option<Cauza>>;

    /// All cases ordered by id.
    async fn list_all(&self) -> AppResult<Vec<Cauza>>;

    async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<Cauza>>;

    /// Apply `changes`; `None` when the case does not exist.
    async fn update(&self, cauza_id: i64, changes: CauzaChanges) -> AppResult<Option<Cauza>>;

    /// Remove the case; `false` when it did not exist. Donations keep their
    /// history with the case reference cleared.
    async fn delete(&self, cauza_id: i64) -> AppResult<bool>;

    async fn filter(&self, filter: &CauzaFilter) -> AppResult<Vec<Cauza>>;

    async fn clear_images(&self, cauza_id: i64) -> AppResult<()>;

    /// Append one image reference to the end of the case's list.
    async fn add_image(&self, cauza_id: i64, reference: String) -> AppResult<()>;

    /// Add the amount to the case and record the donation atomically.
    ///
    /// # Errors
    /// `AppError::NotFound` for a missing donor ("User") or case ("Cauza");
    /// the collected sum is left unchanged in both cases.
    async fn donate(&self, donation: NewDonation) -> AppResult<(Cauza, Donation)>;
}

/// Raised by both backends when a donation would push the collected sum past
/// `i32::MAX`. The case is left unchanged.
pub(crate) fn collected_sum_overflow() -> AppError {
    AppError::validation("sum", "Donation would overflow the collected sum")
}

/// Reachability check for the storage backend.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> AppResult<()>;

    fn backend_name(&self) -> &'static str;
}

/// Aggregates all repositories for convenient access.
///
/// Cloning only bumps reference counts.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub cauze: Arc<dyn CauzaRepository>,
    pub health: Arc<dyn StoreHealth>,
}

impl Repositories {
    /// Repositories backed by a PostgreSQL pool.
    pub fn postgres(pool: AsyncDbPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            cauze: Arc::new(PgCauzaRepository::new(pool.clone())),
            health: Arc::new(PgStoreHealth::new(pool)),
        }
    }

    /// Repositories sharing one fresh in-memory store.
    pub fn memory() -> Self {
        let store = MemoryStore::new();
        Self {
            users: Arc::new(store.clone()),
            cauze: Arc::new(store.clone()),
            health: Arc::new(store),
        }
    }

    /// Build the backend selected by `database.backend`.
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        match config.backend {
            DatabaseBackend::Postgres => {
                let pool = establish_async_connection_pool(config).await?;
                Ok(Self::postgres(pool))
            }
            DatabaseBackend::Memory => Ok(Self::memory()),
        }
    }
}
