//! PostgreSQL implementations of the repository traits.

mod cauza_repo;
mod rows;
mod user_repo;

pub use cauza_repo::PgCauzaRepository;
pub use user_repo::PgUserRepository;

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::repositories::StoreHealth;

/// Connectivity probe used by the readiness endpoint.
#[derive(Clone)]
pub struct PgStoreHealth {
    pool: AsyncDbPool,
}

impl PgStoreHealth {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreHealth for PgStoreHealth {
    async fn ping(&self) -> Result<(), AppError> {
        let mut conn = self.pool.get().await?;
        diesel::sql_query("SELECT 1").execute(&mut conn).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
