//! User repository for async database operations.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::rows::{DonationRow, NewUserRow, UserRow};
use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{Donation, NewUser, User};
use crate::repositories::UserRepository;

/// User repository holding an async connection pool.
///
/// Since `AsyncDbPool` (bb8::Pool) internally uses `Arc`, cloning is cheap.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: AsyncDbPool,
}

impl PgUserRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(users)
            .values(NewUserRow::from(&new_user))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(User::from)
            .map_err(|e| crate::error::DatabaseErrorConverter::convert_diesel_error(e, "insert user"))
    }

    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .filter(id.eq(user_id))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(User::from))
            .map_err(AppError::from)
    }

    async fn list_all(&self) -> Result<Vec<User>, AppError> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .order(id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map(|rows| rows.into_iter().map(User::from).collect())
            .map_err(AppError::from)
    }

    async fn list_donations(&self, donor_id: i64) -> Result<Vec<Donation>, AppError> {
        use crate::schema::donatii::dsl::*;
        let mut conn = self.pool.get().await?;

        donatii
            .filter(user_id.eq(donor_id))
            .order((created_at.desc(), id.desc()))
            .select(DonationRow::as_select())
            .load(&mut conn)
            .await
            .map(|rows| rows.into_iter().map(Donation::from).collect())
            .map_err(AppError::from)
    }
}
