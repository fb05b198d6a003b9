//! Case repository backed by PostgreSQL.
//!
//! Creation and donation run inside a single transaction each, so a
//! missing owner or donor never leaves a partial write behind.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use super::rows::{CauzaChangeset, CauzaRow, DonationRow, NewCauzaRow, NewDonationRow};
use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{Cauza, CauzaChanges, CauzaFilter, Donation, NewCauza, NewDonation};
use crate::repositories::{CauzaRepository, collected_sum_overflow};
use crate::schema::{cauze, donatii, users};

diesel::define_sql_function!(fn lower(x: Text) -> Text);
diesel::define_sql_function!(fn btrim(x: Text) -> Text);
diesel::define_sql_function!(fn array_append(a: diesel::sql_types::Array<Text>, e: Text) -> diesel::sql_types::Array<Text>);

#[derive(Clone)]
pub struct PgCauzaRepository {
    pool: AsyncDbPool,
}

impl PgCauzaRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CauzaRepository for PgCauzaRepository {
    async fn insert_for_owner(&self, new_cauza: NewCauza) -> Result<Cauza, AppError> {
        let mut conn = self.pool.get().await?;
        let owner_id = new_cauza.user_id;

        conn.transaction::<_, AppError, _>(|conn| {
            async move {
                let owner_exists: bool =
                    diesel::select(diesel::dsl::exists(users::table.find(owner_id)))
                        .get_result(conn)
                        .await?;
                if !owner_exists {
                    return Err(AppError::not_found("User", owner_id));
                }

                let row = diesel::insert_into(cauze::table)
                    .values(NewCauzaRow::from(&new_cauza))
                    .returning(CauzaRow::as_returning())
                    .get_result(conn)
                    .await?;
                Ok(Cauza::from(row))
            }
            .scope_boxed()
        })
        .await
    }

    async fn find_by_id(&self, cauza_id: i64) -> Result<Option<Cauza>, AppError> {
        let mut conn = self.pool.get().await?;

        cauze::table
            .find(cauza_id)
            .select(CauzaRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Cauza::from))
            .map_err(AppError::from)
    }

    async fn list_all(&self) -> Result<Vec<Cauza>, AppError> {
        let mut conn = self.pool.get().await?;

        cauze::table
            .order(cauze::id.asc())
            .select(CauzaRow::as_select())
            .load(&mut conn)
            .await
            .map(|rows| rows.into_iter().map(Cauza::from).collect())
            .map_err(AppError::from)
    }

    async fn list_by_user(&self, owner_id: i64) -> Result<Vec<Cauza>, AppError> {
        let mut conn = self.pool.get().await?;

        cauze::table
            .filter(cauze::user_id.eq(owner_id))
            .order(cauze::id.asc())
            .select(CauzaRow::as_select())
            .load(&mut conn)
            .await
            .map(|rows| rows.into_iter().map(Cauza::from).collect())
            .map_err(AppError::from)
    }

    async fn update(
        &self,
        cauza_id: i64,
        changes: CauzaChanges,
    ) -> Result<Option<Cauza>, AppError> {
        let mut conn = self.pool.get().await?;

        diesel::update(cauze::table.find(cauza_id))
            .set(CauzaChangeset::from(&changes))
            .returning(CauzaRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Cauza::from))
            .map_err(AppError::from)
    }

    async fn delete(&self, cauza_id: i64) -> Result<bool, AppError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(cauze::table.find(cauza_id))
            .execute(&mut conn)
            .await?;
        Ok(deleted > 0)
    }

    async fn filter(&self, filter: &CauzaFilter) -> Result<Vec<Cauza>, AppError> {
        let mut conn = self.pool.get().await?;

        cauze::table
            .filter(lower(btrim(cauze::locatie)).eq(filter.normalized_locatie()))
            .filter(cauze::suma_necesara.between(filter.sum_min, filter.sum_max))
            .filter(cauze::rezolvata.eq(filter.rezolvata))
            .filter(cauze::adapost.eq(filter.adapost))
            .order(cauze::id.asc())
            .select(CauzaRow::as_select())
            .load(&mut conn)
            .await
            .map(|rows| rows.into_iter().map(Cauza::from).collect())
            .map_err(AppError::from)
    }

    async fn clear_images(&self, cauza_id: i64) -> Result<(), AppError> {
        let mut conn = self.pool.get().await?;

        let updated = diesel::update(cauze::table.find(cauza_id))
            .set(cauze::poze.eq(Vec::<String>::new()))
            .execute(&mut conn)
            .await?;
        if updated == 0 {
            return Err(AppError::not_found("Cauza", cauza_id));
        }
        Ok(())
    }

    async fn add_image(&self, cauza_id: i64, reference: String) -> Result<(), AppError> {
        let mut conn = self.pool.get().await?;

        let updated = diesel::update(cauze::table.find(cauza_id))
            .set(cauze::poze.eq(array_append(cauze::poze, reference)))
            .execute(&mut conn)
            .await?;
        if updated == 0 {
            return Err(AppError::not_found("Cauza", cauza_id));
        }
        Ok(())
    }

    async fn donate(&self, donation: NewDonation) -> Result<(Cauza, Donation), AppError> {
        let mut conn = self.pool.get().await?;

        conn.transaction::<_, AppError, _>(|conn| {
            async move {
                let donor_exists: bool =
                    diesel::select(diesel::dsl::exists(users::table.find(donation.user_id)))
                        .get_result(conn)
                        .await?;
                if !donor_exists {
                    return Err(AppError::not_found("User", donation.user_id));
                }

                let updated = diesel::update(
                    cauze::table
                        .find(donation.cauza_id)
                        .filter(cauze::suma_stransa.le(i32::MAX.saturating_sub(donation.suma))),
                )
                .set(cauze::suma_stransa.eq(cauze::suma_stransa + donation.suma))
                .returning(CauzaRow::as_returning())
                .get_result(conn)
                .await
                .optional()?;

                let Some(updated) = updated else {
                    let cauza_exists: bool = diesel::select(diesel::dsl::exists(
                        cauze::table.find(donation.cauza_id),
                    ))
                    .get_result(conn)
                    .await?;
                    return Err(if cauza_exists {
                        collected_sum_overflow()
                    } else {
                        AppError::not_found("Cauza", donation.cauza_id)
                    });
                };

                let recorded = diesel::insert_into(donatii::table)
                    .values(NewDonationRow::from(&donation))
                    .returning(DonationRow::as_returning())
                    .get_result(conn)
                    .await?;

                Ok((Cauza::from(updated), Donation::from(recorded)))
            }
            .scope_boxed()
        })
        .await
    }
}
