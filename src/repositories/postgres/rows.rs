//! Diesel row types and their conversions to domain models.

use diesel::prelude::*;
use jiff_diesel::ToDiesel;

use crate::models::{Cauza, CauzaChanges, Donation, NewCauza, NewDonation, NewUser, User};
use crate::schema::{cauze, donatii, users};

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: jiff_diesel::Timestamp,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            created_at: row.created_at.to_jiff(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            username: &user.username,
            email: &user.email,
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = cauze)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CauzaRow {
    pub id: i64,
    pub user_id: i64,
    pub titlu: String,
    pub descriere: String,
    pub locatie: String,
    pub suma_necesara: i32,
    pub suma_stransa: i32,
    pub rezolvata: bool,
    pub adapost: bool,
    pub poze: Vec<String>,
    pub created_at: jiff_diesel::Timestamp,
    pub updated_at: jiff_diesel::Timestamp,
}

impl From<CauzaRow> for Cauza {
    fn from(row: CauzaRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            titlu: row.titlu,
            descriere: row.descriere,
            locatie: row.locatie,
            suma_necesara: row.suma_necesara,
            suma_stransa: row.suma_stransa,
            rezolvata: row.rezolvata,
            adapost: row.adapost,
            poze: row.poze,
            created_at: row.created_at.to_jiff(),
            updated_at: row.updated_at.to_jiff(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = cauze)]
pub struct NewCauzaRow<'a> {
    pub user_id: i64,
    pub titlu: &'a str,
    pub descriere: &'a str,
    pub locatie: &'a str,
    pub suma_necesara: i32,
    pub suma_stransa: i32,
    pub rezolvata: bool,
    pub adapost: bool,
}

impl<'a> From<&'a NewCauza> for NewCauzaRow<'a> {
    fn from(cauza: &'a NewCauza) -> Self {
        Self {
            user_id: cauza.user_id,
            titlu: &cauza.titlu,
            descriere: &cauza.descriere,
            locatie: &cauza.locatie,
            suma_necesara: cauza.suma_necesara,
            suma_stransa: cauza.suma_stransa,
            rezolvata: cauza.rezolvata,
            adapost: cauza.adapost,
        }
    }
}

/// `updated_at` is always set, so the changeset is never empty.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = cauze)]
pub struct CauzaChangeset<'a> {
    pub titlu: Option<&'a str>,
    pub descriere: Option<&'a str>,
    pub locatie: Option<&'a str>,
    pub suma_necesara: Option<i32>,
    pub rezolvata: Option<bool>,
    pub adapost: Option<bool>,
    pub updated_at: jiff_diesel::Timestamp,
}

impl<'a> From<&'a CauzaChanges> for CauzaChangeset<'a> {
    fn from(changes: &'a CauzaChanges) -> Self {
        Self {
            titlu: changes.titlu.as_deref(),
            descriere: changes.descriere.as_deref(),
            locatie: changes.locatie.as_deref(),
            suma_necesara: changes.suma_necesara,
            rezolvata: changes.rezolvata,
            adapost: changes.adapost,
            updated_at: jiff::Timestamp::now().to_diesel(),
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = donatii)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DonationRow {
    pub id: i64,
    pub user_id: i64,
    pub cauza_id: Option<i64>,
    pub suma: i32,
    pub moneda: String,
    pub created_at: jiff_diesel::Timestamp,
}

impl From<DonationRow> for Donation {
    fn from(row: DonationRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            cauza_id: row.cauza_id,
            suma: row.suma,
            moneda: row.moneda,
            created_at: row.created_at.to_jiff(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = donatii)]
pub struct NewDonationRow<'a> {
    pub user_id: i64,
    pub cauza_id: Option<i64>,
    pub suma: i32,
    pub moneda: &'a str,
}

impl<'a> From<&'a NewDonation> for NewDonationRow<'a> {
    fn from(donation: &'a NewDonation) -> Self {
        Self {
            user_id: donation.user_id,
            cauza_id: Some(donation.cauza_id),
            suma: donation.suma,
            moneda: &donation.moneda,
        }
    }
}
