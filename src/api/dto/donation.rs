//! Donation DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::CauzaResponse;
use crate::models::{Cauza, Donation};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationResponse {
    pub id: i64,
    pub user_id: i64,
    /// Absent once the case has been deleted
    pub cauza_id: Option<i64>,
    pub suma: i32,
    #[schema(example = "RON")]
    pub moneda: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: String,
    /// The case as it stands right after the donation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cauza: Option<CauzaResponse>,
}

impl DonationResponse {
    pub fn with_cauza(donation: Donation, cauza: Cauza) -> Self {
        Self {
            cauza: Some(CauzaResponse::from(cauza)),
            ..Self::from(donation)
        }
    }
}

impl From<Donation> for DonationResponse {
    fn from(donation: Donation) -> Self {
        Self {
            id: donation.id,
            user_id: donation.user_id,
            cauza_id: donation.cauza_id,
            suma: donation.suma,
            moneda: donation.moneda,
            created_at: donation.created_at.to_string(),
            cauza: None,
        }
    }
}
