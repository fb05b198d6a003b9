use jiff::Timestamp;

/// A recorded donation. `cauza_id` becomes `None` once the case is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Donation {
    pub id: i64,
    pub user_id: i64,
    pub cauza_id: Option<i64>,
    pub suma: i32,
    pub moneda: String,
    pub created_at: Timestamp,
}

/// A donation about to be applied to a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDonation {
    pub user_id: i64,
    pub cauza_id: i64,
    pub suma: i32,
    pub moneda: String,
}
