use utoipa::OpenApi;

use crate::api::handlers::{cauze, health, users};

pub const CAUZA_TAG: &str = "Cauze";
pub const USER_TAG: &str = "Users";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Donatii",
        description = "Donation platform API: fundraising cases, pictures and donations",
    ),
    paths(
        cauze::list_cauze,
        cauze::list_sorted,
        cauze::filter_cauze,
        cauze::list_by_user,
        cauze::create_cauza,
        cauze::get_cauza,
        cauze::update_cauza,
        cauze::delete_cauza,
        cauze::get_image,
        cauze::save_images,
        cauze::donate,
        users::list_users,
        users::get_user,
        users::create_user,
        users::list_donations,
        health::health_check,
        health::readiness_check,
        health::liveness_check,
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::api::dto::CauzaResponse,
            crate::api::dto::CreateCauzaRequest,
            crate::api::dto::UpdateCauzaRequest,
            crate::api::dto::DonationResponse,
            crate::api::dto::UserResponse,
            crate::api::dto::UserDetailResponse,
            crate::api::dto::CreateUserRequest,
            crate::api::dto::HealthResponse,
        )
    ),
    tags(
        (name = CAUZA_TAG, description = "Fundraising cases, pictures and donations"),
        (name = USER_TAG, description = "Donor accounts"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
