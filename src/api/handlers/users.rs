//! User request handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::api::doc::USER_TAG;
use crate::api::dto::{
    CreateUserRequest, DonationResponse, ErrorResponse, UserDetailResponse, UserResponse,
};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::ValidatedJson;

/// Creates user-related routes.
///
/// Routes:
/// - GET  /users                 - List all users
/// - POST /users                 - Create a new user
/// - GET  /users/{id}            - Get user with owned case ids
/// - GET  /users/{id}/donations  - Donation history, newest first
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/donations", get(list_donations))
}

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    responses((status = 200, description = "All users", body = Vec<UserResponse>)),
    tag = USER_TAG
)]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.services.users.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get a user and the ids of the cases they own
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserDetailResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = USER_TAG
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserDetailResponse>, AppError> {
    let (user, cauze) = state.services.users.get_user_with_cases(id).await?;
    Ok(Json(UserDetailResponse::new(user, cauze)))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid user", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    tag = USER_TAG
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = state
        .services
        .users
        .create_user(payload.into_new_user())
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Donation history of a user, newest first
#[utoipa::path(
    get,
    path = "/users/{id}/donations",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Donations", body = Vec<DonationResponse>),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = USER_TAG
)]
pub async fn list_donations(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<DonationResponse>>, AppError> {
    let donations = state.services.users.donation_history(id).await?;
    Ok(Json(
        donations.into_iter().map(DonationResponse::from).collect(),
    ))
}
