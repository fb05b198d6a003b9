//! Case request handlers.
//!
//! Translates `/cauza/*` requests into case service calls. Every route is
//! registered with its full path.

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, post, put},
};

use crate::api::doc::CAUZA_TAG;
use crate::api::dto::{
    CauzaResponse, CreateCauzaRequest, DonationResponse, ErrorResponse, FilterParams,
    UpdateCauzaRequest, UploadPictures,
};
use crate::error::AppError;
use crate::services::{MISSING_PICTURES, UploadedImage};
use crate::state::AppState;
use crate::utils::{ValidatedJson, ValidatedQuery};

/// Multipart field carrying the uploaded pictures.
const PICTURES_FIELD: &str = "pictures";

/// Creates case routes.
///
/// Routes:
/// - GET    /cauza                                  - List all cases
/// - GET    /cauza/sorted                           - List cases in display order
/// - GET    /cauza/filter                           - Filter cases
/// - GET    /cauza/users/{userId}                   - Cases owned by a user
/// - GET    /cauza/image/{url}                      - Fetch a stored picture
/// - POST   /cauza/saveImages/{id}                  - Replace a case's pictures
/// - PUT    /cauza/donate/{cauzaId}/{userId}/{sum}/{currency} - Donate
/// - POST   /cauza/{userId}                         - Create a case for a user
/// - GET    /cauza/{id}                             - Get a case
/// - PUT    /cauza/{id}                             - Update a case
/// - DELETE /cauza/{id}                             - Delete a case
pub fn cauza_routes() -> Router<AppState> {
    Router::new()
        .route("/cauza", get(list_cauze))
        .route("/cauza/sorted", get(list_sorted))
        .route("/cauza/filter", get(filter_cauze))
        .route("/cauza/users/{user_id}", get(list_by_user))
        .route("/cauza/image/{url}", get(get_image))
        .route("/cauza/saveImages/{id}", post(save_images))
        .route(
            "/cauza/donate/{cauza_id}/{user_id}/{sum}/{currency}",
            put(donate),
        )
        .route(
            "/cauza/{id}",
            get(get_cauza)
                .post(create_cauza)
                .put(update_cauza)
                .delete(delete_cauza),
        )
}

fn to_responses(cauze: Vec<crate::models::Cauza>) -> Vec<CauzaResponse> {
    cauze.into_iter().map(CauzaResponse::from).collect()
}

/// List all cases ordered by id
#[utoipa::path(
    get,
    path = "/cauza",
    responses((status = 200, description = "All cases", body = Vec<CauzaResponse>)),
    tag = CAUZA_TAG
)]
pub async fn list_cauze(
    State(state): State<AppState>,
) -> Result<Json<Vec<CauzaResponse>>, AppError> {
    let cauze = state.services.cauze.list_all().await?;
    Ok(Json(to_responses(cauze)))
}

/// List cases with open ones first, closest to their target first
#[utoipa::path(
    get,
    path = "/cauza/sorted",
    responses((status = 200, description = "Cases in display order", body = Vec<CauzaResponse>)),
    tag = CAUZA_TAG
)]
pub async fn list_sorted(
    State(state): State<AppState>,
) -> Result<Json<Vec<CauzaResponse>>, AppError> {
    let cauze = state.services.cauze.list_sorted().await?;
    Ok(Json(to_responses(cauze)))
}

/// Cases matching location, target range, resolved and shelter flags
#[utoipa::path(
    get,
    path = "/cauza/filter",
    params(FilterParams),
    responses(
        (status = 200, description = "Matching cases", body = Vec<CauzaResponse>),
        (status = 400, description = "Missing or invalid parameters", body = ErrorResponse)
    ),
    tag = CAUZA_TAG
)]
pub async fn filter_cauze(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<FilterParams>,
) -> Result<Json<Vec<CauzaResponse>>, AppError> {
    let cauze = state.services.cauze.filter(params.into()).await?;
    Ok(Json(to_responses(cauze)))
}

/// Cases owned by a user
#[utoipa::path(
    get,
    path = "/cauza/users/{user_id}",
    params(("user_id" = i64, Path, description = "Owner id")),
    responses(
        (status = 200, description = "Cases of the user", body = Vec<CauzaResponse>),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = CAUZA_TAG
)]
pub async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<CauzaResponse>>, AppError> {
    let cauze = state.services.cauze.list_by_user(user_id).await?;
    Ok(Json(to_responses(cauze)))
}

/// Create a case owned by an existing user
#[utoipa::path(
    post,
    path = "/cauza/{id}",
    params(("id" = i64, Path, description = "Owner id")),
    request_body = CreateCauzaRequest,
    responses(
        (status = 200, description = "Case created", body = CauzaResponse),
        (status = 400, description = "Invalid case", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = CAUZA_TAG
)]
pub async fn create_cauza(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<CreateCauzaRequest>,
) -> Result<Json<CauzaResponse>, AppError> {
    let cauza = state
        .services
        .cauze
        .create(payload.into_new_cauza(user_id))
        .await?;
    Ok(Json(CauzaResponse::from(cauza)))
}

/// Get a case by id
#[utoipa::path(
    get,
    path = "/cauza/{id}",
    params(("id" = i64, Path, description = "Case id")),
    responses(
        (status = 200, description = "Case found", body = CauzaResponse),
        (status = 404, description = "Case not found", body = ErrorResponse)
    ),
    tag = CAUZA_TAG
)]
pub async fn get_cauza(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CauzaResponse>, AppError> {
    let cauza = state.services.cauze.get(id).await?;
    Ok(Json(CauzaResponse::from(cauza)))
}

/// Update a case
#[utoipa::path(
    put,
    path = "/cauza/{id}",
    params(("id" = i64, Path, description = "Case id")),
    request_body = UpdateCauzaRequest,
    responses(
        (status = 200, description = "Case updated", body = String, example = json!("Cauza updated!")),
        (status = 400, description = "Invalid changes", body = ErrorResponse),
        (status = 404, description = "Case not found", body = ErrorResponse)
    ),
    tag = CAUZA_TAG
)]
pub async fn update_cauza(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateCauzaRequest>,
) -> Result<&'static str, AppError> {
    state
        .services
        .cauze
        .update(id, payload.into_changes())
        .await?;
    Ok("Cauza updated!")
}

/// Delete a case
#[utoipa::path(
    delete,
    path = "/cauza/{id}",
    params(("id" = i64, Path, description = "Case id")),
    responses(
        (status = 200, description = "Case deleted", body = String, example = json!("Cauza deleted!")),
        (status = 404, description = "Case not found", body = ErrorResponse)
    ),
    tag = CAUZA_TAG
)]
pub async fn delete_cauza(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<&'static str, AppError> {
    state.services.cauze.delete(id).await?;
    Ok("Cauza deleted!")
}

/// Fetch a stored picture
#[utoipa::path(
    get,
    path = "/cauza/image/{url}",
    params(("url" = String, Path, description = "Stored file name, e.g. 3poza.jpg")),
    responses(
        (status = 200, description = "Picture bytes", content_type = "image/*", body = Vec<u8>),
        (status = 404, description = "Nonexistent image", body = ErrorResponse)
    ),
    tag = CAUZA_TAG
)]
pub async fn get_image(
    State(state): State<AppState>,
    Path(url): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (bytes, content_type) = state.services.cauze.read_image(&url).await?;
    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_LENGTH, bytes.len().to_string()),
        ],
        bytes,
    ))
}

/// Replace the pictures of a case
///
/// Existing references are cleared, then each `pictures` part is stored and
/// registered in order. A failing part stops the upload; earlier parts stay.
#[utoipa::path(
    post,
    path = "/cauza/saveImages/{id}",
    params(("id" = i64, Path, description = "Case id")),
    request_body(content = UploadPictures, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Pictures saved", body = String, example = json!("Pictures saved successfully")),
        (status = 400, description = "Malformed upload", body = ErrorResponse),
        (status = 404, description = "Case not found", body = ErrorResponse)
    ),
    tag = CAUZA_TAG
)]
pub async fn save_images(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<&'static str, AppError> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(PICTURES_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::bad_request("Every picture needs a file name"))?;
        let bytes = field.bytes().await?;
        files.push(UploadedImage {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    if files.is_empty() {
        return Err(AppError::bad_request(MISSING_PICTURES));
    }

    state.services.cauze.save_images(id, files).await?;
    Ok("Pictures saved successfully")
}

/// Donate to a case
#[utoipa::path(
    put,
    path = "/cauza/donate/{cauza_id}/{user_id}/{sum}/{currency}",
    params(
        ("cauza_id" = i64, Path, description = "Case id"),
        ("user_id" = i64, Path, description = "Donor id"),
        ("sum" = i32, Path, description = "Positive amount"),
        ("currency" = String, Path, description = "Three-letter currency code")
    ),
    responses(
        (status = 200, description = "Donation recorded", body = DonationResponse),
        (status = 400, description = "Invalid sum or currency", body = ErrorResponse),
        (status = 404, description = "Case or user not found", body = ErrorResponse)
    ),
    tag = CAUZA_TAG
)]
pub async fn donate(
    State(state): State<AppState>,
    Path((cauza_id, user_id, sum, currency)): Path<(i64, i64, i32, String)>,
) -> Result<Json<DonationResponse>, AppError> {
    let (cauza, donation) = state
        .services
        .cauze
        .donate(cauza_id, user_id, sum, &currency)
        .await?;
    Ok(Json(DonationResponse::with_cauza(donation, cauza)))
}
