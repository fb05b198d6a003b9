//! Case-related DTOs for API requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{Cauza, CauzaChanges, CauzaFilter, NewCauza};

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating a case.
///
/// The owner comes from the path. Any `poze` sent by the client are ignored:
/// pictures are only attached through the upload endpoint.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCauzaRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    #[schema(min_length = 1, max_length = 255, example = "Adapost pentru catei")]
    pub titlu: String,
    #[serde(default)]
    pub descriere: String,
    #[validate(length(min = 1, max = 255, message = "Location must be between 1 and 255 characters"))]
    #[schema(min_length = 1, max_length = 255, example = "Cluj")]
    pub locatie: String,
    #[validate(range(min = 0, message = "Target sum must not be negative"))]
    #[schema(minimum = 0, example = 1500)]
    pub suma_necesara: i32,
    #[validate(range(min = 0, message = "Collected sum must not be negative"))]
    #[schema(minimum = 0)]
    pub suma_stransa: Option<i32>,
    #[serde(default)]
    pub rezolvata: bool,
    #[serde(default)]
    pub adapost: bool,
}

impl CreateCauzaRequest {
    /// Converts the request into a case owned by `user_id`.
    pub fn into_new_cauza(self, user_id: i64) -> NewCauza {
        NewCauza {
            user_id,
            titlu: self.titlu,
            descriere: self.descriere,
            locatie: self.locatie,
            suma_necesara: self.suma_necesara,
            suma_stransa: self.suma_stransa.unwrap_or(0),
            rezolvata: self.rezolvata,
            adapost: self.adapost,
        }
    }
}

/// Request body for updating a case. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCauzaRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub titlu: Option<String>,
    pub descriere: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Location must be between 1 and 255 characters"))]
    pub locatie: Option<String>,
    #[validate(range(min = 0, message = "Target sum must not be negative"))]
    pub suma_necesara: Option<i32>,
    pub rezolvata: Option<bool>,
    pub adapost: Option<bool>,
}

impl UpdateCauzaRequest {
    pub fn into_changes(self) -> CauzaChanges {
        CauzaChanges {
            titlu: self.titlu,
            descriere: self.descriere,
            locatie: self.locatie,
            suma_necesara: self.suma_necesara,
            rezolvata: self.rezolvata,
            adapost: self.adapost,
        }
    }
}

/// Query string of `GET /cauza/filter`. Every parameter is required.
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FilterParams {
    /// Location, matched case-insensitively
    #[validate(length(min = 1, message = "Location is required"))]
    pub locatie: String,
    /// Lower bound of the target sum, inclusive
    pub sum_min: i32,
    /// Upper bound of the target sum, inclusive
    pub sum_max: i32,
    /// Match resolved (`true`) or open (`false`) cases
    pub rezolvate: bool,
    /// Match shelter cases
    pub adaposturi: bool,
}

impl From<FilterParams> for CauzaFilter {
    fn from(params: FilterParams) -> Self {
        Self {
            locatie: params.locatie,
            sum_min: params.sum_min,
            sum_max: params.sum_max,
            rezolvata: params.rezolvate,
            adapost: params.adaposturi,
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CauzaResponse {
    pub id: i64,
    pub user_id: i64,
    pub titlu: String,
    pub descriere: String,
    pub locatie: String,
    pub suma_necesara: i32,
    pub suma_stransa: i32,
    pub rezolvata: bool,
    pub adapost: bool,
    /// Image references, e.g. `/cauza/image/3poza.jpg`
    pub poze: Vec<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: String,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: String,
}

impl From<Cauza> for CauzaResponse {
    fn from(cauza: Cauza) -> Self {
        Self {
            id: cauza.id,
            user_id: cauza.user_id,
            titlu: cauza.titlu,
            descriere: cauza.descriere,
            locatie: cauza.locatie,
            suma_necesara: cauza.suma_necesara,
            suma_stransa: cauza.suma_stransa,
            rezolvata: cauza.rezolvata,
            adapost: cauza.adapost,
            poze: cauza.poze,
            created_at: cauza.created_at.to_string(),
            updated_at: cauza.updated_at.to_string(),
        }
    }
}

/// Multipart body of the picture upload, documented for OpenAPI only.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadPictures {
    /// One part per picture, repeated
    #[schema(value_type = Vec<String>, format = Binary)]
    pub pictures: Vec<Vec<u8>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let request: CreateCauzaRequest = serde_json::from_str(
            r#"{"titlu":"Hrana","locatie":"Iasi","sumaNecesara":300,"poze":["/x.jpg"]}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());

        let new_cauza = request.into_new_cauza(4);
        assert_eq!(new_cauza.user_id, 4);
        assert_eq!(new_cauza.suma_stransa, 0);
        assert!(!new_cauza.rezolvata);
        assert_eq!(new_cauza.descriere, "");
    }

    #[test]
    fn test_create_request_rejects_blank_title() {
        let request: CreateCauzaRequest =
            serde_json::from_str(r#"{"titlu":"","locatie":"Iasi","sumaNecesara":300}"#).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("titlu"));
    }

    #[test]
    fn test_update_request_keeps_absent_fields() {
        let request: UpdateCauzaRequest =
            serde_json::from_str(r#"{"sumaNecesara":900,"rezolvata":true}"#).unwrap();
        let changes = request.into_changes();
        assert_eq!(changes.suma_necesara, Some(900));
        assert_eq!(changes.rezolvata, Some(true));
        assert!(changes.titlu.is_none());
    }

    #[test]
    fn test_filter_params_map_to_filter() {
        let params: FilterParams = serde_json::from_str(
            r#"{"locatie":"Cluj","sumMin":10,"sumMax":20,"rezolvate":false,"adaposturi":true}"#,
        )
        .unwrap();
        let filter = CauzaFilter::from(params);
        assert_eq!(filter.sum_min, 10);
        assert_eq!(filter.sum_max, 20);
        assert!(filter.adapost);
        assert!(!filter.rezolvata);
    }

    #[test]
    fn test_response_uses_camel_case() {
        let now = jiff::Timestamp::now();
        let response = CauzaResponse::from(Cauza {
            id: 1,
            user_id: 2,
            titlu: "T".to_string(),
            descriere: String::new(),
            locatie: "Cluj".to_string(),
            suma_necesara: 100,
            suma_stransa: 5,
            rezolvata: false,
            adapost: true,
            poze: vec![],
            created_at: now,
            updated_at: now,
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["sumaNecesara"], 100);
        assert_eq!(json["sumaStransa"], 5);
        assert_eq!(json["userId"], 2);
    }
}
