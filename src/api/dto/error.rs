//! Error response DTOs.

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::error::ValidationFieldError;

/// Standard error response format.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "code": "NOT_FOUND",
    "message": "Cauza not found!",
    "details": { "entity": "Cauza", "field": "id", "value": "42" },
    "request_id": "5f0c6f3e-4c1b-4a8e-9d0e-2f7c1b0a9e11"
}))]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response with code and message.
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
            request_id: None,
        }
    }

    pub fn not_found_error(entity: &str, field: &str, value: &str) -> Self {
        Self::new("NOT_FOUND", format!("{} not found!", entity)).with_details(json!({
            "entity": entity,
            "field": field,
            "value": value,
        }))
    }

    pub fn duplicate_error(entity: &str, field: &str, value: &str) -> Self {
        Self::new(
            "DUPLICATE_ENTRY",
            format!("{} with this {} already exists", entity, field),
        )
        .with_details(json!({
            "entity": entity,
            "field": field,
            "value": value,
        }))
    }

    pub fn validation_error(field: &str, reason: &str) -> Self {
        Self::new("VALIDATION_ERROR", reason.to_string()).with_details(json!({
            "field": field,
        }))
    }

    /// One entry per failing field, in field order.
    pub fn validation_errors(errors: &[ValidationFieldError]) -> Self {
        let message = errors
            .first()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| "Validation failed".to_string());
        let fields: Vec<_> = errors
            .iter()
            .map(|e| json!({ "field": e.field, "message": e.message }))
            .collect();
        Self::new("VALIDATION_ERROR", message).with_details(json!({ "errors": fields }))
    }

    /// Adds details to the error response.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Adds request ID to the error response for correlation.
    pub fn with_request_id(mut self, request_id: &str) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error_message() {
        let response = ErrorResponse::not_found_error("User", "id", "9");
        assert_eq!(response.code, "NOT_FOUND");
        assert_eq!(response.message, "User not found!");
        assert_eq!(response.details.unwrap()["value"], "9");
    }

    #[test]
    fn test_optional_fields_are_skipped() {
        let json = serde_json::to_value(ErrorResponse::new("BAD_REQUEST", "nope")).unwrap();
        assert!(json.get("details").is_none());
        assert!(json.get("request_id").is_none());
    }

    #[test]
    fn test_validation_errors_list_every_field() {
        let errors = vec![
            ValidationFieldError {
                field: "locatie".to_string(),
                message: "Location is required".to_string(),
            },
            ValidationFieldError {
                field: "titlu".to_string(),
                message: "Title is required".to_string(),
            },
        ];
        let response = ErrorResponse::validation_errors(&errors);
        assert_eq!(response.message, "Location is required");
        let details = response.details.unwrap();
        assert_eq!(details["errors"].as_array().unwrap().len(), 2);
        assert_eq!(details["errors"][1]["field"], "titlu");
    }
}
