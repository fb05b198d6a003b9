use crate::error::AppError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Utility for converting database errors to structured AppError variants.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    ///
    /// # Arguments
    /// * `error` - The Diesel error to convert
    /// * `operation` - Description of the database operation that failed
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "Resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn diesel::result::DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let message = info.message().to_string();

        match kind {
            DatabaseErrorKind::UniqueViolation => {
                let (entity, field) = Self::split_constraint(info.constraint_name());
                AppError::Duplicate {
                    entity,
                    field,
                    value: Self::extract_key_value(info.details()).unwrap_or_default(),
                }
            }
            DatabaseErrorKind::ForeignKeyViolation => {
                let (entity, field) = Self::split_constraint(info.constraint_name());
                AppError::Validation {
                    field,
                    reason: format!("Invalid reference from {}", entity),
                }
            }
            DatabaseErrorKind::NotNullViolation => AppError::Validation {
                field: info.column_name().unwrap_or("unknown").to_string(),
                reason: "Field is required".to_string(),
            },
            DatabaseErrorKind::CheckViolation => {
                let (entity, field) = Self::split_constraint(info.constraint_name());
                AppError::Validation {
                    field,
                    reason: format!("Check constraint failed for {}", entity),
                }
            }
            _ => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::msg(message),
            },
        }
    }

    /// Splits a PostgreSQL constraint name of the form `{table}_{column}_{suffix}`.
    fn split_constraint(constraint: Option<&str>) -> (String, String) {
        let Some(name) = constraint else {
            return ("unknown".to_string(), "unknown".to_string());
        };

        let trimmed = ["_key", "_fkey", "_check", "_pkey"]
            .iter()
            .find_map(|suffix| name.strip_suffix(suffix))
            .unwrap_or(name);

        match trimmed.split_once('_') {
            Some((table, column)) => (table.to_string(), column.to_string()),
            None => (trimmed.to_string(), "unknown".to_string()),
        }
    }

    /// Extracts the value from a detail line like `Key (email)=(a@b.c) already exists.`
    fn extract_key_value(details: Option<&str>) -> Option<String> {
        let details = details?;
        let start = details.find(")=(")? + 3;
        let end = details[start..].find(')')? + start;
        Some(details[start..end].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_unique_constraint() {
        let (entity, field) = DatabaseErrorConverter::split_constraint(Some("users_email_key"));
        assert_eq!(entity, "users");
        assert_eq!(field, "email");
    }

    #[test]
    fn test_split_foreign_key_constraint() {
        let (entity, field) =
            DatabaseErrorConverter::split_constraint(Some("cauze_user_id_fkey"));
        assert_eq!(entity, "cauze");
        assert_eq!(field, "user_id");
    }

    #[test]
    fn test_split_missing_constraint() {
        let (entity, field) = DatabaseErrorConverter::split_constraint(None);
        assert_eq!(entity, "unknown");
        assert_eq!(field, "unknown");
    }

    #[test]
    fn test_extract_key_value() {
        let value = DatabaseErrorConverter::extract_key_value(Some(
            "Key (email)=(ana@example.com) already exists.",
        ));
        assert_eq!(value.as_deref(), Some("ana@example.com"));
        assert_eq!(DatabaseErrorConverter::extract_key_value(None), None);
    }

    #[test]
    fn test_convert_not_found() {
        let err = DatabaseErrorConverter::convert_diesel_error(DieselError::NotFound, "select");
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
