use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Forbidden: {0}")]
    Forbidden(anyhow::Error),

    #[error("Conflict: {0}")]
    Conflict(anyhow::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

/// Error body handed to the settings layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    /// Stable machine-readable code for the error class.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::Forbidden(_) => "forbidden",
            AppError::Conflict(_) => "conflict",
            AppError::InternalError(_) => "internal_error",
            AppError::SerializationError(_) => "serialization_error",
            AppError::ConfigError(_) => "config_error",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let (error, details) = match self {
            AppError::ValidationError(err) => {
                ("Validation error".to_string(), Some(err.to_string()))
            }
            AppError::NotFound(err)
            | AppError::Forbidden(err)
            | AppError::Conflict(err) => (err.to_string(), None),
            AppError::InternalError(err) => {
                ("Internal error".to_string(), Some(format!("{:#?}", err)))
            }
            AppError::SerializationError(err) => {
                ("Malformed document".to_string(), Some(err.to_string()))
            }
            AppError::ConfigError(err) => {
                ("Configuration error".to_string(), Some(err.to_string()))
            }
        };

        ErrorResponse {
            code: self.code(),
            error,
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_response_keeps_message() {
        let err = AppError::Conflict(anyhow::anyhow!("user already signs another stage"));
        let response = err.to_response();
        assert_eq!(response.code, "conflict");
        assert_eq!(response.error, "user already signs another stage");
        assert!(response.details.is_none());
    }

    #[test]
    fn test_serialization_error_has_details() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AppError::from(parse_err);
        let response = err.to_response();
        assert_eq!(response.code, "serialization_error");
        assert!(response.details.is_some());
    }

    #[test]
    fn test_details_skipped_when_absent() {
        let err = AppError::Forbidden(anyhow::anyhow!("owner row is read-only"));
        let body = serde_json::to_value(err.to_response()).unwrap();
        assert!(body.get("details").is_none());
        assert_eq!(body["code"], "forbidden");
    }
}
