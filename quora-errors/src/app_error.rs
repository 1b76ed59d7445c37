use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name to message, ordered by field name.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("validation error: {}", describe_fields(.0))]
    Validation(FieldErrors),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

fn describe_fields(fields: &FieldErrors) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl AppError {
    pub fn validation(field: &str, message: &str) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), message.to_string());
        Self::Validation(fields)
    }

    /// Fails with `Validation` when any field was rejected.
    pub fn check(fields: FieldErrors) -> Result<(), Self> {
        if fields.is_empty() {
            Ok(())
        } else {
            Err(Self::Validation(fields))
        }
    }

    pub fn fields(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(fields) => Some(fields),
            _ => None,
        }
    }

    /// Message safe to show to a caller. Internal details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(_) => "validation error".to_string(),
            Self::MalformedPayload(_) => "failed to decode payload".to_string(),
            Self::Unauthorized(msg) => msg.clone(),
            Self::Forbidden(msg) => msg.clone(),
            Self::NotFound(_) => self.to_string(),
            Self::Conflict(_) => "request conflicted with a concurrent change, retry".to_string(),
            Self::Internal(_) => "internal server error".to_string(),
        }
    }
}

#[cfg(feature = "axum")]
mod axum_impl {
    use super::{AppError, FieldErrors};
    use axum::extract::rejection::{JsonRejection, QueryRejection};
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;

    #[derive(serde::Serialize)]
    struct ErrorResponse {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        fields: Option<FieldErrors>,
    }

    impl AppError {
        pub fn status_code(&self) -> StatusCode {
            match self {
                AppError::Validation(_) | AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
                AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                AppError::Forbidden(_) => StatusCode::FORBIDDEN,
                AppError::NotFound(_) => StatusCode::NOT_FOUND,
                AppError::Conflict(_) => StatusCode::CONFLICT,
                AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl From<JsonRejection> for AppError {
        fn from(rejection: JsonRejection) -> Self {
            AppError::MalformedPayload(rejection.body_text())
        }
    }

    impl From<QueryRejection> for AppError {
        fn from(rejection: QueryRejection) -> Self {
            AppError::MalformedPayload(rejection.body_text())
        }
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = self.status_code();
            let body = ErrorResponse {
                message: self.user_message(),
                fields: self.fields().cloned(),
            };
            (status, Json(body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_passes_without_fields() {
        assert_eq!(AppError::check(FieldErrors::new()), Ok(()));
    }

    #[test]
    fn test_check_keeps_every_field() {
        let mut fields = FieldErrors::new();
        fields.insert("type".to_string(), "must be a valid value".to_string());
        fields.insert("answerId".to_string(), "cannot be blank".to_string());

        let err = AppError::check(fields).unwrap_err();
        let fields = err.fields().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(
            err.to_string(),
            "validation error: answerId: cannot be blank; type: must be a valid value"
        );
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let err = AppError::Internal("connection reset by peer".to_string());
        assert_eq!(err.user_message(), "internal server error");
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_status_codes() {
        use axum::http::StatusCode;

        assert_eq!(AppError::validation("type", "x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("answer".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
