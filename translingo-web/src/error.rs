use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use translingo::MtError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors surfaced to HTTP clients
///
/// Upstream detail is logged where it happens and never reaches the body.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl ApiError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_message();
        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<MtError> for ApiError {
    fn from(error: MtError) -> Self {
        match error {
            MtError::InvalidRequest(_) | MtError::InvalidLocale(_) => {
                ApiError::BadRequest(error.to_string())
            }
            MtError::DetectionUnavailable => ApiError::ServiceUnavailable(error.to_string()),
            _ => ApiError::Internal("Translation failed".to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mt_error_mapping() {
        let (status, _) =
            ApiError::from(MtError::InvalidRequest("missing".into())).status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, message) = ApiError::from(MtError::AllProvidersFailed).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Translation failed");

        let (status, _) = ApiError::from(MtError::DetectionUnavailable).status_and_message();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_provider_detail_not_exposed() {
        let (_, message) = ApiError::from(MtError::HttpStatus {
            provider: "MyMemory".into(),
            status: 429,
        })
        .status_and_message();
        assert!(!message.contains("MyMemory"));
    }
}
