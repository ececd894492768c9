//! Error types for moneyview-api

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use moneyview_core::error::ErrorCode;
use moneyview_core::CoreError;
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest { message: message.into() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Core(e) => match e.code() {
                ErrorCode::InvalidSourceUrl | ErrorCode::InvalidSelection => StatusCode::BAD_REQUEST,
                ErrorCode::NotConfigured => StatusCode::CONFLICT,
                ErrorCode::FetchFailed | ErrorCode::UnexpectedPayload => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Core(e) => json!({ "error": e.to_details() }),
            other => json!({ "error": { "message": other.to_string() } }),
        };
        if status.is_server_error() {
            log::error!("{}", self);
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);

        let error: ApiError = CoreError::InvalidSelection { value: "1999".into() }.into();
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);

        let error: ApiError = CoreError::NotConfigured.into();
        assert_eq!(error.status(), StatusCode::CONFLICT);

        let error: ApiError = CoreError::StoreError { message: "disk".into() }.into();
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
