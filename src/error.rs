use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Configuration invariant violations. Fatal: rejected at load time, before
/// any computation runs.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{which} must sum to 1.0, got {sum}")]
    WeightSum { which: &'static str, sum: f64 },

    #[error("fusion upper threshold {upper} must exceed lower threshold {lower}")]
    ThresholdOrder { upper: f64, lower: f64 },

    #[error("buffer capacity must be greater than zero")]
    EmptyBuffer,
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Config(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::SerdeJson(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Anyhow(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::WeightSum {
            which: "fusion_weights",
            sum: 1.2,
        };
        assert!(err.to_string().contains("fusion_weights"));
        assert!(err.to_string().contains("1.2"));

        let err = ConfigError::ThresholdOrder {
            upper: 0.4,
            lower: 0.6,
        };
        assert!(err.to_string().contains("0.4"));
    }

    #[test]
    fn test_app_error_wraps_config_error() {
        let err: AppError = ConfigError::EmptyBuffer.into();
        assert!(err.to_string().contains("capacity"));
    }
}
