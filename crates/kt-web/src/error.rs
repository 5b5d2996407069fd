use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kt_db::StoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    /// The store stayed locked past its busy timeout.
    #[error("{0}")]
    Timeout(String),
    #[error("{0}")]
    Internal(String),
}

impl HttpError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for HttpError {
    fn from(value: StoreError) -> Self {
        if value.is_timeout() {
            Self::Timeout(value.to_string())
        } else {
            Self::Internal(value.to_string())
        }
    }
}

impl From<tokio::task::JoinError> for HttpError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Internal(format!("query task failed: {value}"))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        let invalid = StoreError::InvalidValue(kt_core::ValidationError::UnknownCode {
            field: "kind",
            code: 9,
        });
        let err = HttpError::from(invalid);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "invalid stored value: unknown kind code: 9");

        assert_eq!(
            HttpError::Timeout("locked".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
