use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hsn_core::{ErrorEnvelope, HsnError};

pub struct AppError {
    pub status: StatusCode,
    pub body: ErrorEnvelope,
}

impl AppError {
    pub fn not_found(code: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorEnvelope::not_found(code),
        }
    }

    pub fn invalid_query() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorEnvelope::invalid_query(),
        }
    }

    pub fn internal(msg: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorEnvelope::internal(&msg.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, axum::Json(self.body)).into_response()
    }
}

impl From<HsnError> for AppError {
    fn from(err: HsnError) -> Self {
        match &err {
            HsnError::Remote(_) => Self {
                status: StatusCode::BAD_GATEWAY,
                body: ErrorEnvelope::new(
                    "table_fetch_failed",
                    err.to_string(),
                    "Check the table URL; the previous table is still served",
                ),
            },
            HsnError::InvalidEntry { .. }
            | HsnError::DuplicateCode { .. }
            | HsnError::InvalidRate(_)
            | HsnError::MissingColumn(_)
            | HsnError::Csv(_) => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                body: ErrorEnvelope::new(
                    "invalid_table",
                    err.to_string(),
                    "Fix the table source; the previous table is still served",
                ),
            },
            _ => AppError::internal(err),
        }
    }
}
