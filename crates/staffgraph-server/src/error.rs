//! Mapping of domain errors onto HTTP responses.

use axum::extract::rejection::{BytesRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use staffgraph_core::StaffError;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    Staff(StaffError),
    /// An extractor refused the request before the handler ran.
    Rejected { status: StatusCode, message: String },
}

impl From<StaffError> for ApiError {
    fn from(value: StaffError) -> Self {
        Self::Staff(value)
    }
}

impl ApiError {
    fn rejected(status: StatusCode, reason: String) -> Self {
        Self::Rejected {
            status,
            message: StaffError::InvalidInput(reason).to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Rejected { status, .. } => *status,
            Self::Staff(err) => match err {
                StaffError::EmptyBody
                | StaffError::MissingFields
                | StaffError::InvalidInput(_)
                | StaffError::UnknownParameter(_)
                | StaffError::DuplicateEmployee { .. } => StatusCode::BAD_REQUEST,
                StaffError::NotFound(_) => StatusCode::NOT_FOUND,
                StaffError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Store failures are logged in full but never shown to the client.
        let message = match self {
            Self::Staff(StaffError::Store(detail)) => {
                tracing::error!(error = %detail, "Store operation failed");
                "Internal server error".to_string()
            }
            Self::Staff(other) => {
                tracing::debug!(status = status.as_u16(), error = %other, "Request rejected");
                other.to_string()
            }
            Self::Rejected { message, .. } => {
                tracing::debug!(
                    status = status.as_u16(),
                    error = %message,
                    "Extractor rejected request"
                );
                message
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
