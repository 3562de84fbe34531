use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use fleet_custody::CustodyError;
use fleet_store::StoreError;
use fleet_types::FieldErrors;
use serde_json::json;
use thiserror::Error;

pub const POSTCODE_INVALID: &str = "An invalid postcode was given.";
pub const POSTCODE_UNAVAILABLE: &str =
    "There was an error validating your postcode. Please try again later.";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("invalid postcode: {0}")]
    InvalidPostcode(String),

    #[error("postcode service unavailable: {0}")]
    PostcodeServiceUnavailable(String),

    #[error("custody error: {0}")]
    Custody(#[from] CustodyError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        StoreError::BranchInUse { .. } | StoreError::DriverInUse { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MalformedBody(_) | Self::InvalidPostcode(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::PostcodeServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Custody(CustodyError::CapacityExceeded { .. })
            | Self::Custody(CustodyError::AlreadyAssigned { .. })
            | Self::Custody(CustodyError::DriverBusy { .. }) => StatusCode::BAD_REQUEST,
            Self::Custody(CustodyError::Store(e)) | Self::Store(e) => store_status(e),
            Self::Custody(CustodyError::InconsistentState { .. })
            | Self::Config(_)
            | Self::Io(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation(errors) => json!(errors),
            Self::MalformedBody(detail) => json!({ "detail": format!("JSON parse error - {detail}") }),
            Self::InvalidPostcode(_) => json!({ "postcode": [POSTCODE_INVALID] }),
            Self::PostcodeServiceUnavailable(_) => json!({ "postcode": [POSTCODE_UNAVAILABLE] }),
            _ if status == StatusCode::NOT_FOUND => json!({ "detail": "Not found." }),
            Self::Custody(err) if err.is_rule_violation() => json!({ "error": err.to_string() }),
            _ if status.is_server_error() => {
                tracing::error!(error = %self, "request failed");
                json!({ "error": "An internal error occurred." })
            }
            Self::Store(err) | Self::Custody(CustodyError::Store(err)) => {
                json!({ "error": err.to_string() })
            }
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
