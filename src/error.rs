use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error as ThisError;
use tracing::error;

pub const NOT_FOUND_MESSAGE: &str = "Gasto no encontrado";

#[derive(Debug, ThisError)]
pub enum GastosError {
    #[error("{0}")]
    Validation(String),

    #[error("expense {0} not found")]
    NotFound(u64),

    #[error("corrupt store at {path}: {reason}")]
    CorruptStore { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("no id left after {0}")]
    IdSpaceExhausted(u64),

    #[error("storage task failed: {0}")]
    StorageTask(#[from] tokio::task::JoinError),
}

impl GastosError {
    pub fn validation(msg: impl Into<String>) -> Self {
        GastosError::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GastosError::Validation(_) => StatusCode::BAD_REQUEST,
            GastosError::NotFound(_) => StatusCode::NOT_FOUND,
            GastosError::CorruptStore { .. }
            | GastosError::Io(_)
            | GastosError::Csv(_)
            | GastosError::RactorError(_)
            | GastosError::IdSpaceExhausted(_)
            | GastosError::StorageTask(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GastosError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match &self {
            GastosError::Validation(msg) => msg.clone(),
            GastosError::NotFound(_) => NOT_FOUND_MESSAGE.to_string(),
            _ => {
                error!(error = %self, "request failed");
                "An internal server error occurred.".to_string()
            }
        };
        (status, Json(ApiErrorResponse::new(message))).into_response()
    }
}

/// Body of every failed mutation: `{"success": false, "error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ApiErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
