use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use cwl_ledger::{LedgerError, StoreError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid wallet id: {0}")]
    InvalidWalletId(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidWalletId(_) => StatusCode::BAD_REQUEST,
            Self::Ledger(LedgerError::InvalidAmount { .. })
            | Self::Ledger(LedgerError::InsufficientFunds { .. }) => StatusCode::BAD_REQUEST,
            Self::Ledger(LedgerError::WalletNotFound { .. })
            | Self::Ledger(LedgerError::NoWalletForUser { .. }) => StatusCode::NOT_FOUND,
            Self::Ledger(LedgerError::ContentionExceeded { .. }) => StatusCode::CONFLICT,
            Self::Store(StoreError::WalletExists { .. }) => StatusCode::CONFLICT,
            Self::Ledger(LedgerError::Store(_)) | Self::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
