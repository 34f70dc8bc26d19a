use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::response::ApiResponse;

pub const DEFAULT_UPSTREAM_MESSAGE: &str = "Error retrieving data from external API";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch data from external API";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String },

    #[error("Failed to fetch data from external API: {detail}")]
    Fetch { detail: String },

    #[error("{message}")]
    Upstream { code: u16, message: String },

    #[error("Unauthenticated.")]
    Unauthenticated,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is inactive. Please contact an administrator.")]
    InactiveAccount,

    #[error("{message}")]
    Forbidden { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Password hashing failed: {message}")]
    PasswordHash { message: String },

    #[error("Configuration error in {field}: {message}")]
    Config { field: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Client,
    Auth,
    Upstream,
    Internal,
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } | Self::NotFound { .. } | Self::InvalidInput { .. } => {
                ErrorCategory::Client
            }
            Self::Unauthenticated
            | Self::InvalidCredentials
            | Self::InactiveAccount
            | Self::Forbidden { .. } => ErrorCategory::Auth,
            Self::Fetch { .. } | Self::Upstream { .. } => ErrorCategory::Upstream,
            Self::Config { .. }
            | Self::PasswordHash { .. }
            | Self::Io(_)
            | Self::Serialization(_) => ErrorCategory::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthenticated | Self::InvalidCredentials | Self::InactiveAccount => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            // 上游回傳的 RC 只有在是合法的 4xx/5xx 時才直接沿用
            Self::Upstream { code, .. } => StatusCode::from_u16(*code)
                .ok()
                .filter(|status| status.is_client_error() || status.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::Fetch { .. }
            | Self::Config { .. }
            | Self::PasswordHash { .. }
            | Self::Io(_)
            | Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_envelope(self) -> ApiResponse<()> {
        match self {
            Self::Fetch { detail } => ApiResponse::error(FETCH_FAILED_MESSAGE).with_detail(detail),
            other => ApiResponse::error(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self.category() {
            ErrorCategory::Upstream | ErrorCategory::Internal => {
                tracing::error!(status = status.as_u16(), "❌ Request failed: {}", self)
            }
            ErrorCategory::Client | ErrorCategory::Auth => {
                tracing::debug!(status = status.as_u16(), "Request rejected: {}", self)
            }
        }

        (status, Json(self.into_envelope())).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
