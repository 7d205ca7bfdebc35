//! Error handling for the application

use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl AppError {
    /// JSON body describing the error for command output
    pub fn to_response(&self) -> PricingErrorResponse {
        match self {
            AppError::Pricing(e) => PricingErrorResponse::from(e),
            AppError::Config(msg) => {
                tracing::error!("Configuration error: {}", msg);
                error_response("config_error", self)
            }
            AppError::Io(e) => {
                tracing::error!("I/O error: {}", e);
                error_response("io_error", self)
            }
            AppError::Json(e) => {
                tracing::error!("JSON error: {}", e);
                error_response("invalid_json", self)
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {}", e);
                error_response("template_error", self)
            }
        }
    }
}

fn error_response(error_type: &str, err: &AppError) -> PricingErrorResponse {
    PricingErrorResponse {
        error_type: error_type.to_string(),
        message: err.to_string(),
        details: None,
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
