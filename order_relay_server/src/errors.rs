use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use order_relay_engine::WorkerError;
use thiserror::Error;
use vtex_tools::VtexApiError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid relay configuration. {0}")]
    ConfigurationError(String),
    #[error("{0}")]
    Conflict(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ConfigurationError(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<WorkerError> for ServerError {
    fn from(e: WorkerError) -> Self {
        match e {
            WorkerError::Misconfigured(_) => Self::ConfigurationError(e.to_string()),
            WorkerError::AlreadyRunning | WorkerError::NotRunning => Self::Conflict(e.to_string()),
            WorkerError::NoRuntime | WorkerError::Round(_) => Self::Unspecified(e.to_string()),
        }
    }
}

impl From<VtexApiError> for ServerError {
    fn from(e: VtexApiError) -> Self {
        Self::InitializeError(e.to_string())
    }
}
