//! Error translation - the only place errors become HTTP responses.

use actix_web::dev::ServiceResponse;
use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};

use quill_core::ports::AuthError;
use quill_core::{DomainError, ErrorKind};
use quill_shared::ErrorResponse;

const GENERIC_INTERNAL_MESSAGE: &str = "Oops! something went wrong.";

/// Application-level error rendered as the `{status: "ERROR", result}`
/// envelope.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        DomainError::from(err).into()
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self.kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Permission => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.kind == ErrorKind::Internal {
            tracing::error!(error = %self.message, "Internal error");
        } else {
            tracing::warn!(error_type = self.kind.as_type(), error = %self.message, "Request failed");
        }

        HttpResponse::build(self.status_code())
            .json(ErrorResponse::error(self.kind.as_type(), self.message.clone()))
    }
}

/// Middleware replacing the body of every 500 response with a generic
/// message when `hide` is set. The original error has already been logged.
pub fn mask_internal_errors<B: 'static>(hide: bool) -> ErrorHandlers<B> {
    let handlers = ErrorHandlers::new();
    if !hide {
        return handlers;
    }

    handlers.handler(StatusCode::INTERNAL_SERVER_ERROR, |res: ServiceResponse<B>| {
        let (req, _) = res.into_parts();
        let masked = HttpResponse::InternalServerError().json(ErrorResponse::error(
            ErrorKind::Internal.as_type(),
            GENERIC_INTERNAL_MESSAGE,
        ));
        Ok(ErrorHandlerResponse::Response(
            ServiceResponse::new(req, masked).map_into_right_body(),
        ))
    })
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation(err.to_string()).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation(err.to_string()).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation(err.to_string()).into()
}

/// Fallback for unmatched routes.
pub async fn not_found(req: HttpRequest) -> AppResult<HttpResponse> {
    Err(AppError::not_found(format!(
        "Cannot {} {}",
        req.method(),
        req.path()
    )))
}
