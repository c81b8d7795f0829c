//! Authentication extractor.

use std::future::Future;
use std::pin::Pin;

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, http::header, web};
use uuid::Uuid;

use quill_core::domain::User;
use quill_core::ports::AuthError;
use quill_core::{ErrorKind, RequestContext};

use crate::middleware::error::AppError;
use crate::observability::RequestId;
use crate::state::AppState;

/// Authenticated user, resolved from the bearer access token.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, user {}!", identity.user.id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user: User,
    /// Request context already carrying the user id.
    pub context: RequestContext,
}

impl Identity {
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req);
        let request_id = req
            .extensions()
            .get::<RequestId>()
            .map(|id| id.as_str().to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Box::pin(async move {
            let Some(state) = state else {
                tracing::error!("AppState not found in app data");
                return Err(AppError::new(
                    ErrorKind::Internal,
                    "Server configuration error",
                ));
            };
            let token = token?;

            let user = state.auth.authenticate(&token).await.map_err(|e| {
                tracing::debug!(request_id = %request_id, error = %e, "Rejected bearer token");
                AppError::from(e)
            })?;

            Ok(Identity {
                context: RequestContext::new(request_id).with_user(user.id),
                user,
            })
        })
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
fn bearer_token(req: &HttpRequest) -> Result<String, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    auth_str
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()).into())
}
