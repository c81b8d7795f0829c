//! Authentication handlers.

use actix_web::{HttpResponse, web};

use quill_core::ports::TokenPair;
use quill_shared::ApiResponse;
use quill_shared::dto::{LoginRequest, RefreshTokenRequest, TokenResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::observability::RequestId;
use crate::state::AppState;

fn token_response(pair: TokenPair) -> TokenResponse {
    TokenResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }
}

/// POST /auth/login
pub async fn login(
    state: web::Data<AppState>,
    request_id: RequestId,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let pair = state
        .auth
        .login(
            &request_id.context(),
            req.email.as_deref(),
            req.password.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(token_response(pair))))
}

/// POST /auth/refresh - Protected route
pub async fn refresh(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<RefreshTokenRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let pair = state
        .auth
        .refresh_token(
            &identity.context,
            identity.user_id(),
            req.access_token.as_deref(),
            req.refresh_token.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(token_response(pair))))
}
