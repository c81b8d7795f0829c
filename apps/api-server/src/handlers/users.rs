//! User handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::User;
use quill_core::services::CreateUserInput;
use quill_shared::ApiResponse;
use quill_shared::dto::{CreateUserRequest, CreateUserResponse, CurrentUserResponse, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::observability::RequestId;
use crate::state::AppState;

fn user_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        name: user.name,
        username: user.username,
        email: user.email,
        status: user.status.to_string(),
        last_login: user.last_login,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

/// GET /users/current - Protected route
pub async fn current(identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let user = state
        .users
        .get_user_by_id(&identity.context, identity.user_id())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CurrentUserResponse {
        user: user_response(user),
    })))
}

/// POST /users
pub async fn create(
    state: web::Data<AppState>,
    request_id: RequestId,
    body: web::Json<CreateUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let outcome = state
        .users
        .create_user(
            &request_id.context(),
            CreateUserInput {
                email: req.email,
                name: req.name,
                password: req.password,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CreateUserResponse {
        message: outcome.message.to_string(),
        user_id: outcome.id,
    })))
}
