//! Comment handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::Comment;
use quill_shared::ApiResponse;
use quill_shared::dto::{
    CommentListResponse, CommentMutationResponse, CommentResponse, CreateCommentRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn comment_response(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        user_id: comment.user_id,
        content: comment.content,
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}

/// GET /posts/{post_id}/comments
pub async fn list(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let comments = state
        .comments
        .list_comments(&identity.context, &path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CommentListResponse {
        comments: comments.into_iter().map(comment_response).collect(),
    })))
}

/// POST /posts/{post_id}/comments
pub async fn create(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .comments
        .create_comment(
            &identity.context,
            identity.user_id(),
            &path.into_inner(),
            body.content.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CommentMutationResponse {
        message: outcome.message.to_string(),
        comment_id: outcome.id,
    })))
}

/// DELETE /comments/{comment_id} - author only
pub async fn delete(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .comments
        .delete_comment_by_id(&identity.context, identity.user_id(), &path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CommentMutationResponse {
        message: outcome.message.to_string(),
        comment_id: outcome.id,
    })))
}
