//! Post handlers. Every route requires authentication.

use actix_web::{HttpResponse, web};

use quill_core::domain::Post;
use quill_core::services::{CreatePostInput, ListPostsInput, Outcome, UpdatePostInput};
use quill_shared::ApiResponse;
use quill_shared::dto::{
    ListPostsQuery, PostListResponse, PostMutationResponse, PostRequest, PostResponse,
    SinglePostResponse,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        user_id: post.user_id,
        title: post.title,
        content: post.content,
        cover: post.cover,
        status: post.status.to_string(),
        posted_by: post.posted_by,
        posted_at: post.posted_at,
        tags: post.tags,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn mutation_response(outcome: Outcome) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(PostMutationResponse {
        message: outcome.message.to_string(),
        post_id: outcome.id,
    }))
}

/// GET /posts
pub async fn list(
    identity: Identity,
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();

    let page = state
        .posts
        .get_all_posts(
            &identity.context,
            ListPostsInput {
                page: query.page,
                limit: query.limit,
                search: query.search,
                status: query.status,
                sort: query.sort,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostListResponse {
        posts: page.items.into_iter().map(post_response).collect(),
        page: page.page,
        limit: page.limit,
        total: page.total,
    })))
}

/// POST /posts
pub async fn create(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let outcome = state
        .posts
        .create_post(
            &identity.context,
            identity.user_id(),
            CreatePostInput {
                title: req.title,
                content: req.content,
                cover: req.cover,
                status: req.status,
                tags: req.tags,
            },
        )
        .await?;

    Ok(mutation_response(outcome))
}

/// GET /posts/{post_id}
pub async fn get(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .get_post_by_id(&identity.context, &path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(SinglePostResponse {
        post: post_response(post),
    })))
}

/// PATCH /posts/{post_id} - owner only
pub async fn update(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let outcome = state
        .posts
        .update_post_by_id(
            &identity.context,
            identity.user_id(),
            &path.into_inner(),
            UpdatePostInput {
                title: req.title,
                content: req.content,
                cover: req.cover,
                status: req.status,
                tags: req.tags,
            },
        )
        .await?;

    Ok(mutation_response(outcome))
}

/// DELETE /posts/{post_id} - owner only
pub async fn delete(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .posts
        .delete_post_by_id(&identity.context, identity.user_id(), &path.into_inner())
        .await?;

    Ok(mutation_response(outcome))
}
