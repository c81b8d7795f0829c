//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod posts;
mod users;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::error::{
    json_error_handler, not_found, path_error_handler, query_error_handler,
};
use crate::state::AppState;

/// Register state, extractor error handlers and every route. API routes are
/// mounted under `base_path`; `GET /` is always served.
pub fn configure_app(cfg: &mut web::ServiceConfig, state: AppState, base_path: &str) {
    cfg.app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .default_service(web::to(not_found));

    if !base_path.is_empty() {
        cfg.route("/", web::get().to(health::root));
    }
    cfg.service(web::scope(base_path).configure(configure_routes));
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::root))
        .route("/health", web::get().to(health::health_check))
        // Auth routes
        .route("/auth/login", web::post().to(auth::login))
        .route("/auth/refresh", web::post().to(auth::refresh))
        // Users
        .route("/users/current", web::get().to(users::current))
        .route("/users", web::post().to(users::create))
        // Posts
        .service(
            web::resource("/posts")
                .route(web::get().to(posts::list))
                .route(web::post().to(posts::create)),
        )
        .service(
            web::resource("/posts/{post_id}")
                .route(web::get().to(posts::get))
                .route(web::patch().to(posts::update))
                .route(web::delete().to(posts::delete)),
        )
        // Comments
        .service(
            web::resource("/posts/{post_id}/comments")
                .route(web::get().to(comments::list))
                .route(web::post().to(comments::create)),
        )
        .route("/comments/{comment_id}", web::delete().to(comments::delete));
}
