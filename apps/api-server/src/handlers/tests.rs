use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use serde_json::{Value, json};

use quill_infra::{Argon2PasswordService, InMemoryPersistence, JwtConfig, JwtTokenService};

use super::configure_app;
use crate::observability::RequestIdMiddleware;
use crate::state::AppState;

fn test_state() -> AppState {
    AppState::from_parts(
        Arc::new(InMemoryPersistence::new()),
        Arc::new(JwtTokenService::new(JwtConfig {
            secret: "http-test-secret".to_string(),
            ..Default::default()
        })),
        Arc::new(Argon2PasswordService::new()),
    )
}

macro_rules! app {
    () => {
        app!("")
    };
    ($base:expr) => {{
        let state = test_state();
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .configure(|cfg| configure_app(cfg, state, $base)),
        )
        .await
    }};
}

macro_rules! call {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

/// Register a user and log in, yielding the login result.
macro_rules! sign_up {
    ($app:expr, $email:expr, $name:expr) => {{
        let (status, _) = call!(
            $app,
            TestRequest::post().uri("/users").set_json(json!({
                "email": $email,
                "name": $name,
                "password": "p@ssw0rd@test"
            }))
        );
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call!(
            $app,
            TestRequest::post()
                .uri("/auth/login")
                .set_json(json!({"email": $email, "password": "p@ssw0rd@test"}))
        );
        assert_eq!(status, StatusCode::OK);
        body["result"].clone()
    }};
}

fn bearer(tokens: &Value) -> (&'static str, String) {
    (
        "Authorization",
        format!("Bearer {}", tokens["accessToken"].as_str().unwrap_or_default()),
    )
}

#[actix_web::test]
async fn root_identifies_the_service() {
    let app = app!();

    let (status, body) = call!(app, TestRequest::get().uri("/"));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "SUCCESS", "result": {"message": "API Post Service"}})
    );
}

#[actix_web::test]
async fn routes_are_mounted_under_base_path() {
    let app = app!("/api");

    let (root, _) = call!(app, TestRequest::get().uri("/"));
    let (health, body) = call!(app, TestRequest::get().uri("/api/health"));
    let (unprefixed, _) = call!(app, TestRequest::get().uri("/health"));

    assert_eq!(root, StatusCode::OK);
    assert_eq!(health, StatusCode::OK);
    assert_eq!(body["result"]["status"], "ok");
    assert_eq!(unprefixed, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unknown_route_is_resource_not_found() {
    let app = app!();

    let (status, body) = call!(app, TestRequest::get().uri("/nowhere"));

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "ERROR");
    assert_eq!(body["result"]["type"], "RESOURCE_NOT_FOUND_ERROR");
    assert_eq!(body["result"]["code"], Value::Null);
}

#[actix_web::test]
async fn protected_routes_require_bearer_token() {
    let app = app!();

    let (missing, body) = call!(app, TestRequest::get().uri("/posts"));
    let (garbage, _) = call!(
        app,
        TestRequest::get()
            .uri("/users/current")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
    );

    assert_eq!(missing, StatusCode::UNAUTHORIZED);
    assert_eq!(body["result"]["type"], "AUTHENTICATION_ERROR");
    assert_eq!(garbage, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn login_and_fetch_current_user() {
    let app = app!();
    let tokens = sign_up!(app, "john@gmail.com", "John");
    assert!(tokens["refreshToken"].is_string());

    let (status, body) = call!(
        app,
        TestRequest::get()
            .uri("/users/current")
            .insert_header(bearer(&tokens))
    );

    assert_eq!(status, StatusCode::OK);
    let user = &body["result"]["user"];
    assert_eq!(user["email"], "john@gmail.com");
    assert_eq!(user["status"], "ACTIVE");
    assert!(user.get("passwordHash").is_none());
    assert!(user.get("refreshToken").is_none());
}

#[actix_web::test]
async fn wrong_password_is_authentication_error() {
    let app = app!();
    sign_up!(app, "john@gmail.com", "John");

    let (status, body) = call!(
        app,
        TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({"email": "john@gmail.com", "password": "wrong"}))
    );

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["result"]["message"], "Invalid email or password.");
}

#[actix_web::test]
async fn malformed_json_is_validation_error() {
    let app = app!();

    let (status, body) = call!(
        app,
        TestRequest::post()
            .uri("/auth/login")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["result"]["type"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn refresh_rotates_tokens() {
    let app = app!();
    let tokens = sign_up!(app, "john@gmail.com", "John");

    let (status, body) = call!(
        app,
        TestRequest::post()
            .uri("/auth/refresh")
            .insert_header(bearer(&tokens))
            .set_json(json!({
                "accessToken": tokens["accessToken"],
                "refreshToken": tokens["refreshToken"]
            }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_ne!(body["result"]["refreshToken"], tokens["refreshToken"]);

    let (status, body) = call!(
        app,
        TestRequest::post()
            .uri("/auth/refresh")
            .insert_header(bearer(&tokens))
            .set_json(json!({
                "accessToken": tokens["accessToken"],
                "refreshToken": tokens["refreshToken"]
            }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["result"]["message"], "Invalid refresh token.");
}

#[actix_web::test]
async fn post_lifecycle_enforces_ownership() {
    let app = app!();
    let owner = sign_up!(app, "john@gmail.com", "John");
    let other = sign_up!(app, "jane@gmail.com", "Jane");

    let (status, body) = call!(
        app,
        TestRequest::post()
            .uri("/posts")
            .insert_header(bearer(&owner))
            .set_json(json!({
                "title": "Hello Rust",
                "content": "Borrow checker stories",
                "status": "PUBLISHED",
                "tags": ["rust", "backend"]
            }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["message"], "Created post successfully");
    let post_id = body["result"]["postId"].as_str().unwrap_or_default().to_string();

    let (status, body) = call!(
        app,
        TestRequest::get()
            .uri(&format!("/posts/{post_id}"))
            .insert_header(bearer(&other))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["post"]["postedBy"], "John");
    assert_eq!(body["result"]["post"]["tags"], json!(["backend", "rust"]));

    let (status, body) = call!(
        app,
        TestRequest::patch()
            .uri(&format!("/posts/{post_id}"))
            .insert_header(bearer(&other))
            .set_json(json!({"title": "Hijacked"}))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["result"]["type"], "PERMISSION_ERROR");

    let (status, body) = call!(
        app,
        TestRequest::delete()
            .uri(&format!("/posts/{post_id}"))
            .insert_header(bearer(&owner))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["postId"], post_id.as_str());
}

#[actix_web::test]
async fn listing_rejects_invalid_paging() {
    let app = app!();
    let tokens = sign_up!(app, "john@gmail.com", "John");

    let (status, body) = call!(
        app,
        TestRequest::get()
            .uri("/posts?page=0")
            .insert_header(bearer(&tokens))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["result"]["message"],
        "\"page\" must be greater than or equal to 1"
    );

    let (status, body) = call!(
        app,
        TestRequest::get()
            .uri("/posts?limit=abc")
            .insert_header(bearer(&tokens))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["result"]["type"], "VALIDATION_ERROR");

    let (status, body) = call!(app, TestRequest::get().uri("/posts").insert_header(bearer(&tokens)));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["page"], 1);
    assert_eq!(body["result"]["limit"], 10);
    assert_eq!(body["result"]["total"], 0);
}

#[actix_web::test]
async fn comments_round_trip_through_http() {
    let app = app!();
    let tokens = sign_up!(app, "john@gmail.com", "John");

    let (_, body) = call!(
        app,
        TestRequest::post()
            .uri("/posts")
            .insert_header(bearer(&tokens))
            .set_json(json!({
                "title": "Draft",
                "content": "Soon",
                "status": "DRAFT",
                "tags": []
            }))
    );
    let post_id = body["result"]["postId"].as_str().unwrap_or_default().to_string();

    let (status, body) = call!(
        app,
        TestRequest::post()
            .uri(&format!("/posts/{post_id}/comments"))
            .insert_header(bearer(&tokens))
            .set_json(json!({"content": "First!"}))
    );
    assert_eq!(status, StatusCode::OK);
    let comment_id = body["result"]["commentId"].as_str().unwrap_or_default().to_string();

    let (_, body) = call!(
        app,
        TestRequest::get()
            .uri(&format!("/posts/{post_id}/comments"))
            .insert_header(bearer(&tokens))
    );
    assert_eq!(body["result"]["comments"][0]["content"], "First!");

    let (status, _) = call!(
        app,
        TestRequest::delete()
            .uri(&format!("/comments/{comment_id}"))
            .insert_header(bearer(&tokens))
    );
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn request_id_is_echoed() {
    let app = app!();

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/health")
            .insert_header(("X-Request-ID", "req-123"))
            .to_request(),
    )
    .await;

    assert_eq!(
        resp.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("req-123")
    );
}

#[actix_web::test]
async fn seeded_demo_user_can_log_in() {
    let state = test_state();
    state.seed_demo_user().await.unwrap();
    // Seeding twice is a no-op.
    state.seed_demo_user().await.unwrap();
    let app = test::init_service(
        App::new().configure(|cfg| configure_app(cfg, state, "")),
    )
    .await;

    let (ok, body) = call!(
        app,
        TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({"email": "john@gmail.com", "password": "p@ssw0rd@test"}))
    );
    let (rejected, error) = call!(
        app,
        TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({"email": "john@gmail.com", "password": "wrong"}))
    );

    assert_eq!(ok, StatusCode::OK);
    assert!(body["result"]["refreshToken"].is_string());
    assert_eq!(rejected, StatusCode::UNAUTHORIZED);
    assert_eq!(error["result"]["type"], "AUTHENTICATION_ERROR");
}
