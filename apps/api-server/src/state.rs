//! Application state - the composition root shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{PasswordService, Persistence, TokenService};
use quill_core::services::{
    AuthService, CommentService, CreateUserInput, PostService, UserService,
};
use quill_core::{DomainError, DomainResult, RequestContext};
use quill_infra::{Argon2PasswordService, DatabaseConfig, InMemoryPersistence, JwtTokenService};

#[cfg(feature = "postgres")]
use quill_infra::PostgresPersistence;

use crate::config::AppConfig;

const DEMO_EMAIL: &str = "john@gmail.com";
const DEMO_PASSWORD: &str = "p@ssw0rd@test";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub posts: Arc<PostService>,
    pub comments: Arc<CommentService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let persistence = Self::persistence(config.database.as_ref()).await;
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        let state = Self::from_parts(persistence, tokens, passwords);
        if config.seed_demo_user {
            if let Err(e) = state.seed_demo_user().await {
                tracing::error!("Failed to seed demo user: {}", e);
            }
        }

        tracing::info!("Application state initialized");
        state
    }

    /// Register the demo account unless its email is already taken.
    pub async fn seed_demo_user(&self) -> DomainResult<()> {
        let ctx = RequestContext::background();
        match self
            .users
            .create_user(
                &ctx,
                CreateUserInput {
                    email: Some(DEMO_EMAIL.to_string()),
                    name: Some("John Doe".to_string()),
                    password: Some(DEMO_PASSWORD.to_string()),
                },
            )
            .await
        {
            Ok(outcome) => {
                tracing::info!(user_id = %outcome.id, "Seeded demo user");
                Ok(())
            }
            Err(DomainError::Validation(msg)) if msg == "Email already exists" => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Wire the services over the given adapters.
    pub fn from_parts(
        persistence: Arc<dyn Persistence>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        let users = Arc::new(UserService::new(persistence.clone(), passwords.clone()));

        Self {
            auth: Arc::new(AuthService::new(persistence.clone(), tokens, passwords)),
            posts: Arc::new(PostService::new(persistence.clone(), users.clone())),
            comments: Arc::new(CommentService::new(persistence)),
            users,
        }
    }

    #[cfg(feature = "postgres")]
    async fn persistence(db_config: Option<&DatabaseConfig>) -> Arc<dyn Persistence> {
        let Some(config) = db_config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Arc::new(InMemoryPersistence::new());
        };

        match PostgresPersistence::connect(config).await {
            Ok(persistence) => Arc::new(persistence),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Arc::new(InMemoryPersistence::new())
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn persistence(_db_config: Option<&DatabaseConfig>) -> Arc<dyn Persistence> {
        tracing::info!("Running without postgres feature - using in-memory persistence");
        Arc::new(InMemoryPersistence::new())
    }
}
