use std::sync::Arc;

use uuid::Uuid;

use crate::context::RequestContext;
use crate::domain::{NewUser, User};
use crate::error::{DomainError, DomainResult, RepoError};
use crate::ports::{PasswordService, Persistence};
use crate::services::Outcome;
use crate::validation;

/// Raw registration input, validated by [`UserService::create_user`].
#[derive(Debug, Clone, Default)]
pub struct CreateUserInput {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

/// User lookups and registration.
pub struct UserService {
    persistence: Arc<dyn Persistence>,
    passwords: Arc<dyn PasswordService>,
}

impl UserService {
    pub fn new(persistence: Arc<dyn Persistence>, passwords: Arc<dyn PasswordService>) -> Self {
        Self {
            persistence,
            passwords,
        }
    }

    pub async fn get_user_by_id(&self, ctx: &RequestContext, user_id: Uuid) -> DomainResult<User> {
        let user = self.persistence.users().find_by_id(user_id).await?;

        let Some(user) = user else {
            tracing::warn!(request_id = %ctx.request_id, %user_id, "User not found");
            return Err(DomainError::validation("User not found"));
        };

        tracing::info!(request_id = %ctx.request_id, %user_id, "Fetched user");
        Ok(user)
    }

    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        input: CreateUserInput,
    ) -> DomainResult<Outcome> {
        let email = validation::email("email", input.email.as_deref())?.trim().to_string();
        let password = validation::required("password", input.password.as_deref())?;
        let name = validation::required("name", input.name.as_deref())?.trim().to_string();

        let masked = validation::mask_email(&email);
        let users = self.persistence.users();

        if users.find_by_email(&email).await?.is_some() {
            tracing::warn!(request_id = %ctx.request_id, email = %masked, "Email already exists");
            return Err(DomainError::validation("Email already exists"));
        }

        let password_hash = self.passwords.hash(password)?;

        let user_id = users
            .create(NewUser {
                name,
                username: None,
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent registration.
                RepoError::Constraint(_) => DomainError::validation("Email already exists"),
                other => other.into(),
            })?;

        tracing::info!(request_id = %ctx.request_id, %user_id, "Created user");
        Ok(Outcome::new("Created user successfully", user_id))
    }
}
