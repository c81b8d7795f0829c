use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::domain::{User, UserChanges};
use crate::error::{DomainError, DomainResult};
use crate::ports::{AuthError, PasswordService, Persistence, TokenKind, TokenPair, TokenService};
use crate::validation;

const INVALID_CREDENTIALS: &str = "Invalid email or password.";
const INVALID_USER: &str = "Invalid user.";
const INVALID_REFRESH_TOKEN: &str = "Invalid refresh token.";

/// Issues, verifies and rotates access/refresh token pairs.
///
/// The only server-side session state is the user's current refresh token;
/// every login or refresh overwrites it, which invalidates the previous one.
pub struct AuthService {
    persistence: Arc<dyn Persistence>,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
}

impl AuthService {
    pub fn new(
        persistence: Arc<dyn Persistence>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            persistence,
            tokens,
            passwords,
        }
    }

    /// Exchange credentials for a new token pair.
    ///
    /// Unknown email and wrong password fail with the same message so the
    /// endpoint cannot be used to enumerate accounts.
    pub async fn login(
        &self,
        ctx: &RequestContext,
        email: Option<&str>,
        password: Option<&str>,
    ) -> DomainResult<TokenPair> {
        let email = validation::email("email", email)?.trim();
        let password = validation::required("password", password)?;
        let masked = validation::mask_email(email);

        let Some(user) = self.persistence.users().find_by_email(email).await? else {
            tracing::warn!(request_id = %ctx.request_id, email = %masked, "Login for unknown email");
            return Err(DomainError::authentication(INVALID_CREDENTIALS));
        };

        if !self.passwords.verify(password, &user.password_hash)? {
            tracing::warn!(request_id = %ctx.request_id, email = %masked, "Login with invalid password");
            return Err(DomainError::authentication(INVALID_CREDENTIALS));
        }

        let pair = self.tokens.generate_pair(user.id)?;
        self.store_refresh_token(
            user.id,
            UserChanges::rotate_refresh_token(pair.refresh_token.clone()).with_last_login(Utc::now()),
        )
        .await?;

        tracing::info!(request_id = %ctx.request_id, user_id = %user.id, "User logged in");
        Ok(pair)
    }

    /// Rotate the pair of an authenticated user.
    ///
    /// Succeeds only when `refresh_token` is exactly the value stored for
    /// the user; the stored value is then replaced by the new one.
    pub async fn refresh_token(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> DomainResult<TokenPair> {
        validation::required("accessToken", access_token)?;
        let refresh_token = validation::required("refreshToken", refresh_token)?;

        let Some(user) = self.persistence.users().find_by_id(user_id).await? else {
            tracing::warn!(request_id = %ctx.request_id, %user_id, "Refresh for unknown user");
            return Err(DomainError::authentication(INVALID_USER));
        };

        if user.refresh_token.as_deref() != Some(refresh_token) {
            tracing::warn!(request_id = %ctx.request_id, %user_id, "Refresh token mismatch");
            return Err(DomainError::authentication(INVALID_REFRESH_TOKEN));
        }

        let pair = self.tokens.generate_pair(user.id)?;
        self.store_refresh_token(
            user.id,
            UserChanges::rotate_refresh_token(pair.refresh_token.clone()),
        )
        .await?;

        tracing::info!(request_id = %ctx.request_id, %user_id, "Rotated refresh token");
        Ok(pair)
    }

    /// Resolve a bearer access token to the user it was issued for.
    pub async fn authenticate(&self, token: &str) -> DomainResult<User> {
        let claims = self.tokens.validate_token(token)?;
        if claims.kind != TokenKind::Access {
            return Err(AuthError::WrongTokenType {
                expected: TokenKind::Access,
            }
            .into());
        }

        self.persistence
            .users()
            .find_by_id(claims.user_id)
            .await?
            .ok_or_else(|| DomainError::authentication(INVALID_USER))
    }

    /// Persist rotated session state. Awaited: a failed write fails the
    /// request instead of handing out tokens that cannot be refreshed.
    async fn store_refresh_token(&self, user_id: Uuid, changes: UserChanges) -> DomainResult<()> {
        let uow = self.persistence.begin().await?;
        uow.users().update_by_id(user_id, changes).await?;
        uow.commit().await?;
        Ok(())
    }
}
