//! Ports - traits the infrastructure adapters implement.

mod auth;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenKind, TokenPair, TokenService};
pub use repository::{
    CommentRepository, Persistence, PostRepository, Repositories, UnitOfWork, UserRepository,
};
