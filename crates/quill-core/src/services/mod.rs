//! Services - validation, business rules and orchestration over the ports.
//!
//! Every operation validates its input before touching a repository, and
//! multi-step writes run inside a [`UnitOfWork`](crate::ports::UnitOfWork).

mod auth;
mod comment;
mod post;
mod user;

use serde::Serialize;
use uuid::Uuid;

pub use auth::AuthService;
pub use comment::CommentService;
pub use post::{CreatePostInput, ListPostsInput, PostService, UpdatePostInput};
pub use user::{CreateUserInput, UserService};

/// Result of a successful write: a human-readable message plus the id of the
/// affected entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub message: &'static str,
    pub id: Uuid,
}

impl Outcome {
    pub fn new(message: &'static str, id: Uuid) -> Self {
        Self { message, id }
    }
}
