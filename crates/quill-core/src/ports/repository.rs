use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Comment, NewComment, NewPost, NewUser, Page, PageRequest, Post, PostChanges, PostQuery, User,
    UserChanges,
};
use crate::error::RepoError;

/// User repository.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self, page: PageRequest) -> Result<Page<User>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn create(&self, user: NewUser) -> Result<Uuid, RepoError>;

    /// Write only the supplied fields. Fails with [`RepoError::NotFound`]
    /// when no row has this id.
    async fn update_by_id(&self, id: Uuid, changes: UserChanges) -> Result<Uuid, RepoError>;

    /// Hard delete; returns the number of rows removed.
    async fn delete_by_id(&self, id: Uuid) -> Result<u64, RepoError>;
}

/// Post repository. Tags are stored through the tag and mapping tables but
/// surface on [`Post`] as plain names.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_all(&self, query: &PostQuery) -> Result<Page<Post>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Insert the post, creating any tags that do not exist yet.
    async fn create(&self, post: NewPost) -> Result<Uuid, RepoError>;

    async fn update_by_id(&self, id: Uuid, changes: PostChanges) -> Result<Uuid, RepoError>;

    async fn delete_by_id(&self, id: Uuid) -> Result<u64, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments of one post, oldest first.
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError>;

    async fn create(&self, comment: NewComment) -> Result<Uuid, RepoError>;

    async fn delete_by_id(&self, id: Uuid) -> Result<u64, RepoError>;
}

/// A scope that hands out repositories bound to one connection: either the
/// shared pool or a single open transaction.
pub trait Repositories: Send + Sync {
    fn users(&self) -> Box<dyn UserRepository + '_>;

    fn posts(&self) -> Box<dyn PostRepository + '_>;

    fn comments(&self) -> Box<dyn CommentRepository + '_>;
}

/// Pool-wide persistence entry point.
#[async_trait]
pub trait Persistence: Repositories {
    /// Open a transaction. Repositories taken from the returned unit of
    /// work see and write only through that transaction.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepoError>;
}

/// Repositories bound to one open transaction. Dropping without
/// [`UnitOfWork::commit`] rolls back.
#[async_trait]
pub trait UnitOfWork: Repositories {
    async fn commit(self: Box<Self>) -> Result<(), RepoError>;
}
