//! In-memory persistence, used when no database is configured and in tests.
//!
//! Mirrors the constraints the PostgreSQL schema enforces: unique emails,
//! owner foreign keys and cascading deletes.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
use uuid::Uuid;

use quill_core::domain::{
    Comment, NewComment, NewPost, NewUser, Page, PageRequest, Post, PostChanges, PostQuery,
    SortOrder, User, UserChanges,
};
use quill_core::error::RepoError;
use quill_core::ports::{
    CommentRepository, Persistence, PostRepository, Repositories, UnitOfWork, UserRepository,
};

#[derive(Debug, Clone, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
}

/// Process-local store. Clones share the same tables.
#[derive(Clone, Default)]
pub struct InMemoryPersistence {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repositories for InMemoryPersistence {
    fn users(&self) -> Box<dyn UserRepository + '_> {
        Box::new(InMemoryUserRepository {
            tables: &self.tables,
        })
    }

    fn posts(&self) -> Box<dyn PostRepository + '_> {
        Box::new(InMemoryPostRepository {
            tables: &self.tables,
        })
    }

    fn comments(&self) -> Box<dyn CommentRepository + '_> {
        Box::new(InMemoryCommentRepository {
            tables: &self.tables,
        })
    }
}

#[async_trait]
impl Persistence for InMemoryPersistence {
    /// Holds the store's write lock until commit or drop, so units of work
    /// are serialized. Writes go to a staged copy.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepoError> {
        let guard = self.tables.clone().write_owned().await;
        let staged = RwLock::new(guard.clone());
        Ok(Box::new(InMemoryUnitOfWork { guard, staged }))
    }
}

/// Staged copy of the tables. Dropping it discards the changes.
pub struct InMemoryUnitOfWork {
    guard: OwnedRwLockWriteGuard<Tables>,
    staged: RwLock<Tables>,
}

impl Repositories for InMemoryUnitOfWork {
    fn users(&self) -> Box<dyn UserRepository + '_> {
        Box::new(InMemoryUserRepository {
            tables: &self.staged,
        })
    }

    fn posts(&self) -> Box<dyn PostRepository + '_> {
        Box::new(InMemoryPostRepository {
            tables: &self.staged,
        })
    }

    fn comments(&self) -> Box<dyn CommentRepository + '_> {
        Box::new(InMemoryCommentRepository {
            tables: &self.staged,
        })
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        let Self { mut guard, staged } = *self;
        *guard = staged.into_inner();
        Ok(())
    }
}

struct InMemoryUserRepository<'a> {
    tables: &'a RwLock<Tables>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository<'_> {
    async fn find_all(&self, page: PageRequest) -> Result<Page<User>, RepoError> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(users, page))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<Uuid, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(RepoError::Constraint("users_email_key".to_string()));
        }
        if let Some(username) = &new_user.username {
            if tables
                .users
                .values()
                .any(|u| u.username.as_ref() == Some(username))
            {
                return Err(RepoError::Constraint("users_username_key".to_string()));
            }
        }

        let user = User::new(new_user);
        let id = user.id;
        tables.users.insert(id, user);
        Ok(id)
    }

    async fn update_by_id(&self, id: Uuid, changes: UserChanges) -> Result<Uuid, RepoError> {
        let mut tables = self.tables.write().await;
        let user = tables.users.get_mut(&id).ok_or(RepoError::NotFound)?;
        user.apply(changes);
        Ok(id)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<u64, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(0);
        }

        let owned: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|p| p.user_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in &owned {
            tables.posts.remove(post_id);
        }
        tables
            .comments
            .retain(|_, c| c.user_id != id && !owned.contains(&c.post_id));
        Ok(1)
    }
}

struct InMemoryPostRepository<'a> {
    tables: &'a RwLock<Tables>,
}

#[async_trait]
impl PostRepository for InMemoryPostRepository<'_> {
    async fn find_all(&self, query: &PostQuery) -> Result<Page<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        posts.sort_by(|a, b| {
            compare_posted_by(a, b, query.sort).then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(paginate(posts, query.page))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn create(&self, new_post: NewPost) -> Result<Uuid, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&new_post.user_id) {
            return Err(RepoError::Constraint("posts_user_id_fkey".to_string()));
        }

        let mut post = Post::new(new_post);
        post.tags.sort();
        let id = post.id;
        tables.posts.insert(id, post);
        Ok(id)
    }

    async fn update_by_id(&self, id: Uuid, changes: PostChanges) -> Result<Uuid, RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.apply(changes);
        post.tags.sort();
        Ok(id)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<u64, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Ok(0);
        }
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(1)
    }
}

struct InMemoryCommentRepository<'a> {
    tables: &'a RwLock<Tables>,
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository<'_> {
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn create(&self, new_comment: NewComment) -> Result<Uuid, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&new_comment.post_id) {
            return Err(RepoError::Constraint("comments_post_id_fkey".to_string()));
        }
        if !tables.users.contains_key(&new_comment.user_id) {
            return Err(RepoError::Constraint("comments_user_id_fkey".to_string()));
        }

        let comment = Comment::new(new_comment);
        let id = comment.id;
        tables.comments.insert(id, comment);
        Ok(id)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<u64, RepoError> {
        let mut tables = self.tables.write().await;
        Ok(tables.comments.remove(&id).map_or(0, |_| 1))
    }
}

fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let window = items
        .into_iter()
        .skip(request.offset() as usize)
        .take(request.limit as usize)
        .collect();
    Page::new(window, request, total)
}

/// NULLs sort last ascending and first descending, as in PostgreSQL.
fn compare_posted_by(a: &Post, b: &Post, sort: SortOrder) -> Ordering {
    let ordering = match (&a.posted_by, &b.posted_by) {
        (Some(x), Some(y)) => x.cmp(y),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    };
    match sort {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}
