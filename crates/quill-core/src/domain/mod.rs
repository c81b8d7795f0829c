//! Domain entities - the core business objects.

mod comment;
mod pagination;
mod post;
mod tag;
mod user;

pub use comment::{Comment, NewComment};
pub use pagination::{
    DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, MAX_PAGE_OFFSET, Page, PageRequest, SortOrder,
};
pub use post::{NewPost, Post, PostChanges, PostQuery, PostStatus};
pub use tag::{Tag, normalize_tags};
pub use user::{NewUser, User, UserChanges, UserStatus};
