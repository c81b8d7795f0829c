use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::domain::{
    DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, NewPost, Page, PageRequest, Post, PostChanges, PostQuery,
    PostStatus, SortOrder, normalize_tags,
};
use crate::error::{DomainError, DomainResult};
use crate::ports::Persistence;
use crate::services::{Outcome, UserService};
use crate::validation;

const POST_STATUSES: [&str; 3] = ["DRAFT", "PUBLISHED", "ARCHIVED"];
const SORT_ORDERS: [&str; 2] = ["ASC", "DESC"];

/// Raw listing parameters as received from a query string.
#[derive(Debug, Clone, Default)]
pub struct ListPostsInput {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CreatePostInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub cover: Option<String>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Partial post update; absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdatePostInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub cover: Option<String>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Post listing, authoring and ownership rules.
pub struct PostService {
    persistence: Arc<dyn Persistence>,
    users: Arc<UserService>,
}

impl PostService {
    pub fn new(persistence: Arc<dyn Persistence>, users: Arc<UserService>) -> Self {
        Self { persistence, users }
    }

    pub async fn get_all_posts(
        &self,
        ctx: &RequestContext,
        input: ListPostsInput,
    ) -> DomainResult<Page<Post>> {
        let query = Self::validate_query(input)?;

        let page = self.persistence.posts().find_all(&query).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            page = page.page,
            limit = page.limit,
            total = page.total,
            "Listed posts"
        );
        Ok(page)
    }

    pub async fn get_post_by_id(&self, ctx: &RequestContext, post_id: &str) -> DomainResult<Post> {
        let post_id = validation::uuid("postId", post_id)?;
        let post = self.find_post(ctx, post_id).await?;

        tracing::info!(request_id = %ctx.request_id, %post_id, "Fetched post");
        Ok(post)
    }

    pub async fn create_post(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        input: CreatePostInput,
    ) -> DomainResult<Outcome> {
        let title = validation::required("title", input.title.as_deref())?.to_string();
        let content = validation::required("content", input.content.as_deref())?.to_string();
        let status: PostStatus = validation::one_of(
            "status",
            validation::required("status", input.status.as_deref())?,
            &POST_STATUSES,
        )?;
        let tags = input
            .tags
            .ok_or_else(|| DomainError::validation("\"tags\" is required"))?;
        let cover = validation::not_empty("cover", input.cover.as_deref())?.map(str::to_string);

        let user = self.users.get_user_by_id(ctx, user_id).await?;

        let (posted_by, posted_at) = if status == PostStatus::Published {
            (Some(user.name.clone()), Some(Utc::now()))
        } else {
            (None, None)
        };

        let uow = self.persistence.begin().await?;
        let post_id = uow
            .posts()
            .create(NewPost {
                user_id: user.id,
                title,
                content,
                cover,
                status,
                posted_by,
                posted_at,
                tags: normalize_tags(&tags),
            })
            .await?;
        uow.commit().await?;

        tracing::info!(request_id = %ctx.request_id, %post_id, %user_id, "Created post successfully");
        Ok(Outcome::new("Created post successfully", post_id))
    }

    /// Update a post owned by `user_id`. Ownership is checked before the
    /// body is looked at, so a non-owner always gets a permission error.
    pub async fn update_post_by_id(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        post_id: &str,
        input: UpdatePostInput,
    ) -> DomainResult<Outcome> {
        let post_id = validation::uuid("postId", post_id)?;
        let post = self.find_post(ctx, post_id).await?;
        self.ensure_owner(ctx, &post, user_id, "Unauthorized to update post")?;

        let mut changes = PostChanges {
            title: validation::not_empty("title", input.title.as_deref())?.map(str::to_string),
            content: validation::not_empty("content", input.content.as_deref())?
                .map(str::to_string),
            cover: validation::not_empty("cover", input.cover.as_deref())?.map(str::to_string),
            status: input
                .status
                .as_deref()
                .map(|s| validation::one_of("status", s, &POST_STATUSES))
                .transpose()?,
            tags: input.tags.as_deref().map(normalize_tags),
            ..Default::default()
        };

        if changes.status == Some(PostStatus::Published) && !post.was_published() {
            let author = self.users.get_user_by_id(ctx, user_id).await?;
            changes.posted_by = Some(author.name);
            changes.posted_at = Some(Utc::now());
        }

        let uow = self.persistence.begin().await?;
        let updated_id = uow.posts().update_by_id(post.id, changes).await?;
        uow.commit().await?;

        tracing::info!(request_id = %ctx.request_id, post_id = %updated_id, "Updated post successfully");
        Ok(Outcome::new("Updated post successfully", updated_id))
    }

    pub async fn delete_post_by_id(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        post_id: &str,
    ) -> DomainResult<Outcome> {
        let post_id = validation::uuid("postId", post_id)?;
        let post = self.find_post(ctx, post_id).await?;
        self.ensure_owner(ctx, &post, user_id, "Unauthorized to delete post")?;

        let uow = self.persistence.begin().await?;
        let deleted = uow.posts().delete_by_id(post.id).await?;
        uow.commit().await?;

        tracing::info!(request_id = %ctx.request_id, %post_id, deleted, "Deleted post successfully");
        Ok(Outcome::new("Deleted post successfully", post_id))
    }

    fn validate_query(input: ListPostsInput) -> DomainResult<PostQuery> {
        let page = validation::at_least("page", input.page.unwrap_or(1), 1)?;
        let limit = validation::at_least(
            "limit",
            input.limit.unwrap_or(DEFAULT_PAGE_LIMIT as i64),
            1,
        )?;
        let limit = validation::at_most("limit", limit, MAX_PAGE_LIMIT)?;
        let page = validation::at_most("page", page, PageRequest::max_page(limit))?;
        let search = input
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let status = input
            .status
            .as_deref()
            .map(|s| validation::one_of::<PostStatus>("status", s, &POST_STATUSES))
            .transpose()?;
        let sort = input
            .sort
            .as_deref()
            .map(|s| validation::one_of::<SortOrder>("sort", s, &SORT_ORDERS))
            .transpose()?
            .unwrap_or_default();

        Ok(PostQuery {
            page: PageRequest { page, limit },
            search,
            status,
            sort,
        })
    }

    async fn find_post(&self, ctx: &RequestContext, post_id: Uuid) -> DomainResult<Post> {
        match self.persistence.posts().find_by_id(post_id).await? {
            Some(post) => Ok(post),
            None => {
                tracing::warn!(request_id = %ctx.request_id, %post_id, "Post not found");
                Err(DomainError::validation("Post not found"))
            }
        }
    }

    fn ensure_owner(
        &self,
        ctx: &RequestContext,
        post: &Post,
        user_id: Uuid,
        message: &'static str,
    ) -> DomainResult<()> {
        if post.is_owned_by(user_id) {
            return Ok(());
        }
        tracing::warn!(request_id = %ctx.request_id, post_id = %post.id, %user_id, "{message}");
        Err(DomainError::permission(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_query_defaults() {
        let query = PostService::validate_query(ListPostsInput::default()).unwrap();

        assert_eq!(query.page, PageRequest { page: 1, limit: 10 });
        assert_eq!(query.sort, SortOrder::Desc);
        assert!(query.search.is_none());
        assert!(query.status.is_none());
    }

    #[test]
    fn test_validate_query_rejects_non_positive_page_and_limit() {
        for (page, limit, message) in [
            (0, 1, "\"page\" must be greater than or equal to 1"),
            (-1, 1, "\"page\" must be greater than or equal to 1"),
            (1, 0, "\"limit\" must be greater than or equal to 1"),
            (1, -5, "\"limit\" must be greater than or equal to 1"),
        ] {
            let err = PostService::validate_query(ListPostsInput {
                page: Some(page),
                limit: Some(limit),
                ..Default::default()
            })
            .unwrap_err();
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn test_validate_query_rejects_oversized_page_and_limit() {
        let err = PostService::validate_query(ListPostsInput {
            limit: Some(101),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"limit\" must be less than or equal to 100"
        );

        let err = PostService::validate_query(ListPostsInput {
            page: Some(i64::MAX),
            limit: Some(3),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Validation);
        assert!(err.to_string().starts_with("\"page\" must be less than or equal to"));
    }

    #[test]
    fn test_validate_query_accepts_last_reachable_page() {
        let max = PageRequest::max_page(3);
        let query = PostService::validate_query(ListPostsInput {
            page: Some(max as i64),
            limit: Some(3),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(query.page.page, max);
    }

    #[test]
    fn test_validate_query_parses_filters() {
        let query = PostService::validate_query(ListPostsInput {
            page: Some(2),
            limit: Some(5),
            search: Some(" rust ".to_string()),
            status: Some("PUBLISHED".to_string()),
            sort: Some("ASC".to_string()),
        })
        .unwrap();

        assert_eq!(query.page.offset(), 5);
        assert_eq!(query.search.as_deref(), Some("rust"));
        assert_eq!(query.status, Some(PostStatus::Published));
        assert_eq!(query.sort, SortOrder::Asc);
    }

    #[test]
    fn test_validate_query_rejects_unknown_sort() {
        let err = PostService::validate_query(ListPostsInput {
            sort: Some("sideways".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "\"sort\" must be one of [\"ASC\", \"DESC\"]");
    }
}
