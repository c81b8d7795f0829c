use std::sync::Arc;

use uuid::Uuid;

use crate::context::RequestContext;
use crate::domain::{Comment, NewComment};
use crate::error::{DomainError, DomainResult};
use crate::ports::Persistence;
use crate::services::Outcome;
use crate::validation;

/// Comments on posts.
pub struct CommentService {
    persistence: Arc<dyn Persistence>,
}

impl CommentService {
    pub fn new(persistence: Arc<dyn Persistence>) -> Self {
        Self { persistence }
    }

    pub async fn list_comments(
        &self,
        ctx: &RequestContext,
        post_id: &str,
    ) -> DomainResult<Vec<Comment>> {
        let post_id = validation::uuid("postId", post_id)?;
        self.ensure_post_exists(ctx, post_id).await?;

        let comments = self.persistence.comments().find_by_post_id(post_id).await?;

        tracing::info!(request_id = %ctx.request_id, %post_id, count = comments.len(), "Listed comments");
        Ok(comments)
    }

    pub async fn create_comment(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        post_id: &str,
        content: Option<&str>,
    ) -> DomainResult<Outcome> {
        let post_id = validation::uuid("postId", post_id)?;
        let content = validation::required("content", content)?.to_string();
        self.ensure_post_exists(ctx, post_id).await?;

        let uow = self.persistence.begin().await?;
        let comment_id = uow
            .comments()
            .create(NewComment {
                post_id,
                user_id,
                content,
            })
            .await?;
        uow.commit().await?;

        tracing::info!(request_id = %ctx.request_id, %post_id, %comment_id, "Created comment");
        Ok(Outcome::new("Created comment successfully", comment_id))
    }

    /// Only the author of a comment may delete it.
    pub async fn delete_comment_by_id(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        comment_id: &str,
    ) -> DomainResult<Outcome> {
        let comment_id = validation::uuid("commentId", comment_id)?;

        let Some(comment) = self.persistence.comments().find_by_id(comment_id).await? else {
            tracing::warn!(request_id = %ctx.request_id, %comment_id, "Comment not found");
            return Err(DomainError::validation("Comment not found"));
        };

        if comment.user_id != user_id {
            tracing::warn!(request_id = %ctx.request_id, %comment_id, %user_id, "Unauthorized to delete comment");
            return Err(DomainError::permission("Unauthorized to delete comment"));
        }

        let uow = self.persistence.begin().await?;
        uow.comments().delete_by_id(comment.id).await?;
        uow.commit().await?;

        tracing::info!(request_id = %ctx.request_id, %comment_id, "Deleted comment");
        Ok(Outcome::new("Deleted comment successfully", comment_id))
    }

    async fn ensure_post_exists(&self, ctx: &RequestContext, post_id: Uuid) -> DomainResult<()> {
        if self.persistence.posts().find_by_id(post_id).await?.is_none() {
            tracing::warn!(request_id = %ctx.request_id, %post_id, "Post not found");
            return Err(DomainError::validation("Post not found"));
        }
        Ok(())
    }
}
