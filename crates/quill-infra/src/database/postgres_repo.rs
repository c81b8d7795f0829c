//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, Func, LikeExpr, OnConflict, Query, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use quill_core::domain::{
    Comment, NewComment, NewPost, NewUser, Page, PageRequest, Post, PostChanges, PostQuery,
    SortOrder, Tag, User, UserChanges,
};
use quill_core::error::RepoError;
use quill_core::ports::{CommentRepository, PostRepository, UserRepository};
use quill_core::validation::mask_email;

use super::entity::{comment, post, post_tag_mapping, tag, user};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository<'c, C> = PostgresBaseRepository<'c, user::Entity, C>;

/// PostgreSQL post repository.
pub type PostgresPostRepository<'c, C> = PostgresBaseRepository<'c, post::Entity, C>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository<'c, C> = PostgresBaseRepository<'c, comment::Entity, C>;

#[async_trait]
impl<C> UserRepository for PostgresUserRepository<'_, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_all(&self, page: PageRequest) -> Result<Page<User>, RepoError> {
        let paginator = user::Entity::find()
            .order_by_desc(user::Column::CreatedAt)
            .paginate(self.conn, page.limit);

        let total = paginator.num_items().await.map_err(map_db_err)?;
        let models = paginator
            .fetch_page(page.page - 1)
            .await
            .map_err(map_db_err)?;

        Ok(Page::new(
            models.into_iter().map(Into::into).collect(),
            page,
            total,
        ))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.find_model(id).await?.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.conn)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, new_user: NewUser) -> Result<Uuid, RepoError> {
        let user = User::new(new_user);
        let id = user.id;
        self.insert_model(user::ActiveModel::from(user)).await?;
        Ok(id)
    }

    async fn update_by_id(&self, id: Uuid, changes: UserChanges) -> Result<Uuid, RepoError> {
        let mut active = user::ActiveModel {
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(status) = changes.status {
            active.status = Set(status.into());
        }
        if let Some(last_login) = changes.last_login {
            active.last_login = Set(Some(last_login.into()));
        }
        if let Some(refresh_token) = changes.refresh_token {
            active.refresh_token = Set(Some(refresh_token));
        }

        let result = user::Entity::update_many()
            .set(active)
            .filter(user::Column::Id.eq(id))
            .exec(self.conn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(id)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<u64, RepoError> {
        self.delete_model(id).await
    }
}

impl<C> PostgresPostRepository<'_, C>
where
    C: ConnectionTrait,
{
    /// Resolve tag names for a batch of post rows, sorted by name.
    async fn attach_tags(&self, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let rows = post_tag_mapping::Entity::find()
            .filter(post_tag_mapping::Column::PostId.is_in(ids))
            .find_also_related(tag::Entity)
            .order_by_asc(tag::Column::Name)
            .all(self.conn)
            .await
            .map_err(map_db_err)?;

        let mut tags: HashMap<Uuid, Vec<String>> = HashMap::new();
        for (mapping, tag) in rows {
            if let Some(tag) = tag {
                tags.entry(mapping.post_id).or_default().push(tag.name);
            }
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let names = tags.remove(&model.id).unwrap_or_default();
                post::into_domain(model, names)
            })
            .collect())
    }

    /// Create any missing tags, then map all of `names` to the post.
    async fn link_tags(&self, post_id: Uuid, names: &[String]) -> Result<(), RepoError> {
        if names.is_empty() {
            return Ok(());
        }

        let new_tags = names
            .iter()
            .map(|name| tag::ActiveModel::from(Tag::new(name.clone())));
        match tag::Entity::insert_many(new_tags)
            .on_conflict(OnConflict::column(tag::Column::Name).do_nothing().to_owned())
            .exec_without_returning(self.conn)
            .await
        {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(map_db_err(e)),
        }

        let tags = tag::Entity::find()
            .filter(tag::Column::Name.is_in(names.iter().cloned()))
            .all(self.conn)
            .await
            .map_err(map_db_err)?;
        if tags.is_empty() {
            return Ok(());
        }

        let mappings = tags.into_iter().map(|tag| post_tag_mapping::ActiveModel {
            post_id: Set(post_id),
            tag_id: Set(tag.id),
        });
        post_tag_mapping::Entity::insert_many(mappings)
            .exec_without_returning(self.conn)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }

    fn search_condition(search: &str) -> Condition {
        let needle = search.to_lowercase();
        let pattern = format!("%{}%", escape_like(&needle));

        let tagged = Query::select()
            .column((post_tag_mapping::Entity, post_tag_mapping::Column::PostId))
            .from(post_tag_mapping::Entity)
            .inner_join(
                tag::Entity,
                Expr::col((tag::Entity, tag::Column::Id))
                    .equals((post_tag_mapping::Entity, post_tag_mapping::Column::TagId)),
            )
            .and_where(Expr::expr(Func::lower(Expr::col((tag::Entity, tag::Column::Name)))).eq(needle))
            .to_owned();

        Condition::any()
            .add(
                Expr::expr(Func::lower(Expr::col((post::Entity, post::Column::Title))))
                    .like(LikeExpr::new(pattern).escape('\\')),
            )
            .add(post::Column::Id.in_subquery(tagged))
    }
}

#[async_trait]
impl<C> PostRepository for PostgresPostRepository<'_, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_all(&self, query: &PostQuery) -> Result<Page<Post>, RepoError> {
        let mut select = post::Entity::find();
        if let Some(status) = query.status {
            select = select.filter(post::Column::Status.eq(post::Status::from(status)));
        }
        if let Some(search) = &query.search {
            select = select.filter(Self::search_condition(search));
        }
        select = match query.sort {
            SortOrder::Asc => select.order_by_asc(post::Column::PostedBy),
            SortOrder::Desc => select.order_by_desc(post::Column::PostedBy),
        };

        let paginator = select
            .order_by_desc(post::Column::CreatedAt)
            .paginate(self.conn, query.page.limit);
        let total = paginator.num_items().await.map_err(map_db_err)?;
        let models = paginator
            .fetch_page(query.page.page - 1)
            .await
            .map_err(map_db_err)?;

        Ok(Page::new(self.attach_tags(models).await?, query.page, total))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let Some(model) = self.find_model(id).await? else {
            return Ok(None);
        };
        Ok(self.attach_tags(vec![model]).await?.pop())
    }

    async fn create(&self, new_post: NewPost) -> Result<Uuid, RepoError> {
        let post = Post::new(new_post);
        self.insert_model(post::ActiveModel::from(&post)).await?;
        self.link_tags(post.id, &post.tags).await?;
        Ok(post.id)
    }

    async fn update_by_id(&self, id: Uuid, changes: PostChanges) -> Result<Uuid, RepoError> {
        let mut active = post::ActiveModel {
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(cover) = changes.cover {
            active.cover = Set(Some(cover));
        }
        if let Some(status) = changes.status {
            active.status = Set(status.into());
        }

        let mut update = post::Entity::update_many()
            .set(active)
            .filter(post::Column::Id.eq(id));
        // Publication fields are only filled when still NULL.
        if let Some(posted_by) = changes.posted_by {
            update = update.col_expr(
                post::Column::PostedBy,
                coalesce(post::Column::PostedBy, Expr::value(posted_by)),
            );
        }
        if let Some(posted_at) = changes.posted_at {
            update = update.col_expr(
                post::Column::PostedAt,
                coalesce(
                    post::Column::PostedAt,
                    Expr::value(DateTimeWithTimeZone::from(posted_at)),
                ),
            );
        }

        let result = update.exec(self.conn).await.map_err(map_db_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        if let Some(tags) = changes.tags {
            post_tag_mapping::Entity::delete_many()
                .filter(post_tag_mapping::Column::PostId.eq(id))
                .exec(self.conn)
                .await
                .map_err(map_db_err)?;
            self.link_tags(id, &tags).await?;
        }

        Ok(id)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<u64, RepoError> {
        self.delete_model(id).await
    }
}

#[async_trait]
impl<C> CommentRepository for PostgresCommentRepository<'_, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = comment::Entity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(self.conn)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.find_model(id).await?.map(Into::into))
    }

    async fn create(&self, new_comment: NewComment) -> Result<Uuid, RepoError> {
        let comment = Comment::new(new_comment);
        let id = comment.id;
        self.insert_model(comment::ActiveModel::from(comment)).await?;
        Ok(id)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<u64, RepoError> {
        self.delete_model(id).await
    }
}

fn coalesce(column: post::Column, value: SimpleExpr) -> SimpleExpr {
    Func::coalesce([Expr::col(column).into(), value]).into()
}

/// Escape LIKE wildcards so user input only ever matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
