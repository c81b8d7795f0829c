use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use quill_core::domain::{NewComment, PostStatus, UserChanges};
use quill_core::error::RepoError;
use quill_core::ports::{CommentRepository, PostRepository, UserRepository};

use crate::database::entity::{comment, post, tag, user};
use crate::database::postgres_repo::{
    PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository,
};

fn post_model(id: Uuid, user_id: Uuid) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        user_id,
        title: "Test Post".to_owned(),
        content: "Content".to_owned(),
        cover: None,
        status: post::Status::Published,
        posted_by: Some("John".to_owned()),
        posted_at: Some(now.into()),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, user_id)]])
        .append_query_results([Vec::<tag::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(&db);
    let post = repo.find_by_id(post_id).await.unwrap().unwrap();

    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.status, PostStatus::Published);
    assert!(post.tags.is_empty());
}

#[tokio::test]
async fn test_find_missing_post_skips_tag_lookup() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(&db);

    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    assert_eq!(db.into_transaction_log().len(), 1);
}

#[tokio::test]
async fn test_find_user_by_email() {
    let now = Utc::now();
    let id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user::Model {
            id,
            name: "John".to_owned(),
            username: None,
            email: "john@gmail.com".to_owned(),
            password_hash: "hash".to_owned(),
            status: user::Status::Active,
            last_login: None,
            refresh_token: None,
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresUserRepository::new(&db);
    let user = repo.find_by_email("john@gmail.com").await.unwrap().unwrap();

    assert_eq!(user.id, id);
    assert_eq!(user.email, "john@gmail.com");
}

#[tokio::test]
async fn test_update_missing_user_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresUserRepository::new(&db);
    let err = repo
        .update_by_id(
            Uuid::new_v4(),
            UserChanges::rotate_refresh_token("token".to_owned()),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, RepoError::NotFound));
}

#[tokio::test]
async fn test_update_user_writes_only_supplied_columns() {
    let id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let repo = PostgresUserRepository::new(&db);
    repo.update_by_id(id, UserChanges::rotate_refresh_token("token".to_owned()))
        .await
        .unwrap();

    let log = db.into_transaction_log();
    assert_eq!(log.len(), 1);
    let sql = format!("{:?}", log[0]);
    assert!(sql.contains("refresh_token"));
    assert!(!sql.contains("password_hash"));
}

#[tokio::test]
async fn test_list_comments_for_post() {
    let now = Utc::now();
    let post_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![comment::Model {
            id: Uuid::new_v4(),
            post_id,
            user_id: Uuid::new_v4(),
            content: "Nice post".to_owned(),
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresCommentRepository::new(&db);
    let comments = repo.find_by_post_id(post_id).await.unwrap();

    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].content, "Nice post");
}

#[tokio::test]
async fn test_delete_comment_reports_rows_affected() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let repo = PostgresCommentRepository::new(&db);

    assert_eq!(repo.delete_by_id(Uuid::new_v4()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_comment_inserts_row() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let repo = PostgresCommentRepository::new(&db);
    let id = repo
        .create(NewComment {
            post_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            content: "First!".to_owned(),
        })
        .await
        .unwrap();

    let log = db.into_transaction_log();
    assert_eq!(log.len(), 1);
    let sql = format!("{:?}", log[0]);
    assert!(sql.contains("INSERT INTO"));
    assert!(sql.contains("comments"));
    assert!(sql.contains(&id.to_string()));
}

