//! Pool and transaction scopes for the PostgreSQL adapter.

use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, DbConn, DbErr, TransactionTrait};

use quill_core::error::RepoError;
use quill_core::ports::{
    CommentRepository, Persistence, PostRepository, Repositories, UnitOfWork, UserRepository,
};

use super::connections::DatabaseConfig;
use super::postgres_base::map_db_err;
use super::postgres_repo::{
    PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository,
};

/// Repositories over the shared connection pool.
pub struct PostgresPersistence {
    db: DbConn,
}

impl PostgresPersistence {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        Ok(Self::new(config.connect().await?))
    }

    pub fn connection(&self) -> &DbConn {
        &self.db
    }
}

impl Repositories for PostgresPersistence {
    fn users(&self) -> Box<dyn UserRepository + '_> {
        Box::new(PostgresUserRepository::new(&self.db))
    }

    fn posts(&self) -> Box<dyn PostRepository + '_> {
        Box::new(PostgresPostRepository::new(&self.db))
    }

    fn comments(&self) -> Box<dyn CommentRepository + '_> {
        Box::new(PostgresCommentRepository::new(&self.db))
    }
}

#[async_trait]
impl Persistence for PostgresPersistence {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        Ok(Box::new(PostgresUnitOfWork { txn }))
    }
}

/// Repositories bound to one open transaction.
pub struct PostgresUnitOfWork {
    txn: DatabaseTransaction,
}

impl Repositories for PostgresUnitOfWork {
    fn users(&self) -> Box<dyn UserRepository + '_> {
        Box::new(PostgresUserRepository::new(&self.txn))
    }

    fn posts(&self) -> Box<dyn PostRepository + '_> {
        Box::new(PostgresPostRepository::new(&self.txn))
    }

    fn comments(&self) -> Box<dyn CommentRepository + '_> {
        Box::new(PostgresCommentRepository::new(&self.txn))
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        self.txn.commit().await.map_err(map_db_err)
    }
}
