use std::marker::PhantomData;

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel, PrimaryKeyTrait,
    SqlErr,
};

use quill_core::error::RepoError;

/// Generic PostgreSQL repository bound to one connection, which is either
/// the pool or an open transaction.
pub struct PostgresBaseRepository<'c, E, C>
where
    E: EntityTrait,
{
    pub(crate) conn: &'c C,
    _entity: PhantomData<fn() -> E>,
}

impl<'c, E, C> PostgresBaseRepository<'c, E, C>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    pub fn new(conn: &'c C) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    pub(crate) async fn find_model<ID>(&self, id: ID) -> Result<Option<E::Model>, RepoError>
    where
        ID: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
    {
        E::find_by_id(id).one(self.conn).await.map_err(map_db_err)
    }

    pub(crate) async fn insert_model<A>(&self, model: A) -> Result<(), RepoError>
    where
        A: ActiveModelTrait<Entity = E> + Send,
        E::Model: IntoActiveModel<A>,
    {
        E::insert(model)
            .exec_without_returning(self.conn)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    pub(crate) async fn delete_model<ID>(&self, id: ID) -> Result<u64, RepoError>
    where
        ID: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
    {
        let result = E::delete_by_id(id)
            .exec(self.conn)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected)
    }
}

/// Classify a SeaORM error. Unique and foreign key violations surface as
/// [`RepoError::Constraint`] so services can turn them into user errors.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => RepoError::Constraint(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => RepoError::Constraint(msg),
        _ => match err {
            DbErr::Conn(e) => RepoError::Connection(e.to_string()),
            DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
            other => RepoError::Query(other.to_string()),
        },
    }
}
