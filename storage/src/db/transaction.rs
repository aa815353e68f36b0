//! Transaction management for units of work against the database.

use futures::future::BoxFuture;
use sqlx::postgres::PgTransaction;

use crate::db::connection::DbPool;
use crate::error::StorageError;

/// Begin a new database transaction.
///
/// Returns a transaction handle that can be used for multiple database
/// operations. On success, the transaction can be committed via [`commit`];
/// on failure it can be rolled back via [`rollback`]. Dropping the handle
/// without committing rolls the transaction back before the underlying
/// connection returns to the pool.
pub async fn begin(pool: &DbPool) -> Result<PgTransaction<'static>, StorageError> {
    pool.begin().await.map_err(StorageError::from)
}

/// Commit a transaction, making all changes made within it durable.
pub async fn commit(tx: PgTransaction<'static>) -> Result<(), StorageError> {
    tx.commit().await.map_err(StorageError::from)
}

/// Roll back a transaction, undoing all changes made since it began.
pub async fn rollback(tx: PgTransaction<'static>) -> Result<(), StorageError> {
    tx.rollback().await.map_err(StorageError::from)
}

/// Run `work` inside a single transaction on a pooled connection.
///
/// A connection is checked out for the duration of the call; waiting callers
/// queue once the pool limit is reached. If `work` returns `Ok` the
/// transaction is committed and the value returned. If `work` fails, the
/// transaction is rolled back and the error is returned to the caller
/// unchanged. If no connection becomes available the acquisition error is
/// surfaced and no transaction is begun.
pub async fn with_transaction<T, E, F>(pool: &DbPool, work: F) -> Result<T, E>
where
    E: From<StorageError>,
    F: for<'t> FnOnce(&'t mut PgTransaction<'static>) -> BoxFuture<'t, Result<T, E>>,
{
    let mut tx = begin(pool).await?;
    match work(&mut tx).await {
        Ok(value) => {
            commit(tx).await?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback_error) = rollback(tx).await {
                tracing::error!("failed to roll back transaction: {rollback_error}");
            }
            Err(error)
        }
    }
}
