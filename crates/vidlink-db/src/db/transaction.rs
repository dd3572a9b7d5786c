//! Database transaction utilities
//!
//! Batch writes go through [`TransactionGuard`] so that a batch either lands
//! completely or not at all.

use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use vidlink_core::AppError;

/// A database transaction tied to a named operation for logging.
///
/// Dropping the guard without calling [`commit`](Self::commit) rolls the
/// transaction back.
///
/// # Example
///
/// ```ignore
/// use vidlink_db::db::transaction::TransactionGuard;
///
/// async fn example(pool: &sqlx::PgPool) -> Result<(), vidlink_core::AppError> {
///     let mut tx = TransactionGuard::begin(pool, "example").await?;
///     sqlx::query("DELETE FROM video_links").execute(tx.conn()).await?;
///     tx.commit().await
/// }
/// ```
pub struct TransactionGuard<'a> {
    transaction: Transaction<'a, Postgres>,
    operation: &'static str,
}

impl<'a> TransactionGuard<'a> {
    /// Begin a new database transaction
    pub async fn begin(pool: &'a PgPool, operation: &'static str) -> Result<Self, AppError> {
        let transaction = pool.begin().await?;
        tracing::debug!(operation, "Transaction started");
        Ok(Self {
            transaction,
            operation,
        })
    }

    /// Connection to run statements on inside the transaction.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.transaction
    }

    pub async fn commit(self) -> Result<(), AppError> {
        let operation = self.operation;
        self.transaction.commit().await?;
        tracing::debug!(operation, "Transaction committed");
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), AppError> {
        let operation = self.operation;
        self.transaction.rollback().await?;
        tracing::debug!(operation, "Transaction rolled back");
        Ok(())
    }
}
