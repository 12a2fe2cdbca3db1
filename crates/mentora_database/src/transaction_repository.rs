//! PostgreSQL repository for payment transactions.

use crate::schema::transactions;
use crate::{DatabaseResult, NewTransactionRow, TransactionChangeset, TransactionRow};

use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use mentora_core::{PaymentMethod, TransactionStatus};
use mentora_error::DatabaseError;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;

/// Filters for the transaction listing endpoint.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub student_id: Option<i32>,
    pub status: Option<TransactionStatus>,
    pub method: Option<PaymentMethod>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// PostgreSQL repository for transaction records.
///
/// Transactions are independent of onboarding state; no code path keeps the
/// two in sync.
pub struct TransactionRepository {
    conn: Arc<Mutex<PgConnection>>,
}

impl TransactionRepository {
    /// Create a new transaction repository.
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create a repository from an Arc<Mutex<PgConnection>> (for sharing connections).
    pub fn from_arc(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self { conn }
    }

    /// Record a new transaction.
    #[instrument(skip(self, new_row), fields(student_id = new_row.student_id))]
    pub async fn create(&self, new_row: NewTransactionRow) -> DatabaseResult<TransactionRow> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(transactions::table)
            .values(&new_row)
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)
    }

    /// Fetch one transaction by id.
    #[instrument(skip(self))]
    pub async fn find(&self, id: i32) -> DatabaseResult<Option<TransactionRow>> {
        let mut conn = self.conn.lock().await;

        transactions::table
            .find(id)
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)
    }

    /// List transactions matching the filter, newest first.
    #[instrument(skip(self, filter))]
    pub async fn list(&self, filter: &TransactionFilter) -> DatabaseResult<Vec<TransactionRow>> {
        let mut conn = self.conn.lock().await;

        let mut query = transactions::table.into_boxed();

        if let Some(student_id) = filter.student_id {
            query = query.filter(transactions::student_id.eq(student_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(transactions::status.eq(status.as_str()));
        }
        if let Some(method) = filter.method {
            query = query.filter(transactions::method.eq(method.as_str()));
        }

        query = query.order(transactions::created_at.desc());

        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }
        if let Some(offset) = filter.offset {
            query = query.offset(offset);
        }

        query.load(&mut *conn).map_err(DatabaseError::from)
    }

    /// Apply a partial update to one transaction.
    #[instrument(skip(self, changeset), fields(id = id))]
    pub async fn update(
        &self,
        id: i32,
        mut changeset: TransactionChangeset,
    ) -> DatabaseResult<TransactionRow> {
        let mut conn = self.conn.lock().await;

        changeset.updated_at = Some(Utc::now());

        diesel::update(transactions::table.find(id))
            .set(&changeset)
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)
    }

    /// Remove one transaction.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> DatabaseResult<usize> {
        let mut conn = self.conn.lock().await;

        diesel::delete(transactions::table.find(id))
            .execute(&mut *conn)
            .map_err(DatabaseError::from)
    }
}
