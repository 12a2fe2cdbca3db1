//! Transaction row models.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use mentora_core::{PaymentMethod, TransactionStatus};
use mentora_error::{DatabaseError, DatabaseErrorKind};

/// Database row for the transactions table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TransactionRow {
    pub id: i32,
    pub student_id: i32,
    pub amount: BigDecimal,
    pub currency: String,
    pub method: String,
    pub status: String,
    pub reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransactionRow {
    /// Payment method as a closed enum.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored text is not a known method.
    pub fn method(&self) -> Result<PaymentMethod, DatabaseError> {
        PaymentMethod::parse_str(&self.method).ok_or_else(|| {
            DatabaseError::new(DatabaseErrorKind::UnknownStatus(
                self.method.clone(),
                "transactions.method".to_string(),
            ))
        })
    }

    /// Verification status as a closed enum.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored text is not a known status.
    pub fn status(&self) -> Result<TransactionStatus, DatabaseError> {
        TransactionStatus::parse_str(&self.status).ok_or_else(|| {
            DatabaseError::new(DatabaseErrorKind::UnknownStatus(
                self.status.clone(),
                "transactions.status".to_string(),
            ))
        })
    }
}

/// Insertable struct for the transactions table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::transactions)]
pub struct NewTransactionRow {
    pub student_id: i32,
    pub amount: BigDecimal,
    pub currency: String,
    pub method: String,
    pub status: String,
    pub reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Partial update for one transaction.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = crate::schema::transactions)]
pub struct TransactionChangeset {
    pub amount: Option<BigDecimal>,
    pub currency: Option<String>,
    pub method: Option<String>,
    pub status: Option<String>,
    pub reference: Option<Option<String>>,
    pub paid_at: Option<Option<DateTime<Utc>>>,
    pub updated_at: Option<DateTime<Utc>>,
}
