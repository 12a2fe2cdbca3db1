//! Transaction CRUD handlers.

use crate::dto::ApiTransaction;
use crate::response::{created, ok, ApiResult};
use crate::state::AppState;

use axum::extract::{Path, Query, State};
use axum::Json;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use mentora_core::{PaymentMethod, TransactionStatus};
use mentora_database::{NewTransactionRow, TransactionChangeset, TransactionFilter};
use mentora_error::ValidationError;
use serde::Deserialize;

/// Query parameters for the transaction listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionListQuery {
    pub student_id: Option<i32>,
    pub status: Option<TransactionStatus>,
    pub method: Option<PaymentMethod>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Creation payload for a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransactionInput {
    pub student_id: Option<i32>,
    pub amount: Option<BigDecimal>,
    pub currency: Option<String>,
    pub method: Option<PaymentMethod>,
    pub status: Option<TransactionStatus>,
    pub reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Partial update payload for a transaction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTransactionInput {
    pub amount: Option<BigDecimal>,
    pub currency: Option<String>,
    pub method: Option<PaymentMethod>,
    pub status: Option<TransactionStatus>,
    pub reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// `GET /api/transactions`
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionListQuery>,
) -> ApiResult {
    let filter = TransactionFilter {
        student_id: query.student_id,
        status: query.status,
        method: query.method,
        limit: Some(query.limit.unwrap_or(50).clamp(1, 200)),
        offset: query.offset,
    };

    let rows = state.transactions.list(&filter).await?;
    let transactions = rows
        .into_iter()
        .map(ApiTransaction::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ok(transactions))
}

/// `POST /api/transactions`
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(input): Json<NewTransactionInput>,
) -> ApiResult {
    let mut errors = ValidationError::empty();

    let student_id = match input.student_id {
        None => {
            errors.add("student_id", "student_id is required");
            None
        }
        Some(id) => {
            let found = state.lifecycle.repository().find_by_id(id).await?;
            if found.is_none() {
                errors.add("student_id", "student does not exist");
            }
            Some(id)
        }
    };

    if input.amount.is_none() {
        errors.add("amount", "amount is required");
    }
    if input.method.is_none() {
        errors.add("method", "method is required");
    }

    let (Some(student_id), Some(amount), Some(method)) = (student_id, input.amount, input.method)
    else {
        return Err(errors.into());
    };
    if errors.has_errors() {
        return Err(errors.into());
    }

    let new_row = NewTransactionRow {
        student_id,
        amount,
        currency: input.currency.unwrap_or_else(|| "USD".to_string()),
        method: method.as_str().to_string(),
        status: input.status.unwrap_or_default().as_str().to_string(),
        reference: input.reference,
        paid_at: input.paid_at,
    };

    let row = state.transactions.create(new_row).await?;
    Ok(created(ApiTransaction::try_from(row)?))
}

/// `GET /api/transactions/{id}`
pub async fn get_transaction(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    let row = state
        .transactions
        .find(id)
        .await?
        .ok_or_else(crate::response::not_found)?;
    Ok(ok(ApiTransaction::try_from(row)?))
}

/// `PUT /api/transactions/{id}`
pub async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateTransactionInput>,
) -> ApiResult {
    // Existence check first so a bad id is a 404, not a bare update miss.
    state
        .transactions
        .find(id)
        .await?
        .ok_or_else(crate::response::not_found)?;

    let changeset = TransactionChangeset {
        amount: input.amount,
        currency: input.currency,
        method: input.method.map(|m| m.as_str().to_string()),
        status: input.status.map(|s| s.as_str().to_string()),
        reference: input.reference.map(Some),
        paid_at: input.paid_at.map(Some),
        updated_at: None,
    };

    let row = state.transactions.update(id, changeset).await?;
    Ok(ok(ApiTransaction::try_from(row)?))
}

/// `DELETE /api/transactions/{id}`
pub async fn delete_transaction(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    let removed = state.transactions.delete(id).await?;
    if removed == 0 {
        return Err(crate::response::not_found());
    }
    Ok(crate::response::message("Transaction deleted"))
}
