//! Financial transaction domain models
//!
//! A transaction references either a tenant (apartment rent flows through
//! the building path) or a villa (directly rentable), never neither.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Financial transaction
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FinancialTransaction {
    pub id: i64,
    pub tenant_id: Option<i64>,
    pub villa_id: Option<i64>,
    pub amount_cents: i64,
    pub kind: String, // rent_payment, deposit, maintenance_fee, refund
    pub status: String, // pending, completed, cancelled
    pub occurred_on: NaiveDate,
    pub description: Option<String>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

/// Create transaction request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTransactionRequest {
    pub tenant_id: Option<i64>,
    pub villa_id: Option<i64>,
    #[validate(range(min = 1))]
    pub amount_cents: i64,
    #[validate(length(min = 1, max = 32))]
    pub kind: String,
    pub occurred_on: NaiveDate,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Transaction list filters (query string)
#[derive(Debug, Deserialize, Default)]
pub struct TransactionListQuery {
    pub kind: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Per-kind totals for the dashboard
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct KindTotal {
    pub kind: String,
    pub total_cents: i64,
    pub count: i64,
}
