//! 财务流水处理器

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::transaction::*,
    repository::TransactionRepository,
    scope::DataFilter,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

/// 列出可见范围内的流水
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Query(query): Query<TransactionListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let repo = TransactionRepository::new(state.db.clone());
    let transactions = repo.list(&filter, &query).await?;

    Ok(Json(transactions))
}

/// 查看单条流水
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !filter.accessible_transactions.contains(id) {
        return Err(AppError::NotFound);
    }

    let repo = TransactionRepository::new(state.db.clone());
    let transaction = repo.find_by_id(id).await?.ok_or(AppError::NotFound)?;

    Ok(Json(transaction))
}

/// 创建流水
///
/// 必须且只能关联租户或别墅之一，且关联对象必须在操作者可见范围内
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    filter: DataFilter,
    Json(req): Json<CreateTransactionRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    match (req.tenant_id, req.villa_id) {
        (Some(tenant_id), None) => {
            if !filter.accessible_tenants.contains(tenant_id) {
                return Err(AppError::NotFound);
            }
        }
        (None, Some(villa_id)) => {
            if !filter.assigned_villas.contains(villa_id) {
                return Err(AppError::NotFound);
            }
        }
        _ => {
            return Err(AppError::BadRequest(
                "流水必须且只能关联租户或别墅之一".to_string(),
            ));
        }
    }

    let repo = TransactionRepository::new(state.db.clone());
    let transaction = repo.create(&req, auth_context.user_id).await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// 范围内按类型汇总
pub async fn transaction_summary(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
) -> Result<impl IntoResponse, AppError> {
    let repo = TransactionRepository::new(state.db.clone());
    let totals = repo.summary(&filter).await?;

    Ok(Json(totals))
}
