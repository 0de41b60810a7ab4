//! 租户处理器

use crate::{
    error::AppError,
    middleware::AppState,
    models::tenant::*,
    repository::TenantRepository,
    scope::DataFilter,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use super::Pagination;

/// 列出可见范围内的租户
pub async fn list_tenants(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = pagination.resolve();
    let repo = TenantRepository::new(state.db.clone());

    let tenants = repo.list(&filter, limit, offset).await?;
    Ok(Json(tenants))
}

/// 查看单个租户
pub async fn get_tenant(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !filter.accessible_tenants.contains(id) {
        return Err(AppError::NotFound);
    }

    let repo = TenantRepository::new(state.db.clone());
    let tenant = repo.find_by_id(id).await?.ok_or(AppError::NotFound)?;

    Ok(Json(tenant))
}

/// 创建租户
/// 新租户尚未指派公寓，管理员、业主和员工都可录入；
/// 非管理员需随后把租户指派到自己范围内的公寓才能继续看到
pub async fn create_tenant(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Json(req): Json<CreateTenantRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !filter.is_admin() && !filter.is_owner() && !filter.is_staff() {
        return Err(AppError::Forbidden);
    }
    req.validate()?;

    let repo = TenantRepository::new(state.db.clone());
    let tenant = repo.create(&req).await?;

    Ok((StatusCode::CREATED, Json(tenant)))
}

/// 更新租户
pub async fn update_tenant(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTenantRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    if !filter.accessible_tenants.contains(id) {
        return Err(AppError::NotFound);
    }

    let repo = TenantRepository::new(state.db.clone());
    let tenant = repo.update(id, &req).await?.ok_or(AppError::NotFound)?;

    Ok(Json(tenant))
}

/// 删除租户（仅管理员）
pub async fn delete_tenant(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !filter.is_admin() {
        return Err(AppError::Forbidden);
    }

    let repo = TenantRepository::new(state.db.clone());
    if !repo.delete(id).await? {
        return Err(AppError::NotFound);
    }

    Ok(Json(json!({ "message": "租户已删除" })))
}

/// 把租户指派到公寓
/// 公寓必须在操作者可见范围内
pub async fn assign_apartment(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Path(id): Path<i64>,
    Json(req): Json<AssignApartmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !filter.accessible_apartments.contains(req.apartment_id) {
        return Err(AppError::NotFound);
    }

    let repo = TenantRepository::new(state.db.clone());
    if repo.find_by_id(id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    repo.assign_apartment(id, req.apartment_id).await?;

    Ok(Json(json!({
        "message": "租户已指派",
        "tenant_id": id,
        "apartment_id": req.apartment_id
    })))
}

/// 解除租户的公寓指派
pub async fn unassign_apartment(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Path((id, apartment_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    if !filter.accessible_apartments.contains(apartment_id) {
        return Err(AppError::NotFound);
    }

    let repo = TenantRepository::new(state.db.clone());
    if !repo.unassign_apartment(id, apartment_id).await? {
        return Err(AppError::NotFound);
    }

    Ok(Json(json!({ "message": "指派已解除" })))
}
