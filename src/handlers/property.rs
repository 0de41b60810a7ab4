//! 物业处理器：楼栋、别墅、公寓
//!
//! 列表查询靠 DataFilter 做 SQL 级收窄；单条读取用范围成员检查，
//! 范围外统一 404。结构性写入（创建/删除）仅限管理员。

use crate::{
    error::AppError,
    middleware::AppState,
    models::property::*,
    repository::{ApartmentRepository, BuildingRepository, VillaRepository},
    scope::DataFilter,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use super::Pagination;

// ==================== Buildings ====================

/// 列出指派范围内的楼栋
pub async fn list_buildings(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = pagination.resolve();
    let repo = BuildingRepository::new(state.db.clone());

    let buildings = repo.list(&filter, limit, offset).await?;
    Ok(Json(buildings))
}

/// 查看单个楼栋
pub async fn get_building(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !filter.assigned_buildings.contains(id) {
        return Err(AppError::NotFound);
    }

    let repo = BuildingRepository::new(state.db.clone());
    let building = repo.find_by_id(id).await?.ok_or(AppError::NotFound)?;

    Ok(Json(building))
}

/// 创建楼栋（仅管理员）
pub async fn create_building(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Json(req): Json<CreateBuildingRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !filter.is_admin() {
        return Err(AppError::Forbidden);
    }
    req.validate()?;

    let repo = BuildingRepository::new(state.db.clone());
    let building = repo.create(&req).await?;

    Ok((StatusCode::CREATED, Json(building)))
}

/// 更新楼栋（管理员或被指派者）
pub async fn update_building(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Path(id): Path<i64>,
    Json(req): Json<UpdateBuildingRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    if !filter.assigned_buildings.contains(id) {
        return Err(AppError::NotFound);
    }

    let repo = BuildingRepository::new(state.db.clone());
    let building = repo.update(id, &req).await?.ok_or(AppError::NotFound)?;

    Ok(Json(building))
}

/// 删除楼栋（仅管理员）
pub async fn delete_building(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !filter.is_admin() {
        return Err(AppError::Forbidden);
    }

    let repo = BuildingRepository::new(state.db.clone());
    if !repo.delete(id).await? {
        return Err(AppError::NotFound);
    }

    Ok(Json(json!({ "message": "楼栋已删除" })))
}

/// 楼层创建请求
#[derive(Debug, Deserialize, Validate)]
pub struct AddFloorRequest {
    #[validate(range(min = -5, max = 200))]
    pub level: i32,
}

/// 为楼栋添加楼层（仅管理员）
pub async fn add_floor(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Path(id): Path<i64>,
    Json(req): Json<AddFloorRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !filter.is_admin() {
        return Err(AppError::Forbidden);
    }
    req.validate()?;

    let repo = BuildingRepository::new(state.db.clone());
    if repo.find_by_id(id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let floor = repo.add_floor(id, req.level).await?;
    Ok((StatusCode::CREATED, Json(floor)))
}

// ==================== Villas ====================

/// 列出指派范围内的别墅
pub async fn list_villas(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = pagination.resolve();
    let repo = VillaRepository::new(state.db.clone());

    let villas = repo.list(&filter, limit, offset).await?;
    Ok(Json(villas))
}

/// 查看单个别墅
pub async fn get_villa(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !filter.assigned_villas.contains(id) {
        return Err(AppError::NotFound);
    }

    let repo = VillaRepository::new(state.db.clone());
    let villa = repo.find_by_id(id).await?.ok_or(AppError::NotFound)?;

    Ok(Json(villa))
}

/// 创建别墅（仅管理员）
pub async fn create_villa(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Json(req): Json<CreateVillaRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !filter.is_admin() {
        return Err(AppError::Forbidden);
    }
    req.validate()?;

    let repo = VillaRepository::new(state.db.clone());
    let villa = repo.create(&req).await?;

    Ok((StatusCode::CREATED, Json(villa)))
}

/// 更新别墅（管理员或被指派者）
pub async fn update_villa(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Path(id): Path<i64>,
    Json(req): Json<UpdateVillaRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    if !filter.assigned_villas.contains(id) {
        return Err(AppError::NotFound);
    }

    let repo = VillaRepository::new(state.db.clone());
    let villa = repo.update(id, &req).await?.ok_or(AppError::NotFound)?;

    Ok(Json(villa))
}

/// 删除别墅（仅管理员）
pub async fn delete_villa(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !filter.is_admin() {
        return Err(AppError::Forbidden);
    }

    let repo = VillaRepository::new(state.db.clone());
    if !repo.delete(id).await? {
        return Err(AppError::NotFound);
    }

    Ok(Json(json!({ "message": "别墅已删除" })))
}

// ==================== Apartments ====================

/// 列出可见范围内的公寓
pub async fn list_apartments(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = pagination.resolve();
    let repo = ApartmentRepository::new(state.db.clone());

    let apartments = repo.list(&filter, limit, offset).await?;
    Ok(Json(apartments))
}

/// 查看单个公寓
pub async fn get_apartment(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !filter.accessible_apartments.contains(id) {
        return Err(AppError::NotFound);
    }

    let repo = ApartmentRepository::new(state.db.clone());
    let apartment = repo.find_by_id(id).await?.ok_or(AppError::NotFound)?;

    Ok(Json(apartment))
}

/// 公寓创建请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateApartmentRequest {
    pub floor_id: i64,
    #[validate(length(min = 1, max = 16))]
    pub unit_number: String,
    #[validate(range(min = 0, max = 20))]
    pub bedrooms: i32,
    #[validate(range(min = 0))]
    pub rent_cents: i64,
}

/// 创建公寓（仅管理员）
pub async fn create_apartment(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Json(req): Json<CreateApartmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !filter.is_admin() {
        return Err(AppError::Forbidden);
    }
    req.validate()?;

    let repo = ApartmentRepository::new(state.db.clone());
    let apartment = repo
        .create(req.floor_id, &req.unit_number, req.bedrooms, req.rent_cents)
        .await?;

    Ok((StatusCode::CREATED, Json(apartment)))
}
