//! 仪表盘处理器
//!
//! 所有计数复用与列表相同的范围收窄，保证数字和列表一致。

use crate::{
    error::AppError,
    middleware::AppState,
    repository::{
        ApartmentRepository, BuildingRepository, TenantRepository, TransactionRepository,
        VillaRepository,
    },
    scope::DataFilter,
};
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

/// 仪表盘总览：范围内的楼栋/别墅/公寓/租户数量和流水汇总
pub async fn overview(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
) -> Result<impl IntoResponse, AppError> {
    let buildings = BuildingRepository::new(state.db.clone());
    let villas = VillaRepository::new(state.db.clone());
    let apartments = ApartmentRepository::new(state.db.clone());
    let tenants = TenantRepository::new(state.db.clone());
    let transactions = TransactionRepository::new(state.db.clone());

    let (building_count, villa_count, apartment_count, tenant_count, totals) = tokio::try_join!(
        buildings.count_scoped(&filter),
        villas.count_scoped(&filter),
        apartments.count_scoped(&filter),
        tenants.count_scoped(&filter),
        transactions.summary(&filter),
    )?;

    Ok(Json(json!({
        "role": filter.role,
        "buildings": building_count,
        "villas": villa_count,
        "apartments": apartment_count,
        "tenants": tenant_count,
        "transaction_totals": totals,
    })))
}
