//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::{handlers, middleware::AppState};

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（健康检查）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    // 认证路由（无需认证）
    let auth_routes = Router::new()
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/auth/refresh", post(handlers::auth::refresh_token));

    // 需要认证的路由
    // 中间件顺序：JWT 认证先行，数据过滤器构建随后。
    // axum 的 layer 后添加者先执行，所以 jwt 层放在最后
    let authenticated_routes = Router::new()
        // 当前用户信息
        .route("/api/v1/auth/me", get(handlers::auth::get_current_user))
        .route("/api/v1/auth/logout", post(handlers::auth::logout))
        .route("/api/v1/auth/logout-all", post(handlers::auth::logout_all))

        // 用户管理
        .route(
            "/api/v1/users",
            get(handlers::user::list_users)
                .post(handlers::user::create_user)
        )
        .route(
            "/api/v1/users/{id}",
            get(handlers::user::get_user)
                .put(handlers::user::update_user)
                .delete(handlers::user::delete_user)
        )
        .route("/api/v1/users/me/password", put(handlers::user::change_password))
        .route("/api/v1/roles", get(handlers::user::list_roles))

        // 楼栋
        .route(
            "/api/v1/buildings",
            get(handlers::property::list_buildings)
                .post(handlers::property::create_building)
        )
        .route(
            "/api/v1/buildings/{id}",
            get(handlers::property::get_building)
                .put(handlers::property::update_building)
                .delete(handlers::property::delete_building)
        )
        .route(
            "/api/v1/buildings/{id}/floors",
            post(handlers::property::add_floor)
        )

        // 别墅
        .route(
            "/api/v1/villas",
            get(handlers::property::list_villas)
                .post(handlers::property::create_villa)
        )
        .route(
            "/api/v1/villas/{id}",
            get(handlers::property::get_villa)
                .put(handlers::property::update_villa)
                .delete(handlers::property::delete_villa)
        )

        // 公寓
        .route(
            "/api/v1/apartments",
            get(handlers::property::list_apartments)
                .post(handlers::property::create_apartment)
        )
        .route(
            "/api/v1/apartments/{id}",
            get(handlers::property::get_apartment)
        )

        // 租户
        .route(
            "/api/v1/tenants",
            get(handlers::tenant::list_tenants)
                .post(handlers::tenant::create_tenant)
        )
        .route(
            "/api/v1/tenants/{id}",
            get(handlers::tenant::get_tenant)
                .put(handlers::tenant::update_tenant)
                .delete(handlers::tenant::delete_tenant)
        )
        .route(
            "/api/v1/tenants/{id}/apartments",
            post(handlers::tenant::assign_apartment)
        )
        .route(
            "/api/v1/tenants/{id}/apartments/{apartment_id}",
            axum::routing::delete(handlers::tenant::unassign_apartment)
        )

        // 财务流水
        .route(
            "/api/v1/transactions",
            get(handlers::transaction::list_transactions)
                .post(handlers::transaction::create_transaction)
        )
        .route(
            "/api/v1/transactions/summary",
            get(handlers::transaction::transaction_summary)
        )
        .route(
            "/api/v1/transactions/{id}",
            get(handlers::transaction::get_transaction)
        )

        // 仪表盘
        .route("/api/v1/dashboard/overview", get(handlers::dashboard::overview))

        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::data_filter_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.jwt_service.clone(),
            crate::auth::middleware::jwt_auth_middleware,
        ));

    // 指标端点
    let metrics_routes = Router::new().route("/metrics", get(handlers::metrics::metrics_export));

    // 组合所有路由
    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(authenticated_routes)
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(state.config.server.body_limit_bytes))
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}
