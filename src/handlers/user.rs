//! 用户管理处理器
//!
//! 所有读取都经过请求的 DataFilter（可管理用户范围），
//! 写入在此基础上再做角色规则检查。

use crate::{
    auth::middleware::AuthContext,
    auth::password::PasswordHasher,
    error::AppError,
    middleware::AppState,
    models::user::*,
    repository::{RoleRepository, UserRepository},
    scope::{DataFilter, RoleClass},
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use super::Pagination;

/// 列出可管理范围内的用户
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = pagination.resolve();
    let repo = UserRepository::new(state.db.clone());

    let users = repo.list(&filter, limit, offset).await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(users))
}

/// 查看单个用户
/// 范围外的账户一律返回 404，不泄露其存在性
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !filter.manageable_users.contains(id) {
        return Err(AppError::NotFound);
    }

    let repo = UserRepository::new(state.db.clone());
    let user = repo.find_by_id(id).await?.ok_or(AppError::NotFound)?;

    Ok(Json(UserResponse::from(user)))
}

/// 创建用户
///
/// 角色规则：管理员可创建任意角色；业主只能创建员工账户；
/// 员工与自定义角色不可创建用户
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    filter: DataFilter,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let target_class = RoleClass::from_role_id(req.role_id);
    if filter.is_admin() {
        // 管理员不受限
    } else if filter.is_owner() {
        if !target_class.is_staff() {
            return Err(AppError::Forbidden);
        }
    } else {
        return Err(AppError::Forbidden);
    }

    // 角色必须真实存在
    let role_repo = RoleRepository::new(state.db.clone());
    if role_repo.find_by_id(req.role_id).await?.is_none() {
        return Err(AppError::BadRequest(format!(
            "角色不存在: {}",
            req.role_id
        )));
    }

    PasswordHasher::validate_password_policy(&req.password, &state.config)?;

    let user_repo = UserRepository::new(state.db.clone());
    if user_repo.find_by_username(&req.username).await?.is_some() {
        return Err(AppError::BadRequest("用户名已存在".to_string()));
    }

    let hasher = PasswordHasher::new();
    let password_hash = hasher.hash(&req.password)?;

    let user = user_repo
        .create(&req, &password_hash, auth_context.user_id)
        .await?;

    tracing::info!(
        user_id = user.id,
        created_by = auth_context.user_id,
        role_id = user.role_id,
        "User created"
    );

    Ok((
        axum::http::StatusCode::CREATED,
        Json(UserResponse::from(user)),
    ))
}

/// 更新用户
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    filter: DataFilter,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    if !filter.manageable_users.contains(id) {
        return Err(AppError::NotFound);
    }

    let repo = UserRepository::new(state.db.clone());
    let user = repo.update(id, &req).await?.ok_or(AppError::NotFound)?;

    Ok(Json(UserResponse::from(user)))
}

/// 删除用户（不可删除自己）
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    filter: DataFilter,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if id == auth_context.user_id {
        return Err(AppError::BadRequest("不能删除自己的账户".to_string()));
    }

    if !filter.manageable_users.contains(id) {
        return Err(AppError::NotFound);
    }

    let repo = UserRepository::new(state.db.clone());
    if !repo.delete(id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(
        user_id = id,
        deleted_by = auth_context.user_id,
        "User deleted"
    );

    Ok(Json(json!({ "message": "用户已删除" })))
}

/// 修改自己的密码
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(auth_context.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let hasher = PasswordHasher::new();
    hasher
        .verify(&req.old_password, &user.password_hash)
        .map_err(|_| AppError::BadRequest("旧密码不正确".to_string()))?;

    PasswordHasher::validate_password_policy(&req.new_password, &state.config)?;

    let new_hash = hasher.hash(&req.new_password)?;
    repo.update_password(user.id, &new_hash).await?;

    // 改密后其他会话全部失效
    state.auth_service.logout_all(user.id).await?;

    Ok(Json(json!({ "message": "密码已更新" })))
}

/// 列出所有角色
pub async fn list_roles(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let repo = RoleRepository::new(state.db.clone());
    let roles = repo.list().await?;

    Ok(Json(roles))
}
