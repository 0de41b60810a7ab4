//! 认证服务：登录、登出、令牌刷新

use crate::{
    auth::jwt::{JwtService, TokenPair},
    auth::password::PasswordHasher,
    config::AppConfig,
    error::AppError,
    models::auth::*,
    models::user::User,
    repository::{auth_repo::AuthRepository, user_repo::UserRepository},
};
use sqlx::PgPool;
use std::sync::Arc;

pub struct AuthService {
    db: PgPool,
    jwt_service: Arc<JwtService>,
    config: Arc<AppConfig>,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_service: Arc<JwtService>, config: Arc<AppConfig>) -> Self {
        Self {
            db,
            jwt_service,
            config,
        }
    }

    /// 用户登录
    pub async fn login(
        &self,
        req: LoginRequest,
        client_ip: &str,
        user_agent: Option<&str>,
    ) -> Result<LoginResponse, AppError> {
        let user_repo = UserRepository::new(self.db.clone());
        let auth_repo = AuthRepository::new(self.db.clone());

        // 获取用户
        let user: User = match user_repo.find_by_username(&req.username).await? {
            Some(user) => user,
            None => {
                self.record_login_event(
                    None,
                    &req.username,
                    "login_failure",
                    Some("unknown_user"),
                    client_ip,
                    user_agent,
                )
                .await;
                return Err(AppError::Unauthorized);
            }
        };

        // 检查账户状态
        if user.status != "enabled" {
            self.record_login_event(
                Some(user.id),
                &req.username,
                "login_failure",
                Some("account_disabled"),
                client_ip,
                user_agent,
            )
            .await;
            return Err(AppError::Unauthorized);
        }

        // 检查账户是否被锁定
        if let Some(locked_until) = user.locked_until {
            if locked_until > chrono::Utc::now() {
                self.record_login_event(
                    Some(user.id),
                    &req.username,
                    "login_failure",
                    Some("account_locked"),
                    client_ip,
                    user_agent,
                )
                .await;
                return Err(AppError::BadRequest("账户已被临时锁定".to_string()));
            }
        }

        // 验证密码，失败达到阈值后锁定账户
        let hasher = PasswordHasher::new();
        if hasher.verify(&req.password, &user.password_hash).is_err() {
            let attempts = user_repo.increment_failed_attempts(user.id).await?;

            if attempts >= self.config.security.max_login_attempts as i32 {
                let locked_until = chrono::Utc::now()
                    + chrono::Duration::seconds(
                        self.config.security.login_lockout_duration_secs as i64,
                    );
                user_repo.lock_account(user.id, locked_until).await?;

                tracing::warn!(
                    user_id = user.id,
                    attempts = attempts,
                    "Account locked after repeated login failures"
                );
            }

            self.record_login_event(
                Some(user.id),
                &req.username,
                "login_failure",
                Some("bad_password"),
                client_ip,
                user_agent,
            )
            .await;
            return Err(AppError::Unauthorized);
        }

        // 重置失败次数
        if user.failed_login_attempts > 0 {
            let _ = user_repo.reset_failed_attempts(user.id).await;
        }

        // 生成令牌
        let token_pair =
            self.jwt_service
                .generate_token_pair(user.id, &user.username, user.role_id)?;

        // 存储刷新令牌（只存哈希）
        let token_hash = AuthRepository::hash_token(&token_pair.refresh_token);
        let expires_at = chrono::Utc::now()
            + chrono::Duration::seconds(self.config.security.refresh_token_exp_secs as i64);
        auth_repo
            .store_refresh_token(user.id, &token_hash, user_agent, client_ip, expires_at)
            .await?;

        // 记录成功登录
        self.record_login_event(
            Some(user.id),
            &user.username,
            "login_success",
            None,
            client_ip,
            user_agent,
        )
        .await;

        Ok(LoginResponse {
            access_token: token_pair.access_token,
            refresh_token: token_pair.refresh_token,
            expires_in: token_pair.expires_in,
            user: user.into(),
        })
    }

    /// 刷新令牌（旋转：旧令牌作废，签发新对）
    pub async fn refresh(
        &self,
        req: RefreshTokenRequest,
        client_ip: &str,
        user_agent: Option<&str>,
    ) -> Result<TokenPair, AppError> {
        let auth_repo = AuthRepository::new(self.db.clone());
        let user_repo = UserRepository::new(self.db.clone());

        // 先验证 JWT 本身
        let claims = self.jwt_service.validate_refresh_token(&req.refresh_token)?;
        let user_id: i64 = claims.sub.parse().map_err(|_| AppError::Unauthorized)?;

        // 再核对存储侧状态
        let token_hash = AuthRepository::hash_token(&req.refresh_token);
        let stored = auth_repo
            .find_refresh_token_by_hash(&token_hash)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if stored.revoked_at.is_some() || stored.expires_at < chrono::Utc::now() {
            return Err(AppError::Unauthorized);
        }

        let user = user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if user.status != "enabled" {
            return Err(AppError::Unauthorized);
        }

        // 旋转
        auth_repo
            .revoke_refresh_token_by_hash(&token_hash, user_id)
            .await?;

        let token_pair =
            self.jwt_service
                .generate_token_pair(user.id, &user.username, user.role_id)?;
        let new_hash = AuthRepository::hash_token(&token_pair.refresh_token);
        let expires_at = chrono::Utc::now()
            + chrono::Duration::seconds(self.config.security.refresh_token_exp_secs as i64);
        auth_repo
            .store_refresh_token(user.id, &new_hash, user_agent, client_ip, expires_at)
            .await?;

        Ok(token_pair)
    }

    /// 登出：撤销指定刷新令牌
    pub async fn logout(&self, user_id: i64, refresh_token: &str) -> Result<(), AppError> {
        let auth_repo = AuthRepository::new(self.db.clone());
        let token_hash = AuthRepository::hash_token(refresh_token);
        auth_repo
            .revoke_refresh_token_by_hash(&token_hash, user_id)
            .await?;
        Ok(())
    }

    /// 全端登出：撤销该用户所有刷新令牌
    pub async fn logout_all(&self, user_id: i64) -> Result<u64, AppError> {
        let auth_repo = AuthRepository::new(self.db.clone());
        auth_repo.revoke_all_refresh_tokens(user_id).await
    }

    /// 记录登录事件（事件写入失败不影响主流程）
    async fn record_login_event(
        &self,
        user_id: Option<i64>,
        username: &str,
        event_type: &str,
        failure_reason: Option<&str>,
        client_ip: &str,
        user_agent: Option<&str>,
    ) {
        let auth_repo = AuthRepository::new(self.db.clone());
        if let Err(e) = auth_repo
            .record_login_event(user_id, username, event_type, failure_reason, client_ip, user_agent)
            .await
        {
            tracing::warn!(error = %e, "Failed to record login event");
        }
    }
}
