//! Authentication repository (认证数据访问)

use crate::{error::AppError, models::auth::*};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;

pub struct AuthRepository {
    db: PgPool,
}

impl AuthRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 令牌入库前先做 SHA-256，库里永远不存明文
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    // ==================== Refresh Tokens ====================

    /// 存储刷新令牌
    pub async fn store_refresh_token(
        &self,
        user_id: i64,
        token_hash: &str,
        user_agent: Option<&str>,
        ip_address: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token_hash, user_id, user_agent, ip_address, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(user_agent)
        .bind(ip_address)
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// 根据哈希查找刷新令牌
    pub async fn find_refresh_token_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, AppError> {
        let token =
            sqlx::query_as::<_, RefreshToken>("SELECT * FROM refresh_tokens WHERE token_hash = $1")
                .bind(token_hash)
                .fetch_optional(&self.db)
                .await?;

        Ok(token)
    }

    /// 根据哈希撤销刷新令牌
    pub async fn revoke_refresh_token_by_hash(
        &self,
        token_hash: &str,
        user_id: i64,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW() \
             WHERE token_hash = $1 AND user_id = $2 AND revoked_at IS NULL",
        )
        .bind(token_hash)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 撤销用户的所有刷新令牌
    pub async fn revoke_all_refresh_tokens(&self, user_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW() WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected())
    }

    /// 清理过期的刷新令牌
    pub async fn cleanup_expired_tokens(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < NOW()")
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected())
    }

    // ==================== Login Events ====================

    /// 记录登录事件
    pub async fn record_login_event(
        &self,
        user_id: Option<i64>,
        username: &str,
        event_type: &str,
        failure_reason: Option<&str>,
        source_ip: &str,
        user_agent: Option<&str>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO login_events
                (user_id, username, event_type, failure_reason, source_ip, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user_id)
        .bind(username)
        .bind(event_type)
        .bind(failure_reason)
        .bind(source_ip)
        .bind(user_agent)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_deterministic() {
        let h1 = AuthRepository::hash_token("some-refresh-token");
        let h2 = AuthRepository::hash_token("some-refresh-token");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64); // SHA-256 hex
        assert_ne!(h1, AuthRepository::hash_token("other-token"));
    }
}
