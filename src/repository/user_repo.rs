//! User repository (数据库访问层)

use crate::{
    error::AppError,
    models::user::*,
    scope::DataFilter,
};
use sqlx::{PgPool, Row};

pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 根据用户名查找用户
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 根据 ID 查找用户
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 创建用户
    pub async fn create(
        &self,
        req: &CreateUserRequest,
        password_hash: &str,
        created_by: i64,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, full_name, role_id, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&req.username)
        .bind(&req.email)
        .bind(password_hash)
        .bind(&req.full_name)
        .bind(req.role_id)
        .bind(created_by)
        .fetch_one(&self.db)
        .await?;

        Ok(user)
    }

    /// 更新用户
    pub async fn update(&self, id: i64, req: &UpdateUserRequest) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                email = COALESCE($2, email),
                full_name = COALESCE($3, full_name),
                status = COALESCE($4, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.email)
        .bind(&req.full_name)
        .bind(&req.status)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// 更新密码
    pub async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET
                password_hash = $2,
                failed_login_attempts = 0,
                locked_until = NULL,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 删除用户
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 按可管理用户范围列出账户
    pub async fn list(
        &self,
        filter: &DataFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, AppError> {
        let scoped = filter.restrict_users("SELECT * FROM users WHERE 1 = 1", vec![], "id");
        let sql = format!(
            "{} ORDER BY username LIMIT ${} OFFSET ${}",
            scoped.sql,
            scoped.next_placeholder(),
            scoped.next_placeholder() + 1
        );

        let mut query = sqlx::query_as::<_, User>(&sql);
        for param in &scoped.params {
            query = query.bind(*param);
        }

        let users = query.bind(limit).bind(offset).fetch_all(&self.db).await?;
        Ok(users)
    }

    /// 增加失败登录次数
    pub async fn increment_failed_attempts(&self, id: i64) -> Result<i32, AppError> {
        let attempts: i32 = sqlx::query(
            r#"
            UPDATE users
            SET
                failed_login_attempts = failed_login_attempts + 1,
                updated_at = NOW()
            WHERE id = $1
            RETURNING failed_login_attempts
            "#,
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?
        .get(0);

        Ok(attempts)
    }

    /// 重置失败登录次数
    pub async fn reset_failed_attempts(&self, id: i64) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET
                failed_login_attempts = 0,
                locked_until = NULL,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// 锁定用户账户
    pub async fn lock_account(
        &self,
        id: i64,
        locked_until: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET
                locked_until = $2,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(locked_until)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}
