//! Tenant repository (租户数据访问)

use crate::{error::AppError, models::tenant::*, scope::DataFilter};
use sqlx::PgPool;

pub struct TenantRepository {
    db: PgPool,
}

impl TenantRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 按可见范围列出租户
    pub async fn list(
        &self,
        filter: &DataFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Tenant>, AppError> {
        let scoped = filter.restrict_tenants("SELECT * FROM tenants WHERE 1 = 1", vec![], "id");
        let sql = format!(
            "{} ORDER BY full_name LIMIT ${} OFFSET ${}",
            scoped.sql,
            scoped.next_placeholder(),
            scoped.next_placeholder() + 1
        );

        let mut query = sqlx::query_as::<_, Tenant>(&sql);
        for param in &scoped.params {
            query = query.bind(*param);
        }

        let tenants = query.bind(limit).bind(offset).fetch_all(&self.db).await?;
        Ok(tenants)
    }

    /// 范围内的租户数量
    pub async fn count_scoped(&self, filter: &DataFilter) -> Result<i64, AppError> {
        let scoped =
            filter.restrict_tenants("SELECT COUNT(*) FROM tenants WHERE 1 = 1", vec![], "id");

        let mut query = sqlx::query_scalar::<_, i64>(&scoped.sql);
        for param in &scoped.params {
            query = query.bind(*param);
        }

        Ok(query.fetch_one(&self.db).await?)
    }

    /// 根据 ID 查找租户
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Tenant>, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(tenant)
    }

    /// 创建租户
    pub async fn create(&self, req: &CreateTenantRequest) -> Result<Tenant, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (full_name, email, phone)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&req.full_name)
        .bind(&req.email)
        .bind(&req.phone)
        .fetch_one(&self.db)
        .await?;

        Ok(tenant)
    }

    /// 更新租户
    pub async fn update(&self, id: i64, req: &UpdateTenantRequest) -> Result<Option<Tenant>, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            UPDATE tenants
            SET
                full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.full_name)
        .bind(&req.email)
        .bind(&req.phone)
        .bind(&req.status)
        .fetch_optional(&self.db)
        .await?;

        Ok(tenant)
    }

    /// 删除租户
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 把租户指派到公寓
    pub async fn assign_apartment(
        &self,
        tenant_id: i64,
        apartment_id: i64,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO apartment_assigned (tenant_id, apartment_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(tenant_id)
        .bind(apartment_id)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// 解除租户的公寓指派
    pub async fn unassign_apartment(
        &self,
        tenant_id: i64,
        apartment_id: i64,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM apartment_assigned WHERE tenant_id = $1 AND apartment_id = $2",
        )
        .bind(tenant_id)
        .bind(apartment_id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
