//! Property repository (物业数据访问：楼栋、别墅、楼层、公寓)

use crate::{error::AppError, models::property::*, scope::DataFilter};
use sqlx::PgPool;

// ==================== Buildings ====================

pub struct BuildingRepository {
    db: PgPool,
}

impl BuildingRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 按指派范围列出楼栋
    pub async fn list(
        &self,
        filter: &DataFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Building>, AppError> {
        let scoped = filter.restrict_buildings("SELECT * FROM buildings WHERE 1 = 1", vec![], "id");
        let sql = format!(
            "{} ORDER BY name LIMIT ${} OFFSET ${}",
            scoped.sql,
            scoped.next_placeholder(),
            scoped.next_placeholder() + 1
        );

        let mut query = sqlx::query_as::<_, Building>(&sql);
        for param in &scoped.params {
            query = query.bind(*param);
        }

        let buildings = query.bind(limit).bind(offset).fetch_all(&self.db).await?;
        Ok(buildings)
    }

    /// 范围内的楼栋数量（仪表盘用）
    pub async fn count_scoped(&self, filter: &DataFilter) -> Result<i64, AppError> {
        let scoped =
            filter.restrict_buildings("SELECT COUNT(*) FROM buildings WHERE 1 = 1", vec![], "id");

        let mut query = sqlx::query_scalar::<_, i64>(&scoped.sql);
        for param in &scoped.params {
            query = query.bind(*param);
        }

        Ok(query.fetch_one(&self.db).await?)
    }

    /// 根据 ID 查找楼栋
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Building>, AppError> {
        let building = sqlx::query_as::<_, Building>("SELECT * FROM buildings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(building)
    }

    /// 创建楼栋
    pub async fn create(&self, req: &CreateBuildingRequest) -> Result<Building, AppError> {
        let building = sqlx::query_as::<_, Building>(
            r#"
            INSERT INTO buildings (name, address, notes)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.address)
        .bind(&req.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(building)
    }

    /// 更新楼栋
    pub async fn update(
        &self,
        id: i64,
        req: &UpdateBuildingRequest,
    ) -> Result<Option<Building>, AppError> {
        let building = sqlx::query_as::<_, Building>(
            r#"
            UPDATE buildings
            SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                notes = COALESCE($4, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.address)
        .bind(&req.notes)
        .fetch_optional(&self.db)
        .await?;

        Ok(building)
    }

    /// 删除楼栋
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM buildings WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 为楼栋添加楼层
    pub async fn add_floor(&self, building_id: i64, level: i32) -> Result<Floor, AppError> {
        let floor = sqlx::query_as::<_, Floor>(
            r#"
            INSERT INTO floors (building_id, level)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(building_id)
        .bind(level)
        .fetch_one(&self.db)
        .await?;

        Ok(floor)
    }
}

// ==================== Villas ====================

pub struct VillaRepository {
    db: PgPool,
}

impl VillaRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 按指派范围列出别墅
    pub async fn list(
        &self,
        filter: &DataFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Villa>, AppError> {
        let scoped = filter.restrict_villas("SELECT * FROM villas WHERE 1 = 1", vec![], "id");
        let sql = format!(
            "{} ORDER BY name LIMIT ${} OFFSET ${}",
            scoped.sql,
            scoped.next_placeholder(),
            scoped.next_placeholder() + 1
        );

        let mut query = sqlx::query_as::<_, Villa>(&sql);
        for param in &scoped.params {
            query = query.bind(*param);
        }

        let villas = query.bind(limit).bind(offset).fetch_all(&self.db).await?;
        Ok(villas)
    }

    /// 范围内的别墅数量
    pub async fn count_scoped(&self, filter: &DataFilter) -> Result<i64, AppError> {
        let scoped =
            filter.restrict_villas("SELECT COUNT(*) FROM villas WHERE 1 = 1", vec![], "id");

        let mut query = sqlx::query_scalar::<_, i64>(&scoped.sql);
        for param in &scoped.params {
            query = query.bind(*param);
        }

        Ok(query.fetch_one(&self.db).await?)
    }

    /// 根据 ID 查找别墅
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Villa>, AppError> {
        let villa = sqlx::query_as::<_, Villa>("SELECT * FROM villas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(villa)
    }

    /// 创建别墅
    pub async fn create(&self, req: &CreateVillaRequest) -> Result<Villa, AppError> {
        let villa = sqlx::query_as::<_, Villa>(
            r#"
            INSERT INTO villas (name, address, bedrooms, rent_cents)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.address)
        .bind(req.bedrooms)
        .bind(req.rent_cents)
        .fetch_one(&self.db)
        .await?;

        Ok(villa)
    }

    /// 更新别墅
    pub async fn update(&self, id: i64, req: &UpdateVillaRequest) -> Result<Option<Villa>, AppError> {
        let villa = sqlx::query_as::<_, Villa>(
            r#"
            UPDATE villas
            SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                rent_cents = COALESCE($4, rent_cents),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.address)
        .bind(req.rent_cents)
        .bind(&req.status)
        .fetch_optional(&self.db)
        .await?;

        Ok(villa)
    }

    /// 删除别墅
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM villas WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ==================== Apartments ====================

pub struct ApartmentRepository {
    db: PgPool,
}

impl ApartmentRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 按可见范围列出公寓
    pub async fn list(
        &self,
        filter: &DataFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Apartment>, AppError> {
        let scoped =
            filter.restrict_apartments("SELECT * FROM apartments WHERE 1 = 1", vec![], "id");
        let sql = format!(
            "{} ORDER BY id LIMIT ${} OFFSET ${}",
            scoped.sql,
            scoped.next_placeholder(),
            scoped.next_placeholder() + 1
        );

        let mut query = sqlx::query_as::<_, Apartment>(&sql);
        for param in &scoped.params {
            query = query.bind(*param);
        }

        let apartments = query.bind(limit).bind(offset).fetch_all(&self.db).await?;
        Ok(apartments)
    }

    /// 范围内的公寓数量
    pub async fn count_scoped(&self, filter: &DataFilter) -> Result<i64, AppError> {
        let scoped =
            filter.restrict_apartments("SELECT COUNT(*) FROM apartments WHERE 1 = 1", vec![], "id");

        let mut query = sqlx::query_scalar::<_, i64>(&scoped.sql);
        for param in &scoped.params {
            query = query.bind(*param);
        }

        Ok(query.fetch_one(&self.db).await?)
    }

    /// 根据 ID 查找公寓
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Apartment>, AppError> {
        let apartment = sqlx::query_as::<_, Apartment>("SELECT * FROM apartments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(apartment)
    }

    /// 创建公寓
    pub async fn create(
        &self,
        floor_id: i64,
        unit_number: &str,
        bedrooms: i32,
        rent_cents: i64,
    ) -> Result<Apartment, AppError> {
        let apartment = sqlx::query_as::<_, Apartment>(
            r#"
            INSERT INTO apartments (floor_id, unit_number, bedrooms, rent_cents)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(floor_id)
        .bind(unit_number)
        .bind(bedrooms)
        .bind(rent_cents)
        .fetch_one(&self.db)
        .await?;

        Ok(apartment)
    }
}
