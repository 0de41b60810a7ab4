//! Financial transaction repository (财务流水数据访问)

use crate::{error::AppError, models::transaction::*, scope::DataFilter};
use sqlx::PgPool;

pub struct TransactionRepository {
    db: PgPool,
}

impl TransactionRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 按可见范围列出流水，支持类型与日期区间过滤
    pub async fn list(
        &self,
        filter: &DataFilter,
        query: &TransactionListQuery,
    ) -> Result<Vec<FinancialTransaction>, AppError> {
        let scoped = filter.restrict_transactions(
            "SELECT ft.* FROM financial_transactions ft WHERE 1 = 1",
            vec![],
            "ft.id",
        );

        // 范围参数之后继续编号，业务过滤条件逐个追加
        let mut sql = scoped.sql.clone();
        let mut next = scoped.next_placeholder();

        if query.kind.is_some() {
            sql.push_str(&format!(" AND ft.kind = ${next}"));
            next += 1;
        }
        if query.from.is_some() {
            sql.push_str(&format!(" AND ft.occurred_on >= ${next}"));
            next += 1;
        }
        if query.to.is_some() {
            sql.push_str(&format!(" AND ft.occurred_on <= ${next}"));
            next += 1;
        }
        sql.push_str(&format!(
            " ORDER BY ft.occurred_on DESC, ft.id DESC LIMIT ${next} OFFSET ${}",
            next + 1
        ));

        let mut q = sqlx::query_as::<_, FinancialTransaction>(&sql);
        for param in &scoped.params {
            q = q.bind(*param);
        }
        if let Some(kind) = &query.kind {
            q = q.bind(kind);
        }
        if let Some(from) = query.from {
            q = q.bind(from);
        }
        if let Some(to) = query.to {
            q = q.bind(to);
        }

        let limit = query.limit.unwrap_or(50).clamp(1, 200);
        let offset = query.offset.unwrap_or(0).max(0);
        let transactions = q.bind(limit).bind(offset).fetch_all(&self.db).await?;

        Ok(transactions)
    }

    /// 根据 ID 查找流水
    pub async fn find_by_id(&self, id: i64) -> Result<Option<FinancialTransaction>, AppError> {
        let transaction = sqlx::query_as::<_, FinancialTransaction>(
            "SELECT * FROM financial_transactions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(transaction)
    }

    /// 创建流水
    pub async fn create(
        &self,
        req: &CreateTransactionRequest,
        created_by: i64,
    ) -> Result<FinancialTransaction, AppError> {
        let transaction = sqlx::query_as::<_, FinancialTransaction>(
            r#"
            INSERT INTO financial_transactions
                (tenant_id, villa_id, amount_cents, kind, occurred_on, description, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(req.tenant_id)
        .bind(req.villa_id)
        .bind(req.amount_cents)
        .bind(&req.kind)
        .bind(req.occurred_on)
        .bind(&req.description)
        .bind(created_by)
        .fetch_one(&self.db)
        .await?;

        Ok(transaction)
    }

    /// 范围内按类型汇总（仪表盘）
    pub async fn summary(&self, filter: &DataFilter) -> Result<Vec<KindTotal>, AppError> {
        let scoped = filter.restrict_transactions(
            "SELECT ft.kind, \
             COALESCE(SUM(ft.amount_cents), 0)::BIGINT AS total_cents, \
             COUNT(*)::BIGINT AS count \
             FROM financial_transactions ft WHERE 1 = 1",
            vec![],
            "ft.id",
        );
        let sql = format!("{} GROUP BY ft.kind ORDER BY ft.kind", scoped.sql);

        let mut query = sqlx::query_as::<_, KindTotal>(&sql);
        for param in &scoped.params {
            query = query.bind(*param);
        }

        let totals = query.fetch_all(&self.db).await?;
        Ok(totals)
    }
}
