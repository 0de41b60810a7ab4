//! HTTP 处理器模块

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod metrics;
pub mod property;
pub mod tenant;
pub mod transaction;
pub mod user;

use serde::Deserialize;

/// 通用分页参数
#[derive(Debug, Deserialize, Default)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    /// 解析为 (limit, offset)，限制单页上限
    pub fn resolve(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(50).clamp(1, 200);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}
