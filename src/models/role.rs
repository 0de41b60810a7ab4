//! Role domain model
//!
//! Role ids are fixed by the seed migration: 1 admin, 2 owner,
//! 3..=6 staff variants, >= 7 customer-defined. Classification lives
//! in `crate::scope::role`.

use serde::{Deserialize, Serialize};

/// Role
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_system: bool,
}
