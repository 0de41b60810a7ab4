//! Tenant domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Tenant
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tenant {
    pub id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: String, // active, notice, moved_out
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Apartment assignment (tenant occupies apartment)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ApartmentAssignment {
    pub tenant_id: i64,
    pub apartment_id: i64,
    pub assigned_at: DateTime<Utc>,
}

/// Create tenant request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTenantRequest {
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

/// Update tenant request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTenantRequest {
    #[validate(length(min = 1, max = 120))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub status: Option<String>,
}

/// Assign tenant to apartment request
#[derive(Debug, Deserialize)]
pub struct AssignApartmentRequest {
    pub apartment_id: i64,
}
