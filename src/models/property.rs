//! Property domain models: buildings, villas, floors, apartments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Building
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Building {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Standalone villa (directly rentable, no floors)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Villa {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub bedrooms: i32,
    pub rent_cents: i64,
    pub status: String, // vacant, occupied, maintenance
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Floor of a building
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Floor {
    pub id: i64,
    pub building_id: i64,
    pub level: i32,
}

/// Apartment, belongs to exactly one building via its floor
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Apartment {
    pub id: i64,
    pub floor_id: i64,
    pub unit_number: String,
    pub bedrooms: i32,
    pub rent_cents: i64,
    pub status: String, // vacant, occupied, maintenance
}

/// Create building request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBuildingRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub address: String,
    pub notes: Option<String>,
}

/// Update building request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBuildingRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// Create villa request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVillaRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub address: String,
    #[validate(range(min = 0, max = 20))]
    pub bedrooms: i32,
    #[validate(range(min = 0))]
    pub rent_cents: i64,
}

/// Update villa request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVillaRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub address: Option<String>,
    #[validate(range(min = 0))]
    pub rent_cents: Option<i64>,
    pub status: Option<String>,
}
