//! Database repository layer

pub mod auth_repo;
pub mod property_repo;
pub mod role_repo;
pub mod tenant_repo;
pub mod transaction_repo;
pub mod user_repo;

pub use auth_repo::*;
pub use property_repo::*;
pub use role_repo::*;
pub use tenant_repo::*;
pub use transaction_repo::*;
pub use user_repo::*;
