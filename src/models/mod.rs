//! 数据模型模块
//! 用户与角色、物业（楼栋/别墅/楼层/公寓）、租户、财务流水、认证

pub mod auth;
pub mod property;
pub mod role;
pub mod tenant;
pub mod transaction;
pub mod user;
