//! 数据访问范围引擎
//!
//! 每个请求根据用户角色计算一次可见数据范围（楼栋、别墅、公寓、租户、
//! 财务流水、可管理用户），并以 `DataFilter` 附加到请求上。
//! 控制器通过 `restrict` 系列辅助函数把范围编码进自己的 SQL。

pub mod filter;
pub mod query;
pub mod resolver;
pub mod role;
pub mod set;

pub use filter::{Actor, DataFilter, DataFilterAssembler};
pub use query::{restrict, ScopedSql};
pub use resolver::ScopeResolver;
pub use role::RoleClass;
pub use set::ScopeSet;
