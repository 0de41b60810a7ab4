//! Role classification

use serde::Serialize;

/// 管理员角色 ID
pub const ROLE_ADMIN: i32 = 1;
/// 业主角色 ID
pub const ROLE_OWNER: i32 = 2;
/// 员工角色 ID 范围（经理、会计、维修、前台）
pub const ROLE_STAFF_MIN: i32 = 3;
pub const ROLE_STAFF_MAX: i32 = 6;

/// Role class derived from a raw role id.
///
/// Consumers switch on this closed enum instead of re-deriving
/// id range checks at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleClass {
    Admin,
    Owner,
    Staff,
    Custom,
}

impl RoleClass {
    /// Classify a role id. Pure and total: unknown ids fall back to `Custom`.
    pub fn from_role_id(role_id: i32) -> Self {
        match role_id {
            ROLE_ADMIN => RoleClass::Admin,
            ROLE_OWNER => RoleClass::Owner,
            ROLE_STAFF_MIN..=ROLE_STAFF_MAX => RoleClass::Staff,
            _ => RoleClass::Custom,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, RoleClass::Admin)
    }

    pub fn is_owner(&self) -> bool {
        matches!(self, RoleClass::Owner)
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, RoleClass::Staff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_roles() {
        assert_eq!(RoleClass::from_role_id(1), RoleClass::Admin);
        assert_eq!(RoleClass::from_role_id(2), RoleClass::Owner);
        assert_eq!(RoleClass::from_role_id(3), RoleClass::Staff);
        assert_eq!(RoleClass::from_role_id(4), RoleClass::Staff);
        assert_eq!(RoleClass::from_role_id(5), RoleClass::Staff);
        assert_eq!(RoleClass::from_role_id(6), RoleClass::Staff);
    }

    #[test]
    fn test_classify_custom_fallback() {
        assert_eq!(RoleClass::from_role_id(7), RoleClass::Custom);
        assert_eq!(RoleClass::from_role_id(100), RoleClass::Custom);
        assert_eq!(RoleClass::from_role_id(0), RoleClass::Custom);
        assert_eq!(RoleClass::from_role_id(-1), RoleClass::Custom);
    }

    #[test]
    fn test_staff_boundary() {
        assert!(RoleClass::from_role_id(6).is_staff());
        assert!(!RoleClass::from_role_id(7).is_staff());
    }
}
