//! User roles and the role groups endpoints are guarded with.

use api_types::user::RoleName as ApiRole;

use crate::EngineError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RoleName {
    SuperAdmin,
    Admin,
    #[default]
    Editor,
    Sales,
}

impl RoleName {
    /// Returns the canonical role string used by the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN_ROLE",
            Self::Admin => "ADMIN_ROLE",
            Self::Editor => "EDITOR_ROLE",
            Self::Sales => "SALES_ROLE",
        }
    }

    pub fn is_any_of(self, roles: &[RoleName]) -> bool {
        roles.contains(&self)
    }
}

impl TryFrom<&str> for RoleName {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "SUPER_ADMIN_ROLE" => Ok(Self::SuperAdmin),
            "ADMIN_ROLE" => Ok(Self::Admin),
            "EDITOR_ROLE" => Ok(Self::Editor),
            "SALES_ROLE" => Ok(Self::Sales),
            other => Err(EngineError::InvalidInput(format!("invalid role: {other}"))),
        }
    }
}

impl From<ApiRole> for RoleName {
    fn from(value: ApiRole) -> Self {
        match value {
            ApiRole::SuperAdminRole => Self::SuperAdmin,
            ApiRole::AdminRole => Self::Admin,
            ApiRole::EditorRole => Self::Editor,
            ApiRole::SalesRole => Self::Sales,
        }
    }
}

impl From<RoleName> for ApiRole {
    fn from(value: RoleName) -> Self {
        match value {
            RoleName::SuperAdmin => Self::SuperAdminRole,
            RoleName::Admin => Self::AdminRole,
            RoleName::Editor => Self::EditorRole,
            RoleName::Sales => Self::SalesRole,
        }
    }
}

pub const SUPERADMIN_ADMIN_EDITOR: &[RoleName] =
    &[RoleName::SuperAdmin, RoleName::Admin, RoleName::Editor];
pub const SUPERADMIN_ADMIN: &[RoleName] = &[RoleName::SuperAdmin, RoleName::Admin];
pub const ADMIN_EDITOR: &[RoleName] = &[RoleName::Editor, RoleName::Admin];
pub const EDITOR: &[RoleName] = &[RoleName::Editor];
pub const ADMIN: &[RoleName] = &[RoleName::Admin];
pub const SUPERADMIN: &[RoleName] = &[RoleName::SuperAdmin];
pub const SALESMAN: &[RoleName] = &[RoleName::Sales];
/// Every role; used by read-only listings open to any signed-in user.
pub const ANY_ROLE: &[RoleName] = &[
    RoleName::SuperAdmin,
    RoleName::Admin,
    RoleName::Editor,
    RoleName::Sales,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_strings_round_trip() {
        for role in ANY_ROLE {
            assert_eq!(RoleName::try_from(role.as_str()).unwrap(), *role);
        }
        assert!(RoleName::try_from("ROOT").is_err());
    }

    #[test]
    fn groups_gate_roles() {
        assert!(RoleName::Admin.is_any_of(SUPERADMIN_ADMIN));
        assert!(!RoleName::Editor.is_any_of(SUPERADMIN_ADMIN));
        assert!(RoleName::Editor.is_any_of(SUPERADMIN_ADMIN_EDITOR));
        assert!(!RoleName::Sales.is_any_of(ADMIN_EDITOR));
    }
}
