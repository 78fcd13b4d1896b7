//! Audit columns shared by every table and the caller that writes them.

use api_types::AuditView;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, RoleName, User};

/// Who is performing an operation.
///
/// The id ends up in `created_by`/`updated_by`; the role gates operations
/// such as granting `SUPER_ADMIN_ROLE`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub role: RoleName,
}

impl Actor {
    /// Used by the admin CLI, which runs with full privileges.
    pub fn system() -> Self {
        Self {
            user_id: "system".to_string(),
            role: RoleName::SuperAdmin,
        }
    }
}

impl From<&User> for Actor {
    fn from(value: &User) -> Self {
        Self {
            user_id: value.audit.id.to_string(),
            role: value.role,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Audit {
    pub id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

impl Audit {
    pub fn new(actor: &Actor) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            is_active: true,
            created_at: now,
            updated_at: now,
            created_by: Some(actor.user_id.clone()),
            updated_by: Some(actor.user_id.clone()),
        }
    }

    /// Marks the row as modified by `actor`.
    pub fn touch(&mut self, actor: &Actor) {
        self.updated_at = Utc::now();
        self.updated_by = Some(actor.user_id.clone());
    }

    pub fn deactivate(&mut self, actor: &Actor) {
        self.is_active = false;
        self.touch(actor);
    }

    pub(crate) fn from_columns(
        id: &str,
        is_active: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        created_by: Option<String>,
        updated_by: Option<String>,
    ) -> ResultEngine<Self> {
        Ok(Self {
            id: parse_id(id)?,
            is_active,
            created_at,
            updated_at,
            created_by,
            updated_by,
        })
    }
}

impl From<&Audit> for AuditView {
    fn from(value: &Audit) -> Self {
        Self {
            id: value.id,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
            created_by: value.created_by.clone(),
            updated_by: value.updated_by.clone(),
        }
    }
}

pub(crate) fn parse_id(value: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| EngineError::InvalidInput(format!("invalid stored id: {value}")))
}

pub(crate) fn parse_optional_id(value: Option<&str>) -> ResultEngine<Option<Uuid>> {
    value.map(parse_id).transpose()
}

/// Builds an [`Audit`] from the audit columns of any entity model.
macro_rules! audit_of {
    ($model:expr) => {
        $crate::audit::Audit::from_columns(
            &$model.id,
            $model.is_active,
            $model.created_at,
            $model.updated_at,
            $model.created_by.clone(),
            $model.updated_by.clone(),
        )
    };
}

pub(crate) use audit_of;
