//! The module contains the `User` struct and the `users` table.
//!
//! Users log in with their email or phone. The password column holds an
//! argon2 PHC string and never leaves the engine.

use api_types::user::UserView;
use sea_orm::entity::{ActiveValue, prelude::*};

use crate::{ResultEngine, RoleName, audit::{Audit, audit_of}};

#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub audit: Audit,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: RoleName,
    pub(crate) password_hash: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub phone: Option<String>,
    pub password: String,
    pub role_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&User> for ActiveModel {
    fn from(value: &User) -> Self {
        Self {
            id: ActiveValue::Set(value.audit.id.to_string()),
            is_active: ActiveValue::Set(value.audit.is_active),
            created_at: ActiveValue::Set(value.audit.created_at),
            updated_at: ActiveValue::Set(value.audit.updated_at),
            created_by: ActiveValue::Set(value.audit.created_by.clone()),
            updated_by: ActiveValue::Set(value.audit.updated_by.clone()),
            name: ActiveValue::Set(value.name.clone()),
            email: ActiveValue::Set(value.email.clone()),
            phone: ActiveValue::Set(value.phone.clone()),
            password: ActiveValue::Set(value.password_hash.clone()),
            role_name: ActiveValue::Set(value.role.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for User {
    type Error = crate::EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            audit: audit_of!(model)?,
            role: RoleName::try_from(model.role_name.as_str())?,
            name: model.name,
            email: model.email,
            phone: model.phone,
            password_hash: model.password,
        })
    }
}

impl From<&User> for UserView {
    fn from(value: &User) -> Self {
        Self {
            audit: (&value.audit).into(),
            name: value.name.clone(),
            email: value.email.clone(),
            phone: value.phone.clone(),
            role_name: value.role.into(),
        }
    }
}
