//! Buyers, sellers and customers are stored in three tables with the same
//! columns. They share the [`Party`] domain type.

use api_types::party::PartyView;

use crate::audit::Audit;

/// A trading counterpart: somebody we buy from, sell to, or keep a ledger
/// for.
#[derive(Clone, Debug, PartialEq)]
pub struct Party {
    pub audit: Audit,
    pub name: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
}

impl From<&Party> for PartyView {
    fn from(value: &Party) -> Self {
        Self {
            audit: (&value.audit).into(),
            name: value.name.clone(),
            phone: value.phone.clone(),
            company_name: value.company_name.clone(),
        }
    }
}

/// Implements the `Party` conversions for one of the party tables.
macro_rules! impl_party_model {
    () => {
        impl ActiveModelBehavior for ActiveModel {}

        impl From<&$crate::Party> for ActiveModel {
            fn from(value: &$crate::Party) -> Self {
                Self {
                    id: ActiveValue::Set(value.audit.id.to_string()),
                    is_active: ActiveValue::Set(value.audit.is_active),
                    created_at: ActiveValue::Set(value.audit.created_at),
                    updated_at: ActiveValue::Set(value.audit.updated_at),
                    created_by: ActiveValue::Set(value.audit.created_by.clone()),
                    updated_by: ActiveValue::Set(value.audit.updated_by.clone()),
                    name: ActiveValue::Set(value.name.clone()),
                    phone: ActiveValue::Set(value.phone.clone()),
                    company_name: ActiveValue::Set(value.company_name.clone()),
                }
            }
        }

        impl TryFrom<Model> for $crate::Party {
            type Error = $crate::EngineError;

            fn try_from(model: Model) -> Result<Self, Self::Error> {
                Ok(Self {
                    audit: $crate::audit::audit_of!(model)?,
                    name: model.name,
                    phone: model.phone,
                    company_name: model.company_name,
                })
            }
        }
    };
}

pub(crate) use impl_party_model;
