//! The `manufactures` table: goods turned into product out of a purchase.

use api_types::manufacture::ManufactureView;
use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{
    Amount, EngineError, Purchase, ResultEngine,
    audit::{Audit, audit_of, parse_id},
};

#[derive(Clone, Debug, PartialEq)]
pub struct Manufacture {
    pub audit: Audit,
    pub name: String,
    pub amount: Amount,
    pub manufacture_date: Option<DateTime<Utc>>,
    pub purchase_id: Uuid,
    pub purchase: Option<Purchase>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "manufactures")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub name: String,
    pub amount: i64,
    pub manufacture_date: Option<DateTimeUtc>,
    pub purchase_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::purchases::Entity",
        from = "Column::PurchaseId",
        to = "super::purchases::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Purchases,
}

impl Related<super::purchases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Manufacture> for ActiveModel {
    fn from(value: &Manufacture) -> Self {
        Self {
            id: ActiveValue::Set(value.audit.id.to_string()),
            is_active: ActiveValue::Set(value.audit.is_active),
            created_at: ActiveValue::Set(value.audit.created_at),
            updated_at: ActiveValue::Set(value.audit.updated_at),
            created_by: ActiveValue::Set(value.audit.created_by.clone()),
            updated_by: ActiveValue::Set(value.audit.updated_by.clone()),
            name: ActiveValue::Set(value.name.clone()),
            amount: ActiveValue::Set(value.amount.micros()),
            manufacture_date: ActiveValue::Set(value.manufacture_date),
            purchase_id: ActiveValue::Set(value.purchase_id.to_string()),
        }
    }
}

impl TryFrom<(Model, Option<super::purchases::Model>)> for Manufacture {
    type Error = EngineError;

    fn try_from((model, purchase): (Model, Option<super::purchases::Model>)) -> ResultEngine<Self> {
        Ok(Self {
            audit: audit_of!(model)?,
            amount: Amount::from_micros(model.amount),
            manufacture_date: model.manufacture_date,
            purchase_id: parse_id(&model.purchase_id)?,
            purchase: purchase.map(Purchase::try_from).transpose()?,
            name: model.name,
        })
    }
}

impl From<&Manufacture> for ManufactureView {
    fn from(value: &Manufacture) -> Self {
        Self {
            audit: (&value.audit).into(),
            name: value.name.clone(),
            amount: value.amount.to_f64(),
            manufacture_date: value.manufacture_date,
            purchase: value.purchase.as_ref().map(Into::into),
        }
    }
}
