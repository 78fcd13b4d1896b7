//! The `sells` table. Every sell draws its amount from a purchase.

use api_types::sell::SellView;
use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{
    Amount, EngineError, Purchase, ResultEngine, TransactionType,
    audit::{Audit, audit_of, parse_id, parse_optional_id},
};

#[derive(Clone, Debug, PartialEq)]
pub struct Sell {
    pub audit: Audit,
    pub name: String,
    pub amount: Amount,
    pub price: Amount,
    pub sell_date: Option<DateTime<Utc>>,
    pub transaction_type: TransactionType,
    pub customer_id: Option<Uuid>,
    pub purchase_id: Uuid,
    /// Loaded alongside the sell when it is read back.
    pub purchase: Option<Purchase>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sells")]
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
    pub price: i64,
    pub sell_date: Option<DateTimeUtc>,
    pub transaction_type: String,
    pub customer_id: Option<String>,
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
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Customers,
}

impl Related<super::purchases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Sell> for ActiveModel {
    fn from(value: &Sell) -> Self {
        Self {
            id: ActiveValue::Set(value.audit.id.to_string()),
            is_active: ActiveValue::Set(value.audit.is_active),
            created_at: ActiveValue::Set(value.audit.created_at),
            updated_at: ActiveValue::Set(value.audit.updated_at),
            created_by: ActiveValue::Set(value.audit.created_by.clone()),
            updated_by: ActiveValue::Set(value.audit.updated_by.clone()),
            name: ActiveValue::Set(value.name.clone()),
            amount: ActiveValue::Set(value.amount.micros()),
            price: ActiveValue::Set(value.price.micros()),
            sell_date: ActiveValue::Set(value.sell_date),
            transaction_type: ActiveValue::Set(value.transaction_type.as_str().to_string()),
            customer_id: ActiveValue::Set(value.customer_id.map(|id| id.to_string())),
            purchase_id: ActiveValue::Set(value.purchase_id.to_string()),
        }
    }
}

impl TryFrom<(Model, Option<super::purchases::Model>)> for Sell {
    type Error = EngineError;

    fn try_from((model, purchase): (Model, Option<super::purchases::Model>)) -> ResultEngine<Self> {
        Ok(Self {
            audit: audit_of!(model)?,
            amount: Amount::from_micros(model.amount),
            price: Amount::from_micros(model.price),
            sell_date: model.sell_date,
            transaction_type: TransactionType::try_from(model.transaction_type.as_str())?,
            customer_id: parse_optional_id(model.customer_id.as_deref())?,
            purchase_id: parse_id(&model.purchase_id)?,
            purchase: purchase.map(Purchase::try_from).transpose()?,
            name: model.name,
        })
    }
}

impl From<&Sell> for SellView {
    fn from(value: &Sell) -> Self {
        Self {
            audit: (&value.audit).into(),
            name: value.name.clone(),
            amount: value.amount.to_f64(),
            price: value.price.to_f64(),
            sell_date: value.sell_date,
            transaction_type: value.transaction_type.into(),
            customer_id: value.customer_id,
            purchase: value.purchase.as_ref().map(Into::into),
        }
    }
}
