//! The module contains the `Purchase` struct and the `purchases` table.
//!
//! A purchase is a quantity of goods bought from a seller. Sells and
//! manufactures draw from it; see [`Purchase::remaining`].

use api_types::purchase::PurchaseView;
use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{
    Amount, EngineError, ResultEngine,
    audit::{Audit, audit_of, parse_optional_id},
};

/// How a purchase or sell was settled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransactionType {
    #[default]
    Cash,
    Credit,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Credit => "credit",
        }
    }
}

impl TryFrom<&str> for TransactionType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "cash" => Ok(Self::Cash),
            "credit" => Ok(Self::Credit),
            other => Err(EngineError::InvalidInput(format!(
                "invalid transaction type: {other}"
            ))),
        }
    }
}

impl From<api_types::TransactionType> for TransactionType {
    fn from(value: api_types::TransactionType) -> Self {
        match value {
            api_types::TransactionType::Cash => Self::Cash,
            api_types::TransactionType::Credit => Self::Credit,
        }
    }
}

impl From<TransactionType> for api_types::TransactionType {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Cash => Self::Cash,
            TransactionType::Credit => Self::Credit,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Purchase {
    pub audit: Audit,
    pub name: String,
    pub amount: Amount,
    pub price: Amount,
    pub purchase_date: Option<DateTime<Utc>>,
    pub transaction_type: TransactionType,
    pub seller_id: Option<Uuid>,
}

/// Breakdown of how much of a purchase has been used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PurchaseRemaining {
    pub purchase_id: Uuid,
    pub amount: Amount,
    pub sold: Amount,
    pub manufactured: Amount,
    pub remaining: Amount,
}

impl Purchase {
    /// What is left once `sold` and `manufactured` are taken out.
    pub fn remaining(&self, sold: Amount, manufactured: Amount) -> PurchaseRemaining {
        PurchaseRemaining {
            purchase_id: self.audit.id,
            amount: self.amount,
            sold,
            manufactured,
            remaining: self.amount - sold - manufactured,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "purchases")]
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
    pub purchase_date: Option<DateTimeUtc>,
    pub transaction_type: String,
    pub seller_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sellers::Entity",
        from = "Column::SellerId",
        to = "super::sellers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Sellers,
    #[sea_orm(has_many = "super::sells::Entity")]
    Sells,
    #[sea_orm(has_many = "super::manufactures::Entity")]
    Manufactures,
}

impl Related<super::sellers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sellers.def()
    }
}

impl Related<super::sells::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sells.def()
    }
}

impl Related<super::manufactures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Manufactures.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Purchase> for ActiveModel {
    fn from(value: &Purchase) -> Self {
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
            purchase_date: ActiveValue::Set(value.purchase_date),
            transaction_type: ActiveValue::Set(value.transaction_type.as_str().to_string()),
            seller_id: ActiveValue::Set(value.seller_id.map(|id| id.to_string())),
        }
    }
}

impl TryFrom<Model> for Purchase {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            audit: audit_of!(model)?,
            amount: Amount::from_micros(model.amount),
            price: Amount::from_micros(model.price),
            purchase_date: model.purchase_date,
            transaction_type: TransactionType::try_from(model.transaction_type.as_str())?,
            seller_id: parse_optional_id(model.seller_id.as_deref())?,
            name: model.name,
        })
    }
}

impl From<&Purchase> for PurchaseView {
    fn from(value: &Purchase) -> Self {
        Self {
            audit: (&value.audit).into(),
            name: value.name.clone(),
            amount: value.amount.to_f64(),
            price: value.price.to_f64(),
            purchase_date: value.purchase_date,
            transaction_type: value.transaction_type.into(),
            seller_id: value.seller_id,
        }
    }
}

impl From<&PurchaseRemaining> for api_types::purchase::PurchaseRemainingView {
    fn from(value: &PurchaseRemaining) -> Self {
        Self {
            purchase_id: value.purchase_id,
            amount: value.amount.to_f64(),
            sold: value.sold.to_f64(),
            manufactured: value.manufactured.to_f64(),
            remaining: value.remaining.to_f64(),
        }
    }
}
