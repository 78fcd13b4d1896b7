//! The `ledgers` table: running balances kept per customer.

use api_types::ledger::LedgerView;
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{
    Amount, EngineError, Party, ResultEngine,
    audit::{Audit, audit_of, parse_id},
};

#[derive(Clone, Debug, PartialEq)]
pub struct Ledger {
    pub audit: Audit,
    pub previous_ledger: Amount,
    pub deposit_amount: Amount,
    pub remaining_ledger: Amount,
    pub customer_id: Uuid,
    pub customer: Option<Party>,
}

/// `previous - deposit`. Overpaying leaves a negative balance.
pub fn compute_remaining(previous: Amount, deposit: Amount) -> ResultEngine<Amount> {
    previous
        .checked_sub(deposit)
        .ok_or_else(|| EngineError::InvalidAmount("ledger balance overflow".to_string()))
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ledgers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub previous_ledger: i64,
    pub deposit_amount: i64,
    pub remaining_ledger: i64,
    pub customer_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Customers,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Ledger> for ActiveModel {
    fn from(value: &Ledger) -> Self {
        Self {
            id: ActiveValue::Set(value.audit.id.to_string()),
            is_active: ActiveValue::Set(value.audit.is_active),
            created_at: ActiveValue::Set(value.audit.created_at),
            updated_at: ActiveValue::Set(value.audit.updated_at),
            created_by: ActiveValue::Set(value.audit.created_by.clone()),
            updated_by: ActiveValue::Set(value.audit.updated_by.clone()),
            previous_ledger: ActiveValue::Set(value.previous_ledger.micros()),
            deposit_amount: ActiveValue::Set(value.deposit_amount.micros()),
            remaining_ledger: ActiveValue::Set(value.remaining_ledger.micros()),
            customer_id: ActiveValue::Set(value.customer_id.to_string()),
        }
    }
}

impl TryFrom<(Model, Option<super::customers::Model>)> for Ledger {
    type Error = EngineError;

    fn try_from((model, customer): (Model, Option<super::customers::Model>)) -> ResultEngine<Self> {
        Ok(Self {
            audit: audit_of!(model)?,
            previous_ledger: Amount::from_micros(model.previous_ledger),
            deposit_amount: Amount::from_micros(model.deposit_amount),
            remaining_ledger: Amount::from_micros(model.remaining_ledger),
            customer_id: parse_id(&model.customer_id)?,
            customer: customer.map(Party::try_from).transpose()?,
        })
    }
}

impl From<&Ledger> for LedgerView {
    fn from(value: &Ledger) -> Self {
        Self {
            audit: (&value.audit).into(),
            previous_ledger: value.previous_ledger.to_f64(),
            deposit_amount: value.deposit_amount.to_f64(),
            remaining_ledger: value.remaining_ledger.to_f64(),
            customer: value.customer.as_ref().map(Into::into),
        }
    }
}
