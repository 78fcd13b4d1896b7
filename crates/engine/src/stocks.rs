//! The `stocks` table.

use api_types::stock::StockView;
use sea_orm::entity::{ActiveValue, prelude::*};

use crate::{
    Amount, EngineError, ResultEngine,
    audit::{Audit, audit_of},
};

#[derive(Clone, Debug, PartialEq)]
pub struct Stock {
    pub audit: Audit,
    pub name: String,
    pub in_stock: Amount,
    pub sold: Amount,
    pub remaining: Amount,
}

impl Stock {
    /// Recomputes `remaining` from `in_stock` and `sold`.
    pub fn refresh_remaining(&mut self) -> ResultEngine<()> {
        self.remaining = self
            .in_stock
            .checked_sub(self.sold)
            .ok_or_else(|| EngineError::InvalidAmount("stock overflow".to_string()))?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stocks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub name: String,
    pub in_stock: i64,
    pub sold: i64,
    pub remaining: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Stock> for ActiveModel {
    fn from(value: &Stock) -> Self {
        Self {
            id: ActiveValue::Set(value.audit.id.to_string()),
            is_active: ActiveValue::Set(value.audit.is_active),
            created_at: ActiveValue::Set(value.audit.created_at),
            updated_at: ActiveValue::Set(value.audit.updated_at),
            created_by: ActiveValue::Set(value.audit.created_by.clone()),
            updated_by: ActiveValue::Set(value.audit.updated_by.clone()),
            name: ActiveValue::Set(value.name.clone()),
            in_stock: ActiveValue::Set(value.in_stock.micros()),
            sold: ActiveValue::Set(value.sold.micros()),
            remaining: ActiveValue::Set(value.remaining.micros()),
        }
    }
}

impl TryFrom<Model> for Stock {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            audit: audit_of!(model)?,
            in_stock: Amount::from_micros(model.in_stock),
            sold: Amount::from_micros(model.sold),
            remaining: Amount::from_micros(model.remaining),
            name: model.name,
        })
    }
}

impl From<&Stock> for StockView {
    fn from(value: &Stock) -> Self {
        Self {
            audit: (&value.audit).into(),
            name: value.name.clone(),
            in_stock: value.in_stock.to_f64(),
            sold: value.sold.to_f64(),
            remaining: value.remaining.to_f64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Actor;

    #[test]
    fn remaining_follows_in_stock_and_sold() {
        let mut stock = Stock {
            audit: Audit::new(&Actor::system()),
            name: "Flour".to_string(),
            in_stock: Amount::from_micros(80_000_000),
            sold: Amount::from_micros(12_250_000),
            remaining: Amount::ZERO,
        };
        stock.refresh_remaining().unwrap();
        assert_eq!(stock.remaining.to_string(), "67.75");
    }
}
