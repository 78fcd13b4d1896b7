//! Daily statements: every active purchase or sell of one day, with its
//! counterpart and line total.

use api_types::purchase::StatementLine;
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use sea_orm::{QueryFilter, QueryOrder, prelude::*};

use crate::{
    Amount, EngineError, Party, Purchase, ResultEngine, Sell, TransactionType, customers,
    purchases, sellers, sells,
};

use super::Engine;

#[derive(Clone, Debug, PartialEq)]
pub struct StatementRow {
    /// Seller of a purchase or customer of a sell; empty when not recorded.
    pub party: String,
    pub product: String,
    pub amount: Amount,
    pub price: Amount,
    /// `amount × price`. Kept as a float since it can exceed what an
    /// [`Amount`] holds.
    pub total: f64,
    pub transaction_type: TransactionType,
    pub date: DateTime<Utc>,
}

impl StatementRow {
    fn new(
        party: Option<Party>,
        product: String,
        amount: Amount,
        price: Amount,
        transaction_type: TransactionType,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            party: party.map(|p| p.name).unwrap_or_default(),
            product,
            amount,
            price,
            total: Amount::micros_to_f64(amount.wide_mul(price)),
            transaction_type,
            date,
        }
    }
}

impl From<&StatementRow> for StatementLine {
    fn from(value: &StatementRow) -> Self {
        Self {
            party: value.party.clone(),
            product: value.product.clone(),
            amount: value.amount.to_f64(),
            price: value.price.to_f64(),
            total: value.total,
            transaction_type: value.transaction_type.into(),
            date: value.date,
        }
    }
}

/// `[date 00:00 UTC, next day 00:00 UTC)`.
fn day_bounds(date: NaiveDate) -> ResultEngine<(DateTime<Utc>, DateTime<Utc>)> {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    let end = start
        .checked_add_days(Days::new(1))
        .ok_or_else(|| EngineError::InvalidInput(format!("invalid statement date: {date}")))?;
    Ok((start, end))
}

impl Engine {
    /// Purchases dated `date`, oldest first, with their seller.
    pub async fn purchase_statement(&self, date: NaiveDate) -> ResultEngine<Vec<StatementRow>> {
        let (start, end) = day_bounds(date)?;
        let rows = purchases::Entity::find()
            .filter(purchases::Column::IsActive.eq(true))
            .filter(purchases::Column::PurchaseDate.gte(start))
            .filter(purchases::Column::PurchaseDate.lt(end))
            .find_also_related(sellers::Entity)
            .order_by_asc(purchases::Column::PurchaseDate)
            .all(&self.database)
            .await?;

        rows.into_iter()
            .map(|(purchase, seller)| {
                let purchase = Purchase::try_from(purchase)?;
                let seller = seller.map(Party::try_from).transpose()?;
                Ok(StatementRow::new(
                    seller,
                    purchase.name,
                    purchase.amount,
                    purchase.price,
                    purchase.transaction_type,
                    purchase.purchase_date.unwrap_or(start),
                ))
            })
            .collect()
    }

    /// Sells dated `date`, oldest first, with their customer.
    pub async fn sell_statement(&self, date: NaiveDate) -> ResultEngine<Vec<StatementRow>> {
        let (start, end) = day_bounds(date)?;
        let rows = sells::Entity::find()
            .filter(sells::Column::IsActive.eq(true))
            .filter(sells::Column::SellDate.gte(start))
            .filter(sells::Column::SellDate.lt(end))
            .find_also_related(customers::Entity)
            .order_by_asc(sells::Column::SellDate)
            .all(&self.database)
            .await?;

        rows.into_iter()
            .map(|(sell, customer)| {
                let sell = Sell::try_from((sell, None::<purchases::Model>))?;
                let customer = customer.map(Party::try_from).transpose()?;
                Ok(StatementRow::new(
                    customer,
                    sell.name,
                    sell.amount,
                    sell.price,
                    sell.transaction_type,
                    sell.sell_date.unwrap_or(start),
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_cover_one_utc_day() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let (start, end) = day_bounds(date).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-02-29T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-03-01T00:00:00+00:00");
    }

    #[test]
    fn row_total_is_amount_times_price() {
        let row = StatementRow::new(
            None,
            "Wheat".to_string(),
            Amount::from_micros(12_500_000),
            Amount::from_micros(4_000_000),
            TransactionType::Credit,
            Utc::now(),
        );
        assert_eq!(row.total, 50.0);
        assert_eq!(row.party, "");
    }
}
