use api_types::sell::{SellNew, SellSearch, SellUpdate};
use sea_orm::{
    ActiveModelTrait, Condition, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    Actor, Audit, EngineError, Page, PageRequest, Purchase, ResultEngine, Sell, purchases,
    query::{contains_ignore_case, search_term},
    sells,
};

use super::{
    Engine, normalize_required_name, page_also_related, purchases::Excluding, quantity, to_utc,
    with_tx,
};

const ORDER_FIELDS: &[(&str, sells::Column)] = &[
    ("name", sells::Column::Name),
    ("price", sells::Column::Price),
    ("amount", sells::Column::Amount),
    ("sellDate", sells::Column::SellDate),
    ("createdAt", sells::Column::CreatedAt),
    ("updatedAt", sells::Column::UpdatedAt),
];

impl Engine {
    /// All active sells with their purchase, most recently updated first.
    pub async fn sells(&self) -> ResultEngine<Vec<Sell>> {
        sells::Entity::find()
            .filter(sells::Column::IsActive.eq(true))
            .find_also_related(purchases::Entity)
            .order_by_desc(sells::Column::UpdatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Sell::try_from)
            .collect()
    }

    pub async fn sells_page(
        &self,
        search: &SellSearch,
        request: &PageRequest,
    ) -> ResultEngine<Page<Sell>> {
        let condition = Condition::all()
            .add(sells::Column::IsActive.eq(true))
            .add_option(
                search_term(search.name.as_deref())
                    .map(|s| contains_ignore_case(sells::Entity, sells::Column::Name, s)),
            )
            .add_option(
                search
                    .purchase_id
                    .map(|id| sells::Column::PurchaseId.eq(id.to_string())),
            );
        let order = request.order_column(ORDER_FIELDS, sells::Column::UpdatedAt);
        let (rows, count) = page_also_related::<sells::Entity, purchases::Entity, _>(
            &self.database,
            condition,
            request,
            order,
        )
        .await?;
        Ok(Page {
            data: rows
                .into_iter()
                .map(Sell::try_from)
                .collect::<ResultEngine<_>>()?,
            count,
            page: request.page,
            limit: request.limit,
        })
    }

    pub async fn sell(&self, id: Uuid) -> ResultEngine<Sell> {
        let row = sells::Entity::find_by_id(id.to_string())
            .filter(sells::Column::IsActive.eq(true))
            .find_also_related(purchases::Entity)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("Sell Not Found!!".to_string()))?;
        Sell::try_from(row)
    }

    /// Records a sell out of a purchase.
    ///
    /// The amount must fit in what the purchase still holds; the check and
    /// the insert share one transaction.
    pub async fn new_sell(&self, input: &SellNew, actor: &Actor) -> ResultEngine<Sell> {
        let mut sell = Sell {
            audit: Audit::new(actor),
            name: normalize_required_name(&input.name, "sell")?,
            amount: quantity(input.amount, "amount")?,
            price: quantity(input.price, "price")?,
            sell_date: Some(to_utc(input.sell_date)),
            transaction_type: input.transaction_type.unwrap_or_default().into(),
            customer_id: input.customer_id,
            purchase_id: input.purchase_id,
            purchase: None,
        };

        with_tx!(self, |db_tx| {
            if let Some(customer_id) = sell.customer_id {
                self.require_customer(&db_tx, customer_id).await?;
            }
            let purchase = self
                .ensure_purchase_covers(&db_tx, sell.purchase_id, sell.amount, Excluding::default())
                .await?;
            let model: sells::ActiveModel = (&sell).into();
            model.insert(&db_tx).await?;
            tracing::info!(
                sell_id = %sell.audit.id,
                purchase_id = %sell.purchase_id,
                amount = %sell.amount,
                "sell created"
            );
            sell.purchase = Some(purchase);
            Ok(sell)
        })
    }

    /// Applies the fields present in `input`. A changed amount or purchase is
    /// checked against the purchase, not counting this sell's old amount.
    pub async fn update_sell(
        &self,
        id: Uuid,
        input: &SellUpdate,
        actor: &Actor,
    ) -> ResultEngine<Sell> {
        with_tx!(self, |db_tx| {
            let model = self.require_sell(&db_tx, id).await?;
            let mut sell = Sell::try_from((model, None::<purchases::Model>))?;
            if let Some(name) = &input.name {
                sell.name = normalize_required_name(name, "sell")?;
            }
            if let Some(price) = input.price {
                sell.price = quantity(price, "price")?;
            }
            if let Some(date) = input.sell_date {
                sell.sell_date = Some(to_utc(date));
            }
            if let Some(kind) = input.transaction_type {
                sell.transaction_type = kind.into();
            }
            if let Some(customer_id) = input.customer_id {
                self.require_customer(&db_tx, customer_id).await?;
                sell.customer_id = Some(customer_id);
            }

            let purchase = if input.amount.is_some() || input.purchase_id.is_some() {
                if let Some(amount) = input.amount {
                    sell.amount = quantity(amount, "amount")?;
                }
                if let Some(purchase_id) = input.purchase_id {
                    sell.purchase_id = purchase_id;
                }
                let excluding = Excluding {
                    sell: Some(id),
                    ..Excluding::default()
                };
                Some(
                    self.ensure_purchase_covers(&db_tx, sell.purchase_id, sell.amount, excluding)
                        .await?,
                )
            } else {
                self.purchase_row(&db_tx, sell.purchase_id).await?
            };
            sell.audit.touch(actor);

            let model: sells::ActiveModel = (&sell).into();
            model.update(&db_tx).await?;
            sell.purchase = purchase;
            Ok(sell)
        })
    }

    /// Soft delete. The amount goes back to the purchase.
    pub async fn remove_sell(&self, id: Uuid, actor: &Actor) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            let model = self.require_sell(&db_tx, id).await?;
            let mut sell = Sell::try_from((model, None::<purchases::Model>))?;
            sell.audit.deactivate(actor);
            let model: sells::ActiveModel = (&sell).into();
            model.update(&db_tx).await?;
            Ok(true)
        })
    }

    /// The purchase row, active or not, for embedding in responses.
    pub(super) async fn purchase_row<C: ConnectionTrait>(
        &self,
        db: &C,
        id: Uuid,
    ) -> ResultEngine<Option<Purchase>> {
        purchases::Entity::find_by_id(id.to_string())
            .one(db)
            .await?
            .map(Purchase::try_from)
            .transpose()
    }
}
