use api_types::stock::{StockNew, StockSearch, StockUpdate};
use sea_orm::{ActiveModelTrait, Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Actor, Amount, Audit, Page, PageRequest, ResultEngine, Stock,
    query::{contains_ignore_case, search_term},
    stocks,
};

use super::{Engine, normalize_required_name, page_of, quantity, with_tx};

const ORDER_FIELDS: &[(&str, stocks::Column)] = &[
    ("name", stocks::Column::Name),
    ("inStock", stocks::Column::InStock),
    ("sold", stocks::Column::Sold),
    ("remaining", stocks::Column::Remaining),
    ("createdAt", stocks::Column::CreatedAt),
    ("updatedAt", stocks::Column::UpdatedAt),
];

impl Engine {
    pub async fn stocks(&self) -> ResultEngine<Vec<Stock>> {
        stocks::Entity::find()
            .filter(stocks::Column::IsActive.eq(true))
            .order_by_desc(stocks::Column::UpdatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Stock::try_from)
            .collect()
    }

    pub async fn stocks_page(
        &self,
        search: &StockSearch,
        request: &PageRequest,
    ) -> ResultEngine<Page<Stock>> {
        let condition = Condition::all()
            .add(stocks::Column::IsActive.eq(true))
            .add_option(
                search_term(search.name.as_deref())
                    .map(|s| contains_ignore_case(stocks::Entity, stocks::Column::Name, s)),
            );
        let order = request.order_column(ORDER_FIELDS, stocks::Column::UpdatedAt);
        let (rows, count) =
            page_of::<stocks::Entity, _>(&self.database, condition, request, order).await?;
        Ok(Page {
            data: rows
                .into_iter()
                .map(Stock::try_from)
                .collect::<ResultEngine<_>>()?,
            count,
            page: request.page,
            limit: request.limit,
        })
    }

    pub async fn stock(&self, id: Uuid) -> ResultEngine<Stock> {
        Stock::try_from(self.require_stock(&self.database, id).await?)
    }

    pub async fn new_stock(&self, input: &StockNew, actor: &Actor) -> ResultEngine<Stock> {
        let mut stock = Stock {
            audit: Audit::new(actor),
            name: normalize_required_name(&input.name, "stock")?,
            in_stock: quantity(input.in_stock, "in stock")?,
            sold: quantity(input.sold, "sold")?,
            remaining: Amount::ZERO,
        };
        stock.refresh_remaining()?;

        with_tx!(self, |db_tx| {
            let model: stocks::ActiveModel = (&stock).into();
            model.insert(&db_tx).await?;
            tracing::info!(stock_id = %stock.audit.id, remaining = %stock.remaining, "stock created");
            Ok(stock)
        })
    }

    /// Applies the fields present in `input`; `remaining` is recomputed.
    pub async fn update_stock(
        &self,
        id: Uuid,
        input: &StockUpdate,
        actor: &Actor,
    ) -> ResultEngine<Stock> {
        with_tx!(self, |db_tx| {
            let mut stock = Stock::try_from(self.require_stock(&db_tx, id).await?)?;
            if let Some(name) = &input.name {
                stock.name = normalize_required_name(name, "stock")?;
            }
            if let Some(in_stock) = input.in_stock {
                stock.in_stock = quantity(in_stock, "in stock")?;
            }
            if let Some(sold) = input.sold {
                stock.sold = quantity(sold, "sold")?;
            }
            stock.refresh_remaining()?;
            stock.audit.touch(actor);

            let model: stocks::ActiveModel = (&stock).into();
            model.update(&db_tx).await?;
            Ok(stock)
        })
    }

    /// Soft delete.
    pub async fn remove_stock(&self, id: Uuid, actor: &Actor) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            let mut stock = Stock::try_from(self.require_stock(&db_tx, id).await?)?;
            stock.audit.deactivate(actor);
            let model: stocks::ActiveModel = (&stock).into();
            model.update(&db_tx).await?;
            Ok(true)
        })
    }
}
