use api_types::purchase::{PurchaseNew, PurchaseSearch, PurchaseUpdate};
use sea_orm::{
    ActiveModelTrait, Condition, ConnectionTrait, QueryFilter, QueryOrder, QueryTrait,
    TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    Actor, Amount, Audit, EngineError, Page, PageRequest, Purchase, PurchaseRemaining,
    ResultEngine, manufactures, purchases,
    query::{contains_ignore_case, search_term},
    sells,
};

use super::{Engine, normalize_required_name, page_of, quantity, to_utc, with_tx};

pub(super) const EXCEEDS_PURCHASE: &str = "You are exceeding purchase amount";

const ORDER_FIELDS: &[(&str, purchases::Column)] = &[
    ("name", purchases::Column::Name),
    ("price", purchases::Column::Price),
    ("amount", purchases::Column::Amount),
    ("purchaseDate", purchases::Column::PurchaseDate),
    ("createdAt", purchases::Column::CreatedAt),
    ("updatedAt", purchases::Column::UpdatedAt),
];

/// Rows drawing from a purchase that should not be counted, so an update
/// does not compete with its own previous amount.
#[derive(Clone, Copy, Debug, Default)]
pub(super) struct Excluding {
    pub(super) sell: Option<Uuid>,
    pub(super) manufacture: Option<Uuid>,
}

impl Engine {
    /// All active purchases, most recently updated first.
    pub async fn purchases(&self) -> ResultEngine<Vec<Purchase>> {
        purchases::Entity::find()
            .filter(purchases::Column::IsActive.eq(true))
            .order_by_desc(purchases::Column::UpdatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Purchase::try_from)
            .collect()
    }

    pub async fn purchases_page(
        &self,
        search: &PurchaseSearch,
        request: &PageRequest,
    ) -> ResultEngine<Page<Purchase>> {
        let condition = Condition::all()
            .add(purchases::Column::IsActive.eq(true))
            .add_option(
                search_term(search.name.as_deref())
                    .map(|s| contains_ignore_case(purchases::Entity, purchases::Column::Name, s)),
            );
        let order = request.order_column(ORDER_FIELDS, purchases::Column::UpdatedAt);
        let (rows, count) =
            page_of::<purchases::Entity, _>(&self.database, condition, request, order).await?;
        Ok(Page {
            data: rows
                .into_iter()
                .map(Purchase::try_from)
                .collect::<ResultEngine<_>>()?,
            count,
            page: request.page,
            limit: request.limit,
        })
    }

    pub async fn purchase(&self, id: Uuid) -> ResultEngine<Purchase> {
        Purchase::try_from(self.require_purchase(&self.database, id).await?)
    }

    /// Records a purchase. `seller_id`, when given, must be an active seller.
    pub async fn new_purchase(&self, input: &PurchaseNew, actor: &Actor) -> ResultEngine<Purchase> {
        let purchase = Purchase {
            audit: Audit::new(actor),
            name: normalize_required_name(&input.name, "purchase")?,
            amount: quantity(input.amount, "amount")?,
            price: quantity(input.price, "price")?,
            purchase_date: Some(to_utc(input.purchase_date)),
            transaction_type: input.transaction_type.unwrap_or_default().into(),
            seller_id: input.seller_id,
        };

        with_tx!(self, |db_tx| {
            if let Some(seller_id) = purchase.seller_id {
                self.require_seller(&db_tx, seller_id).await?;
            }
            let model: purchases::ActiveModel = (&purchase).into();
            model.insert(&db_tx).await?;
            tracing::info!(purchase_id = %purchase.audit.id, amount = %purchase.amount, "purchase created");
            Ok(purchase)
        })
    }

    /// Applies the fields present in `input`.
    ///
    /// The amount can't drop below what is already sold or manufactured.
    pub async fn update_purchase(
        &self,
        id: Uuid,
        input: &PurchaseUpdate,
        actor: &Actor,
    ) -> ResultEngine<Purchase> {
        with_tx!(self, |db_tx| {
            let mut purchase = Purchase::try_from(self.require_purchase(&db_tx, id).await?)?;
            if let Some(name) = &input.name {
                purchase.name = normalize_required_name(name, "purchase")?;
            }
            if let Some(price) = input.price {
                purchase.price = quantity(price, "price")?;
            }
            if let Some(amount) = input.amount {
                let amount = quantity(amount, "amount")?;
                let (sold, manufactured) = self
                    .committed_amounts(&db_tx, id, Excluding::default())
                    .await?;
                if amount < sold + manufactured {
                    return Err(EngineError::InvalidAmount(format!(
                        "purchase amount can't be lower than the {} already used",
                        sold + manufactured
                    )));
                }
                purchase.amount = amount;
            }
            if let Some(date) = input.purchase_date {
                purchase.purchase_date = Some(to_utc(date));
            }
            if let Some(kind) = input.transaction_type {
                purchase.transaction_type = kind.into();
            }
            if let Some(seller_id) = input.seller_id {
                self.require_seller(&db_tx, seller_id).await?;
                purchase.seller_id = Some(seller_id);
            }
            purchase.audit.touch(actor);

            let model: purchases::ActiveModel = (&purchase).into();
            model.update(&db_tx).await?;
            Ok(purchase)
        })
    }

    /// Soft delete.
    pub async fn remove_purchase(&self, id: Uuid, actor: &Actor) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            let mut purchase = Purchase::try_from(self.require_purchase(&db_tx, id).await?)?;
            purchase.audit.deactivate(actor);
            let model: purchases::ActiveModel = (&purchase).into();
            model.update(&db_tx).await?;
            Ok(true)
        })
    }

    /// How much of the purchase is still free for sells and manufacturing.
    pub async fn purchase_remaining(&self, id: Uuid) -> ResultEngine<PurchaseRemaining> {
        let purchase = Purchase::try_from(self.require_purchase(&self.database, id).await?)?;
        let (sold, manufactured) = self
            .committed_amounts(&self.database, id, Excluding::default())
            .await?;
        Ok(purchase.remaining(sold, manufactured))
    }

    /// Sums of the active sells and manufactures drawing from `purchase_id`.
    pub(super) async fn committed_amounts<C: ConnectionTrait>(
        &self,
        db: &C,
        purchase_id: Uuid,
        excluding: Excluding,
    ) -> ResultEngine<(Amount, Amount)> {
        let sold: Amount = sells::Entity::find()
            .filter(sells::Column::PurchaseId.eq(purchase_id.to_string()))
            .filter(sells::Column::IsActive.eq(true))
            .apply_if(excluding.sell, |query, id| {
                query.filter(sells::Column::Id.ne(id.to_string()))
            })
            .all(db)
            .await?
            .into_iter()
            .map(|row| Amount::from_micros(row.amount))
            .sum();
        let manufactured: Amount = manufactures::Entity::find()
            .filter(manufactures::Column::PurchaseId.eq(purchase_id.to_string()))
            .filter(manufactures::Column::IsActive.eq(true))
            .apply_if(excluding.manufacture, |query, id| {
                query.filter(manufactures::Column::Id.ne(id.to_string()))
            })
            .all(db)
            .await?
            .into_iter()
            .map(|row| Amount::from_micros(row.amount))
            .sum();
        Ok((sold, manufactured))
    }

    /// Fails with `ExceedsPurchase` when `requested` is more than what the
    /// purchase still holds.
    pub(super) async fn ensure_purchase_covers<C: ConnectionTrait>(
        &self,
        db: &C,
        purchase_id: Uuid,
        requested: Amount,
        excluding: Excluding,
    ) -> ResultEngine<Purchase> {
        let purchase = Purchase::try_from(self.require_purchase(db, purchase_id).await?)?;
        let (sold, manufactured) = self.committed_amounts(db, purchase_id, excluding).await?;
        let remaining = purchase.remaining(sold, manufactured).remaining;
        if requested > remaining {
            tracing::warn!(%purchase_id, %requested, %remaining, "purchase exceeded");
            return Err(EngineError::ExceedsPurchase(EXCEEDS_PURCHASE.to_string()));
        }
        Ok(purchase)
    }
}
