use api_types::ledger::{LedgerNew, LedgerSearch, LedgerUpdate};
use sea_orm::{ActiveModelTrait, Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Actor, Audit, EngineError, Ledger, Page, PageRequest, Party, ResultEngine, compute_remaining,
    customers, ledgers,
};

use super::{Engine, page_also_related, quantity, with_tx};

const ORDER_FIELDS: &[(&str, ledgers::Column)] = &[
    ("previousLedger", ledgers::Column::PreviousLedger),
    ("depositAmount", ledgers::Column::DepositAmount),
    ("createdAt", ledgers::Column::CreatedAt),
    ("updatedAt", ledgers::Column::UpdatedAt),
];

impl Engine {
    /// All active ledgers with their customer.
    pub async fn ledgers(&self) -> ResultEngine<Vec<Ledger>> {
        ledgers::Entity::find()
            .filter(ledgers::Column::IsActive.eq(true))
            .find_also_related(customers::Entity)
            .order_by_desc(ledgers::Column::UpdatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Ledger::try_from)
            .collect()
    }

    /// Searching for a customer that does not exist (or was removed) gives
    /// an empty page rather than an error.
    pub async fn ledgers_page(
        &self,
        search: &LedgerSearch,
        request: &PageRequest,
    ) -> ResultEngine<Page<Ledger>> {
        let mut condition = Condition::all().add(ledgers::Column::IsActive.eq(true));
        if let Some(customer_id) = search.customer_id {
            match self.require_customer(&self.database, customer_id).await {
                Ok(_) => {
                    condition = condition.add(ledgers::Column::CustomerId.eq(customer_id.to_string()));
                }
                Err(EngineError::KeyNotFound(_)) => return Ok(Page::empty(request)),
                Err(err) => return Err(err),
            }
        }
        let order = request.order_column(ORDER_FIELDS, ledgers::Column::UpdatedAt);
        let (rows, count) = page_also_related::<ledgers::Entity, customers::Entity, _>(
            &self.database,
            condition,
            request,
            order,
        )
        .await?;
        Ok(Page {
            data: rows
                .into_iter()
                .map(Ledger::try_from)
                .collect::<ResultEngine<_>>()?,
            count,
            page: request.page,
            limit: request.limit,
        })
    }

    pub async fn ledger(&self, id: Uuid) -> ResultEngine<Ledger> {
        let row = ledgers::Entity::find_by_id(id.to_string())
            .filter(ledgers::Column::IsActive.eq(true))
            .find_also_related(customers::Entity)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("Ledger Not Found!!".to_string()))?;
        Ledger::try_from(row)
    }

    /// Opens a ledger entry for an active customer.
    pub async fn new_ledger(&self, input: &LedgerNew, actor: &Actor) -> ResultEngine<Ledger> {
        let previous_ledger = quantity(input.previous_ledger, "previous ledger")?;
        let deposit_amount = quantity(input.deposit_amount, "deposit amount")?;
        let mut ledger = Ledger {
            audit: Audit::new(actor),
            previous_ledger,
            deposit_amount,
            remaining_ledger: compute_remaining(previous_ledger, deposit_amount)?,
            customer_id: input.customer_id,
            customer: None,
        };

        with_tx!(self, |db_tx| {
            let customer = self.require_customer(&db_tx, ledger.customer_id).await?;
            let model: ledgers::ActiveModel = (&ledger).into();
            model.insert(&db_tx).await?;
            tracing::info!(
                ledger_id = %ledger.audit.id,
                customer_id = %ledger.customer_id,
                remaining = %ledger.remaining_ledger,
                "ledger created"
            );
            ledger.customer = Some(Party::try_from(customer)?);
            Ok(ledger)
        })
    }

    /// Applies the fields present in `input` and recomputes the remaining
    /// balance.
    pub async fn update_ledger(
        &self,
        id: Uuid,
        input: &LedgerUpdate,
        actor: &Actor,
    ) -> ResultEngine<Ledger> {
        with_tx!(self, |db_tx| {
            let model = self.require_ledger(&db_tx, id).await?;
            let mut ledger = Ledger::try_from((model, None::<customers::Model>))?;
            if let Some(previous) = input.previous_ledger {
                ledger.previous_ledger = quantity(previous, "previous ledger")?;
            }
            if let Some(deposit) = input.deposit_amount {
                ledger.deposit_amount = quantity(deposit, "deposit amount")?;
            }
            let customer = match input.customer_id {
                Some(customer_id) => {
                    ledger.customer_id = customer_id;
                    Some(self.require_customer(&db_tx, customer_id).await?)
                }
                None => {
                    customers::Entity::find_by_id(ledger.customer_id.to_string())
                        .one(&db_tx)
                        .await?
                }
            };
            ledger.remaining_ledger =
                compute_remaining(ledger.previous_ledger, ledger.deposit_amount)?;
            ledger.audit.touch(actor);

            let model: ledgers::ActiveModel = (&ledger).into();
            model.update(&db_tx).await?;
            ledger.customer = customer.map(Party::try_from).transpose()?;
            Ok(ledger)
        })
    }

    /// Soft delete.
    pub async fn remove_ledger(&self, id: Uuid, actor: &Actor) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            let model = self.require_ledger(&db_tx, id).await?;
            let mut ledger = Ledger::try_from((model, None::<customers::Model>))?;
            ledger.audit.deactivate(actor);
            let model: ledgers::ActiveModel = (&ledger).into();
            model.update(&db_tx).await?;
            Ok(true)
        })
    }
}
