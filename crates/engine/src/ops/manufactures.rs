use api_types::manufacture::{ManufactureNew, ManufactureSearch, ManufactureUpdate};
use sea_orm::{ActiveModelTrait, Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Actor, Audit, EngineError, Manufacture, Page, PageRequest, ResultEngine, manufactures,
    purchases,
    query::{contains_ignore_case, search_term},
};

use super::{
    Engine, normalize_required_name, page_also_related, purchases::Excluding, quantity, to_utc,
    with_tx,
};

const ORDER_FIELDS: &[(&str, manufactures::Column)] = &[
    ("name", manufactures::Column::Name),
    ("amount", manufactures::Column::Amount),
    ("manufactureDate", manufactures::Column::ManufactureDate),
    ("createdAt", manufactures::Column::CreatedAt),
    ("updatedAt", manufactures::Column::UpdatedAt),
];

impl Engine {
    pub async fn manufactures(&self) -> ResultEngine<Vec<Manufacture>> {
        manufactures::Entity::find()
            .filter(manufactures::Column::IsActive.eq(true))
            .find_also_related(purchases::Entity)
            .order_by_desc(manufactures::Column::UpdatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Manufacture::try_from)
            .collect()
    }

    pub async fn manufactures_page(
        &self,
        search: &ManufactureSearch,
        request: &PageRequest,
    ) -> ResultEngine<Page<Manufacture>> {
        let condition = Condition::all()
            .add(manufactures::Column::IsActive.eq(true))
            .add_option(search_term(search.name.as_deref()).map(|s| {
                contains_ignore_case(manufactures::Entity, manufactures::Column::Name, s)
            }))
            .add_option(
                search
                    .purchase_id
                    .map(|id| manufactures::Column::PurchaseId.eq(id.to_string())),
            );
        let order = request.order_column(ORDER_FIELDS, manufactures::Column::UpdatedAt);
        let (rows, count) = page_also_related::<manufactures::Entity, purchases::Entity, _>(
            &self.database,
            condition,
            request,
            order,
        )
        .await?;
        Ok(Page {
            data: rows
                .into_iter()
                .map(Manufacture::try_from)
                .collect::<ResultEngine<_>>()?,
            count,
            page: request.page,
            limit: request.limit,
        })
    }

    pub async fn manufacture(&self, id: Uuid) -> ResultEngine<Manufacture> {
        let row = manufactures::Entity::find_by_id(id.to_string())
            .filter(manufactures::Column::IsActive.eq(true))
            .find_also_related(purchases::Entity)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("Manufacture Not Found!!".to_string()))?;
        Manufacture::try_from(row)
    }

    /// Turns part of a purchase into product. Same availability rule as
    /// sells.
    pub async fn new_manufacture(
        &self,
        input: &ManufactureNew,
        actor: &Actor,
    ) -> ResultEngine<Manufacture> {
        let mut manufacture = Manufacture {
            audit: Audit::new(actor),
            name: normalize_required_name(&input.name, "manufacture")?,
            amount: quantity(input.amount, "amount")?,
            manufacture_date: Some(to_utc(input.manufacture_date)),
            purchase_id: input.purchase_id,
            purchase: None,
        };

        with_tx!(self, |db_tx| {
            let purchase = self
                .ensure_purchase_covers(
                    &db_tx,
                    manufacture.purchase_id,
                    manufacture.amount,
                    Excluding::default(),
                )
                .await?;
            let model: manufactures::ActiveModel = (&manufacture).into();
            model.insert(&db_tx).await?;
            tracing::info!(
                manufacture_id = %manufacture.audit.id,
                purchase_id = %manufacture.purchase_id,
                amount = %manufacture.amount,
                "manufacture created"
            );
            manufacture.purchase = Some(purchase);
            Ok(manufacture)
        })
    }

    pub async fn update_manufacture(
        &self,
        id: Uuid,
        input: &ManufactureUpdate,
        actor: &Actor,
    ) -> ResultEngine<Manufacture> {
        with_tx!(self, |db_tx| {
            let model = self.require_manufacture(&db_tx, id).await?;
            let mut manufacture = Manufacture::try_from((model, None::<purchases::Model>))?;
            if let Some(name) = &input.name {
                manufacture.name = normalize_required_name(name, "manufacture")?;
            }
            if let Some(date) = input.manufacture_date {
                manufacture.manufacture_date = Some(to_utc(date));
            }

            let purchase = if input.amount.is_some() || input.purchase_id.is_some() {
                if let Some(amount) = input.amount {
                    manufacture.amount = quantity(amount, "amount")?;
                }
                if let Some(purchase_id) = input.purchase_id {
                    manufacture.purchase_id = purchase_id;
                }
                let excluding = Excluding {
                    manufacture: Some(id),
                    ..Excluding::default()
                };
                Some(
                    self.ensure_purchase_covers(
                        &db_tx,
                        manufacture.purchase_id,
                        manufacture.amount,
                        excluding,
                    )
                    .await?,
                )
            } else {
                self.purchase_row(&db_tx, manufacture.purchase_id).await?
            };
            manufacture.audit.touch(actor);

            let model: manufactures::ActiveModel = (&manufacture).into();
            model.update(&db_tx).await?;
            manufacture.purchase = purchase;
            Ok(manufacture)
        })
    }

    /// Soft delete. The amount goes back to the purchase.
    pub async fn remove_manufacture(&self, id: Uuid, actor: &Actor) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            let model = self.require_manufacture(&db_tx, id).await?;
            let mut manufacture = Manufacture::try_from((model, None::<purchases::Model>))?;
            manufacture.audit.deactivate(actor);
            let model: manufactures::ActiveModel = (&manufacture).into();
            model.update(&db_tx).await?;
            Ok(true)
        })
    }
}
