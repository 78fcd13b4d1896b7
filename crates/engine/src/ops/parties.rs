//! Buyers, sellers and customers share one set of operations.

use api_types::party::{PartyNew, PartySearch, PartyUpdate};
use sea_orm::{
    ActiveModelTrait, Condition, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    Actor, Audit, EngineError, Page, PageRequest, Party, ResultEngine, buyers, customers,
    query::{contains_ignore_case, search_term},
    sellers,
};

use super::{
    Engine, normalize_optional_text, normalize_required_name, page_of, unique_violation, with_tx,
};

fn new_party(input: &PartyNew, actor: &Actor, label: &str) -> ResultEngine<Party> {
    Ok(Party {
        audit: Audit::new(actor),
        name: normalize_required_name(&input.name, label)?,
        phone: normalize_optional_text(input.phone.as_deref()),
        company_name: normalize_optional_text(input.company_name.as_deref()),
    })
}

fn apply_party_update(
    party: &mut Party,
    input: &PartyUpdate,
    actor: &Actor,
    label: &str,
) -> ResultEngine<()> {
    if let Some(name) = &input.name {
        party.name = normalize_required_name(name, label)?;
    }
    if let Some(phone) = &input.phone {
        party.phone = normalize_optional_text(Some(phone));
    }
    if let Some(company_name) = &input.company_name {
        party.company_name = normalize_optional_text(Some(company_name));
    }
    party.audit.touch(actor);
    Ok(())
}

fn party_keys(party: &Party) -> [(&str, Option<&str>); 2] {
    [
        ("phone", party.phone.as_deref()),
        ("company_name", party.company_name.as_deref()),
    ]
}

/// Generates the CRUD operations of one party table.
macro_rules! impl_party_ops {
    (
        $table:ident,
        $label:literal,
        list = $list:ident,
        page = $page:ident,
        get = $get:ident,
        create = $create:ident,
        update = $update:ident,
        remove = $remove:ident,
        require = $require:ident,
        unique = $unique:ident $(,)?
    ) => {
        impl Engine {
            /// All active rows, most recently updated first.
            pub async fn $list(&self) -> ResultEngine<Vec<Party>> {
                $table::Entity::find()
                    .filter($table::Column::IsActive.eq(true))
                    .order_by_desc($table::Column::UpdatedAt)
                    .all(&self.database)
                    .await?
                    .into_iter()
                    .map(Party::try_from)
                    .collect()
            }

            pub async fn $page(
                &self,
                search: &PartySearch,
                request: &PageRequest,
            ) -> ResultEngine<Page<Party>> {
                let condition = Condition::all()
                    .add($table::Column::IsActive.eq(true))
                    .add_option(search_term(search.name.as_deref()).map(|s| {
                        contains_ignore_case($table::Entity, $table::Column::Name, s)
                    }))
                    .add_option(search_term(search.phone.as_deref()).map(|s| {
                        contains_ignore_case($table::Entity, $table::Column::Phone, s)
                    }))
                    .add_option(search_term(search.company_name.as_deref()).map(|s| {
                        contains_ignore_case($table::Entity, $table::Column::CompanyName, s)
                    }));
                let order = request.order_column(
                    &[
                        ("name", $table::Column::Name),
                        ("phone", $table::Column::Phone),
                        ("companyName", $table::Column::CompanyName),
                        ("createdAt", $table::Column::CreatedAt),
                        ("updatedAt", $table::Column::UpdatedAt),
                    ],
                    $table::Column::UpdatedAt,
                );
                let (rows, count) =
                    page_of::<$table::Entity, _>(&self.database, condition, request, order)
                        .await?;
                Ok(Page {
                    data: rows
                        .into_iter()
                        .map(Party::try_from)
                        .collect::<ResultEngine<_>>()?,
                    count,
                    page: request.page,
                    limit: request.limit,
                })
            }

            pub async fn $get(&self, id: Uuid) -> ResultEngine<Party> {
                Party::try_from(self.$require(&self.database, id).await?)
            }

            pub async fn $create(&self, input: &PartyNew, actor: &Actor) -> ResultEngine<Party> {
                let party = new_party(input, actor, $label)?;
                with_tx!(self, |db_tx| {
                    self.$unique(&db_tx, &party).await?;
                    let model: $table::ActiveModel = (&party).into();
                    model
                        .insert(&db_tx)
                        .await
                        .map_err(|err| unique_violation(err, &party_keys(&party)))?;
                    tracing::info!(id = %party.audit.id, kind = $label, "party created");
                    Ok(party)
                })
            }

            pub async fn $update(
                &self,
                id: Uuid,
                input: &PartyUpdate,
                actor: &Actor,
            ) -> ResultEngine<Party> {
                with_tx!(self, |db_tx| {
                    let mut party = Party::try_from(self.$require(&db_tx, id).await?)?;
                    apply_party_update(&mut party, input, actor, $label)?;
                    self.$unique(&db_tx, &party).await?;
                    let model: $table::ActiveModel = (&party).into();
                    model
                        .update(&db_tx)
                        .await
                        .map_err(|err| unique_violation(err, &party_keys(&party)))?;
                    Ok(party)
                })
            }

            /// Soft delete.
            pub async fn $remove(&self, id: Uuid, actor: &Actor) -> ResultEngine<bool> {
                with_tx!(self, |db_tx| {
                    let mut party = Party::try_from(self.$require(&db_tx, id).await?)?;
                    party.audit.deactivate(actor);
                    let model: $table::ActiveModel = (&party).into();
                    model.update(&db_tx).await?;
                    Ok(true)
                })
            }

            /// Phone and company name are unique within the table.
            async fn $unique<C: ConnectionTrait>(&self, db: &C, party: &Party) -> ResultEngine<()> {
                let id = party.audit.id.to_string();
                if let Some(phone) = &party.phone {
                    let taken = $table::Entity::find()
                        .filter($table::Column::Phone.eq(phone.clone()))
                        .filter($table::Column::Id.ne(id.clone()))
                        .one(db)
                        .await?
                        .is_some();
                    if taken {
                        return Err(EngineError::ExistingKey(phone.clone()));
                    }
                }
                if let Some(company_name) = &party.company_name {
                    let taken = $table::Entity::find()
                        .filter($table::Column::CompanyName.eq(company_name.clone()))
                        .filter($table::Column::Id.ne(id))
                        .one(db)
                        .await?
                        .is_some();
                    if taken {
                        return Err(EngineError::ExistingKey(company_name.clone()));
                    }
                }
                Ok(())
            }
        }
    };
}

impl_party_ops!(
    buyers,
    "buyer",
    list = buyers,
    page = buyers_page,
    get = buyer,
    create = new_buyer,
    update = update_buyer,
    remove = remove_buyer,
    require = require_buyer,
    unique = ensure_unique_buyer,
);

impl_party_ops!(
    sellers,
    "seller",
    list = sellers,
    page = sellers_page,
    get = seller,
    create = new_seller,
    update = update_seller,
    remove = remove_seller,
    require = require_seller,
    unique = ensure_unique_seller,
);

impl_party_ops!(
    customers,
    "customer",
    list = customers,
    page = customers_page,
    get = customer,
    create = new_customer,
    update = update_customer,
    remove = remove_customer,
    require = require_customer,
    unique = ensure_unique_customer,
);
