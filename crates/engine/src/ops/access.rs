use sea_orm::{ConnectionTrait, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, buyers, customers, ledgers, manufactures, purchases, sellers,
    sells, stocks, users,
};

use super::Engine;

/// Generates a `require_*` method returning the active row with the given
/// id, or `KeyNotFound` with the entity's message.
macro_rules! impl_require_active {
    ($require_fn:ident, $table:ident, $err_msg:literal) => {
        pub(super) async fn $require_fn<C: ConnectionTrait>(
            &self,
            db: &C,
            id: Uuid,
        ) -> ResultEngine<$table::Model> {
            $table::Entity::find_by_id(id.to_string())
                .filter($table::Column::IsActive.eq(true))
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_require_active!(require_user, users, "User Not Found!!");
    impl_require_active!(require_buyer, buyers, "Buyer Not Found!!");
    impl_require_active!(require_seller, sellers, "Seller Not Found!!");
    impl_require_active!(require_customer, customers, "Customer Not Found!!");
    impl_require_active!(require_purchase, purchases, "Purchase Not Found!!");
    impl_require_active!(require_sell, sells, "Sell Not Found!!");
    impl_require_active!(require_manufacture, manufactures, "Manufacture Not Found!!");
    impl_require_active!(require_ledger, ledgers, "Ledger Not Found!!");
    impl_require_active!(require_stock, stocks, "Stock Not Found!!");
}
