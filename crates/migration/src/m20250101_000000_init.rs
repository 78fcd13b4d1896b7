//! Initial schema.
//!
//! - `users`: staff accounts with their role
//! - `buyers`, `sellers`, `customers`: trading counterparts
//! - `purchases`: goods bought, optionally from a seller
//! - `sells`, `manufactures`: amounts drawn from a purchase
//! - `ledgers`: customer balances
//! - `stocks`: stock levels
//!
//! Every table starts with the same audit columns. Quantities are stored as
//! integer millionths.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Audit {
    Id,
    IsActive,
    CreatedAt,
    UpdatedAt,
    CreatedBy,
    UpdatedBy,
}

#[derive(Iden)]
enum Users {
    Table,
    Name,
    Email,
    Phone,
    Password,
    RoleName,
}

/// Column names shared by the three party tables.
#[derive(Iden)]
enum Party {
    Name,
    Phone,
    CompanyName,
}

#[derive(Iden)]
enum Buyers {
    Table,
}

#[derive(Iden)]
enum Sellers {
    Table,
}

#[derive(Iden)]
enum Customers {
    Table,
}

#[derive(Iden)]
enum Purchases {
    Table,
    Name,
    Amount,
    Price,
    PurchaseDate,
    TransactionType,
    SellerId,
}

#[derive(Iden)]
enum Sells {
    Table,
    Name,
    Amount,
    Price,
    SellDate,
    TransactionType,
    CustomerId,
    PurchaseId,
}

#[derive(Iden)]
enum Manufactures {
    Table,
    Name,
    Amount,
    ManufactureDate,
    PurchaseId,
}

#[derive(Iden)]
enum Ledgers {
    Table,
    PreviousLedger,
    DepositAmount,
    RemainingLedger,
    CustomerId,
}

#[derive(Iden)]
enum Stocks {
    Table,
    Name,
    InStock,
    Sold,
    Remaining,
}

/// `CREATE TABLE` with the audit columns already in place.
fn audited<T: IntoIden>(table: T) -> TableCreateStatement {
    Table::create()
        .table(table)
        .if_not_exists()
        .col(ColumnDef::new(Audit::Id).string().not_null().primary_key())
        .col(
            ColumnDef::new(Audit::IsActive)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(Audit::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Audit::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(Audit::CreatedBy).string())
        .col(ColumnDef::new(Audit::UpdatedBy).string())
        .to_owned()
}

fn party_table<T: IntoIden>(table: T) -> TableCreateStatement {
    audited(table)
        .col(ColumnDef::new(Party::Name).string_len(65).not_null())
        .col(ColumnDef::new(Party::Phone).string_len(20).unique_key())
        .col(ColumnDef::new(Party::CompanyName).string_len(100).unique_key())
        .to_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                audited(Users::Table)
                    .col(ColumnDef::new(Users::Name).string_len(65).not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Phone).string_len(20).unique_key())
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(
                        ColumnDef::new(Users::RoleName)
                            .string()
                            .not_null()
                            .default("EDITOR_ROLE"),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Parties
        // ───────────────────────────────────────────────────────────────────
        manager.create_table(party_table(Buyers::Table)).await?;
        manager.create_table(party_table(Sellers::Table)).await?;
        manager.create_table(party_table(Customers::Table)).await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Purchases
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                audited(Purchases::Table)
                    .col(ColumnDef::new(Purchases::Name).string_len(65).not_null())
                    .col(ColumnDef::new(Purchases::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Purchases::Price).big_integer().not_null())
                    .col(ColumnDef::new(Purchases::PurchaseDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Purchases::TransactionType)
                            .string()
                            .not_null()
                            .default("cash"),
                    )
                    .col(ColumnDef::new(Purchases::SellerId).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-purchases-seller_id")
                            .from(Purchases::Table, Purchases::SellerId)
                            .to(Sellers::Table, Audit::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-purchases-purchase_date")
                    .table(Purchases::Table)
                    .col(Purchases::PurchaseDate)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Sells
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                audited(Sells::Table)
                    .col(ColumnDef::new(Sells::Name).string_len(65).not_null())
                    .col(ColumnDef::new(Sells::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Sells::Price).big_integer().not_null())
                    .col(ColumnDef::new(Sells::SellDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Sells::TransactionType)
                            .string()
                            .not_null()
                            .default("cash"),
                    )
                    .col(ColumnDef::new(Sells::CustomerId).string())
                    .col(ColumnDef::new(Sells::PurchaseId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sells-customer_id")
                            .from(Sells::Table, Sells::CustomerId)
                            .to(Customers::Table, Audit::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sells-purchase_id")
                            .from(Sells::Table, Sells::PurchaseId)
                            .to(Purchases::Table, Audit::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sells-purchase_id")
                    .table(Sells::Table)
                    .col(Sells::PurchaseId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Manufactures
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                audited(Manufactures::Table)
                    .col(ColumnDef::new(Manufactures::Name).string_len(65).not_null())
                    .col(ColumnDef::new(Manufactures::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Manufactures::ManufactureDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Manufactures::PurchaseId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-manufactures-purchase_id")
                            .from(Manufactures::Table, Manufactures::PurchaseId)
                            .to(Purchases::Table, Audit::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-manufactures-purchase_id")
                    .table(Manufactures::Table)
                    .col(Manufactures::PurchaseId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Ledgers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                audited(Ledgers::Table)
                    .col(ColumnDef::new(Ledgers::PreviousLedger).big_integer().not_null())
                    .col(ColumnDef::new(Ledgers::DepositAmount).big_integer().not_null())
                    .col(ColumnDef::new(Ledgers::RemainingLedger).big_integer().not_null())
                    .col(ColumnDef::new(Ledgers::CustomerId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ledgers-customer_id")
                            .from(Ledgers::Table, Ledgers::CustomerId)
                            .to(Customers::Table, Audit::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Stocks
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                audited(Stocks::Table)
                    .col(ColumnDef::new(Stocks::Name).string_len(65).not_null())
                    .col(ColumnDef::new(Stocks::InStock).big_integer().not_null())
                    .col(ColumnDef::new(Stocks::Sold).big_integer().not_null())
                    .col(ColumnDef::new(Stocks::Remaining).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Stocks::Table.into_iden(),
            Ledgers::Table.into_iden(),
            Manufactures::Table.into_iden(),
            Sells::Table.into_iden(),
            Purchases::Table.into_iden(),
            Customers::Table.into_iden(),
            Sellers::Table.into_iden(),
            Buyers::Table.into_iden(),
            Users::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}
