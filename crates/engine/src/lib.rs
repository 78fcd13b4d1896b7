//! Domain logic and persistence for the flour mill back office.
//!
//! [`Engine`] owns the database connection and exposes one method per
//! business operation. Callers identify themselves with an [`Actor`].

pub use amount::Amount;
pub use audit::{Actor, Audit};
pub use error::EngineError;
pub use ledgers::{Ledger, compute_remaining};
pub use manufactures::Manufacture;
pub use ops::{Engine, EngineBuilder, StatementRow};
pub use party::Party;
pub use purchases::{Purchase, PurchaseRemaining, TransactionType};
pub use query::{Page, PageRequest, SortDirection};
pub use roles::RoleName;
pub use sells::Sell;
pub use stocks::Stock;
pub use users::User;

pub mod roles;

mod amount;
mod audit;
mod buyers;
mod customers;
mod error;
mod ledgers;
mod manufactures;
mod ops;
mod party;
mod purchases;
mod query;
mod sellers;
mod sells;
mod stocks;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
