use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    Condition, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Related, SqlErr,
};

use crate::{Amount, EngineError, PageRequest, ResultEngine};

mod access;
mod ledgers;
mod manufactures;
mod parties;
mod purchases;
mod sells;
mod statements;
mod stocks;
mod users;

pub use statements::StatementRow;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn quantity(value: f64, label: &str) -> ResultEngine<Amount> {
    Amount::non_negative(value, label)
}

fn to_utc(value: DateTime<FixedOffset>) -> DateTime<Utc> {
    value.with_timezone(&Utc)
}

/// Maps a unique index violation to `ExistingKey`, naming the value of the
/// column the database reports. `keys` pairs column names with values.
fn unique_violation(err: DbErr, keys: &[(&str, Option<&str>)]) -> EngineError {
    let Some(SqlErr::UniqueConstraintViolation(message)) = err.sql_err() else {
        return EngineError::Database(err);
    };
    let key = keys
        .iter()
        .find(|(column, value)| value.is_some() && message.contains(column))
        .or_else(|| keys.iter().find(|(_, value)| value.is_some()))
        .and_then(|(_, value)| *value)
        .unwrap_or_default();
    EngineError::ExistingKey(key.to_string())
}

/// Counts the rows matching `condition` and loads the requested page of
/// them.
async fn page_of<E, C>(
    db: &C,
    condition: Condition,
    request: &PageRequest,
    order: E::Column,
) -> ResultEngine<(Vec<E::Model>, u64)>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let count = E::find().filter(condition.clone()).count(db).await?;
    let rows = E::find()
        .filter(condition)
        .order_by(order, request.sort.order())
        .offset(request.offset())
        .limit(request.limit)
        .all(db)
        .await?;
    Ok((rows, count))
}

/// Same as [`page_of`] with the related `F` row loaded next to each row.
async fn page_also_related<E, F, C>(
    db: &C,
    condition: Condition,
    request: &PageRequest,
    order: E::Column,
) -> ResultEngine<(Vec<(E::Model, Option<F::Model>)>, u64)>
where
    E: EntityTrait + Related<F>,
    F: EntityTrait,
    C: ConnectionTrait,
{
    let count = E::find().filter(condition.clone()).count(db).await?;
    let rows = E::find()
        .filter(condition)
        .find_also_related(F::default())
        .order_by(order, request.sort.order())
        .offset(request.offset())
        .limit(request.limit)
        .all(db)
        .await?;
    Ok((rows, count))
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_names_are_trimmed() {
        assert_eq!(normalize_required_name("  Wheat ", "purchase").unwrap(), "Wheat");
        assert_eq!(
            normalize_required_name("   ", "purchase").unwrap_err(),
            EngineError::InvalidInput("purchase name must not be empty".to_string())
        );
    }

    #[tokio::test]
    async fn unique_index_errors_become_existing_key() {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        db.execute_unprepared("CREATE TABLE t (email TEXT UNIQUE, phone TEXT UNIQUE)")
            .await
            .unwrap();
        db.execute_unprepared("INSERT INTO t VALUES ('a@mill.test', '0300')")
            .await
            .unwrap();
        let err = db
            .execute_unprepared("INSERT INTO t VALUES ('b@mill.test', '0300')")
            .await
            .unwrap_err();

        let keys = [("email", Some("b@mill.test")), ("phone", Some("0300"))];
        assert_eq!(
            unique_violation(err, &keys),
            EngineError::ExistingKey("0300".to_string())
        );

        let err = db.execute_unprepared("SELECT * FROM missing").await.unwrap_err();
        assert!(matches!(
            unique_violation(err, &keys),
            EngineError::Database(_)
        ));
    }

    #[test]
    fn blank_optional_text_becomes_none() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(
            normalize_optional_text(Some(" 0300 ")),
            Some("0300".to_string())
        );
    }
}
