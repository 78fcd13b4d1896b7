use std::borrow::Cow;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Maximum number of fractional digits accepted for quantities and prices.
pub const MAX_DECIMAL_PLACES: usize = 6;

/// Number of fractional digits in the shortest decimal form of `value`.
///
/// `f64`'s `Display` never switches to exponent notation, so splitting on the
/// dot is enough.
pub fn decimal_places(value: f64) -> usize {
    let repr = value.to_string();
    repr.split_once('.').map_or(0, |(_, frac)| frac.len())
}

/// Validator for amounts, prices and ledger values sent by clients.
pub fn validate_quantity(value: &f64) -> Result<(), ValidationError> {
    if !value.is_finite() || *value < 0.0 {
        return Err(ValidationError::new("quantity")
            .with_message(Cow::Borrowed("Must be a non-negative number")));
    }
    if decimal_places(*value) > MAX_DECIMAL_PLACES {
        return Err(ValidationError::new("quantity").with_message(Cow::Borrowed(
            "Should be a number with at most 6 decimal places",
        )));
    }
    Ok(())
}

/// Uniform response wrapper returned by every JSON endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Unix timestamp (seconds) of the response.
    pub nonce: i64,
    pub status: u16,
    pub message: Option<String>,
    pub error: Option<serde_json::Value>,
    pub payload: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(status: u16, message: Option<String>, payload: T) -> Self {
        Self {
            nonce: Utc::now().timestamp(),
            status,
            message,
            error: None,
            payload: Some(payload),
        }
    }
}

impl Envelope<()> {
    pub fn error(status: u16, message: String, error: Option<serde_json::Value>) -> Self {
        Self {
            nonce: Utc::now().timestamp(),
            status,
            message: Some(message),
            error,
            payload: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageView<T> {
    pub data: Vec<T>,
    pub count: u64,
    pub page: u64,
    pub limit: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted {
    pub deleted: bool,
}

/// Query parameters shared by every `/pagination` endpoint.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// `ASC` or `DESC` (default).
    pub sort: Option<String>,
    /// camelCase field name; unknown names fall back to `updatedAt`.
    pub order: Option<String>,
}

/// Audit columns carried by every stored row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditView {
    pub id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Cash,
    Credit,
}

pub mod user {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum RoleName {
        SuperAdminRole,
        AdminRole,
        #[default]
        EditorRole,
        SalesRole,
    }

    #[derive(Debug, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase", deny_unknown_fields)]
    pub struct UserNew {
        #[validate(length(min = 1, max = 65, message = "Maximum 65 characters supported"))]
        pub name: String,
        #[validate(
            email(message = "Must be a valid email"),
            length(max = 100, message = "Maximum 100 characters supported")
        )]
        pub email: String,
        #[validate(length(max = 20, message = "Maximum 20 character supported"))]
        pub phone: Option<String>,
        #[validate(length(min = 1, max = 100, message = "Maximum 100 characters supported"))]
        pub password: String,
        pub role_name: Option<RoleName>,
    }

    #[derive(Debug, Default, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase", deny_unknown_fields)]
    pub struct UserUpdate {
        #[validate(length(min = 1, max = 65, message = "Maximum 65 characters supported"))]
        pub name: Option<String>,
        #[validate(
            email(message = "Must be a valid email"),
            length(max = 100, message = "Maximum 100 characters supported")
        )]
        pub email: Option<String>,
        #[validate(length(max = 20, message = "Maximum 20 character supported"))]
        pub phone: Option<String>,
        #[validate(length(min = 1, max = 100, message = "Maximum 100 characters supported"))]
        pub password: Option<String>,
        pub role_name: Option<RoleName>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserSearch {
        pub name: Option<String>,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub role_name: Option<RoleName>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserView {
        #[serde(flatten)]
        pub audit: AuditView,
        pub name: String,
        pub email: String,
        pub phone: Option<String>,
        pub role_name: RoleName,
    }

    /// Credentials check. One of `email` or `phone` identifies the user.
    #[derive(Debug, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase", deny_unknown_fields)]
    pub struct Login {
        pub email: Option<String>,
        pub phone: Option<String>,
        #[validate(length(min = 1, message = "Password must be defined"))]
        pub password: String,
    }
}

/// Buyers, sellers and customers share the same shape.
pub mod party {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase", deny_unknown_fields)]
    pub struct PartyNew {
        #[validate(length(min = 1, max = 65, message = "Maximum 65 characters supported"))]
        pub name: String,
        #[validate(length(max = 20, message = "Maximum 20 character supported"))]
        pub phone: Option<String>,
        #[validate(length(max = 100, message = "Maximum 100 character supported"))]
        pub company_name: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase", deny_unknown_fields)]
    pub struct PartyUpdate {
        #[validate(length(min = 1, max = 65, message = "Maximum 65 characters supported"))]
        pub name: Option<String>,
        #[validate(length(max = 20, message = "Maximum 20 character supported"))]
        pub phone: Option<String>,
        #[validate(length(max = 100, message = "Maximum 100 character supported"))]
        pub company_name: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PartySearch {
        pub name: Option<String>,
        pub phone: Option<String>,
        pub company_name: Option<String>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PartyView {
        #[serde(flatten)]
        pub audit: AuditView,
        pub name: String,
        pub phone: Option<String>,
        pub company_name: Option<String>,
    }
}

pub mod purchase {
    use chrono::NaiveDate;

    use super::*;

    #[derive(Debug, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase", deny_unknown_fields)]
    pub struct PurchaseNew {
        #[validate(length(min = 1, max = 65, message = "Maximum 65 characters supported"))]
        pub name: String,
        #[validate(custom(function = "validate_quantity"))]
        pub price: f64,
        #[validate(custom(function = "validate_quantity"))]
        pub amount: f64,
        /// RFC3339 timestamp, including timezone offset.
        pub purchase_date: DateTime<FixedOffset>,
        pub transaction_type: Option<TransactionType>,
        pub seller_id: Option<Uuid>,
    }

    #[derive(Debug, Default, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase", deny_unknown_fields)]
    pub struct PurchaseUpdate {
        #[validate(length(min = 1, max = 65, message = "Maximum 65 characters supported"))]
        pub name: Option<String>,
        #[validate(custom(function = "validate_quantity"))]
        pub price: Option<f64>,
        #[validate(custom(function = "validate_quantity"))]
        pub amount: Option<f64>,
        pub purchase_date: Option<DateTime<FixedOffset>>,
        pub transaction_type: Option<TransactionType>,
        pub seller_id: Option<Uuid>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PurchaseSearch {
        pub name: Option<String>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PurchaseView {
        #[serde(flatten)]
        pub audit: AuditView,
        pub name: String,
        pub amount: f64,
        pub price: f64,
        pub purchase_date: Option<DateTime<Utc>>,
        pub transaction_type: TransactionType,
        pub seller_id: Option<Uuid>,
    }

    /// How much of a purchase is still available for sells and manufacturing.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PurchaseRemainingView {
        pub purchase_id: Uuid,
        pub amount: f64,
        pub sold: f64,
        pub manufactured: f64,
        pub remaining: f64,
    }

    /// Day selector for the daily statement exports.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatementQuery {
        pub date: NaiveDate,
    }

    /// One CSV line of a daily purchase or sell statement.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct StatementLine {
        pub party: String,
        pub product: String,
        pub amount: f64,
        pub price: f64,
        pub total: f64,
        pub transaction_type: TransactionType,
        pub date: DateTime<Utc>,
    }
}

pub mod sell {
    use super::*;
    use crate::purchase::PurchaseView;

    #[derive(Debug, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase", deny_unknown_fields)]
    pub struct SellNew {
        #[validate(length(min = 1, max = 65, message = "Maximum 65 characters supported"))]
        pub name: String,
        #[validate(custom(function = "validate_quantity"))]
        pub price: f64,
        #[validate(custom(function = "validate_quantity"))]
        pub amount: f64,
        pub sell_date: DateTime<FixedOffset>,
        pub transaction_type: Option<TransactionType>,
        pub purchase_id: Uuid,
        pub customer_id: Option<Uuid>,
    }

    #[derive(Debug, Default, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase", deny_unknown_fields)]
    pub struct SellUpdate {
        #[validate(length(min = 1, max = 65, message = "Maximum 65 characters supported"))]
        pub name: Option<String>,
        #[validate(custom(function = "validate_quantity"))]
        pub price: Option<f64>,
        #[validate(custom(function = "validate_quantity"))]
        pub amount: Option<f64>,
        pub sell_date: Option<DateTime<FixedOffset>>,
        pub transaction_type: Option<TransactionType>,
        pub purchase_id: Option<Uuid>,
        pub customer_id: Option<Uuid>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SellSearch {
        pub name: Option<String>,
        pub purchase_id: Option<Uuid>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SellView {
        #[serde(flatten)]
        pub audit: AuditView,
        pub name: String,
        pub amount: f64,
        pub price: f64,
        pub sell_date: Option<DateTime<Utc>>,
        pub transaction_type: TransactionType,
        pub customer_id: Option<Uuid>,
        pub purchase: Option<PurchaseView>,
    }
}

pub mod manufacture {
    use super::*;
    use crate::purchase::PurchaseView;

    #[derive(Debug, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase", deny_unknown_fields)]
    pub struct ManufactureNew {
        #[validate(length(min = 1, max = 65, message = "Maximum 65 characters supported"))]
        pub name: String,
        #[validate(custom(function = "validate_quantity"))]
        pub amount: f64,
        pub manufacture_date: DateTime<FixedOffset>,
        pub purchase_id: Uuid,
    }

    #[derive(Debug, Default, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase", deny_unknown_fields)]
    pub struct ManufactureUpdate {
        #[validate(length(min = 1, max = 65, message = "Maximum 65 characters supported"))]
        pub name: Option<String>,
        #[validate(custom(function = "validate_quantity"))]
        pub amount: Option<f64>,
        pub manufacture_date: Option<DateTime<FixedOffset>>,
        pub purchase_id: Option<Uuid>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ManufactureSearch {
        pub name: Option<String>,
        pub purchase_id: Option<Uuid>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ManufactureView {
        #[serde(flatten)]
        pub audit: AuditView,
        pub name: String,
        pub amount: f64,
        pub manufacture_date: Option<DateTime<Utc>>,
        pub purchase: Option<PurchaseView>,
    }
}

pub mod ledger {
    use super::*;
    use crate::party::PartyView;

    #[derive(Debug, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase", deny_unknown_fields)]
    pub struct LedgerNew {
        #[validate(custom(function = "validate_quantity"))]
        pub previous_ledger: f64,
        #[validate(custom(function = "validate_quantity"))]
        pub deposit_amount: f64,
        pub customer_id: Uuid,
    }

    #[derive(Debug, Default, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase", deny_unknown_fields)]
    pub struct LedgerUpdate {
        #[validate(custom(function = "validate_quantity"))]
        pub previous_ledger: Option<f64>,
        #[validate(custom(function = "validate_quantity"))]
        pub deposit_amount: Option<f64>,
        pub customer_id: Option<Uuid>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LedgerSearch {
        pub customer_id: Option<Uuid>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LedgerView {
        #[serde(flatten)]
        pub audit: AuditView,
        pub previous_ledger: f64,
        pub deposit_amount: f64,
        pub remaining_ledger: f64,
        pub customer: Option<PartyView>,
    }
}

pub mod stock {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase", deny_unknown_fields)]
    pub struct StockNew {
        #[validate(length(min = 1, max = 65, message = "Maximum 65 characters supported"))]
        pub name: String,
        #[validate(custom(function = "validate_quantity"))]
        pub in_stock: f64,
        #[validate(custom(function = "validate_quantity"))]
        pub sold: f64,
    }

    #[derive(Debug, Default, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase", deny_unknown_fields)]
    pub struct StockUpdate {
        #[validate(length(min = 1, max = 65, message = "Maximum 65 characters supported"))]
        pub name: Option<String>,
        #[validate(custom(function = "validate_quantity"))]
        pub in_stock: Option<f64>,
        #[validate(custom(function = "validate_quantity"))]
        pub sold: Option<f64>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StockSearch {
        pub name: Option<String>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StockView {
        #[serde(flatten)]
        pub audit: AuditView,
        pub name: String,
        pub in_stock: f64,
        pub sold: f64,
        pub remaining: f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_places_counts_fraction_digits() {
        assert_eq!(decimal_places(10.0), 0);
        assert_eq!(decimal_places(10.5), 1);
        assert_eq!(decimal_places(0.123456), 6);
        assert_eq!(decimal_places(0.1234567), 7);
    }

    #[test]
    fn quantity_rejects_negative_and_long_fractions() {
        assert!(validate_quantity(&50.25).is_ok());
        assert!(validate_quantity(&-1.0).is_err());
        assert!(validate_quantity(&f64::NAN).is_err());
        assert!(validate_quantity(&1.0000001).is_err());
    }

    #[test]
    fn update_payload_rejects_unknown_fields() {
        let parsed = serde_json::from_str::<party::PartyUpdate>(r#"{"nickname":"x"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn role_names_use_screaming_case() {
        let json = serde_json::to_string(&user::RoleName::SuperAdminRole).unwrap();
        assert_eq!(json, "\"SUPER_ADMIN_ROLE\"");
    }
}
