//! `/purchase` endpoints, the remaining-amount lookup and the daily
//! purchase statement.

use api_types::purchase::{
    PurchaseNew, PurchaseRemainingView, PurchaseSearch, PurchaseUpdate, PurchaseView,
    StatementLine, StatementQuery,
};
use axum::{
    Extension,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use engine::{StatementRow, User, roles};

use crate::{
    Reply, ServerError,
    auth::require_roles,
    crud::crud_handlers,
    extractors::{QueryParams, UuidPath},
    ok,
    server::ServerState,
};

crud_handlers!(
    new = PurchaseNew,
    update = PurchaseUpdate,
    search = PurchaseSearch,
    view = PurchaseView,
    list = purchases,
    page = purchases_page,
    get = purchase,
    create = new_purchase,
    edit = update_purchase,
    remove = remove_purchase,
);

pub async fn remaining(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    UuidPath(id): UuidPath,
) -> Reply<PurchaseRemainingView> {
    require_roles(&user, roles::SUPERADMIN_ADMIN_EDITOR)?;
    let remaining = state.engine.purchase_remaining(id).await?;
    ok(PurchaseRemainingView::from(&remaining))
}

pub async fn statement(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    QueryParams(query): QueryParams<StatementQuery>,
) -> Result<Response, ServerError> {
    require_roles(&user, roles::SUPERADMIN_ADMIN)?;
    let rows = state.engine.purchase_statement(query.date).await?;
    csv_response(&rows, &format!("purchases-{}.csv", query.date))
}

const STATEMENT_HEADERS: [&str; 7] = [
    "party",
    "product",
    "amount",
    "price",
    "total",
    "transaction_type",
    "date",
];

/// Renders statement rows as a CSV download. An empty day still gets the
/// header line.
pub(crate) fn csv_response(rows: &[StatementRow], file_name: &str) -> Result<Response, ServerError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    if rows.is_empty() {
        writer
            .write_record(STATEMENT_HEADERS)
            .map_err(|e| ServerError::Internal(e.to_string()))?;
    }
    for row in rows {
        writer
            .serialize(StatementLine::from(row))
            .map_err(|e| ServerError::Internal(e.to_string()))?;
    }
    let body = writer
        .into_inner()
        .map_err(|e| ServerError::Internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response())
}
