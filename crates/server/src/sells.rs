//! `/sell` endpoints and the daily sell statement.

use api_types::{
    purchase::StatementQuery,
    sell::{SellNew, SellSearch, SellUpdate, SellView},
};
use axum::{Extension, extract::State, response::Response};
use engine::{User, roles};

use crate::{
    ServerError, auth::require_roles, crud::crud_handlers, extractors::QueryParams,
    purchases::csv_response, server::ServerState,
};

crud_handlers!(
    new = SellNew,
    update = SellUpdate,
    search = SellSearch,
    view = SellView,
    list = sells,
    page = sells_page,
    get = sell,
    create = new_sell,
    edit = update_sell,
    remove = remove_sell,
);

pub async fn statement(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    QueryParams(query): QueryParams<StatementQuery>,
) -> Result<Response, ServerError> {
    require_roles(&user, roles::SUPERADMIN_ADMIN)?;
    let rows = state.engine.sell_statement(query.date).await?;
    csv_response(&rows, &format!("sells-{}.csv", query.date))
}
