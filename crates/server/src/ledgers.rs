//! `/ledger` endpoints. Searching by an unknown customer yields an empty page.

use api_types::ledger::{LedgerNew, LedgerSearch, LedgerUpdate, LedgerView};

use crate::crud::crud_handlers;

crud_handlers!(
    new = LedgerNew,
    update = LedgerUpdate,
    search = LedgerSearch,
    view = LedgerView,
    list = ledgers,
    page = ledgers_page,
    get = ledger,
    create = new_ledger,
    edit = update_ledger,
    remove = remove_ledger,
);
