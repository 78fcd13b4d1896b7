//! `/user` endpoints.

use api_types::user::{UserNew, UserSearch, UserUpdate, UserView};

use crate::crud::crud_handlers;

crud_handlers!(
    new = UserNew,
    update = UserUpdate,
    search = UserSearch,
    view = UserView,
    list = users,
    page = users_page,
    get = user,
    create = new_user,
    edit = update_user,
    remove = remove_user,
);
