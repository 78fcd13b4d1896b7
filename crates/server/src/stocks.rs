use api_types::stock::{StockNew, StockSearch, StockUpdate, StockView};

use crate::crud::crud_handlers;

crud_handlers!(
    new = StockNew,
    update = StockUpdate,
    search = StockSearch,
    view = StockView,
    list = stocks,
    page = stocks_page,
    get = stock,
    create = new_stock,
    edit = update_stock,
    remove = remove_stock,
);
