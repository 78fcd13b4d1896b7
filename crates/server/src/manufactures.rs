use api_types::manufacture::{
    ManufactureNew, ManufactureSearch, ManufactureUpdate, ManufactureView,
};

use crate::crud::crud_handlers;

crud_handlers!(
    new = ManufactureNew,
    update = ManufactureUpdate,
    search = ManufactureSearch,
    view = ManufactureView,
    list = manufactures,
    page = manufactures_page,
    get = manufacture,
    create = new_manufacture,
    edit = update_manufacture,
    remove = remove_manufacture,
);
