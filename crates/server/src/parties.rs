//! `/buyer`, `/seller` and `/customer` endpoints.

pub mod buyers {
    use api_types::party::{PartyNew, PartySearch, PartyUpdate, PartyView};

    use crate::crud::crud_handlers;

    crud_handlers!(
        new = PartyNew,
        update = PartyUpdate,
        search = PartySearch,
        view = PartyView,
        list = buyers,
        page = buyers_page,
        get = buyer,
        create = new_buyer,
        edit = update_buyer,
        remove = remove_buyer,
    );
}

pub mod sellers {
    use api_types::party::{PartyNew, PartySearch, PartyUpdate, PartyView};

    use crate::crud::crud_handlers;

    crud_handlers!(
        new = PartyNew,
        update = PartyUpdate,
        search = PartySearch,
        view = PartyView,
        list = sellers,
        page = sellers_page,
        get = seller,
        create = new_seller,
        edit = update_seller,
        remove = remove_seller,
    );
}

pub mod customers {
    use api_types::party::{PartyNew, PartySearch, PartyUpdate, PartyView};

    use crate::crud::crud_handlers;

    crud_handlers!(
        new = PartyNew,
        update = PartyUpdate,
        search = PartySearch,
        view = PartyView,
        list = customers,
        page = customers_page,
        get = customer,
        create = new_customer,
        edit = update_customer,
        remove = remove_customer,
    );
}
