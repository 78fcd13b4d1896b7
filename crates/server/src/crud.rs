//! The six handlers every resource exposes, generated per resource.
//!
//! Listing everything is open to any signed-in user; paging, reading one
//! row and writes need `SUPERADMIN_ADMIN`.

/// Generates `list`, `page`, `get`, `create`, `update` and `remove`
/// handlers on top of the matching engine operations.
macro_rules! crud_handlers {
    (
        new = $new_ty:ty,
        update = $update_ty:ty,
        search = $search_ty:ty,
        view = $view:ty,
        list = $list:ident,
        page = $page:ident,
        get = $get:ident,
        create = $create:ident,
        edit = $edit:ident,
        remove = $remove:ident $(,)?
    ) => {
        pub async fn list(
            axum::Extension(user): axum::Extension<engine::User>,
            axum::extract::State(state): axum::extract::State<$crate::server::ServerState>,
        ) -> $crate::Reply<Vec<$view>> {
            $crate::auth::require_roles(&user, engine::roles::ANY_ROLE)?;
            let rows = state.engine.$list().await?;
            $crate::ok(rows.iter().map(<$view>::from).collect())
        }

        pub async fn page(
            axum::Extension(user): axum::Extension<engine::User>,
            axum::extract::State(state): axum::extract::State<$crate::server::ServerState>,
            $crate::extractors::QueryParams(pagination): $crate::extractors::QueryParams<
                api_types::PaginationQuery,
            >,
            $crate::extractors::QueryParams(search): $crate::extractors::QueryParams<$search_ty>,
        ) -> $crate::Reply<api_types::PageView<$view>> {
            $crate::auth::require_roles(&user, engine::roles::SUPERADMIN_ADMIN)?;
            let request = engine::PageRequest::from(&pagination);
            let page = state.engine.$page(&search, &request).await?;
            $crate::ok(page.into_view())
        }

        pub async fn get(
            axum::Extension(user): axum::Extension<engine::User>,
            axum::extract::State(state): axum::extract::State<$crate::server::ServerState>,
            $crate::extractors::UuidPath(id): $crate::extractors::UuidPath,
        ) -> $crate::Reply<$view> {
            $crate::auth::require_roles(&user, engine::roles::SUPERADMIN_ADMIN)?;
            let row = state.engine.$get(id).await?;
            $crate::ok(<$view>::from(&row))
        }

        pub async fn create(
            axum::Extension(user): axum::Extension<engine::User>,
            axum::extract::State(state): axum::extract::State<$crate::server::ServerState>,
            $crate::extractors::ValidatedJson(payload): $crate::extractors::ValidatedJson<
                $new_ty,
            >,
        ) -> $crate::Reply<$view> {
            $crate::auth::require_roles(&user, engine::roles::SUPERADMIN_ADMIN)?;
            let actor = engine::Actor::from(&user);
            let row = state.engine.$create(&payload, &actor).await?;
            $crate::created(<$view>::from(&row))
        }

        pub async fn update(
            axum::Extension(user): axum::Extension<engine::User>,
            axum::extract::State(state): axum::extract::State<$crate::server::ServerState>,
            $crate::extractors::UuidPath(id): $crate::extractors::UuidPath,
            $crate::extractors::ValidatedJson(payload): $crate::extractors::ValidatedJson<
                $update_ty,
            >,
        ) -> $crate::Reply<$view> {
            $crate::auth::require_roles(&user, engine::roles::SUPERADMIN_ADMIN)?;
            let actor = engine::Actor::from(&user);
            let row = state.engine.$edit(id, &payload, &actor).await?;
            $crate::ok(<$view>::from(&row))
        }

        pub async fn remove(
            axum::Extension(user): axum::Extension<engine::User>,
            axum::extract::State(state): axum::extract::State<$crate::server::ServerState>,
            $crate::extractors::UuidPath(id): $crate::extractors::UuidPath,
        ) -> $crate::Reply<api_types::Deleted> {
            $crate::auth::require_roles(&user, engine::roles::SUPERADMIN_ADMIN)?;
            let actor = engine::Actor::from(&user);
            let deleted = state.engine.$remove(id, &actor).await?;
            $crate::ok(api_types::Deleted { deleted })
        }
    };
}

pub(crate) use crud_handlers;
