use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use std::sync::Arc;

use crate::{
    auth, ledgers, manufactures,
    parties::{buyers, customers, sellers},
    purchases, sells, stocks, users,
};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Registers `/R`, `/R/pagination` and `/R/{id}` for one resource module.
macro_rules! resource {
    ($router:expr, $path:literal, $module:ident) => {
        $router
            .route($path, get($module::list).post($module::create))
            .route(concat!($path, "/pagination"), get($module::page))
            .route(
                concat!($path, "/{id}"),
                get($module::get)
                    .put($module::update)
                    .delete($module::remove),
            )
    };
}

fn api_router(state: ServerState) -> Router<ServerState> {
    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/purchase/{id}/remaining", get(purchases::remaining))
        .route("/purchase/statement", get(purchases::statement))
        .route("/sell/statement", get(sells::statement));
    let protected = resource!(protected, "/user", users);
    let protected = resource!(protected, "/buyer", buyers);
    let protected = resource!(protected, "/seller", sellers);
    let protected = resource!(protected, "/customer", customers);
    let protected = resource!(protected, "/purchase", purchases);
    let protected = resource!(protected, "/sell", sells);
    let protected = resource!(protected, "/manufacture", manufactures);
    let protected = resource!(protected, "/ledger", ledgers);
    let protected = resource!(protected, "/stock", stocks);
    let protected = protected.route_layer(middleware::from_fn_with_state(state, auth::auth));

    Router::new()
        .route("/auth/login", post(auth::login))
        .merge(protected)
}

/// Build the whole application: `/health`, and everything else under `/api`.
pub fn app(engine: Engine, cors: bool) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
    };

    let router = Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api", api_router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
    cors: bool,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine, cors)).await
}
