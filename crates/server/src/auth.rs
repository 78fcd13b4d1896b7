//! Basic authentication, role checks and the `/auth` endpoints.

use api_types::user::{Login, UserView};
use axum::{
    Extension,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use engine::{RoleName, User};

use crate::{Reply, ServerError, extractors::ValidatedJson, ok, server::ServerState};

/// Resolves the `Authorization: Basic` credentials (email or phone and
/// password) to an active user and stores it in the request extensions.
pub async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(auth_header)) = auth_header else {
        return Err(ServerError::Unauthorized("missing credentials".to_string()));
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(ServerError::Unauthorized("missing credentials".to_string()));
    }

    let user = state
        .engine
        .authenticate(auth_header.username(), auth_header.password())
        .await?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Fails with 403 unless the user holds one of `roles`.
pub fn require_roles(user: &User, roles: &[RoleName]) -> Result<(), ServerError> {
    if user.role.is_any_of(roles) {
        return Ok(());
    }
    tracing::debug!(user_id = %user.audit.id, role = user.role.as_str(), "role rejected");
    Err(ServerError::Forbidden("Forbidden resource".to_string()))
}

pub async fn login(
    State(state): State<ServerState>,
    ValidatedJson(payload): ValidatedJson<Login>,
) -> Reply<UserView> {
    let present = |value: Option<&str>| value.map(str::trim).filter(|s| !s.is_empty());
    let login = present(payload.email.as_deref())
        .or_else(|| present(payload.phone.as_deref()))
        .ok_or_else(|| ServerError::Generic("email or phone is required".to_string()))?;

    let user = state.engine.authenticate(login, &payload.password).await?;
    ok(UserView::from(&user))
}

pub async fn me(Extension(user): Extension<User>) -> Reply<UserView> {
    ok(UserView::from(&user))
}
