//! Session middleware.

use std::sync::Arc;

use botica_app::{auth::SessionsServiceError, domain::users::models::UserRole};
use salvo::prelude::*;
use tracing::error;

use crate::{auth::SESSION_COOKIE, extensions::*, state::State};

/// Resolve the session cookie to a user identity, or reject the request
/// before it reaches any service.
#[salvo::handler]
pub(crate) async fn require_session(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = req
        .cookie(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
    else {
        res.render(StatusError::unauthorized().brief("Login required"));

        return;
    };

    let state = match depot.obtain::<Arc<State>>() {
        Ok(state) => state,
        Err(_error) => {
            res.render(StatusError::internal_server_error());

            return;
        }
    };

    let user = match state.app.sessions.resolve_session(&token).await {
        Ok(user) => user,
        Err(SessionsServiceError::NotFound) => {
            res.render(StatusError::unauthorized().brief("Session expired or invalid"));

            return;
        }
        Err(SessionsServiceError::Sql(source)) => {
            error!("failed to resolve session: {source}");

            res.render(StatusError::internal_server_error());

            return;
        }
    };

    depot.insert_current_user(user);

    ctrl.call_next(req, depot, res).await;
}

/// Allow only admins past this point. Must run after [`require_session`].
#[salvo::handler]
pub(crate) async fn require_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let role = match depot.current_user_or_401() {
        Ok(user) => user.role,
        Err(error) => {
            res.render(error);

            return;
        }
    };

    if role != UserRole::Admin {
        res.render(StatusError::forbidden().brief("Admin access required"));

        return;
    }

    ctrl.call_next(req, depot, res).await;
}
