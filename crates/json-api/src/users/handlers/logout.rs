//! Logout Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{SESSION_COOKIE, expired_session_cookie},
    extensions::*,
    state::State,
};

/// Logout Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LogoutResponse {
    /// Confirmation message
    pub message: String,
}

/// Logout Handler
///
/// Destroys the session (if any) and clears the cookie. Always succeeds, so
/// a client with a stale cookie still ends up signed out.
#[endpoint(tags("users"), summary = "Logout")]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<LogoutResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    if let Some(token) = req
        .cookie(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
    {
        state
            .app
            .sessions
            .destroy_session(&token)
            .await
            .or_500("failed to destroy session")?;
    }

    res.add_cookie(expired_session_cookie());

    Ok(Json(LogoutResponse {
        message: "Signed out".to_string(),
    }))
}
