//! Login Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::session_cookie,
    extensions::*,
    state::State,
    users::{errors::into_status_error, register::UserResponse},
};

/// Login Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login Handler
///
/// Verifies credentials and opens a session by setting the session cookie.
#[endpoint(
    tags("users"),
    summary = "Login",
    responses(
        (status_code = StatusCode::OK, description = "Signed in"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid email or password"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let user = state
        .app
        .users
        .verify_credentials(&request.email, &request.password)
        .await
        .map_err(into_status_error)?;

    let token = state
        .app
        .sessions
        .create_session(user.uuid)
        .await
        .or_500("failed to create session")?;

    res.add_cookie(session_cookie(token));

    Ok(Json(user.into()))
}
