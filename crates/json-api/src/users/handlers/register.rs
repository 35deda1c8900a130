//! Register Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use botica_app::domain::users::models::{NewUser, User};

use crate::{
    auth::session_cookie, extensions::*, state::State, users::errors::into_status_error,
};

/// Register Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// User Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserResponse {
    /// The unique identifier of the user
    pub uuid: Uuid,

    /// Display name
    pub name: String,

    /// Account email
    pub email: String,

    /// Account role, `user` or `admin`
    pub role: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            uuid: user.uuid.into(),
            name: user.name,
            email: user.email,
            role: user.role.to_string(),
        }
    }
}

/// Register Handler
///
/// Creates an account and signs the new user in by setting the session
/// cookie.
#[endpoint(
    tags("users"),
    summary = "Register",
    responses(
        (status_code = StatusCode::CREATED, description = "Account created"),
        (status_code = StatusCode::CONFLICT, description = "Email already registered"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let user = state
        .app
        .users
        .register(NewUser {
            name: request.name,
            email: request.email,
            password: request.password,
        })
        .await
        .map_err(into_status_error)?;

    let token = state
        .app
        .sessions
        .create_session(user.uuid)
        .await
        .or_500("failed to create session")?;

    res.add_cookie(session_cookie(token));
    res.status_code(StatusCode::CREATED);

    Ok(Json(user.into()))
}
