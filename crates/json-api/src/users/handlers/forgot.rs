//! Forgot Password Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State, users::errors::into_status_error};

/// Forgot Password Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ForgotPasswordRequest {
    pub email: String,
}

/// Forgot Password Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ForgotPasswordResponse {
    /// Confirmation message
    pub message: String,
}

/// Forgot Password Handler
///
/// Stores a short-lived reset code for the account and mails it out.
#[endpoint(
    tags("users"),
    summary = "Forgot Password",
    responses(
        (status_code = StatusCode::OK, description = "Reset code sent"),
        (status_code = StatusCode::NOT_FOUND, description = "Email not registered"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ForgotPasswordRequest>,
    depot: &mut Depot,
) -> Result<Json<ForgotPasswordResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .users
        .begin_password_reset(&json.into_inner().email)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ForgotPasswordResponse {
        message: "Reset code sent".to_string(),
    }))
}
