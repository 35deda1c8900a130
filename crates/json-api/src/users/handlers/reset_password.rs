//! Reset Password Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State, users::errors::into_status_error};

/// Reset Password Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

/// Reset Password Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ResetPasswordResponse {
    /// Confirmation message
    pub message: String,
}

/// Reset Password Handler
///
/// Exchanges a valid reset code for a new password.
#[endpoint(
    tags("users"),
    summary = "Reset Password",
    responses(
        (status_code = StatusCode::OK, description = "Password updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid or expired reset code"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ResetPasswordRequest>,
    depot: &mut Depot,
) -> Result<Json<ResetPasswordResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    state
        .app
        .users
        .reset_password(&request.email, &request.otp, &request.new_password)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ResetPasswordResponse {
        message: "Password updated".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use botica_app::domain::users::{MockUsersService, UsersServiceError};

    use crate::test_helpers::users_service;

    use super::*;

    fn make_service(users: MockUsersService) -> Service {
        users_service(users, Router::with_path("users/reset-password").post(handler))
    }

    #[tokio::test]
    async fn test_reset_password_success() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_reset_password()
            .once()
            .withf(|email, otp, new_password| {
                email == "an@example.com" && otp == "123456" && new_password == "new-password"
            })
            .return_once(|_, _, _| Ok(()));

        let res = TestClient::post("http://example.com/users/reset-password")
            .json(&json!({
                "email": "an@example.com",
                "otp": "123456",
                "new_password": "new-password",
            }))
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_reset_password_bad_otp_returns_400() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_reset_password()
            .once()
            .return_once(|_, _, _| Err(UsersServiceError::InvalidOtp));

        let res = TestClient::post("http://example.com/users/reset-password")
            .json(&json!({
                "email": "an@example.com",
                "otp": "000000",
                "new_password": "new-password",
            }))
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
