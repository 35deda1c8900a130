//! Current User Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{extensions::*, state::State, users::{errors::into_status_error, register::UserResponse}};

/// Current User Handler
///
/// Re-reads the signed-in user's account record, so a rename or role change
/// shows up without a fresh login.
#[endpoint(tags("users"), summary = "Current User", security(("session_cookie" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let user = state
        .app
        .users
        .get_user(user.uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use botica_app::domain::users::{MockUsersService, UsersServiceError};

    use crate::test_helpers::{TEST_USER_UUID, make_user, users_protected_service};

    use super::*;

    fn make_service(users: MockUsersService) -> Service {
        users_protected_service(users, Router::with_path("users/me").get(handler))
    }

    #[tokio::test]
    async fn test_me_returns_the_current_user() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_get_user()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(|_| Ok(make_user("An", "an@example.com")));

        let response: UserResponse = TestClient::get("http://example.com/users/me")
            .send(&make_service(users))
            .await
            .take_json()
            .await?;

        assert_eq!(response.uuid, TEST_USER_UUID.into_uuid());
        assert_eq!(response.email, "an@example.com");
        assert_eq!(response.role, "user");

        Ok(())
    }

    #[tokio::test]
    async fn test_me_for_a_vanished_account_returns_404() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_get_user()
            .once()
            .return_once(|_| Err(UsersServiceError::NotFound));

        let res = TestClient::get("http://example.com/users/me")
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
