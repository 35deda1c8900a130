//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use botica_app::auth::models::CurrentUser;

const CURRENT_USER_KEY: &str = "botica::current_user";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Stash the identity resolved by the session middleware.
    fn insert_current_user(&mut self, user: CurrentUser);

    /// The identity resolved for this request, or 401 when the request never
    /// passed the session middleware.
    fn current_user_or_401(&self) -> Result<&CurrentUser, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_current_user(&mut self, user: CurrentUser) {
        self.insert(CURRENT_USER_KEY, user);
    }

    fn current_user_or_401(&self) -> Result<&CurrentUser, StatusError> {
        self.get::<CurrentUser>(CURRENT_USER_KEY)
            .map_err(|_ignored| StatusError::unauthorized().brief("Login required"))
    }
}
