//! User Index Handler (admin)

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use botica_app::domain::users::models::UsersQuery;

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, register::UserResponse},
};

/// One page of users.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UsersPageResponse {
    /// The users on this page, newest first
    pub items: Vec<UserResponse>,

    /// Total number of users matching the query
    pub total_count: u64,

    /// Total number of pages at the requested page size
    pub total_pages: u32,

    /// The page this response covers (1-based)
    pub current_page: u32,
}

/// User Index Handler
///
/// Admin-only listing with pagination and a case-insensitive substring
/// search over name and email.
#[endpoint(tags("users"), summary = "List Users", security(("session_cookie" = [])))]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    search: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<UsersPageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let query = UsersQuery {
        page: page.into_inner().unwrap_or(1),
        limit: limit.into_inner().unwrap_or(10),
        search: search.into_inner(),
    };

    let page = state
        .app
        .users
        .list_users(query)
        .await
        .map_err(into_status_error)?;

    Ok(Json(UsersPageResponse {
        items: page.items.into_iter().map(Into::into).collect(),
        total_count: page.total_count,
        total_pages: page.total_pages,
        current_page: page.current_page,
    }))
}
