//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    extensions::*,
    state::State,
};

/// Remove Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RemoveCartItemRequest {
    /// The product whose line should be removed
    pub product_uuid: Uuid,
}

/// Remove Cart Item Handler
///
/// Removes any line for the product. Removing a product that is not in the
/// cart succeeds silently; only a user with no cart at all gets a 404.
#[endpoint(
    tags("cart"),
    summary = "Remove Cart Item",
    security(("session_cookie" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart updated"),
        (status_code = StatusCode::NOT_FOUND, description = "No cart for this user"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Login required"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RemoveCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let view = state
        .app
        .carts
        .remove_item(user.uuid, json.into_inner().product_uuid.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(view.into()))
}
