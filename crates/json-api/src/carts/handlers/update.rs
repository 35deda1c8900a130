//! Update Cart Item Quantity Handler

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

/// Update Cart Item Quantity Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// The product whose line should change
    pub product_uuid: Uuid,

    /// The new quantity; zero removes the line
    pub quantity: u32,
}

/// Update Cart Item Quantity Handler
///
/// Assigns a line's quantity directly. A quantity of zero removes the line
/// rather than leaving an empty husk behind.
#[endpoint(
    tags("cart"),
    summary = "Update Cart Item Quantity",
    security(("session_cookie" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart updated"),
        (status_code = StatusCode::NOT_FOUND, description = "No cart or no line for this product"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Login required"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;
    let request = json.into_inner();

    let view = state
        .app
        .carts
        .set_item_quantity(user.uuid, request.product_uuid.into(), request.quantity)
        .await
        .map_err(into_status_error)?;

    Ok(Json(view.into()))
}
