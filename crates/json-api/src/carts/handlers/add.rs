//! Add Cart Item Handler

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

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCartItemRequest {
    /// The product to add
    pub product_uuid: Uuid,

    /// How many units to add; defaults to 1
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Add Cart Item Handler
///
/// Adds a product to the current user's cart. A line that already exists
/// for the product has its quantity incremented instead of gaining a twin.
#[endpoint(
    tags("cart"),
    summary = "Add Cart Item",
    security(("session_cookie" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown product or bad quantity"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Login required"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;
    let request = json.into_inner();

    let view = state
        .app
        .carts
        .add_item(
            user.uuid,
            request.product_uuid.into(),
            request.quantity.unwrap_or(1),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(view.into()))
}
