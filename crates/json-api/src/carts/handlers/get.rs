//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use botica_app::domain::carts::models::{CartLine, CartView};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The lines in the cart, in the order they were first added
    pub items: Vec<CartLineResponse>,

    /// Sum of all line quantities
    pub total_quantity: u64,
}

impl From<CartView> for CartResponse {
    fn from(view: CartView) -> Self {
        Self {
            items: view.items.into_iter().map(CartLineResponse::from).collect(),
            total_quantity: view.total_quantity,
        }
    }
}

/// Cart Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineResponse {
    /// The product this line denotes
    pub product_uuid: Uuid,

    /// Product name as it was when the line was created
    pub name: String,

    /// Unit price snapshot in minor currency units
    pub unit_price: u64,

    /// Image URL snapshot
    pub image_url: Option<String>,

    /// Number of units in the cart
    pub quantity: u32,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        Self {
            product_uuid: line.product_uuid.into(),
            name: line.name,
            unit_price: line.unit_price,
            image_url: line.image_url,
            quantity: line.quantity,
        }
    }
}

/// Get Cart Handler
///
/// Returns the current user's cart, creating an empty one on first access.
#[endpoint(tags("cart"), summary = "Get Cart", security(("session_cookie" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let view = state
        .app
        .carts
        .get_cart(user.uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(view.into()))
}
