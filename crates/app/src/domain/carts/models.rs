//! Cart Models

use jiff::Timestamp;

use crate::{
    domain::{products::models::ProductUuid, users::models::UserUuid},
    uuids::TypedUuid,
};

pub type CartUuid = TypedUuid<Cart>;

/// Cart Model
///
/// Exactly one cart exists per user; it is created lazily on the first read
/// or add and never deleted.
#[derive(Debug, Clone)]
pub struct Cart {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One product-quantity pairing within a cart.
///
/// `name`, `unit_price` and `image_url` are a snapshot of the product's
/// display fields taken when the line was created. They are never refreshed
/// by later product edits.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub unit_price: u64,
    pub image_url: Option<String>,
    pub quantity: u32,
}

/// The view returned by every cart operation.
#[derive(Debug, Clone, PartialEq)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub total_quantity: u64,
}

impl CartView {
    #[must_use]
    pub fn from_lines(items: Vec<CartLine>) -> Self {
        let total_quantity = items.iter().map(|line| u64::from(line.quantity)).sum();

        Self {
            items,
            total_quantity,
        }
    }
}
