//! Carts service.
//!
//! Maintains the cart invariants (at most one cart per user, at most one
//! line per product within a cart) under get/add/remove/set-quantity.
//! Every mutation locks the user's cart row for the duration of its
//! transaction, so concurrent mutations for one user serialize instead of
//! losing updates.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            models::CartView,
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        products::models::ProductUuid,
        users::models::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<CartView, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.carts_repository.ensure_cart(&mut tx, user).await?;

        let items = self
            .items_repository
            .get_cart_items(&mut tx, cart.uuid)
            .await?;

        tx.commit().await?;

        Ok(CartView::from_lines(items))
    }

    async fn add_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartView, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let quantity = i32::try_from(quantity).map_err(|_| CartsServiceError::InvalidQuantity)?;

        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .ensure_cart_locked(&mut tx, user)
            .await?;

        // The upsert sources its snapshot from the products table, so an
        // unknown product produces no row rather than a forged line.
        self.items_repository
            .upsert_item(&mut tx, cart.uuid, product, quantity)
            .await?
            .ok_or(CartsServiceError::UnknownProduct)?;

        let items = self
            .items_repository
            .get_cart_items(&mut tx, cart.uuid)
            .await?;

        tx.commit().await?;

        Ok(CartView::from_lines(items))
    }

    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<CartView, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .find_cart_locked(&mut tx, user)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        // Removing a line that is not present succeeds silently.
        self.items_repository
            .delete_item(&mut tx, cart.uuid, product)
            .await?;

        let items = self
            .items_repository
            .get_cart_items(&mut tx, cart.uuid)
            .await?;

        tx.commit().await?;

        Ok(CartView::from_lines(items))
    }

    async fn set_item_quantity(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartView, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .find_cart_locked(&mut tx, user)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        if quantity == 0 {
            // Removal-on-zero: reaching zero removes the line outright.
            self.items_repository
                .delete_item(&mut tx, cart.uuid, product)
                .await?;
        } else {
            let quantity =
                i32::try_from(quantity).map_err(|_| CartsServiceError::InvalidQuantity)?;

            let updated = self
                .items_repository
                .set_item_quantity(&mut tx, cart.uuid, product, quantity)
                .await?;

            if updated == 0 {
                return Err(CartsServiceError::NotFound);
            }
        }

        let items = self
            .items_repository
            .get_cart_items(&mut tx, cart.uuid)
            .await?;

        tx.commit().await?;

        Ok(CartView::from_lines(items))
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the user's cart, lazily creating (and persisting) an empty
    /// one on first access.
    async fn get_cart(&self, user: UserUuid) -> Result<CartView, CartsServiceError>;

    /// Add `quantity` of a product to the user's cart. An existing line for
    /// the product is incremented; otherwise a new line is appended with the
    /// product snapshot captured now.
    async fn add_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartView, CartsServiceError>;

    /// Remove any line for the given product. Idempotent.
    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<CartView, CartsServiceError>;

    /// Assign a line's quantity directly; zero removes the line.
    async fn set_item_quantity(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartView, CartsServiceError>;
}
