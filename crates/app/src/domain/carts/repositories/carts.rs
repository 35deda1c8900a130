//! Carts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    carts::models::{Cart, CartUuid},
    users::models::UserUuid,
};

const INSERT_CART_IF_ABSENT_SQL: &str = include_str!("../sql/insert_cart_if_absent.sql");
const FIND_CART_BY_USER_SQL: &str = include_str!("../sql/find_cart_by_user.sql");
const FIND_CART_BY_USER_FOR_UPDATE_SQL: &str =
    include_str!("../sql/find_cart_by_user_for_update.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Load the user's cart, creating an empty one first if none exists.
    ///
    /// Creation uses `ON CONFLICT DO NOTHING`, so two concurrent callers for
    /// the same user converge on a single cart row.
    pub(crate) async fn ensure_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Cart, sqlx::Error> {
        query(INSERT_CART_IF_ABSENT_SQL)
            .bind(CartUuid::new().into_uuid())
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?;

        query_as::<Postgres, Cart>(FIND_CART_BY_USER_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// As [`Self::ensure_cart`], but locks the cart row for the rest of the
    /// transaction so concurrent mutations for one user serialize.
    pub(crate) async fn ensure_cart_locked(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Cart, sqlx::Error> {
        query(INSERT_CART_IF_ABSENT_SQL)
            .bind(CartUuid::new().into_uuid())
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?;

        query_as::<Postgres, Cart>(FIND_CART_BY_USER_FOR_UPDATE_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Lock and return the user's cart, or `None` if they have none.
    pub(crate) async fn find_cart_locked(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<Cart>, sqlx::Error> {
        query_as::<Postgres, Cart>(FIND_CART_BY_USER_FOR_UPDATE_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Cart {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
