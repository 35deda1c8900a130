//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{PgSessionsService, SessionsService},
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        products::{PgProductsService, ProductsService},
        users::{PgUsersService, UsersService},
    },
    mail::Mailer,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to run database migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub users: Arc<dyn UsersService>,
    pub sessions: Arc<dyn SessionsService>,
}

impl AppContext {
    /// Build application context from a database URL, applying any pending
    /// migrations.
    ///
    /// # Errors
    ///
    /// Returns an error when connecting or migrating fails.
    pub async fn from_database_url(
        url: &str,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .map_err(AppInitError::Migrate)?;

        let db = Db::new(pool.clone());

        Ok(Self {
            products: Arc::new(PgProductsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            users: Arc::new(PgUsersService::new(db, mailer)),
            sessions: Arc::new(PgSessionsService::new(pool)),
        })
    }
}
