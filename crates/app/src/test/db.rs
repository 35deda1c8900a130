//! Database test utilities.

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};

const PG_USER: &str = "botica_test";
const PG_PASSWORD: &str = "botica_test_password";

/// Shared PostgreSQL container that starts once and is reused by every test.
static POSTGRES_CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

/// Channel feeding the background database-drop task.
static CLEANUP_SENDER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

async fn init_postgres_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(PG_USER)
        .with_password(PG_PASSWORD)
        .with_db_name("botica_test")
        .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
        .start()
        .await
        .expect("Failed to start PostgreSQL container")
}

async fn init_cleanup_task() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(db_name) = receiver.recv().await {
            drop_database(&db_name).await;
        }
    });

    sender
}

async fn drop_database(db_name: &str) {
    let Some(container) = POSTGRES_CONTAINER.get() else {
        return;
    };

    let Ok(port) = container.get_host_port_ipv4(5432).await else {
        return;
    };

    let base_url = admin_url(port);

    if let Ok(mut conn) = PgConnection::connect(&base_url).await {
        let drop_query = format!("DROP DATABASE IF EXISTS \"{db_name}\"");
        let _ = sqlx::query(&drop_query).execute(&mut conn).await;
        let _ = conn.close().await;
    }
}

fn container_host() -> String {
    std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string())
}

fn admin_url(port: u16) -> String {
    let host = container_host();

    format!("postgresql://{PG_USER}:{PG_PASSWORD}@{host}:{port}/postgres")
}

/// An isolated test database inside the shared container.
///
/// Every instance gets its own freshly migrated database, so tests need no
/// per-test cleanup; the database is dropped in the background once the
/// instance goes out of scope.
#[derive(Debug, Clone)]
pub(crate) struct TestDb {
    pool: PgPool,
    name: String,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = CLEANUP_SENDER.get() {
            let _ = sender.send(self.name.clone());
        }
    }
}

impl TestDb {
    pub(crate) async fn new() -> Self {
        let _cleanup_sender = CLEANUP_SENDER.get_or_init(init_cleanup_task).await;

        let container = POSTGRES_CONTAINER
            .get_or_init(init_postgres_container)
            .await;

        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("Failed to get container port");

        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("System clock before the epoch")
            .as_nanos();

        let thread_id = std::thread::current().id();

        let name = format!("botica_test_{nanos}_{thread_id:?}").replace([':', ' ', '(', ')'], "");

        let mut conn = PgConnection::connect(&admin_url(port))
            .await
            .expect("Failed to connect to postgres database");

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut conn)
            .await
            .expect("Failed to create test database");

        conn.close()
            .await
            .expect("Failed to close admin connection");

        let host = container_host();
        let database_url = format!("postgresql://{PG_USER}:{PG_PASSWORD}@{host}:{port}/{name}");

        let pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to create pool for test database");

        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations on test database");

        Self { pool, name }
    }

    /// Returns the connection pool for this test database.
    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }
}
