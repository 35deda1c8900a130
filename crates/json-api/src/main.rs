//! Botica JSON API Server

use std::{process, sync::Arc};

use salvo::{
    affix_state::inject,
    oapi::{
        OpenApi,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use botica_app::{
    context::AppContext,
    mail::{MailGatewayClient, MailGatewayConfig},
};

use crate::{config::ServerConfig, state::State};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod auth;
mod carts;
mod config;
mod extensions;
mod healthcheck;
mod products;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;
mod users;

/// Botica JSON API Server entry point
///
/// # Panics
///
/// Panics if the server fails to bind or serve requests
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.log_level)),
        )
        .init();

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let mailer = Arc::new(MailGatewayClient::new(MailGatewayConfig {
        addr: config.mail.mail_gateway_addr,
        token: config.mail.mail_gateway_token,
        from: config.mail.mail_from,
    }));

    let app = match AppContext::from_database_url(&config.database.database_url, mailer).await {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            process::exit(1);
        }
    };

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(inject(State::from_app_context(app)))
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        // Public catalog reads and account flows.
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(
                    Router::with_path("{product}")
                        .get(products::get::handler)
                        .push(Router::with_path("comments").post(products::comments::handler)),
                ),
        )
        .push(
            Router::with_path("users")
                .push(Router::with_path("register").post(users::register::handler))
                .push(Router::with_path("login").post(users::login::handler))
                .push(Router::with_path("logout").post(users::logout::handler))
                .push(Router::with_path("forgot").post(users::forgot::handler))
                .push(Router::with_path("reset-password").post(users::reset_password::handler)),
        )
        // Anything below requires a resolved session.
        .push(
            Router::new()
                .hoop(auth::middleware::require_session)
                .push(Router::with_path("users/me").get(users::me::handler))
                .push(
                    Router::with_path("cart").get(carts::get::handler).push(
                        Router::with_path("items")
                            .post(carts::add::handler)
                            .push(Router::with_path("remove").post(carts::remove::handler))
                            .push(Router::with_path("quantity").post(carts::update::handler)),
                    ),
                ),
        )
        // Admin panel: catalog mutations and the user listing.
        .push(
            Router::new()
                .hoop(auth::middleware::require_session)
                .hoop(auth::middleware::require_admin)
                .push(Router::with_path("users").get(users::index::handler))
                .push(
                    Router::with_path("products")
                        .post(products::create::handler)
                        .push(
                            Router::with_path("{product}")
                                .put(products::update::handler)
                                .delete(products::delete::handler),
                        ),
                ),
        );

    let doc = OpenApi::new("Botica API", "0.1.0")
        .add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(auth::SESSION_COOKIE))),
        )
        .merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(router).await;
}
