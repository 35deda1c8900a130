//! Sessions service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;

use crate::{
    auth::{
        errors::SessionsServiceError,
        models::CurrentUser,
        repository::PgSessionsRepository,
        token::{generate_session_token, validate_session_token},
    },
    domain::users::models::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgSessionsService {
    repository: PgSessionsRepository,
}

impl PgSessionsService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgSessionsRepository::new(pool),
        }
    }
}

#[async_trait]
impl SessionsService for PgSessionsService {
    async fn create_session(&self, user: UserUuid) -> Result<String, SessionsServiceError> {
        let token = generate_session_token();

        self.repository.create_session(&token, user).await?;

        Ok(token)
    }

    async fn resolve_session(&self, token: &str) -> Result<CurrentUser, SessionsServiceError> {
        if validate_session_token(token).is_err() {
            return Err(SessionsServiceError::NotFound);
        }

        let Some(user) = self.repository.find_session_user(token).await? else {
            // Expired rows stay behind until their token is presented again;
            // reap on the failed lookup so the dead token cannot linger.
            let _reaped = self.repository.delete_session(token).await;

            return Err(SessionsServiceError::NotFound);
        };

        Ok(user)
    }

    async fn destroy_session(&self, token: &str) -> Result<(), SessionsServiceError> {
        self.repository.delete_session(token).await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait SessionsService: Send + Sync {
    /// Open a session for the user and return its opaque token.
    async fn create_session(&self, user: UserUuid) -> Result<String, SessionsServiceError>;

    /// Resolve a presented token to the identity it carries. Malformed,
    /// unknown, expired, and orphaned tokens all fail alike.
    async fn resolve_session(&self, token: &str) -> Result<CurrentUser, SessionsServiceError>;

    /// Drop a session. Destroying an unknown token is not an error.
    async fn destroy_session(&self, token: &str) -> Result<(), SessionsServiceError>;
}
