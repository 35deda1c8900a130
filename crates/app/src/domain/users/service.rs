//! Users service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use rand::Rng;
use tracing::info;

use crate::{
    auth::password,
    database::Db,
    domain::users::{
        errors::UsersServiceError,
        models::{NewUser, User, UserPage, UserRole, UserUuid, UsersQuery},
        repository::PgUsersRepository,
    },
    mail::Mailer,
};

const MAX_PAGE_SIZE: u32 = 100;

const RESET_MAIL_SUBJECT: &str = "Your password reset code";

#[derive(Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
    mailer: Arc<dyn Mailer>,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
            mailer,
        }
    }
}

/// Emails are matched case-insensitively by storing them lowercased.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn six_digit_otp() -> String {
    let otp: u32 = rand::thread_rng().gen_range(100_000..1_000_000);

    otp.to_string()
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn register(&self, user: NewUser) -> Result<User, UsersServiceError> {
        let email = normalize_email(&user.email);

        if user.name.trim().is_empty() || email.is_empty() || user.password.is_empty() {
            return Err(UsersServiceError::MissingRequiredData);
        }

        let password_hash =
            password::hash_password(&user.password).map_err(UsersServiceError::PasswordHash)?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_user(
                &mut tx,
                UserUuid::new(),
                user.name.trim(),
                &email,
                &password_hash,
                UserRole::User,
            )
            .await?;

        tx.commit().await?;

        info!(user_uuid = %created.uuid, "registered user");

        Ok(created)
    }

    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, UsersServiceError> {
        let email = normalize_email(email);

        let mut tx = self.db.begin().await?;

        let credentials = self
            .repository
            .find_credentials_by_email(&mut tx, &email)
            .await?;

        tx.commit().await?;

        let Some(credentials) = credentials else {
            return Err(UsersServiceError::InvalidCredentials);
        };

        let valid = password::verify_password(&credentials.password_hash, password)
            .map_err(UsersServiceError::PasswordHash)?;

        if !valid {
            return Err(UsersServiceError::InvalidCredentials);
        }

        Ok(credentials.user)
    }

    async fn get_user(&self, user: UserUuid) -> Result<User, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let found = self.repository.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(found)
    }

    async fn list_users(&self, query: UsersQuery) -> Result<UserPage, UsersServiceError> {
        let page = query.page.max(1);
        let limit = query.limit.clamp(1, MAX_PAGE_SIZE);
        let offset = i64::from(page - 1) * i64::from(limit);

        let pattern = query
            .search
            .as_deref()
            .filter(|term| !term.trim().is_empty())
            .map(|term| format!("%{term}%"));

        let mut tx = self.db.begin().await?;

        let total = self
            .repository
            .count_users(&mut tx, pattern.as_deref())
            .await?;

        let users = self
            .repository
            .list_users(&mut tx, pattern.as_deref(), i64::from(limit), offset)
            .await?;

        tx.commit().await?;

        let total_count = u64::try_from(total).unwrap_or(0);
        let total_pages = u32::try_from(total_count.div_ceil(u64::from(limit))).unwrap_or(u32::MAX);

        Ok(UserPage {
            items: users,
            total_count,
            total_pages,
            current_page: page,
        })
    }

    async fn begin_password_reset(&self, email: &str) -> Result<(), UsersServiceError> {
        let email = normalize_email(email);

        let mut tx = self.db.begin().await?;

        let credentials = self
            .repository
            .find_credentials_by_email(&mut tx, &email)
            .await?
            .ok_or(UsersServiceError::NotFound)?;

        let otp = six_digit_otp();

        self.repository
            .set_reset_otp(&mut tx, credentials.user.uuid, &otp)
            .await?;

        tx.commit().await?;

        let text = format!("Your password reset code is: {otp}");

        self.mailer
            .send(&email, RESET_MAIL_SUBJECT, &text)
            .await
            .map_err(UsersServiceError::Mail)?;

        info!(user_uuid = %credentials.user.uuid, "issued password reset code");

        Ok(())
    }

    async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> Result<(), UsersServiceError> {
        if new_password.is_empty() {
            return Err(UsersServiceError::MissingRequiredData);
        }

        let email = normalize_email(email);

        let password_hash =
            password::hash_password(new_password).map_err(UsersServiceError::PasswordHash)?;

        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .repository
            .reset_password(&mut tx, &email, otp, &password_hash)
            .await?;

        if rows_affected == 0 {
            return Err(UsersServiceError::InvalidOtp);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Create an account with the `user` role and a hashed password.
    async fn register(&self, user: NewUser) -> Result<User, UsersServiceError>;

    /// Check an email/password pair, returning the matching user.
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, UsersServiceError>;

    /// Retrieve a single user.
    async fn get_user(&self, user: UserUuid) -> Result<User, UsersServiceError>;

    /// Admin listing with pagination and name/email search.
    async fn list_users(&self, query: UsersQuery) -> Result<UserPage, UsersServiceError>;

    /// Store a short-lived reset code for the account and mail it out.
    async fn begin_password_reset(&self, email: &str) -> Result<(), UsersServiceError>;

    /// Exchange a valid reset code for a new password.
    async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> Result<(), UsersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: "hunter2!".to_string(),
        }
    }

    #[tokio::test]
    async fn register_creates_a_user_with_the_user_role() -> TestResult {
        let ctx = TestContext::new().await;

        let user = ctx
            .users
            .register(new_user("An", "An@Example.com"))
            .await?;

        assert_eq!(user.name, "An");
        assert_eq!(user.email, "an@example.com", "emails are stored lowercased");
        assert_eq!(user.role, UserRole::User);

        Ok(())
    }

    #[tokio::test]
    async fn register_duplicate_email_returns_email_taken() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.users.register(new_user("An", "an@example.com")).await?;

        let result = ctx
            .users
            .register(new_user("Other An", "AN@example.com"))
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::EmailTaken)),
            "expected EmailTaken, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn register_missing_fields_are_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .users
            .register(NewUser {
                name: "An".to_string(),
                email: "an@example.com".to_string(),
                password: String::new(),
            })
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::MissingRequiredData)),
            "expected MissingRequiredData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn verify_credentials_accepts_the_registered_password() -> TestResult {
        let ctx = TestContext::new().await;

        let registered = ctx.users.register(new_user("An", "an@example.com")).await?;

        let user = ctx
            .users
            .verify_credentials("an@example.com", "hunter2!")
            .await?;

        assert_eq!(user.uuid, registered.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn verify_credentials_rejects_a_wrong_password() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.users.register(new_user("An", "an@example.com")).await?;

        let result = ctx
            .users
            .verify_credentials("an@example.com", "not-the-password")
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::InvalidCredentials)),
            "expected InvalidCredentials, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn verify_credentials_rejects_an_unknown_email() {
        let ctx = TestContext::new().await;

        let result = ctx
            .users
            .verify_credentials("nobody@example.com", "hunter2!")
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::InvalidCredentials)),
            "expected InvalidCredentials, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_users_searches_name_and_email() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.users.register(new_user("An", "an@example.com")).await?;
        ctx.users
            .register(new_user("Binh", "binh@example.com"))
            .await?;

        let by_name = ctx
            .users
            .list_users(UsersQuery {
                page: 1,
                limit: 10,
                search: Some("binh".to_string()),
            })
            .await?;

        assert_eq!(by_name.items.len(), 1);
        assert_eq!(by_name.items[0].name, "Binh");

        let by_email = ctx
            .users
            .list_users(UsersQuery {
                page: 1,
                limit: 10,
                search: Some("AN@EXAMPLE".to_string()),
            })
            .await?;

        assert_eq!(by_email.items.len(), 1);
        assert_eq!(by_email.items[0].email, "an@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn password_reset_round_trip() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.users.register(new_user("An", "an@example.com")).await?;

        ctx.users.begin_password_reset("an@example.com").await?;

        let sent = ctx.sent_mail.lock().expect("mailbox lock");
        let (to, _, text) = sent.last().expect("a reset mail should have been sent");

        assert_eq!(to, "an@example.com");

        let otp = text
            .rsplit(' ')
            .next()
            .expect("mail text should end with the code")
            .to_string();

        drop(sent);

        assert_eq!(otp.len(), 6, "reset code should be six digits");

        ctx.users
            .reset_password("an@example.com", &otp, "new-password-1")
            .await?;

        // The new password works, the old one does not, and the OTP is spent.
        ctx.users
            .verify_credentials("an@example.com", "new-password-1")
            .await?;

        let old = ctx
            .users
            .verify_credentials("an@example.com", "hunter2!")
            .await;

        assert!(matches!(old, Err(UsersServiceError::InvalidCredentials)));

        let reuse = ctx
            .users
            .reset_password("an@example.com", &otp, "another-password")
            .await;

        assert!(
            matches!(reuse, Err(UsersServiceError::InvalidOtp)),
            "expected InvalidOtp on reuse, got {reuse:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn reset_password_with_wrong_otp_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.users.register(new_user("An", "an@example.com")).await?;
        ctx.users.begin_password_reset("an@example.com").await?;

        // Generated codes are always in 100000..=999999, so this one can
        // never match.
        let result = ctx
            .users
            .reset_password("an@example.com", "000000", "new-password")
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::InvalidOtp)),
            "expected InvalidOtp, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn reset_password_with_expired_otp_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.users.register(new_user("An", "an@example.com")).await?;
        ctx.users.begin_password_reset("an@example.com").await?;

        let otp: String = sqlx::query_scalar("SELECT reset_otp FROM users WHERE email = $1")
            .bind("an@example.com")
            .fetch_one(ctx.db.pool())
            .await?;

        sqlx::query(
            "UPDATE users SET reset_otp_expires_at = now() - interval '1 minute' \
             WHERE email = $1",
        )
        .bind("an@example.com")
        .execute(ctx.db.pool())
        .await?;

        let result = ctx
            .users
            .reset_password("an@example.com", &otp, "new-password")
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::InvalidOtp)),
            "expected InvalidOtp for an expired code, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn begin_password_reset_unknown_email_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.users.begin_password_reset("nobody@example.com").await;

        assert!(
            matches!(result, Err(UsersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
