//! Sessions repository.

use std::str::FromStr;

use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as};

use crate::{
    auth::models::CurrentUser,
    domain::users::models::{UserRole, UserUuid},
};

const CREATE_SESSION_SQL: &str = include_str!("sql/create_session.sql");
const FIND_SESSION_USER_SQL: &str = include_str!("sql/find_session_user.sql");
const DELETE_SESSION_SQL: &str = include_str!("sql/delete_session.sql");

#[derive(Debug, Clone)]
pub(crate) struct PgSessionsRepository {
    pool: PgPool,
}

impl PgSessionsRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn create_session(
        &self,
        token: &str,
        user: UserUuid,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_SESSION_SQL)
            .bind(token)
            .bind(user.into_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Resolve an unexpired session to its user. Sessions whose user has
    /// been deleted are gone already (FK cascade), so they resolve to
    /// `None` like any other dead token.
    pub(crate) async fn find_session_user(
        &self,
        token: &str,
    ) -> Result<Option<CurrentUser>, sqlx::Error> {
        query_as::<Postgres, CurrentUser>(FIND_SESSION_USER_SQL)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn delete_session(&self, token: &str) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_SESSION_SQL)
            .bind(token)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CurrentUser {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let role: String = row.try_get("role")?;

        let role = UserRole::from_str(&role).map_err(|_| sqlx::Error::ColumnDecode {
            index: "role".to_string(),
            source: format!("unknown user role: {role}").into(),
        })?;

        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            role,
        })
    }
}
