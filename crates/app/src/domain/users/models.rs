//! User Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;

use crate::uuids::TypedUuid;

pub type UserUuid = TypedUuid<User>;

/// User Model
///
/// The password hash never leaves the repository layer.
#[derive(Debug, Clone)]
pub struct User {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownUserRole;

impl FromStr for UserRole {
    type Err = UnknownUserRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(UnknownUserRole),
        }
    }
}

/// New User Model. The password arrives in plain text and is hashed by the
/// service before it reaches storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Pagination and search parameters for the admin user listing.
#[derive(Debug, Clone, PartialEq)]
pub struct UsersQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
}

impl Default for UsersQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: None,
        }
    }
}

/// One page of users.
#[derive(Debug, Clone)]
pub struct UserPage {
    pub items: Vec<User>,
    pub total_count: u64,
    pub total_pages: u32,
    pub current_page: u32,
}
