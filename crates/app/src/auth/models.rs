//! Auth Models

use crate::domain::users::models::{UserRole, UserUuid};

/// The identity a resolved session carries through a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}
