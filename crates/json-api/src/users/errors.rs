//! User Errors

use salvo::http::StatusError;
use tracing::error;

use botica_app::domain::users::UsersServiceError;

pub(crate) fn into_status_error(error: UsersServiceError) -> StatusError {
    match error {
        UsersServiceError::EmailTaken => {
            StatusError::conflict().brief("Email already registered")
        }
        UsersServiceError::NotFound => StatusError::not_found().brief("User not found"),
        UsersServiceError::InvalidCredentials => {
            StatusError::bad_request().brief("Invalid email or password")
        }
        UsersServiceError::InvalidOtp => {
            StatusError::bad_request().brief("Invalid or expired reset code")
        }
        UsersServiceError::MissingRequiredData | UsersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid user payload")
        }
        UsersServiceError::PasswordHash(source) => {
            error!("password hashing failed: {source}");

            StatusError::internal_server_error()
        }
        UsersServiceError::Mail(source) => {
            error!("failed to send mail: {source}");

            StatusError::internal_server_error()
        }
        UsersServiceError::Sql(source) => {
            error!("users storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
