//! Session authentication.

pub mod errors;
pub mod models;
pub mod password;
mod repository;
pub mod service;
pub mod token;

pub use errors::SessionsServiceError;
pub use service::*;
