pub(crate) mod forgot;
pub(crate) mod index;
pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod me;
pub(crate) mod register;
pub(crate) mod reset_password;
