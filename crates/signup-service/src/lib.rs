//! Account signup service.
//!
//! Accepts a name, email and password, rejects emails that are already
//! registered, stores the account with a bcrypt password hash, and returns a
//! signed identity token for the new account.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;

pub use auth::{SignupService, TokenIssuer};
pub use config::Config;
pub use error::AuthError;
