//! Accounts and bearer-token authentication.
//!
//! Passwords are stored as Argon2id PHC strings. A successful login issues an HS256 JWT
//! whose `sub` is the user's id; protected handlers take an [`AuthUser`] argument, which
//! rejects the request with 401 unless a valid `Authorization: Bearer <token>` is present.

pub mod extractor;
pub mod password;
pub mod token;

pub use extractor::AuthUser;
pub use token::{AuthError, Claims, TokenKeys};
