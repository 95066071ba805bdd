//! Authentication building blocks shared by the ClassConnect services
//!
//! Tokens are HS256 JWTs minted with a one-hour expiry. Route protection is
//! the [`RequireRole`] actix middleware, which validates the bearer token,
//! checks the caller's role against an allow list and optionally matches the
//! `id_user` path segment against the token subject. Validated claims land in
//! the request extensions as [`UserData`] for handlers to extract.

mod claims;
mod middleware;
mod password;
mod pin;

pub use claims::{generate_jwt, parse_jwt, Claims, JwtError};
pub use middleware::{RequireRole, UserData};
pub use password::{hash_password, verify_password, PasswordError};
pub use pin::{PinGenerator, RandomPinGenerator, PIN_LENGTH};
