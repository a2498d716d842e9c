//! Authentication primitives
//!
//! Password hashing (argon2id) and stateless signed credentials (HMAC-SHA256
//! JWTs). The web layer consumes these through [`TokenSigner`] and the
//! password helpers; no session state is kept server-side.

mod password;
mod token;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use token::{Claims, TokenError, TokenSigner, DEFAULT_TOKEN_TTL_SECONDS};
