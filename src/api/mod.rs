//! API module
//!
//! HTTP routes, middleware, and shared request state.

pub mod middleware;
pub mod routes;

use sqlx::PgPool;

use crate::auth::TokenSigner;

pub use routes::create_router;

/// State shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub tokens: TokenSigner,
}

impl AppState {
    pub fn new(pool: PgPool, tokens: TokenSigner) -> Self {
        Self { pool, tokens }
    }
}
