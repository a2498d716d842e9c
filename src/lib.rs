//! Book Review API Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod auth;
pub mod domain;
pub mod handlers;
pub mod projection;

pub mod config;
pub mod db;
mod error;

pub use api::AppState;
pub use config::Config;
pub use domain::{DomainError, Genre, Rating};
pub use error::{AppError, AppResult};
