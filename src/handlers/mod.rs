//! Command Handlers module
//!
//! Handlers orchestrate a mutation end to end: validation, ownership checks,
//! the store write, and (for reviews) the rating recomputation.

mod auth_handler;
mod book_handler;
mod commands;
mod review_handler;


pub use auth_handler::{LoginHandler, RegisterHandler};
pub use book_handler::{CreateBookHandler, DeleteBookHandler, UpdateBookHandler};
pub use commands::*;
pub use review_handler::{CreateReviewHandler, DeleteReviewHandler, UpdateReviewHandler};
