//! Rating projection module
//!
//! Keeps the denormalized rating fields on books in sync with the review
//! ledger.

mod service;

pub use service::{BookRating, RatingAggregator};
