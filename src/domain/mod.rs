//! Domain module
//!
//! Value types and validation rules for the book catalog and review ledger.

mod error;
mod genre;
mod rating;

pub use error::DomainError;
pub use genre::Genre;
pub use rating::{validate_review_text, Rating, MAX_RATING, MIN_RATING, REVIEW_TEXT_MAX_LEN};

use chrono::{Datelike, Utc};

/// Earliest accepted publication year
pub const MIN_PUBLISHED_YEAR: i32 = 1000;

/// Validate a book's published year: within [1000, current year]
pub fn validate_published_year(year: i32) -> Result<(), DomainError> {
    let current_year = Utc::now().year();
    if year < MIN_PUBLISHED_YEAR || year > current_year {
        return Err(DomainError::year_out_of_range(year, current_year));
    }
    Ok(())
}
