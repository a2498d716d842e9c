//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

/// Domain-specific errors
///
/// These errors represent field validation and business rule violations.
/// They are independent of the web/infrastructure layer and all map to 400.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field is missing or empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Email does not look like an email address
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Password shorter than the policy minimum
    #[error("Password must be at least {min} characters (got {actual})")]
    PasswordTooShort { min: usize, actual: usize },

    /// Password longer than the policy maximum
    #[error("Password must be at most {max} characters (got {actual})")]
    PasswordTooLong { max: usize, actual: usize },

    /// Genre is not one of the fixed enumerated set
    #[error("Invalid genre: {0}")]
    InvalidGenre(String),

    /// Published year outside the accepted range
    #[error("Published year must be between {min} and {max} (got {actual})")]
    PublishedYearOutOfRange { min: i32, max: i32, actual: i32 },

    /// Rating outside 1-5
    #[error("Rating must be an integer between 1 and 5 (got {0})")]
    InvalidRating(i32),

    /// Review text is empty
    #[error("Review text cannot be empty")]
    ReviewTextEmpty,

    /// Review text exceeds the length bound
    #[error("Review text must be at most {max} characters (got {actual})")]
    ReviewTextTooLong { max: usize, actual: usize },
}

impl DomainError {
    /// Create a published-year range error for the current year bound
    pub fn year_out_of_range(actual: i32, max: i32) -> Self {
        Self::PublishedYearOutOfRange {
            min: crate::domain::MIN_PUBLISHED_YEAR,
            max,
            actual,
        }
    }
}
