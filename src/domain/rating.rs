//! Rating value type and review text bounds
//!
//! A review's rating is a whole number of stars, 1 through 5. Construction
//! goes through [`Rating::new`] so an out-of-range value can never reach the
//! store or the aggregator.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Lowest allowed rating
pub const MIN_RATING: i32 = 1;

/// Highest allowed rating
pub const MAX_RATING: i32 = 5;

/// Maximum review text length in characters
pub const REVIEW_TEXT_MAX_LEN: usize = 500;

/// Validated star rating (1-5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Rating(i32);

impl Rating {
    /// Create a rating, rejecting values outside 1-5
    pub fn new(value: i32) -> Result<Self, DomainError> {
        if !(MIN_RATING..=MAX_RATING).contains(&value) {
            return Err(DomainError::InvalidRating(value));
        }
        Ok(Self(value))
    }

    /// The raw star count
    pub fn value(&self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Rating {
    type Error = DomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for i32 {
    fn from(rating: Rating) -> i32 {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate review text: non-empty after trimming, at most 500 characters
pub fn validate_review_text(text: &str) -> Result<(), DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::ReviewTextEmpty);
    }
    let char_count = text.chars().count();
    if char_count > REVIEW_TEXT_MAX_LEN {
        return Err(DomainError::ReviewTextTooLong {
            max: REVIEW_TEXT_MAX_LEN,
            actual: char_count,
        });
    }
    Ok(())
}
