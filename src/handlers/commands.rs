//! Command definitions
//!
//! Commands represent intentions to change the system state, decoupled from
//! the HTTP request types. Field validation happens in the handlers so that
//! out-of-range values surface as 400s, never as panics or silent truncation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// =========================================================================
// Commands
// =========================================================================

/// Command to register a new user
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Command to authenticate an existing user
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// Command to add a book to the catalog
#[derive(Debug, Clone)]
pub struct CreateBookCommand {
    pub title: String,
    pub author: String,
    pub description: String,
    /// Raw genre name, validated against the fixed set by the handler
    pub genre: String,
    pub published_year: i32,
}

/// Command to update a book; absent fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateBookCommand {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub published_year: Option<i32>,
}

/// Command to create a review for a book
#[derive(Debug, Clone)]
pub struct CreateReviewCommand {
    pub book_id: Uuid,
    /// Raw star count, validated to 1-5 by the handler
    pub rating: i32,
    pub review_text: String,
}

/// Command to update an existing review
#[derive(Debug, Clone)]
pub struct UpdateReviewCommand {
    pub rating: i32,
    pub review_text: String,
}

// =========================================================================
// Results
// =========================================================================

/// Public view of a user; never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    pub user: UserRecord,
}

/// A book row as returned by mutations
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    pub genre: String,
    pub published_year: i32,
    pub added_by: Uuid,
    pub average_rating: f64,
    pub total_reviews: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A review row as returned by mutations
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub id: Uuid,
    pub book_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub review_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
