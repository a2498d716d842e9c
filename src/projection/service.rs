//! Rating Aggregator
//!
//! Recomputes a book's denormalized `average_rating` / `total_reviews` from
//! the full current review set. The aggregate fields are a cache of the
//! review ledger, never a source of truth: every recomputation is a full
//! reduction, not an incremental adjustment, so interleaved writers converge
//! on a value consistent with the final review set.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Aggregate snapshot for a book
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookRating {
    pub average_rating: f64,
    pub total_reviews: i32,
}

impl BookRating {
    /// The aggregate of an empty review set
    pub const EMPTY: BookRating = BookRating {
        average_rating: 0.0,
        total_reviews: 0,
    };
}

/// Service recomputing book rating aggregates after review mutations
#[derive(Debug, Clone)]
pub struct RatingAggregator {
    pool: PgPool,
}

impl RatingAggregator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Recompute and persist a book's aggregates inside the caller's
    /// transaction.
    ///
    /// Called by every review mutation before commit: the mutation and the
    /// recomputation become atomic, and the read sees the just-written
    /// review set (read-your-writes on the same transaction).
    pub async fn recompute_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: Uuid,
    ) -> Result<BookRating, sqlx::Error> {
        let (total_reviews, average_rating): (i64, Option<f64>) = sqlx::query_as(
            r#"
            SELECT COUNT(*), AVG(rating)::float8
            FROM reviews
            WHERE book_id = $1
            "#,
        )
        .bind(book_id)
        .fetch_one(&mut **tx)
        .await?;

        let rating = BookRating {
            // AVG over an empty set is NULL
            average_rating: average_rating.unwrap_or(0.0),
            total_reviews: total_reviews as i32,
        };

        sqlx::query(
            r#"
            UPDATE books
            SET average_rating = $2,
                total_reviews = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(book_id)
        .bind(rating.average_rating)
        .bind(rating.total_reviews)
        .execute(&mut **tx)
        .await?;

        tracing::debug!(
            "Aggregates recomputed for book {}: avg {} over {} reviews",
            book_id,
            rating.average_rating,
            rating.total_reviews
        );

        Ok(rating)
    }

    /// Recompute a book's aggregates in a transaction of its own
    pub async fn recompute(&self, book_id: Uuid) -> Result<BookRating, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let rating = self.recompute_in_tx(&mut tx, book_id).await?;
        tx.commit().await?;
        Ok(rating)
    }

    /// Read the aggregates stored on the book row
    pub async fn stored(&self, book_id: Uuid) -> Result<Option<BookRating>, sqlx::Error> {
        let row: Option<(f64, i32)> = sqlx::query_as(
            "SELECT average_rating, total_reviews FROM books WHERE id = $1",
        )
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(average_rating, total_reviews)| BookRating {
            average_rating,
            total_reviews,
        }))
    }

    /// Compare the stored aggregates against a fresh reduction over the
    /// review ledger. True when they match; lets tests detect a book whose
    /// cache has diverged from its review set.
    pub async fn verify(&self, book_id: Uuid) -> Result<bool, sqlx::Error> {
        let stored = match self.stored(book_id).await? {
            Some(rating) => rating,
            None => return Ok(false),
        };

        let (count, avg): (i64, Option<f64>) = sqlx::query_as(
            r#"
            SELECT COUNT(*), AVG(rating)::float8
            FROM reviews
            WHERE book_id = $1
            "#,
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;

        let computed = BookRating {
            average_rating: avg.unwrap_or(0.0),
            total_reviews: count as i32,
        };

        Ok(stored.total_reviews == computed.total_reviews
            && (stored.average_rating - computed.average_rating).abs() < f64::EPSILON)
    }
}
