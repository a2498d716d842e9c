//! Review ledger mutation handlers
//!
//! Every mutation runs in one transaction together with the rating
//! recomputation for the touched book: either both persist or neither does,
//! so the book's aggregate fields cannot silently diverge from its review
//! set.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{validate_review_text, Rating};
use crate::error::AppError;
use crate::projection::RatingAggregator;

use super::{CreateReviewCommand, ReviewRecord, UpdateReviewCommand};

/// Handler for creating a review
pub struct CreateReviewHandler {
    pool: PgPool,
    aggregator: RatingAggregator,
}

impl CreateReviewHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            aggregator: RatingAggregator::new(pool.clone()),
            pool,
        }
    }

    /// Execute the create review command for the acting user
    pub async fn execute(
        &self,
        command: CreateReviewCommand,
        user_id: Uuid,
    ) -> Result<ReviewRecord, AppError> {
        let rating = Rating::new(command.rating)?;
        validate_review_text(&command.review_text)?;

        let mut tx = self.pool.begin().await?;

        let book_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM books WHERE id = $1)")
                .bind(command.book_id)
                .fetch_one(&mut *tx)
                .await?;
        if !book_exists {
            return Err(AppError::BookNotFound(command.book_id.to_string()));
        }

        // One review per (book, user); the unique index is the backstop for
        // two writers racing past this check
        let already_reviewed: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM reviews WHERE book_id = $1 AND user_id = $2)",
        )
        .bind(command.book_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;
        if already_reviewed {
            return Err(AppError::DuplicateReview);
        }

        let review: ReviewRecord = sqlx::query_as(
            r#"
            INSERT INTO reviews (id, book_id, user_id, rating, review_text, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING id, book_id, user_id, rating, review_text, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(command.book_id)
        .bind(user_id)
        .bind(rating.value())
        .bind(command.review_text.trim())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::on_unique_violation(e, AppError::DuplicateReview))?;

        self.aggregator
            .recompute_in_tx(&mut tx, command.book_id)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Review {} created for book {} by user {}",
            review.id,
            command.book_id,
            user_id
        );

        Ok(review)
    }
}

/// Handler for author-only review updates
pub struct UpdateReviewHandler {
    pool: PgPool,
    aggregator: RatingAggregator,
}

impl UpdateReviewHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            aggregator: RatingAggregator::new(pool.clone()),
            pool,
        }
    }

    /// Apply new rating/text to a review the acting user authored
    pub async fn execute(
        &self,
        review_id: Uuid,
        acting_user_id: Uuid,
        command: UpdateReviewCommand,
    ) -> Result<ReviewRecord, AppError> {
        let rating = Rating::new(command.rating)?;
        validate_review_text(&command.review_text)?;

        let mut tx = self.pool.begin().await?;

        let row: Option<(Uuid, Uuid)> =
            sqlx::query_as("SELECT user_id, book_id FROM reviews WHERE id = $1")
                .bind(review_id)
                .fetch_optional(&mut *tx)
                .await?;

        let (author_id, book_id) =
            row.ok_or_else(|| AppError::ReviewNotFound(review_id.to_string()))?;
        if author_id != acting_user_id {
            return Err(AppError::Forbidden(
                "Only the review's author may update it".to_string(),
            ));
        }

        let review: ReviewRecord = sqlx::query_as(
            r#"
            UPDATE reviews
            SET rating = $2, review_text = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, book_id, user_id, rating, review_text, created_at, updated_at
            "#,
        )
        .bind(review_id)
        .bind(rating.value())
        .bind(command.review_text.trim())
        .fetch_one(&mut *tx)
        .await?;

        self.aggregator.recompute_in_tx(&mut tx, book_id).await?;

        tx.commit().await?;

        Ok(review)
    }
}

/// Handler for author-only review deletion
pub struct DeleteReviewHandler {
    pool: PgPool,
    aggregator: RatingAggregator,
}

impl DeleteReviewHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            aggregator: RatingAggregator::new(pool.clone()),
            pool,
        }
    }

    /// Remove a review and recompute the book's aggregates over the
    /// remaining set
    pub async fn execute(&self, review_id: Uuid, acting_user_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(Uuid, Uuid)> =
            sqlx::query_as("SELECT user_id, book_id FROM reviews WHERE id = $1")
                .bind(review_id)
                .fetch_optional(&mut *tx)
                .await?;

        let (author_id, book_id) =
            row.ok_or_else(|| AppError::ReviewNotFound(review_id.to_string()))?;
        if author_id != acting_user_id {
            return Err(AppError::Forbidden(
                "Only the review's author may delete it".to_string(),
            ));
        }

        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review_id)
            .execute(&mut *tx)
            .await?;

        self.aggregator.recompute_in_tx(&mut tx, book_id).await?;

        tx.commit().await?;

        tracing::info!(
            "Review {} deleted by user {}, book {} aggregates recomputed",
            review_id,
            acting_user_id,
            book_id
        );

        Ok(())
    }
}
