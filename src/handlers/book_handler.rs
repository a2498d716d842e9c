//! Book catalog mutation handlers
//!
//! Create, owner-only update, and owner-only delete. Reads live in the API
//! layer; mutations come through here so validation and ownership checks are
//! applied uniformly.

use std::str::FromStr;

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{validate_published_year, DomainError, Genre};
use crate::error::AppError;

use super::{BookRecord, CreateBookCommand, UpdateBookCommand};

/// Handler for adding a book to the catalog
pub struct CreateBookHandler {
    pool: PgPool,
}

impl CreateBookHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Execute the create book command for the acting user
    pub async fn execute(
        &self,
        command: CreateBookCommand,
        owner_id: Uuid,
    ) -> Result<BookRecord, AppError> {
        let title = required(&command.title, "title")?;
        let author = required(&command.author, "author")?;
        let description = required(&command.description, "description")?;
        let genre = Genre::from_str(&command.genre)?;
        validate_published_year(command.published_year)?;

        // New books start with an empty review set
        let book: BookRecord = sqlx::query_as(
            r#"
            INSERT INTO books (id, title, author, description, genre, published_year,
                               added_by, average_rating, total_reviews, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 0, 0, NOW(), NOW())
            RETURNING id, title, author, description, genre, published_year,
                      added_by, average_rating, total_reviews, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(author)
        .bind(description)
        .bind(genre.as_str())
        .bind(command.published_year)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Book added: {} by user {}", book.id, owner_id);

        Ok(book)
    }
}

/// Handler for owner-only book updates
pub struct UpdateBookHandler {
    pool: PgPool,
}

impl UpdateBookHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Merge the provided fields into the book, owner permitting
    pub async fn execute(
        &self,
        book_id: Uuid,
        acting_user_id: Uuid,
        command: UpdateBookCommand,
    ) -> Result<BookRecord, AppError> {
        let genre = command
            .genre
            .as_deref()
            .map(Genre::from_str)
            .transpose()?;
        if let Some(year) = command.published_year {
            validate_published_year(year)?;
        }
        let title = non_blank(command.title, "title")?;
        let author = non_blank(command.author, "author")?;
        let description = non_blank(command.description, "description")?;

        // Ownership check and update share one transaction so the row cannot
        // vanish between them
        let mut tx = self.pool.begin().await?;

        let owner: Option<Uuid> =
            sqlx::query_scalar("SELECT added_by FROM books WHERE id = $1")
                .bind(book_id)
                .fetch_optional(&mut *tx)
                .await?;

        let owner = owner.ok_or_else(|| AppError::BookNotFound(book_id.to_string()))?;
        if owner != acting_user_id {
            return Err(AppError::Forbidden(
                "Only the user who added a book may modify it".to_string(),
            ));
        }

        let book: BookRecord = sqlx::query_as(
            r#"
            UPDATE books
            SET title = COALESCE($2, title),
                author = COALESCE($3, author),
                description = COALESCE($4, description),
                genre = COALESCE($5, genre),
                published_year = COALESCE($6, published_year),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, author, description, genre, published_year,
                      added_by, average_rating, total_reviews, created_at, updated_at
            "#,
        )
        .bind(book_id)
        .bind(title)
        .bind(author)
        .bind(description)
        .bind(genre.map(|g| g.as_str()))
        .bind(command.published_year)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(book)
    }
}

/// Handler for owner-only book deletion
pub struct DeleteBookHandler {
    pool: PgPool,
}

impl DeleteBookHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delete a book and its reviews atomically
    ///
    /// Reviews cascade with the book so the ledger never holds rows that
    /// reference a missing book.
    pub async fn execute(&self, book_id: Uuid, acting_user_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let owner: Option<Uuid> =
            sqlx::query_scalar("SELECT added_by FROM books WHERE id = $1")
                .bind(book_id)
                .fetch_optional(&mut *tx)
                .await?;

        let owner = owner.ok_or_else(|| AppError::BookNotFound(book_id.to_string()))?;
        if owner != acting_user_id {
            return Err(AppError::Forbidden(
                "Only the user who added a book may delete it".to_string(),
            ));
        }

        sqlx::query("DELETE FROM reviews WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("Book deleted: {} by user {}", book_id, acting_user_id);

        Ok(())
    }
}

/// Require a non-blank value for a create field
fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::MissingField(field));
    }
    Ok(trimmed)
}

/// An update field may be absent, but not blank
fn non_blank(value: Option<String>, field: &'static str) -> Result<Option<String>, DomainError> {
    match value {
        Some(v) => {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                return Err(DomainError::MissingField(field));
            }
            Ok(Some(trimmed.to_string()))
        }
        None => Ok(None),
    }
}
