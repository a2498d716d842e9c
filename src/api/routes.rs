//! API Routes
//!
//! HTTP endpoint definitions. Reads query the store directly; mutations go
//! through the command handlers. Every response uses the
//! `{success, message?, <resource>?}` envelope with camelCase fields.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AppError;
use crate::handlers::{
    BookRecord, CreateBookCommand, CreateBookHandler, CreateReviewCommand, CreateReviewHandler,
    DeleteBookHandler, DeleteReviewHandler, LoginCommand, LoginHandler, RegisterCommand,
    RegisterHandler, ReviewRecord, UpdateBookCommand, UpdateBookHandler, UpdateReviewCommand,
    UpdateReviewHandler, UserRecord,
};

use super::middleware::AuthUser;
use super::AppState;

/// Book list page size
const PAGE_SIZE: i64 = 5;

// =========================================================================
// Request types
// =========================================================================

#[derive(Debug, Deserialize, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub description: String,
    pub genre: String,
    pub published_year: i32,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub published_year: Option<i32>,
}

/// Review create/update body; the text field is called `comment` on the wire
#[derive(Debug, Deserialize, Serialize)]
pub struct ReviewRequest {
    pub rating: i32,
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<i64>,
}

// =========================================================================
// Response types
// =========================================================================

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub user: UserRecord,
}

/// A book row with its owner's name resolved
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookListing {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    pub genre: String,
    pub published_year: i32,
    pub added_by: Uuid,
    pub added_by_name: String,
    pub average_rating: f64,
    pub total_reviews: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookListResponse {
    pub success: bool,
    pub current_page: i64,
    pub total_pages: i64,
    pub books: Vec<BookListing>,
}

#[derive(Debug, Serialize)]
pub struct BooksResponse {
    pub success: bool,
    pub books: Vec<BookListing>,
}

#[derive(Debug, Serialize)]
pub struct BookDetailResponse {
    pub success: bool,
    pub book: BookListing,
}

#[derive(Debug, Serialize)]
pub struct BookMutationResponse {
    pub success: bool,
    pub message: String,
    pub book: BookRecord,
}

/// A review row with its author's name resolved
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListing {
    pub id: Uuid,
    pub book_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub rating: i32,
    pub review_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A review row with its book's title and author resolved
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserReviewListing {
    pub id: Uuid,
    pub book_id: Uuid,
    pub book_title: String,
    pub book_author: String,
    pub user_id: Uuid,
    pub rating: i32,
    pub review_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ReviewsResponse<T: Serialize> {
    pub success: bool,
    pub reviews: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct ReviewMutationResponse {
    pub success: bool,
    pub message: String,
    pub review: ReviewRecord,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/books/all", get(list_books))
        .route("/books/:id", get(get_book))
        .route("/reviews/book/:book_id", get(list_book_reviews));

    let protected = Router::new()
        .route("/books/user/me", get(list_my_books))
        .route("/books/add", post(add_book))
        .route("/books/edit/:id", patch(edit_book))
        .route("/books/delete/:id", delete(delete_book))
        .route("/reviews/book/:book_id", post(add_review))
        .route("/reviews/user/me", get(list_my_reviews))
        .route("/reviews/:id", put(update_review).delete(delete_review))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            super::middleware::require_auth,
        ));

    public
        .merge(protected)
        .layer(middleware::from_fn(super::middleware::logging_middleware))
        .with_state(state)
}

// =========================================================================
// POST /auth/register
// =========================================================================

/// Register a new user
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let handler = RegisterHandler::new(state.pool);

    let user = handler
        .execute(RegisterCommand {
            name: request.name,
            email: request.email,
            password: request.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: format!("User registered with email {}", user.email),
            token: None,
            user,
        }),
    ))
}

// =========================================================================
// POST /auth/login
// =========================================================================

/// Authenticate and issue a credential
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let handler = LoginHandler::new(state.pool, state.tokens);

    let result = handler
        .execute(LoginCommand {
            email: request.email,
            password: request.password,
        })
        .await?;

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        token: Some(result.token),
        user: result.user,
    }))
}

// =========================================================================
// GET /books/all?page=N
// =========================================================================

/// Paginated book list, newest first
async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<BookListResponse>, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let offset = page_offset(page, PAGE_SIZE);

    let books: Vec<BookListing> = sqlx::query_as(
        r#"
        SELECT b.id, b.title, b.author, b.description, b.genre, b.published_year,
               b.added_by, u.name AS added_by_name, b.average_rating, b.total_reviews,
               b.created_at, b.updated_at
        FROM books b
        JOIN users u ON u.id = b.added_by
        ORDER BY b.created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(PAGE_SIZE)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
        .fetch_one(&state.pool)
        .await?;

    Ok(Json(BookListResponse {
        success: true,
        current_page: page,
        total_pages: total_pages(total, PAGE_SIZE),
        books,
    }))
}

// =========================================================================
// GET /books/user/me
// =========================================================================

/// Books added by the caller, newest first
async fn list_my_books(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<BooksResponse>, AppError> {
    let books: Vec<BookListing> = sqlx::query_as(
        r#"
        SELECT b.id, b.title, b.author, b.description, b.genre, b.published_year,
               b.added_by, u.name AS added_by_name, b.average_rating, b.total_reviews,
               b.created_at, b.updated_at
        FROM books b
        JOIN users u ON u.id = b.added_by
        WHERE b.added_by = $1
        ORDER BY b.created_at DESC
        "#,
    )
    .bind(user.user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(BooksResponse {
        success: true,
        books,
    }))
}

// =========================================================================
// GET /books/:id
// =========================================================================

/// Single book with its owner's name resolved
async fn get_book(
    State(state): State<AppState>,
    Path(book_id): Path<Uuid>,
) -> Result<Json<BookDetailResponse>, AppError> {
    let book: Option<BookListing> = sqlx::query_as(
        r#"
        SELECT b.id, b.title, b.author, b.description, b.genre, b.published_year,
               b.added_by, u.name AS added_by_name, b.average_rating, b.total_reviews,
               b.created_at, b.updated_at
        FROM books b
        JOIN users u ON u.id = b.added_by
        WHERE b.id = $1
        "#,
    )
    .bind(book_id)
    .fetch_optional(&state.pool)
    .await?;

    let book = book.ok_or_else(|| AppError::BookNotFound(book_id.to_string()))?;

    Ok(Json(BookDetailResponse {
        success: true,
        book,
    }))
}

// =========================================================================
// POST /books/add
// =========================================================================

/// Add a book to the catalog
async fn add_book(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateBookRequest>,
) -> Result<(StatusCode, Json<BookMutationResponse>), AppError> {
    let handler = CreateBookHandler::new(state.pool);

    let book = handler
        .execute(
            CreateBookCommand {
                title: request.title,
                author: request.author,
                description: request.description,
                genre: request.genre,
                published_year: request.published_year,
            },
            user.user_id,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BookMutationResponse {
            success: true,
            message: "Book added".to_string(),
            book,
        }),
    ))
}

// =========================================================================
// PATCH /books/edit/:id
// =========================================================================

/// Update a book (owner only); absent fields are left unchanged
async fn edit_book(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(book_id): Path<Uuid>,
    Json(request): Json<UpdateBookRequest>,
) -> Result<Json<BookMutationResponse>, AppError> {
    let handler = UpdateBookHandler::new(state.pool);

    let book = handler
        .execute(
            book_id,
            user.user_id,
            UpdateBookCommand {
                title: request.title,
                author: request.author,
                description: request.description,
                genre: request.genre,
                published_year: request.published_year,
            },
        )
        .await?;

    Ok(Json(BookMutationResponse {
        success: true,
        message: "Book updated".to_string(),
        book,
    }))
}

// =========================================================================
// DELETE /books/delete/:id
// =========================================================================

/// Delete a book and its reviews (owner only)
async fn delete_book(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(book_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let handler = DeleteBookHandler::new(state.pool);

    handler.execute(book_id, user.user_id).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Book deleted".to_string(),
    }))
}

// =========================================================================
// POST /reviews/book/:book_id
// =========================================================================

/// Create a review for a book; triggers rating aggregation
async fn add_review(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(book_id): Path<Uuid>,
    Json(request): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<ReviewMutationResponse>), AppError> {
    let handler = CreateReviewHandler::new(state.pool);

    let review = handler
        .execute(
            CreateReviewCommand {
                book_id,
                rating: request.rating,
                review_text: request.comment,
            },
            user.user_id,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ReviewMutationResponse {
            success: true,
            message: "Review added successfully".to_string(),
            review,
        }),
    ))
}

// =========================================================================
// GET /reviews/book/:book_id
// =========================================================================

/// All reviews for a book, newest first, with author names resolved
async fn list_book_reviews(
    State(state): State<AppState>,
    Path(book_id): Path<Uuid>,
) -> Result<Json<ReviewsResponse<ReviewListing>>, AppError> {
    let book_exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM books WHERE id = $1)")
            .bind(book_id)
            .fetch_one(&state.pool)
            .await?;
    if !book_exists {
        return Err(AppError::BookNotFound(book_id.to_string()));
    }

    let reviews: Vec<ReviewListing> = sqlx::query_as(
        r#"
        SELECT r.id, r.book_id, r.user_id, u.name AS user_name, r.rating,
               r.review_text, r.created_at, r.updated_at
        FROM reviews r
        JOIN users u ON u.id = r.user_id
        WHERE r.book_id = $1
        ORDER BY r.created_at DESC
        "#,
    )
    .bind(book_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(ReviewsResponse {
        success: true,
        reviews,
    }))
}

// =========================================================================
// GET /reviews/user/me
// =========================================================================

/// Reviews authored by the caller, newest first, with book info resolved
async fn list_my_reviews(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ReviewsResponse<UserReviewListing>>, AppError> {
    let reviews: Vec<UserReviewListing> = sqlx::query_as(
        r#"
        SELECT r.id, r.book_id, b.title AS book_title, b.author AS book_author,
               r.user_id, r.rating, r.review_text, r.created_at, r.updated_at
        FROM reviews r
        JOIN books b ON b.id = r.book_id
        WHERE r.user_id = $1
        ORDER BY r.created_at DESC
        "#,
    )
    .bind(user.user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(ReviewsResponse {
        success: true,
        reviews,
    }))
}

// =========================================================================
// PUT /reviews/:id
// =========================================================================

/// Update a review (author only); triggers rating aggregation
async fn update_review(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(review_id): Path<Uuid>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<ReviewMutationResponse>, AppError> {
    let handler = UpdateReviewHandler::new(state.pool);

    let review = handler
        .execute(
            review_id,
            user.user_id,
            UpdateReviewCommand {
                rating: request.rating,
                review_text: request.comment,
            },
        )
        .await?;

    Ok(Json(ReviewMutationResponse {
        success: true,
        message: "Review updated successfully".to_string(),
        review,
    }))
}

// =========================================================================
// DELETE /reviews/:id
// =========================================================================

/// Delete a review (author only); triggers rating aggregation over the
/// remaining set
async fn delete_review(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(review_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let handler = DeleteReviewHandler::new(state.pool);

    handler.execute(review_id, user.user_id).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Review deleted successfully".to_string(),
    }))
}

/// Total page count for a list of `total` items
fn total_pages(total: i64, page_size: i64) -> i64 {
    (total + page_size - 1) / page_size
}

/// Row offset for a 1-based page number
///
/// Saturates instead of overflowing: an absurd page number yields an offset
/// past every row, which the store answers with an empty page.
fn page_offset(page: i64, page_size: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(1, 5), 1);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
        assert_eq!(total_pages(11, 5), 3);
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, 5), 0);
        assert_eq!(page_offset(2, 5), 5);
        assert_eq!(page_offset(3, 5), 10);
    }

    #[test]
    fn test_page_offset_saturates_on_huge_pages() {
        // Client-supplied page numbers must not overflow the offset
        assert_eq!(page_offset(i64::MAX, 5), i64::MAX);
        assert_eq!(page_offset(i64::MAX / 5, 5), (i64::MAX / 5 - 1) * 5);
    }

    #[test]
    fn test_create_book_request_deserialize() {
        let json = r#"{
            "title": "Snow Crash",
            "author": "Neal Stephenson",
            "description": "Pizza delivery and the metaverse",
            "genre": "Science Fiction",
            "publishedYear": 1992
        }"#;

        let request: CreateBookRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.title, "Snow Crash");
        assert_eq!(request.published_year, 1992);
    }

    #[test]
    fn test_update_book_request_partial() {
        let request: UpdateBookRequest = serde_json::from_str(r#"{"genre": "Horror"}"#).unwrap();
        assert_eq!(request.genre, Some("Horror".to_string()));
        assert!(request.title.is_none());
        assert!(request.published_year.is_none());
    }

    #[test]
    fn test_review_request_deserialize() {
        let request: ReviewRequest =
            serde_json::from_str(r#"{"rating": 4, "comment": "Holds up."}"#).unwrap();
        assert_eq!(request.rating, 4);
        assert_eq!(request.comment, "Holds up.");
    }

    #[test]
    fn test_page_query_defaults() {
        let query: PageQuery = serde_json::from_str("{}").unwrap();
        assert!(query.page.is_none());
    }
}
