//! Registration and login handlers

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{hash_password, validate_password, verify_password, TokenSigner};
use crate::domain::DomainError;
use crate::error::AppError;

use super::{LoginCommand, LoginResult, RegisterCommand, UserRecord};

/// Handler for user registration
pub struct RegisterHandler {
    pool: PgPool,
}

impl RegisterHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Execute the register command
    pub async fn execute(&self, command: RegisterCommand) -> Result<UserRecord, AppError> {
        let name = command.name.trim();
        if name.is_empty() {
            return Err(DomainError::MissingField("name").into());
        }

        let email = normalize_email(&command.email)?;
        validate_password(&command.password)?;

        // Pre-check for a friendlier error; the unique index is the backstop
        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(&email)
                .fetch_optional(&self.pool)
                .await?;

        if existing.is_some() {
            return Err(AppError::DuplicateEmail(email));
        }

        let password_hash = hash_password(&command.password)?;

        let user: UserRecord = sqlx::query_as(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id, name, email
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(&email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::on_unique_violation(e, AppError::DuplicateEmail(email.clone())))?;

        tracing::info!("User registered: {}", user.id);

        Ok(user)
    }
}

/// Handler for user authentication
pub struct LoginHandler {
    pool: PgPool,
    tokens: TokenSigner,
}

impl LoginHandler {
    pub fn new(pool: PgPool, tokens: TokenSigner) -> Self {
        Self { pool, tokens }
    }

    /// Execute the login command, issuing a signed credential on success
    pub async fn execute(&self, command: LoginCommand) -> Result<LoginResult, AppError> {
        let email = normalize_email(&command.email)?;

        let row: Option<(Uuid, String, String, String)> = sqlx::query_as(
            "SELECT id, name, email, password_hash FROM users WHERE email = $1",
        )
        .bind(&email)
        .fetch_optional(&self.pool)
        .await?;

        let (id, name, email, password_hash) =
            row.ok_or_else(|| AppError::UserNotFound(email.clone()))?;

        if !verify_password(&command.password, &password_hash) {
            return Err(AppError::Unauthenticated("Invalid password".to_string()));
        }

        let token = self
            .tokens
            .issue(id, &name, &email)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(LoginResult {
            token,
            user: UserRecord { id, name, email },
        })
    }
}

/// Trim and lowercase an email, rejecting obviously malformed values
fn normalize_email(raw: &str) -> Result<String, DomainError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(DomainError::MissingField("email"));
    }

    // Cheap shape check: one '@' with non-empty local part and a dotted domain
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
        }
        None => false,
    };

    if !valid {
        return Err(DomainError::InvalidEmail(email));
    }

    Ok(email)
}
