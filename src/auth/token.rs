//! Opaque bearer tokens.
//!
//! Tokens are random 64-hex-character strings persisted in `api_tokens` and
//! resolved back to their user by a single lookup. They carry no embedded
//! claims and never expire; revocation means deleting the row. A user may
//! hold several tokens at once since every login mints a fresh one.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::User;

/// Name recorded next to each minted token.
const TOKEN_NAME: &str = "api_token";

/// Builds a new opaque token string from two UUIDv4s worth of randomness.
pub fn generate_api_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Mints a token for `user_id`, persists it, and returns the plain text.
pub async fn issue(pool: &PgPool, user_id: i32) -> Result<String, AppError> {
    let token = generate_api_token();

    sqlx::query("INSERT INTO api_tokens (user_id, name, token) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(TOKEN_NAME)
        .bind(&token)
        .execute(pool)
        .await?;

    Ok(token)
}

/// Resolves a bearer token to its user. `None` means the token is unknown.
pub async fn resolve(pool: &PgPool, token: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT u.id, u.name, u.email, u.created_at, u.updated_at \
         FROM api_tokens t \
         JOIN users u ON u.id = t.user_id \
         WHERE t.token = $1",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
