use actix_web::{post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    auth::{hash_password, token, verify_password, LoginRequest, RegisterRequest},
    error::AppError,
    models::{User, UserRecord},
    resources::UserResource,
};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

/// Exchanges credentials for a bearer token.
///
/// Unknown email and wrong password fail identically so the endpoint cannot
/// be used to probe which addresses have accounts.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
    let record = sqlx::query_as::<_, UserRecord>(&sql)
        .bind(&login_data.email)
        .fetch_optional(&**pool)
        .await?;

    let Some(record) = record else {
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&login_data.password, &record.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let user = record.into_user();
    let bearer = token::issue(&pool, user.id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Login successful",
        "user": UserResource::from_user(&user),
        "token": bearer
    })))
}

/// Creates an account and logs it in.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM users WHERE email = $1")
        .bind(&register_data.email)
        .fetch_optional(&**pool)
        .await?;

    if existing.is_some() {
        let mut errors = ValidationErrors::new();
        let mut error = ValidationError::new("unique");
        error.message = Some("The email has already been taken.".into());
        errors.add("email", error);
        return Err(AppError::Validation(errors));
    }

    let password_hash = hash_password(&register_data.password)?;

    let sql = format!(
        "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
        USER_COLUMNS
    );
    let user: User = sqlx::query_as::<_, UserRecord>(&sql)
        .bind(&register_data.name)
        .bind(&register_data.email)
        .bind(&password_hash)
        .fetch_one(&**pool)
        .await?
        .into_user();

    let bearer = token::issue(&pool, user.id).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "User registered successfully",
        "user": UserResource::from_user(&user),
        "token": bearer
    })))
}
