use actix_web::{delete, get, post, route, web, HttpResponse, Responder};
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{auth::AuthenticatedUser, error::AppError, resources::TaskResource, tasks};

/// Lists the caller's tasks, owners attached.
#[get("")]
pub async fn list_tasks(
    pool: web::Data<PgPool>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = tasks::list(&pool, &caller.0).await?;

    let body: Vec<TaskResource> = tasks.iter().map(TaskResource::from_task_with_owner).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Creates a task owned by the caller.
///
/// The body is taken as a raw JSON object so the validation layer can tell
/// absent fields from explicit nulls; field errors answer 422.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    caller: AuthenticatedUser,
    payload: web::Json<Value>,
) -> Result<impl Responder, AppError> {
    let created = tasks::create(&pool, &caller.0, &payload).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Task created successfully!",
        "task": TaskResource::from_task_with_owner(&created)
    })))
}

/// Fetches one of the caller's tasks by id.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    caller: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let found = tasks::get(&pool, &caller.0, task_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(TaskResource::from_task_with_owner(&found)))
}

/// Partially updates one of the caller's tasks. PUT and PATCH behave the
/// same: only supplied fields change.
#[route("/{id}", method = "PUT", method = "PATCH")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    caller: AuthenticatedUser,
    task_id: web::Path<Uuid>,
    payload: web::Json<Value>,
) -> Result<impl Responder, AppError> {
    let updated = tasks::update(&pool, &caller.0, task_id.into_inner(), &payload).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task updated successfully",
        "task": TaskResource::from_task_with_owner(&updated)
    })))
}

/// Permanently deletes one of the caller's tasks.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    caller: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    tasks::delete(&pool, &caller.0, task_id.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}
