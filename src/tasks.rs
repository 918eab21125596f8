//! The task service.
//!
//! Five operations, each taking the resolved caller identity as an explicit
//! argument. The service validates payloads, enforces ownership, and drives
//! the store; handlers only deserialize and wrap responses.
//!
//! Every operation is scoped to the caller: listing returns only the
//! caller's tasks, and a task id owned by someone else answers NotFound so
//! existence is not leaked. Updates never touch `owner_id`, whatever the
//! payload says.

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskOwnerRow, TaskWithOwner, User};
use crate::validation::{validate_task_payload, Mode, TaskChanges};

const TASK_COLUMNS: &str =
    "id, title, description, status, priority, due_date, owner_id, created_at, updated_at";

const TASK_OWNER_SELECT: &str =
    "SELECT t.id, t.title, t.description, t.status, t.priority, t.due_date, t.owner_id, \
            t.created_at, t.updated_at, \
            u.name AS owner_name, u.email AS owner_email, \
            u.created_at AS owner_created_at, u.updated_at AS owner_updated_at \
     FROM tasks t \
     JOIN users u ON u.id = t.owner_id";

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// All of the caller's tasks, owner eagerly joined, newest first.
pub async fn list(pool: &PgPool, caller: &User) -> Result<Vec<TaskWithOwner>, AppError> {
    let sql = format!(
        "{} WHERE t.owner_id = $1 ORDER BY t.created_at DESC",
        TASK_OWNER_SELECT
    );
    let rows = sqlx::query_as::<_, TaskOwnerRow>(&sql)
        .bind(caller.id)
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(TaskOwnerRow::into_task_with_owner)
        .collect())
}

/// Validates `payload` strictly and inserts a task owned by the caller.
///
/// Omitted status and priority fall back to `pending` and `medium`.
pub async fn create(pool: &PgPool, caller: &User, payload: &Value) -> Result<TaskWithOwner, AppError> {
    let mut changes = validate_task_payload(payload, Mode::Strict)?;
    let title = changes
        .title
        .take()
        .ok_or_else(|| AppError::Internal("strict validation passed without a title".into()))?;

    let sql = format!(
        "INSERT INTO tasks (id, title, description, status, priority, due_date, owner_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {}",
        TASK_COLUMNS
    );
    let task = sqlx::query_as::<_, Task>(&sql)
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(changes.description.flatten())
        .bind(changes.status.unwrap_or_default())
        .bind(changes.priority.unwrap_or_default())
        .bind(changes.due_date.flatten())
        .bind(caller.id)
        .fetch_one(pool)
        .await?;

    Ok(TaskWithOwner {
        task,
        owner: Some(caller.clone()),
    })
}

/// The caller's task by id, owner joined.
pub async fn get(pool: &PgPool, caller: &User, task_id: Uuid) -> Result<TaskWithOwner, AppError> {
    fetch_owned(pool, caller, task_id)
        .await?
        .ok_or_else(task_not_found)
}

/// Partial update: validates only the supplied fields and writes only those
/// columns. An empty payload leaves the row as-is and returns it unchanged.
pub async fn update(
    pool: &PgPool,
    caller: &User,
    task_id: Uuid,
    payload: &Value,
) -> Result<TaskWithOwner, AppError> {
    let existing = fetch_owned(pool, caller, task_id)
        .await?
        .ok_or_else(task_not_found)?;

    let changes = validate_task_payload(payload, Mode::Partial)?;
    if changes.is_empty() {
        return Ok(existing);
    }

    let sql = update_statement(&changes);
    let mut query = sqlx::query_as::<_, Task>(&sql);
    if let Some(title) = &changes.title {
        query = query.bind(title);
    }
    if let Some(description) = &changes.description {
        query = query.bind(description);
    }
    if let Some(status) = changes.status {
        query = query.bind(status);
    }
    if let Some(priority) = changes.priority {
        query = query.bind(priority);
    }
    if let Some(due_date) = &changes.due_date {
        query = query.bind(due_date);
    }

    let task = query
        .bind(task_id)
        .bind(caller.id)
        .fetch_optional(pool)
        .await?
        // The row can vanish between the ownership fetch and the write.
        .ok_or_else(task_not_found)?;

    Ok(TaskWithOwner {
        task,
        owner: existing.owner,
    })
}

/// Hard delete of the caller's task.
pub async fn delete(pool: &PgPool, caller: &User, task_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
        .bind(task_id)
        .bind(caller.id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(task_not_found());
    }

    Ok(())
}

async fn fetch_owned(
    pool: &PgPool,
    caller: &User,
    task_id: Uuid,
) -> Result<Option<TaskWithOwner>, AppError> {
    let sql = format!("{} WHERE t.id = $1 AND t.owner_id = $2", TASK_OWNER_SELECT);
    let row = sqlx::query_as::<_, TaskOwnerRow>(&sql)
        .bind(task_id)
        .bind(caller.id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(TaskOwnerRow::into_task_with_owner))
}

/// Builds the UPDATE statement for a change set. Placeholders are numbered
/// in field-table order; the trailing two are the task id and the owner id.
/// The binds in [`update`] must mirror this order exactly.
fn update_statement(changes: &TaskChanges) -> String {
    let mut sets: Vec<String> = Vec::new();
    let mut param = 1;

    if changes.title.is_some() {
        sets.push(format!("title = ${}", param));
        param += 1;
    }
    if changes.description.is_some() {
        sets.push(format!("description = ${}", param));
        param += 1;
    }
    if changes.status.is_some() {
        sets.push(format!("status = ${}", param));
        param += 1;
    }
    if changes.priority.is_some() {
        sets.push(format!("priority = ${}", param));
        param += 1;
    }
    if changes.due_date.is_some() {
        sets.push(format!("due_date = ${}", param));
        param += 1;
    }
    sets.push("updated_at = now()".to_string());

    format!(
        "UPDATE tasks SET {} WHERE id = ${} AND owner_id = ${} RETURNING {}",
        sets.join(", "),
        param,
        param + 1,
        TASK_COLUMNS
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskPriority, TaskStatus};
    use pretty_assertions::assert_eq;

    #[test]
    fn update_statement_numbers_params_for_a_full_change_set() {
        let changes = TaskChanges {
            title: Some("t".into()),
            description: Some(Some("d".into())),
            status: Some(TaskStatus::Completed),
            priority: Some(TaskPriority::High),
            due_date: Some(None),
        };
        let sql = update_statement(&changes);
        assert_eq!(
            sql,
            format!(
                "UPDATE tasks SET title = $1, description = $2, status = $3, \
                 priority = $4, due_date = $5, updated_at = now() \
                 WHERE id = $6 AND owner_id = $7 RETURNING {}",
                TASK_COLUMNS
            )
        );
    }

    #[test]
    fn update_statement_skips_absent_fields() {
        let changes = TaskChanges {
            status: Some(TaskStatus::InProgress),
            ..TaskChanges::default()
        };
        let sql = update_statement(&changes);
        assert_eq!(
            sql,
            format!(
                "UPDATE tasks SET status = $1, updated_at = now() \
                 WHERE id = $2 AND owner_id = $3 RETURNING {}",
                TASK_COLUMNS
            )
        );
        let set_clause = sql.split("WHERE").next().unwrap();
        assert!(!set_clause.contains("title"));
        assert!(!set_clause.contains("owner_id"));
    }

    #[test]
    fn update_statement_never_sets_owner_id() {
        // owner_id appears only in the WHERE clause, for any change set.
        let changes = TaskChanges {
            title: Some("hijack".into()),
            ..TaskChanges::default()
        };
        let sql = update_statement(&changes);
        let set_clause = sql.split("WHERE").next().unwrap();
        assert!(!set_clause.contains("owner_id"));
    }
}
