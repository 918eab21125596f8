//! Wire projections.
//!
//! Internal records never serialize straight onto the wire; these resource
//! structs are the only shapes clients see. Timestamps are rendered with a
//! fixed pattern (`YYYY-MM-DD HH:MM:SS`, UTC) rather than whatever the
//! serializer would pick, and the owner sub-object only appears when the
//! association was eagerly loaded by the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Task, TaskPriority, TaskStatus, TaskWithOwner, User};

/// Fixed wire format for all timestamps.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Public projection of a user. The password hash is structurally absent.
#[derive(Debug, Serialize)]
pub struct UserResource {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl UserResource {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: format_datetime(&user.created_at),
            updated_at: format_datetime(&user.updated_at),
        }
    }
}

/// Wire shape of a task.
///
/// `owner` is skipped entirely when the association was not loaded; a null
/// owner reference is never an error here.
#[derive(Debug, Serialize)]
pub struct TaskResource {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<String>,
    pub owner_id: i32,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserResource>,
}

impl TaskResource {
    pub fn from_task(task: &Task, owner: Option<&User>) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            due_date: task.due_date.as_ref().map(format_datetime),
            owner_id: task.owner_id,
            created_at: format_datetime(&task.created_at),
            updated_at: format_datetime(&task.updated_at),
            owner: owner.map(UserResource::from_user),
        }
    }

    pub fn from_task_with_owner(with_owner: &TaskWithOwner) -> Self {
        Self::from_task(&with_owner.task, with_owner.owner.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_user() -> User {
        User {
            id: 1,
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
        }
    }

    fn sample_task() -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "Buy milk".to_string(),
            description: Some("Semi-skimmed".to_string()),
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            due_date: Some(Utc.with_ymd_and_hms(2026, 8, 15, 17, 30, 0).unwrap()),
            owner_id: 1,
            created_at: Utc.with_ymd_and_hms(2026, 8, 7, 9, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 8, 7, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn timestamps_use_the_fixed_pattern() {
        let resource = TaskResource::from_task(&sample_task(), None);
        assert_eq!(resource.created_at, "2026-08-07 09:00:00");
        assert_eq!(resource.updated_at, "2026-08-07 10:00:00");
        assert_eq!(resource.due_date.as_deref(), Some("2026-08-15 17:30:00"));
    }

    #[test]
    fn subsecond_precision_is_truncated() {
        let mut task = sample_task();
        task.due_date = Some(
            Utc.with_ymd_and_hms(2026, 8, 15, 17, 30, 0).unwrap()
                + chrono::Duration::milliseconds(987),
        );
        let resource = TaskResource::from_task(&task, None);
        assert_eq!(resource.due_date.as_deref(), Some("2026-08-15 17:30:00"));
    }

    #[test]
    fn missing_owner_omits_the_key_and_missing_due_date_is_null() {
        let mut task = sample_task();
        task.due_date = None;
        let value = serde_json::to_value(TaskResource::from_task(&task, None)).unwrap();

        assert!(value.get("owner").is_none());
        assert_eq!(value["due_date"], json!(null));
        assert_eq!(value["owner_id"], json!(1));
        assert_eq!(value["status"], json!("pending"));
        assert_eq!(value["priority"], json!("medium"));
    }

    #[test]
    fn loaded_owner_projects_public_fields_only() {
        let user = sample_user();
        let value =
            serde_json::to_value(TaskResource::from_task(&sample_task(), Some(&user))).unwrap();

        let owner = &value["owner"];
        assert_eq!(owner["id"], json!(1));
        assert_eq!(owner["name"], json!("Test User"));
        assert_eq!(owner["email"], json!("test@example.com"));
        assert_eq!(owner["created_at"], json!("2026-08-01 12:00:00"));
        assert!(owner.get("password").is_none());
        assert!(owner.get("password_hash").is_none());
    }
}
