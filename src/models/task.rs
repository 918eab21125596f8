use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::user::User;

/// Status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet. The default for new tasks.
    Pending,
    /// Currently being worked on.
    InProgress,
    /// Finished.
    Completed,
    /// Abandoned without completion.
    Cancelled,
}

impl TaskStatus {
    /// Wire names, in declaration order.
    pub const NAMES: [&'static str; 4] = ["pending", "in_progress", "completed", "cancelled"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Priority of a task.
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub const NAMES: [&'static str; 4] = ["low", "medium", "high", "urgent"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

/// A task record as stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier (UUID v4), assigned at creation and never reused.
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    /// The user who created the task. Set once, never mutated by updates.
    pub owner_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A task together with its eagerly loaded owner.
///
/// The owner is optional by construction so the projector never has to guess
/// whether the association was loaded.
#[derive(Debug, Clone)]
pub struct TaskWithOwner {
    pub task: Task,
    pub owner: Option<User>,
}

/// Flat row produced by the tasks-join-users queries.
#[derive(Debug, FromRow)]
pub struct TaskOwnerRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub owner_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_created_at: DateTime<Utc>,
    pub owner_updated_at: DateTime<Utc>,
}

impl TaskOwnerRow {
    pub fn into_task_with_owner(self) -> TaskWithOwner {
        let owner = User {
            id: self.owner_id,
            name: self.owner_name,
            email: self.owner_email,
            created_at: self.owner_created_at,
            updated_at: self.owner_updated_at,
        };
        TaskWithOwner {
            task: Task {
                id: self.id,
                title: self.title,
                description: self.description,
                status: self.status,
                priority: self.priority,
                due_date: self.due_date,
                owner_id: self.owner_id,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            owner: Some(owner),
        }
    }
}
