//! Development seeder.
//!
//! Applies migrations, then inserts the canonical test account plus a small
//! set of demo users and sample tasks. Safe to run repeatedly: users are
//! keyed by email and skipped when already present, and tasks are only
//! seeded for users created by this run.

use chrono::{Duration, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use tasknest::auth::hash_password;
use tasknest::config::Config;
use tasknest::models::{TaskPriority, TaskStatus};

const DEMO_USERS: [(&str, &str); 3] = [
    ("Ada Fowler", "ada@example.com"),
    ("Marcus Webb", "marcus@example.com"),
    ("Priya Nair", "priya@example.com"),
];

const SAMPLE_TITLES: [&str; 8] = [
    "Book dentist appointment",
    "Renew passport",
    "Write quarterly summary",
    "Fix leaking tap",
    "Plan weekend trip",
    "Review insurance policy",
    "Clear out the garage",
    "Prepare talk slides",
];

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    let test_user_id = seed_user(&pool, "Test User", "test@example.com", "password").await;

    let mut seeded_ids = Vec::new();
    if let Some(id) = test_user_id {
        seeded_ids.push(id);
    }
    for (name, email) in DEMO_USERS {
        if let Some(id) = seed_user(&pool, name, email, "password").await {
            seeded_ids.push(id);
        }
    }

    let statuses = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];
    let priorities = [
        TaskPriority::Low,
        TaskPriority::Medium,
        TaskPriority::High,
        TaskPriority::Urgent,
    ];

    let mut task_count = 0;
    for (i, title) in SAMPLE_TITLES.iter().enumerate() {
        for (j, owner_id) in seeded_ids.iter().enumerate() {
            let due_date = Utc::now() + Duration::days((i as i64 + j as i64) % 30 + 1);
            sqlx::query(
                "INSERT INTO tasks (id, title, description, status, priority, due_date, owner_id) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(Uuid::new_v4())
            .bind(title)
            .bind(format!("Sample task seeded for development: {}", title))
            .bind(statuses[(i + j) % statuses.len()])
            .bind(priorities[(i * 3 + j) % priorities.len()])
            .bind(due_date)
            .bind(owner_id)
            .execute(&pool)
            .await
            .expect("Failed to seed task");
            task_count += 1;
        }
    }

    log::info!(
        "seeding complete: {} new users, {} tasks",
        seeded_ids.len(),
        task_count
    );
}

/// Inserts a user unless the email is already taken. Returns the new id,
/// or `None` when the user already existed.
async fn seed_user(pool: &PgPool, name: &str, email: &str, password: &str) -> Option<i32> {
    let password_hash = hash_password(password).expect("Failed to hash seed password");

    sqlx::query_scalar::<_, i32>(
        "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) \
         ON CONFLICT (email) DO NOTHING \
         RETURNING id",
    )
    .bind(name)
    .bind(email)
    .bind(&password_hash)
    .fetch_optional(pool)
    .await
    .expect("Failed to seed user")
}
