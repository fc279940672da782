use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::{
    error::StoreError,
    models::{Category, NewSubmission, Submission},
};

// 1. SubmissionStore Contract
/// SubmissionStore
///
/// The Resource Store: durable creation of pending submissions with store-assigned
/// ids and timestamps, plus the two collection-scoped queries the moderation queue
/// and the "my submissions" view need.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Persists a new submission, assigning `id` and `createdAt`.
    async fn add(&self, submission: NewSubmission) -> Result<Submission, StoreError>;

    /// All submissions still awaiting approval, newest first.
    async fn list_pending(&self) -> Result<Vec<Submission>, StoreError>;

    /// Submissions created by `user_id`, newest first.
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Submission>, StoreError>;
}

/// StorageState
///
/// The concrete type used to share the Resource Store across the application state.
pub type StorageState = Arc<dyn SubmissionStore>;

// 2. The Postgres Implementation
#[derive(FromRow)]
struct SubmissionRow {
    id: Uuid,
    name: String,
    description: String,
    icon: String,
    link: String,
    category: String,
    approved: bool,
    user_id: String,
    user_email: String,
    user_name: String,
    created_at: DateTime<Utc>,
}

impl From<SubmissionRow> for Submission {
    fn from(row: SubmissionRow) -> Self {
        Submission {
            id: row.id,
            name: row.name,
            description: row.description,
            icon: row.icon,
            link: row.link,
            category: Category::coerce(&row.category),
            approved: row.approved,
            user_id: row.user_id,
            user_email: row.user_email,
            user_name: row.user_name,
            created_at: row.created_at,
        }
    }
}

const SUBMISSION_COLUMNS: &str = "id, name, description, icon, link, category, approved, \
     user_id, user_email, user_name, created_at";

/// PostgresSubmissionStore
///
/// Writes to the `submissions` table. `created_at` comes from the database clock
/// (`DEFAULT now()`), never from the caller.
pub struct PostgresSubmissionStore {
    pool: PgPool,
}

impl PostgresSubmissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `submissions` table if it is missing. Local mode only.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS submissions (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                icon TEXT NOT NULL DEFAULT '',
                link TEXT NOT NULL,
                category TEXT NOT NULL,
                approved BOOLEAN NOT NULL DEFAULT false,
                user_id TEXT NOT NULL,
                user_email TEXT NOT NULL DEFAULT '',
                user_name TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for PostgresSubmissionStore {
    async fn add(&self, submission: NewSubmission) -> Result<Submission, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO submissions
                (id, name, description, icon, link, category, approved, user_id, user_email, user_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {SUBMISSION_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, SubmissionRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&submission.name)
            .bind(&submission.description)
            .bind(&submission.icon)
            .bind(&submission.link)
            .bind(submission.category.as_str())
            .bind(submission.approved)
            .bind(&submission.user_id)
            .bind(&submission.user_email)
            .bind(&submission.user_name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("add submission error: {:?}", e);
                StoreError::from(e)
            })?;

        Ok(row.into())
    }

    async fn list_pending(&self) -> Result<Vec<Submission>, StoreError> {
        let sql = format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE approved = false ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, SubmissionRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from)?;
        Ok(rows.into_iter().map(Submission::from).collect())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Submission>, StoreError> {
        let sql = format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE user_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, SubmissionRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from)?;
        Ok(rows.into_iter().map(Submission::from).collect())
    }
}

// 3. The In-Memory Implementation (local runs and tests)
/// InMemorySubmissionStore
///
/// Volatile Resource Store. `fail_with` makes every write fail with the given
/// error, which is how the workflow's failure paths are exercised in tests.
#[derive(Default)]
pub struct InMemorySubmissionStore {
    records: Mutex<Vec<Submission>>,
    fail_with: Option<StoreError>,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing(error: StoreError) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail_with: Some(error),
        }
    }

    /// Number of successfully written records.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every record in write order.
    pub fn records(&self) -> Vec<Submission> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Submission>> {
        // A poisoned lock only means a panicking test thread; the data is still usable.
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn add(&self, submission: NewSubmission) -> Result<Submission, StoreError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        let record = Submission::from_new(submission, Uuid::new_v4(), Utc::now());
        self.lock().push(record.clone());
        Ok(record)
    }

    async fn list_pending(&self) -> Result<Vec<Submission>, StoreError> {
        let mut pending: Vec<Submission> =
            self.lock().iter().filter(|s| !s.approved).cloned().collect();
        pending.reverse();
        Ok(pending)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Submission>, StoreError> {
        let mut mine: Vec<Submission> = self
            .lock()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        mine.reverse();
        Ok(mine)
    }
}
