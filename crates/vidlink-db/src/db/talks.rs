use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;
use vidlink_core::models::{Event, Talk};
use vidlink_core::AppError;

/// Read access to the host application's events and talks.
#[async_trait]
pub trait TalkDirectory: Send + Sync {
    async fn find_event(&self, slug: &str) -> Result<Option<Event>, AppError>;

    async fn find_talk(&self, event_id: Uuid, code: &str) -> Result<Option<Talk>, AppError>;

    /// Talks in the event's current schedule, ordered by title then code.
    async fn scheduled_talks(&self, event_id: Uuid) -> Result<Vec<Talk>, AppError>;
}

/// Talk directory over the host's `events` and `submissions` tables
#[derive(Clone)]
pub struct PgTalkDirectory {
    pool: PgPool,
}

impl PgTalkDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TalkDirectory for PgTalkDirectory {
    #[tracing::instrument(skip(self), fields(db.table = "events", db.operation = "select"))]
    async fn find_event(&self, slug: &str) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<Postgres, Event>(
            "SELECT id, slug, name, has_schedule FROM events WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    #[tracing::instrument(skip(self), fields(db.table = "submissions", db.operation = "select"))]
    async fn find_talk(&self, event_id: Uuid, code: &str) -> Result<Option<Talk>, AppError> {
        let talk = sqlx::query_as::<Postgres, Talk>(
            "SELECT id, event_id, code, title, scheduled FROM submissions WHERE event_id = $1 AND code = $2",
        )
        .bind(event_id)
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(talk)
    }

    #[tracing::instrument(skip(self), fields(db.table = "submissions", db.operation = "select"))]
    async fn scheduled_talks(&self, event_id: Uuid) -> Result<Vec<Talk>, AppError> {
        let talks = sqlx::query_as::<Postgres, Talk>(
            r#"
            SELECT id, event_id, code, title, scheduled
            FROM submissions
            WHERE event_id = $1 AND scheduled
            ORDER BY title ASC, code ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(talks)
    }
}
