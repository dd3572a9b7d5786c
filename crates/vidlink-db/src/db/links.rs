use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use vidlink_core::models::{LinkAction, LinkChange, LinkOutcome, Talk, VideoLink};
use vidlink_core::AppError;

use super::transaction::TransactionGuard;

/// Store of the one-to-one talk to video association.
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Link of the talk with `code` in the event, if any.
    async fn get_by_submission(
        &self,
        event_id: Uuid,
        code: &str,
    ) -> Result<Option<VideoLink>, AppError>;

    /// One page of the event's links ordered by talk code, plus the total count.
    async fn list(
        &self,
        event_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<VideoLink>, i64), AppError>;

    /// Create the talk's link or overwrite its identifier, atomically.
    async fn upsert(&self, talk: &Talk, video_id: &str) -> Result<LinkOutcome, AppError>;

    /// Overwrite the identifier of the talk's existing link; `None` when it has none.
    async fn update_existing(
        &self,
        talk: &Talk,
        video_id: &str,
    ) -> Result<Option<LinkOutcome>, AppError>;

    /// Remove the talk's link. Reports `Unchanged` when there was none.
    async fn delete_for_talk(&self, talk: &Talk) -> Result<LinkOutcome, AppError>;

    /// Apply all changes, in order, or none of them.
    async fn apply_batch(&self, changes: Vec<LinkChange>) -> Result<Vec<LinkOutcome>, AppError>;

    /// Check the store can serve requests.
    async fn ping(&self) -> Result<(), AppError>;

    async fn apply(&self, change: LinkChange) -> Result<LinkOutcome, AppError> {
        match change {
            LinkChange::Upsert { talk, video_id } => self.upsert(&talk, &video_id).await,
            LinkChange::Delete { talk } => self.delete_for_talk(&talk).await,
        }
    }
}

/// Row returned by the upsert, before the talk code is attached.
#[derive(sqlx::FromRow)]
struct StoredLink {
    id: Uuid,
    submission_id: Uuid,
    video_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    created: bool,
}

impl StoredLink {
    fn into_outcome(self, talk: &Talk) -> LinkOutcome {
        let action = if self.created {
            LinkAction::Created
        } else {
            LinkAction::Updated
        };
        LinkOutcome {
            submission_code: talk.code.clone(),
            action,
            link: Some(VideoLink {
                id: self.id,
                event_id: talk.event_id,
                submission_id: self.submission_id,
                submission_code: talk.code.clone(),
                video_id: self.video_id,
                created_at: self.created_at,
                updated_at: self.updated_at,
            }),
        }
    }
}

fn deleted_outcome(talk: &Talk, rows_affected: u64) -> LinkOutcome {
    LinkOutcome {
        submission_code: talk.code.clone(),
        action: if rows_affected > 0 {
            LinkAction::Deleted
        } else {
            LinkAction::Unchanged
        },
        link: None,
    }
}

// `xmax = 0` holds only for a freshly inserted row version, which tells an
// insert apart from the conflict update without a second query.
async fn upsert_with<'e, E>(executor: E, talk: &Talk, video_id: &str) -> Result<LinkOutcome, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let stored = sqlx::query_as::<Postgres, StoredLink>(
        r#"
        INSERT INTO video_links (submission_id, video_id)
        VALUES ($1, $2)
        ON CONFLICT (submission_id)
        DO UPDATE SET video_id = EXCLUDED.video_id, updated_at = NOW()
        RETURNING id, submission_id, video_id, created_at, updated_at, (xmax = 0) AS created
        "#,
    )
    .bind(talk.id)
    .bind(video_id)
    .fetch_one(executor)
    .await?;

    Ok(stored.into_outcome(talk))
}

async fn delete_with<'e, E>(executor: E, talk: &Talk) -> Result<LinkOutcome, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query("DELETE FROM video_links WHERE submission_id = $1")
        .bind(talk.id)
        .execute(executor)
        .await?;

    Ok(deleted_outcome(talk, result.rows_affected()))
}

/// Postgres-backed link store
#[derive(Clone)]
pub struct PgLinkRepository {
    pool: PgPool,
}

impl PgLinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    #[tracing::instrument(skip(self), fields(db.table = "video_links", db.operation = "select"))]
    async fn get_by_submission(
        &self,
        event_id: Uuid,
        code: &str,
    ) -> Result<Option<VideoLink>, AppError> {
        let link = sqlx::query_as::<Postgres, VideoLink>(
            r#"
            SELECT l.id, s.event_id, l.submission_id, s.code AS submission_code,
                   l.video_id, l.created_at, l.updated_at
            FROM video_links l
            JOIN submissions s ON s.id = l.submission_id
            WHERE s.event_id = $1 AND s.code = $2
            "#,
        )
        .bind(event_id)
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(link)
    }

    #[tracing::instrument(skip(self), fields(db.table = "video_links", db.operation = "select"))]
    async fn list(
        &self,
        event_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<VideoLink>, i64), AppError> {
        let links = sqlx::query_as::<Postgres, VideoLink>(
            r#"
            SELECT l.id, s.event_id, l.submission_id, s.code AS submission_code,
                   l.video_id, l.created_at, l.updated_at
            FROM video_links l
            JOIN submissions s ON s.id = l.submission_id
            WHERE s.event_id = $1
            ORDER BY s.code ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(event_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<Postgres, i64>(
            r#"
            SELECT COUNT(*)
            FROM video_links l
            JOIN submissions s ON s.id = l.submission_id
            WHERE s.event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((links, total))
    }

    #[tracing::instrument(skip(self, talk), fields(db.table = "video_links", db.operation = "upsert", submission = %talk.code))]
    async fn upsert(&self, talk: &Talk, video_id: &str) -> Result<LinkOutcome, AppError> {
        upsert_with(&self.pool, talk, video_id).await
    }

    #[tracing::instrument(skip(self, talk), fields(db.table = "video_links", db.operation = "update", submission = %talk.code))]
    async fn update_existing(
        &self,
        talk: &Talk,
        video_id: &str,
    ) -> Result<Option<LinkOutcome>, AppError> {
        let stored = sqlx::query_as::<Postgres, StoredLink>(
            r#"
            UPDATE video_links
            SET video_id = $2, updated_at = NOW()
            WHERE submission_id = $1
            RETURNING id, submission_id, video_id, created_at, updated_at, FALSE AS created
            "#,
        )
        .bind(talk.id)
        .bind(video_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(stored.map(|s| s.into_outcome(talk)))
    }

    #[tracing::instrument(skip(self, talk), fields(db.table = "video_links", db.operation = "delete", submission = %talk.code))]
    async fn delete_for_talk(&self, talk: &Talk) -> Result<LinkOutcome, AppError> {
        delete_with(&self.pool, talk).await
    }

    #[tracing::instrument(skip(self, changes), fields(db.table = "video_links", db.operation = "batch", batch_size = changes.len()))]
    async fn apply_batch(&self, changes: Vec<LinkChange>) -> Result<Vec<LinkOutcome>, AppError> {
        let mut tx = TransactionGuard::begin(&self.pool, "apply_link_batch").await?;
        let mut outcomes = Vec::with_capacity(changes.len());

        for change in &changes {
            let outcome = match change {
                LinkChange::Upsert { talk, video_id } => {
                    upsert_with(tx.conn(), talk, video_id).await
                }
                LinkChange::Delete { talk } => delete_with(tx.conn(), talk).await,
            };
            match outcome {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    tracing::warn!(error = %e, submission = %change.talk().code, "Link batch failed, rolling back");
                    tx.rollback().await?;
                    return Err(e);
                }
            }
        }

        tx.commit().await?;
        Ok(outcomes)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
