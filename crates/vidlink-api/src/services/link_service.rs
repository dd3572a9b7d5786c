//! Link operations shared by the API, the import endpoint and the settings page.
//!
//! Every write path goes through the extractor and then through one store
//! call, so the create/update/delete rule lives in exactly one place
//! (`LinkChange::from_extraction`).

use std::sync::Arc;
use vidlink_core::models::{Event, LinkAction, LinkChange, LinkOutcome, Talk, VideoLink};
use vidlink_core::{
    extract_video_id, AppError, ExtractMode, ImportRecord, Recording, VideoRecordingProvider,
};
use vidlink_db::{LinkRepository, TalkDirectory};

const BLANK_VIDEO_ID: &str = "video_id may not be blank";

fn no_link(code: &str) -> AppError {
    AppError::NotFound(format!("No video link for submission '{}'", code))
}

#[derive(Clone)]
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    talks: Arc<dyn TalkDirectory>,
    recordings: VideoRecordingProvider,
}

impl LinkService {
    pub fn new(links: Arc<dyn LinkRepository>, talks: Arc<dyn TalkDirectory>) -> Self {
        Self {
            links,
            talks,
            recordings: VideoRecordingProvider,
        }
    }

    pub async fn find_event(&self, slug: &str) -> Result<Event, AppError> {
        self.talks
            .find_event(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event '{}' not found", slug)))
    }

    /// Talk addressed by URL path; unknown codes are a 404.
    pub async fn find_talk(&self, event: &Event, code: &str) -> Result<Talk, AppError> {
        self.talks
            .find_talk(event.id, code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Submission '{}' not found", code)))
    }

    /// Talk named in a request body; unknown codes are a 400.
    pub async fn talk_for_write(&self, event: &Event, code: &str) -> Result<Talk, AppError> {
        self.talks
            .find_talk(event.id, code.trim())
            .await?
            .ok_or_else(|| AppError::BadRequest(format!("Unknown submission '{}'", code.trim())))
    }

    pub async fn scheduled_talks(&self, event: &Event) -> Result<Vec<Talk>, AppError> {
        self.talks.scheduled_talks(event.id).await
    }

    pub async fn list(
        &self,
        event: &Event,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<VideoLink>, i64), AppError> {
        self.links.list(event.id, limit, offset).await
    }

    /// Every link of the event, for pre-filling forms.
    pub async fn all_links(&self, event: &Event) -> Result<Vec<VideoLink>, AppError> {
        let (links, _) = self.links.list(event.id, i64::MAX, 0).await?;
        Ok(links)
    }

    pub async fn get(&self, event: &Event, code: &str) -> Result<VideoLink, AppError> {
        self.links
            .get_by_submission(event.id, code)
            .await?
            .ok_or_else(|| no_link(code))
    }

    pub async fn recording(&self, event: &Event, code: &str) -> Result<Option<Recording>, AppError> {
        let link = self.links.get_by_submission(event.id, code).await?;
        Ok(self.recordings.recording(link.as_ref()))
    }

    /// Single-field form: strict URL parsing, a blank value removes the link.
    #[tracing::instrument(skip(self, talk, raw), fields(submission = %talk.code))]
    pub async fn set_from_form(&self, talk: &Talk, raw: &str) -> Result<LinkOutcome, AppError> {
        let video_id = extract_video_id(raw, ExtractMode::Strict)?;
        let outcome = self
            .links
            .apply(LinkChange::from_extraction(talk.clone(), video_id))
            .await?;
        tracing::info!(action = ?outcome.action, "Video link saved from form");
        Ok(outcome)
    }

    /// API create: relaxed parsing, creates or overwrites the talk's link.
    #[tracing::instrument(skip(self, talk, raw), fields(submission = %talk.code))]
    pub async fn create_or_update(&self, talk: &Talk, raw: &str) -> Result<LinkOutcome, AppError> {
        let video_id = extract_video_id(raw, ExtractMode::Relaxed)?
            .ok_or_else(|| AppError::InvalidInput(BLANK_VIDEO_ID.to_string()))?;
        let outcome = self.links.upsert(talk, &video_id).await?;
        tracing::info!(action = ?outcome.action, video_id = %video_id, "Video link stored");
        Ok(outcome)
    }

    /// API update of an existing link. A link removed concurrently is a 404,
    /// never silently recreated.
    #[tracing::instrument(skip(self, event, raw), fields(event = %event.slug))]
    pub async fn update_existing(
        &self,
        event: &Event,
        code: &str,
        raw: &str,
    ) -> Result<VideoLink, AppError> {
        self.get(event, code).await?;
        let talk = self.find_talk(event, code).await?;
        let video_id = extract_video_id(raw, ExtractMode::Relaxed)?
            .ok_or_else(|| AppError::InvalidInput(BLANK_VIDEO_ID.to_string()))?;
        let outcome = self
            .links
            .update_existing(&talk, &video_id)
            .await?
            .ok_or_else(|| no_link(code))?;
        tracing::info!(video_id = %video_id, "Video link updated");
        outcome
            .link
            .ok_or_else(|| AppError::Internal("Update returned no link".to_string()))
    }

    #[tracing::instrument(skip(self, event), fields(event = %event.slug))]
    pub async fn delete(&self, event: &Event, code: &str) -> Result<(), AppError> {
        let talk = self.find_talk(event, code).await?;
        let outcome = self.links.delete_for_talk(&talk).await?;
        if outcome.action == LinkAction::Unchanged {
            return Err(no_link(code));
        }
        tracing::info!("Video link deleted");
        Ok(())
    }

    /// Apply prepared changes as one batch.
    pub async fn apply_changes(&self, changes: Vec<LinkChange>) -> Result<Vec<LinkOutcome>, AppError> {
        if changes.is_empty() {
            return Ok(Vec::new());
        }
        self.links.apply_batch(changes).await
    }

    /// Bulk import. Every record is checked before anything is written; the
    /// first bad record fails the whole import and nothing is stored.
    #[tracing::instrument(skip(self, event, records), fields(event = %event.slug, records = records.len()))]
    pub async fn import(
        &self,
        event: &Event,
        records: Vec<ImportRecord>,
    ) -> Result<Vec<LinkOutcome>, AppError> {
        let changes = self.prepare_import(event, records).await?;
        let outcomes = self.apply_changes(changes).await?;
        tracing::info!(applied = outcomes.len(), "Import finished");
        Ok(outcomes)
    }

    async fn prepare_import(
        &self,
        event: &Event,
        records: Vec<ImportRecord>,
    ) -> Result<Vec<LinkChange>, AppError> {
        let mut changes = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let row = index + 1;
            let code = record.submission.trim();
            let talk = self.talks.find_talk(event.id, code).await?.ok_or_else(|| {
                AppError::InvalidInput(format!("Record {}: unknown submission '{}'", row, code))
            })?;
            let video_id = extract_video_id(&record.video_id, ExtractMode::Relaxed)
                .map_err(|e| AppError::InvalidInput(format!("Record {} ({}): {}", row, code, e)))?
                .ok_or_else(|| {
                    AppError::InvalidInput(format!("Record {} ({}): {}", row, code, BLANK_VIDEO_ID))
                })?;
            changes.push(LinkChange::Upsert { talk, video_id });
        }
        Ok(changes)
    }
}
