//! In-memory store implementations
//!
//! Used by the `memory` backend and by tests that run without a database.
//! Each map sits behind one mutex, so every operation is atomic.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;
use vidlink_core::models::{Event, LinkAction, LinkChange, LinkOutcome, Talk, VideoLink};
use vidlink_core::AppError;

use super::links::LinkRepository;
use super::talks::TalkDirectory;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

type LinkMap = HashMap<Uuid, VideoLink>;

/// Link store keyed by talk id
#[derive(Clone, Default)]
pub struct InMemoryLinkRepository {
    links: Arc<Mutex<LinkMap>>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links across all events.
    pub fn len(&self) -> usize {
        lock(&self.links).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn upsert_in(links: &mut LinkMap, talk: &Talk, video_id: &str) -> LinkOutcome {
        let now = Utc::now();
        let action = match links.get_mut(&talk.id) {
            Some(existing) => {
                existing.video_id = video_id.to_string();
                existing.updated_at = now;
                LinkAction::Updated
            }
            None => {
                links.insert(
                    talk.id,
                    VideoLink {
                        id: Uuid::new_v4(),
                        event_id: talk.event_id,
                        submission_id: talk.id,
                        submission_code: talk.code.clone(),
                        video_id: video_id.to_string(),
                        created_at: now,
                        updated_at: now,
                    },
                );
                LinkAction::Created
            }
        };
        LinkOutcome {
            submission_code: talk.code.clone(),
            action,
            link: links.get(&talk.id).cloned(),
        }
    }

    fn delete_in(links: &mut LinkMap, talk: &Talk) -> LinkOutcome {
        let action = match links.remove(&talk.id) {
            Some(_) => LinkAction::Deleted,
            None => LinkAction::Unchanged,
        };
        LinkOutcome {
            submission_code: talk.code.clone(),
            action,
            link: None,
        }
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn get_by_submission(
        &self,
        event_id: Uuid,
        code: &str,
    ) -> Result<Option<VideoLink>, AppError> {
        Ok(lock(&self.links)
            .values()
            .find(|l| l.event_id == event_id && l.submission_code == code)
            .cloned())
    }

    async fn list(
        &self,
        event_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<VideoLink>, i64), AppError> {
        let mut links: Vec<VideoLink> = lock(&self.links)
            .values()
            .filter(|l| l.event_id == event_id)
            .cloned()
            .collect();
        links.sort_by(|a, b| a.submission_code.cmp(&b.submission_code));

        let total = links.len() as i64;
        let page = links
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn upsert(&self, talk: &Talk, video_id: &str) -> Result<LinkOutcome, AppError> {
        Ok(Self::upsert_in(&mut lock(&self.links), talk, video_id))
    }

    async fn update_existing(
        &self,
        talk: &Talk,
        video_id: &str,
    ) -> Result<Option<LinkOutcome>, AppError> {
        let mut links = lock(&self.links);
        if !links.contains_key(&talk.id) {
            return Ok(None);
        }
        Ok(Some(Self::upsert_in(&mut links, talk, video_id)))
    }

    async fn delete_for_talk(&self, talk: &Talk) -> Result<LinkOutcome, AppError> {
        Ok(Self::delete_in(&mut lock(&self.links), talk))
    }

    async fn apply_batch(&self, changes: Vec<LinkChange>) -> Result<Vec<LinkOutcome>, AppError> {
        let mut guard = lock(&self.links);
        let mut staged = guard.clone();
        let outcomes = changes
            .iter()
            .map(|change| match change {
                LinkChange::Upsert { talk, video_id } => {
                    Self::upsert_in(&mut staged, talk, video_id)
                }
                LinkChange::Delete { talk } => Self::delete_in(&mut staged, talk),
            })
            .collect();
        *guard = staged;
        Ok(outcomes)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Talk directory seeded by hand
#[derive(Clone, Default)]
pub struct InMemoryTalkDirectory {
    events: Arc<Mutex<HashMap<Uuid, Event>>>,
    talks: Arc<Mutex<HashMap<Uuid, Talk>>>,
}

impl InMemoryTalkDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(&self, slug: &str, name: &str, has_schedule: bool) -> Event {
        let event = Event {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            name: name.to_string(),
            has_schedule,
        };
        lock(&self.events).insert(event.id, event.clone());
        event
    }

    pub fn add_talk(&self, event: &Event, code: &str, title: &str, scheduled: bool) -> Talk {
        let talk = Talk {
            id: Uuid::new_v4(),
            event_id: event.id,
            code: code.to_string(),
            title: title.to_string(),
            scheduled,
        };
        lock(&self.talks).insert(talk.id, talk.clone());
        talk
    }
}

#[async_trait]
impl TalkDirectory for InMemoryTalkDirectory {
    async fn find_event(&self, slug: &str) -> Result<Option<Event>, AppError> {
        Ok(lock(&self.events)
            .values()
            .find(|e| e.slug == slug)
            .cloned())
    }

    async fn find_talk(&self, event_id: Uuid, code: &str) -> Result<Option<Talk>, AppError> {
        Ok(lock(&self.talks)
            .values()
            .find(|t| t.event_id == event_id && t.code == code)
            .cloned())
    }

    async fn scheduled_talks(&self, event_id: Uuid) -> Result<Vec<Talk>, AppError> {
        let mut talks: Vec<Talk> = lock(&self.talks)
            .values()
            .filter(|t| t.event_id == event_id && t.scheduled)
            .cloned()
            .collect();
        talks.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.code.cmp(&b.code)));
        Ok(talks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (InMemoryTalkDirectory, Event, Talk, Talk) {
        let directory = InMemoryTalkDirectory::new();
        let event = directory.add_event("democon", "DemoCon", true);
        let keynote = directory.add_talk(&event, "ABC123", "Keynote", true);
        let workshop = directory.add_talk(&event, "DEF456", "A workshop", true);
        (directory, event, keynote, workshop)
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates() {
        let (_, event, keynote, _) = setup();
        let repo = InMemoryLinkRepository::new();

        let first = repo.upsert(&keynote, "first").await.unwrap();
        assert_eq!(first.action, LinkAction::Created);

        let second = repo.upsert(&keynote, "second").await.unwrap();
        assert_eq!(second.action, LinkAction::Updated);
        assert_eq!(repo.len(), 1);

        let stored = repo
            .get_by_submission(event.id, "ABC123")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.video_id, "second");
        assert_eq!(stored.id, first.link.unwrap().id);
    }

    #[tokio::test]
    async fn test_delete_is_noop_without_link() {
        let (_, _, keynote, _) = setup();
        let repo = InMemoryLinkRepository::new();

        let outcome = repo.delete_for_talk(&keynote).await.unwrap();
        assert_eq!(outcome.action, LinkAction::Unchanged);

        repo.upsert(&keynote, "abc").await.unwrap();
        let outcome = repo.delete_for_talk(&keynote).await.unwrap();
        assert_eq!(outcome.action, LinkAction::Deleted);
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_update_existing_needs_a_link() {
        let (_, _, keynote, _) = setup();
        let repo = InMemoryLinkRepository::new();

        assert!(repo.update_existing(&keynote, "abc").await.unwrap().is_none());
        assert!(repo.is_empty());

        repo.upsert(&keynote, "abc").await.unwrap();
        let outcome = repo.update_existing(&keynote, "def").await.unwrap().unwrap();
        assert_eq!(outcome.action, LinkAction::Updated);
        assert_eq!(outcome.link.unwrap().video_id, "def");
    }

    #[tokio::test]
    async fn test_concurrent_upserts_keep_one_link() {
        let (_, event, keynote, _) = setup();
        let repo = InMemoryLinkRepository::new();

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let repo = repo.clone();
                let talk = keynote.clone();
                tokio::spawn(async move { repo.upsert(&talk, &format!("id{}", i)).await })
            })
            .collect();

        let mut created = 0;
        for task in tasks {
            let outcome = task.await.unwrap().unwrap();
            if outcome.action == LinkAction::Created {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(repo.len(), 1);
        let (links, total) = repo.list(event.id, 50, 0).await.unwrap();
        assert_eq!(total, 1);
        assert!(links[0].video_id.starts_with("id"));
    }

    #[tokio::test]
    async fn test_list_orders_by_code_and_paginates() {
        let (_, event, keynote, workshop) = setup();
        let repo = InMemoryLinkRepository::new();
        repo.upsert(&workshop, "w").await.unwrap();
        repo.upsert(&keynote, "k").await.unwrap();

        let (page, total) = repo.list(event.id, 1, 0).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(page[0].submission_code, "ABC123");

        let (page, _) = repo.list(event.id, 10, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].submission_code, "DEF456");
    }

    #[tokio::test]
    async fn test_apply_batch_in_order() {
        let (_, event, keynote, workshop) = setup();
        let repo = InMemoryLinkRepository::new();
        repo.upsert(&workshop, "old").await.unwrap();

        let outcomes = repo
            .apply_batch(vec![
                LinkChange::from_extraction(keynote.clone(), Some("one".to_string())),
                LinkChange::from_extraction(keynote.clone(), Some("two".to_string())),
                LinkChange::from_extraction(workshop.clone(), None),
            ])
            .await
            .unwrap();

        let actions: Vec<LinkAction> = outcomes.iter().map(|o| o.action).collect();
        assert_eq!(
            actions,
            vec![LinkAction::Created, LinkAction::Updated, LinkAction::Deleted]
        );
        let (links, total) = repo.list(event.id, 50, 0).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(links[0].video_id, "two");
    }

    #[tokio::test]
    async fn test_scheduled_talks_sorted_by_title() {
        let (directory, event, _, _) = setup();
        directory.add_talk(&event, "ZZZ999", "Unscheduled", false);

        let talks = directory.scheduled_talks(event.id).await.unwrap();
        let codes: Vec<&str> = talks.iter().map(|t| t.code.as_str()).collect();
        assert_eq!(codes, vec!["DEF456", "ABC123"]);
    }

    #[tokio::test]
    async fn test_find_talk_is_scoped_to_event() {
        let (directory, event, _, _) = setup();
        let other = directory.add_event("othercon", "OtherCon", true);

        assert!(directory.find_talk(event.id, "ABC123").await.unwrap().is_some());
        assert!(directory.find_talk(other.id, "ABC123").await.unwrap().is_none());
        assert!(directory.find_event("missing").await.unwrap().is_none());
    }
}
