use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "sqlx")]
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::Talk;

const WATCH_URL_BASE: &str = "https://youtube.com/watch?v=";
const PLAYER_URL_BASE: &str = "https://www.youtube-nocookie.com/embed/";

/// Public watch page for a video identifier.
pub fn watch_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL_BASE, video_id)
}

/// Privacy-enhanced embeddable player for a video identifier.
pub fn player_url(video_id: &str) -> String {
    format!("{}{}", PLAYER_URL_BASE, video_id)
}

/// The video attached to a talk. At most one exists per talk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct VideoLink {
    pub id: Uuid,
    pub event_id: Uuid,
    pub submission_id: Uuid,
    pub submission_code: String,
    pub video_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoLink {
    pub fn watch_url(&self) -> String {
        watch_url(&self.video_id)
    }

    pub fn player_url(&self) -> String {
        player_url(&self.video_id)
    }

    /// Responsive 16:9 embed fragment for the talk page.
    pub fn iframe(&self) -> String {
        format!(
            "<div class=\"embed-responsive embed-responsive-16by9\">\
             <iframe src=\"{}\" frameborder=\"0\" allowfullscreen></iframe></div>",
            self.player_url()
        )
    }
}

/// API representation of a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VideoLinkResponse {
    /// Talk code
    pub submission: String,
    pub youtube_link: String,
    pub video_id: String,
}

impl From<&VideoLink> for VideoLinkResponse {
    fn from(link: &VideoLink) -> Self {
        VideoLinkResponse {
            submission: link.submission_code.clone(),
            youtube_link: link.watch_url(),
            video_id: link.video_id.clone(),
        }
    }
}

/// Echo of a write request after normalisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LinkWriteResponse {
    pub submission: String,
    pub video_id: String,
}

impl From<&VideoLink> for LinkWriteResponse {
    fn from(link: &VideoLink) -> Self {
        LinkWriteResponse {
            submission: link.submission_code.clone(),
            video_id: link.video_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedLinks {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<VideoLinkResponse>,
}

/// Request DTO for creating or replacing the link of a talk
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, message = "submission may not be blank"))]
    pub submission: String,
    /// URL or bare identifier
    #[validate(length(min = 1, message = "video_id may not be blank"))]
    pub video_id: String,
}

/// Request DTO for updating the link of a talk
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateLinkRequest {
    #[validate(length(min = 1, message = "video_id may not be blank"))]
    pub video_id: String,
}

/// A pending change to the store for one talk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkChange {
    /// Create the link, or overwrite the existing one.
    Upsert { talk: Talk, video_id: String },
    /// Remove the link if there is one.
    Delete { talk: Talk },
}

impl LinkChange {
    /// Map an extraction result onto a store change: no value clears the link.
    pub fn from_extraction(talk: Talk, video_id: Option<String>) -> Self {
        match video_id {
            Some(video_id) => LinkChange::Upsert { talk, video_id },
            None => LinkChange::Delete { talk },
        }
    }

    pub fn talk(&self) -> &Talk {
        match self {
            LinkChange::Upsert { talk, .. } | LinkChange::Delete { talk } => talk,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LinkAction {
    Created,
    Updated,
    Deleted,
    /// A delete for a talk that had no link.
    Unchanged,
}

/// What applying a [`LinkChange`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOutcome {
    pub submission_code: String,
    pub action: LinkAction,
    /// The stored link after the change; `None` after a delete.
    pub link: Option<VideoLink>,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub results: Vec<LinkWriteResponse>,
}

impl ImportSummary {
    pub fn from_outcomes(outcomes: &[LinkOutcome]) -> Self {
        let mut summary = ImportSummary::default();
        for outcome in outcomes {
            match outcome.action {
                LinkAction::Created => summary.created += 1,
                LinkAction::Updated => summary.updated += 1,
                LinkAction::Deleted => summary.deleted += 1,
                LinkAction::Unchanged => {}
            }
            if let Some(link) = &outcome.link {
                summary.results.push(LinkWriteResponse::from(link));
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(video_id: &str) -> VideoLink {
        let now = Utc::now();
        VideoLink {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            submission_id: Uuid::new_v4(),
            submission_code: "ABC123".to_string(),
            video_id: video_id.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn talk() -> Talk {
        Talk {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            code: "ABC123".to_string(),
            title: "Keynote".to_string(),
            scheduled: true,
        }
    }

    #[test]
    fn test_derived_urls() {
        let link = link("dQw4w9WgXcQ");
        assert_eq!(link.watch_url(), "https://youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(
            link.player_url(),
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(
            link.iframe(),
            "<div class=\"embed-responsive embed-responsive-16by9\"><iframe \
             src=\"https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ\" frameborder=\"0\" \
             allowfullscreen></iframe></div>"
        );
    }

    #[test]
    fn test_response_shape() {
        let json = serde_json::to_value(VideoLinkResponse::from(&link("abc"))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "submission": "ABC123",
                "youtube_link": "https://youtube.com/watch?v=abc",
                "video_id": "abc",
            })
        );
    }

    #[test]
    fn test_change_from_extraction() {
        assert!(matches!(
            LinkChange::from_extraction(talk(), Some("abc".to_string())),
            LinkChange::Upsert { ref video_id, .. } if video_id == "abc"
        ));
        assert!(matches!(
            LinkChange::from_extraction(talk(), None),
            LinkChange::Delete { .. }
        ));
    }

    #[test]
    fn test_import_summary_counts() {
        let outcomes = vec![
            LinkOutcome {
                submission_code: "A".to_string(),
                action: LinkAction::Created,
                link: Some(link("a")),
            },
            LinkOutcome {
                submission_code: "B".to_string(),
                action: LinkAction::Updated,
                link: Some(link("b")),
            },
            LinkOutcome {
                submission_code: "C".to_string(),
                action: LinkAction::Unchanged,
                link: None,
            },
        ];
        let summary = ImportSummary::from_outcomes(&outcomes);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.deleted, 0);
        assert_eq!(summary.results.len(), 2);
    }
}
