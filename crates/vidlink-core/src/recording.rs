//! Recording provider hook for the host's talk pages.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::VideoLink;

/// Origin the talk page must allow in its `frame-src` policy.
pub const PLAYER_CSP_SOURCE: &str = "https://www.youtube-nocookie.com/";

/// Embeddable recording of a talk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Recording {
    pub iframe: String,
    pub csp_header: String,
}

/// Supplies the embedded player for talks that have a video.
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoRecordingProvider;

impl VideoRecordingProvider {
    /// `None` when the talk has no link.
    pub fn recording(&self, link: Option<&VideoLink>) -> Option<Recording> {
        link.map(|link| Recording {
            iframe: link.iframe(),
            csp_header: PLAYER_CSP_SOURCE.to_string(),
        })
    }
}
