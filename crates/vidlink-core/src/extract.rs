//! Video identifier extraction.
//!
//! Turns whatever a user typed (a watch URL, a short link, or a bare id) into
//! the opaque identifier stored for a talk. A blank input is not an error: it
//! means "no video" and callers treat it as a request to remove the link.

use url::Url;

/// Longest identifier the store accepts.
pub const MAX_VIDEO_ID_LENGTH: usize = 20;

const WATCH_HOST_MARKER: &str = "youtube.com";
const SHORT_HOST_MARKER: &str = "youtu.be";

/// How forgiving extraction is with input that is not a recognised URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// Form fields that ask for a URL: anything else is rejected.
    Strict,
    /// API and import fields: a bare id is accepted, and a path keeps only its last segment.
    /// A `youtube.com` URL without a `v` parameter also keeps its last path segment.
    Relaxed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("Failed to parse the URL!")]
    Unparseable,

    #[error("Please provide a YouTube URL!")]
    NotAVideoUrl,

    #[error("Video ID is longer than {MAX_VIDEO_ID_LENGTH} characters")]
    TooLong,
}

/// Extract a video identifier from `raw`.
///
/// Returns `Ok(None)` for blank input.
pub fn extract_video_id(raw: &str, mode: ExtractMode) -> Result<Option<String>, ExtractError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let video_id = if value.contains(WATCH_HOST_MARKER) {
        from_watch_url(value, mode)?
    } else if value.contains(SHORT_HOST_MARKER) {
        from_short_link(value)?
    } else {
        match mode {
            ExtractMode::Strict => return Err(ExtractError::NotAVideoUrl),
            ExtractMode::Relaxed => from_bare_value(value)?,
        }
    };

    if video_id.chars().count() > MAX_VIDEO_ID_LENGTH {
        return Err(ExtractError::TooLong);
    }

    Ok(Some(video_id))
}

fn from_watch_url(value: &str, mode: ExtractMode) -> Result<String, ExtractError> {
    let url = match Url::parse(value) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            match Url::parse(&format!("https://{}", value)) {
                Ok(url) => url,
                Err(_) => return fallback(value, mode),
            }
        }
        Err(_) => return fallback(value, mode),
    };

    if let Some((_, v)) = url.query_pairs().find(|(key, _)| key == "v") {
        let v = v.trim();
        if v.is_empty() {
            return Err(ExtractError::Unparseable);
        }
        return Ok(v.to_string());
    }

    match mode {
        ExtractMode::Strict => Err(ExtractError::Unparseable),
        // embed, shorts and live URLs carry the id as the last path segment
        ExtractMode::Relaxed => url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
            .map(str::to_string)
            .ok_or(ExtractError::Unparseable),
    }
}

fn fallback(value: &str, mode: ExtractMode) -> Result<String, ExtractError> {
    match mode {
        ExtractMode::Strict => Err(ExtractError::Unparseable),
        ExtractMode::Relaxed => from_bare_value(value),
    }
}

fn from_short_link(value: &str) -> Result<String, ExtractError> {
    let (_, tail) = value.rsplit_once('/').ok_or(ExtractError::Unparseable)?;
    // Share links carry a timestamp as `?t=42`; it is not part of the id.
    let id = tail.split(['?', '#']).next().unwrap_or_default();
    if id.is_empty() {
        return Err(ExtractError::Unparseable);
    }
    Ok(id.to_string())
}

fn from_bare_value(value: &str) -> Result<String, ExtractError> {
    if !value.contains('/') {
        return Ok(value.to_string());
    }
    value
        .split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(str::to_string)
        .ok_or(ExtractError::Unparseable)
}
