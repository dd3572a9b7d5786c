//! The organiser settings form: one URL field per scheduled talk.

use std::collections::HashMap;
use uuid::Uuid;
use vidlink_core::models::{LinkChange, Talk, VideoLink};
use vidlink_core::{extract_video_id, ExtractMode};

pub const FIELD_PREFIX: &str = "video_id_";

pub fn field_name(code: &str) -> String {
    format!("{}{}", FIELD_PREFIX, code)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsField {
    pub name: String,
    /// Talk title
    pub label: String,
    /// Watch URL of the stored link, empty when there is none.
    pub initial: String,
    pub error: Option<String>,
}

/// Fields for `talks`, pre-filled from `links`.
pub fn build_fields(talks: &[Talk], links: &[VideoLink]) -> Vec<SettingsField> {
    let by_talk: HashMap<Uuid, &VideoLink> = links.iter().map(|l| (l.submission_id, l)).collect();
    talks
        .iter()
        .map(|talk| SettingsField {
            name: field_name(&talk.code),
            label: talk.title.clone(),
            initial: by_talk
                .get(&talk.id)
                .map(|l| l.watch_url())
                .unwrap_or_default(),
            error: None,
        })
        .collect()
}

/// Attach validation errors (keyed by field name) to the fields.
pub fn with_errors(
    mut fields: Vec<SettingsField>,
    errors: &HashMap<String, String>,
) -> Vec<SettingsField> {
    for field in &mut fields {
        field.error = errors.get(&field.name).cloned();
    }
    fields
}

/// Validate every submitted field.
///
/// All fields are checked before anything is decided: either every field is
/// valid and the changes are returned, or the errors of all invalid fields
/// are. Fields whose value matches what is stored produce no change. A field
/// missing from `data` counts as blank.
pub fn validate_submission(
    talks: &[Talk],
    links: &[VideoLink],
    data: &HashMap<String, String>,
) -> Result<Vec<LinkChange>, HashMap<String, String>> {
    let current: HashMap<Uuid, &str> = links
        .iter()
        .map(|l| (l.submission_id, l.video_id.as_str()))
        .collect();

    let mut changes = Vec::new();
    let mut errors = HashMap::new();

    for talk in talks {
        let name = field_name(&talk.code);
        let raw = data.get(&name).map(String::as_str).unwrap_or_default();
        match extract_video_id(raw, ExtractMode::Strict) {
            Ok(video_id) => {
                let stored = current.get(&talk.id).copied();
                if video_id.as_deref() == stored {
                    continue;
                }
                changes.push(LinkChange::from_extraction(talk.clone(), video_id));
            }
            Err(e) => {
                errors.insert(name, e.to_string());
            }
        }
    }

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn talk(code: &str, title: &str) -> Talk {
        Talk {
            id: Uuid::new_v4(),
            event_id: Uuid::nil(),
            code: code.to_string(),
            title: title.to_string(),
            scheduled: true,
        }
    }

    fn link(talk: &Talk, video_id: &str) -> VideoLink {
        VideoLink {
            id: Uuid::new_v4(),
            event_id: talk.event_id,
            submission_id: talk.id,
            submission_code: talk.code.clone(),
            video_id: video_id.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn data(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_build_fields() {
        let keynote = talk("ABC123", "Keynote");
        let workshop = talk("DEF456", "Workshop");
        let fields = build_fields(
            &[keynote.clone(), workshop],
            &[link(&keynote, "abc")],
        );
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "video_id_ABC123");
        assert_eq!(fields[0].label, "Keynote");
        assert_eq!(fields[0].initial, "https://youtube.com/watch?v=abc");
        assert_eq!(fields[1].initial, "");
    }

    #[test]
    fn test_no_talks_no_fields() {
        assert!(build_fields(&[], &[]).is_empty());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let talks = vec![talk("A", "a"), talk("B", "b"), talk("C", "c")];
        let errors = validate_submission(
            &talks,
            &[],
            &data(&[
                ("video_id_A", "not a url"),
                ("video_id_B", "https://youtu.be/ok"),
                ("video_id_C", "https://www.youtube.com/watch"),
            ]),
        )
        .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["video_id_A"], "Please provide a YouTube URL!");
        assert_eq!(errors["video_id_C"], "Failed to parse the URL!");
    }

    #[test]
    fn test_validate_produces_changes() {
        let keynote = talk("A", "a");
        let workshop = talk("B", "b");
        let unchanged = talk("C", "c");
        let links = vec![link(&workshop, "old"), link(&unchanged, "same")];
        let changes = validate_submission(
            &[keynote, workshop, unchanged],
            &links,
            &data(&[
                ("video_id_A", "https://youtu.be/new"),
                ("video_id_B", ""),
                ("video_id_C", "https://youtube.com/watch?v=same"),
            ]),
        )
        .unwrap();
        assert_eq!(changes.len(), 2);
        assert!(matches!(&changes[0], LinkChange::Upsert { video_id, .. } if video_id == "new"));
        assert!(matches!(&changes[1], LinkChange::Delete { talk } if talk.code == "B"));
    }

    #[test]
    fn test_missing_field_is_blank() {
        let keynote = talk("A", "a");
        let changes = validate_submission(&[keynote], &[], &HashMap::new()).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_with_errors() {
        let fields = build_fields(&[talk("A", "a")], &[]);
        let errors: HashMap<String, String> =
            [("video_id_A".to_string(), "bad".to_string())].into();
        let fields = with_errors(fields, &errors);
        assert_eq!(fields[0].error.as_deref(), Some("bad"));
    }
}
