//! Note and tag records.
//!
//! # Invariants
//! - `RawNote` serializes its tag references as `tagIds`, matching the
//!   `notes` slot layout.
//! - `Note` is never persisted; it is rebuilt from `RawNote` + `Tag` lists.

use serde::{Deserialize, Serialize};

/// Stable note identifier.
pub type NoteId = String;
/// Stable tag identifier.
pub type TagId = String;

/// User-defined label attachable to many notes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub label: String,
}

impl Tag {
    pub fn new(id: impl Into<TagId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Persisted note; tags referenced by id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNote {
    pub id: NoteId,
    pub title: String,
    pub markdown: String,
    /// Order is insignificant and duplicates are allowed.
    pub tag_ids: Vec<TagId>,
}

impl RawNote {
    pub fn from_data(id: impl Into<NoteId>, data: RawNoteData) -> Self {
        Self {
            id: id.into(),
            title: data.title,
            markdown: data.markdown,
            tag_ids: data.tag_ids,
        }
    }

    /// Referenced ids with no matching entry in `tags`, in `tag_ids` order.
    ///
    /// Left behind by tag deletion, which never rewrites notes.
    pub fn dangling_tag_ids<'a>(&'a self, tags: &[Tag]) -> Vec<&'a str> {
        self.tag_ids
            .iter()
            .map(String::as_str)
            .filter(|tag_id| !tags.iter().any(|tag| tag.id == *tag_id))
            .collect()
    }
}

/// View-layer note with resolved tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub markdown: String,
    pub tags: Vec<Tag>,
}

impl Note {
    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags.iter().any(|tag| tag.id == tag_id)
    }
}

/// Create/update input carrying resolved tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteData {
    pub title: String,
    pub markdown: String,
    pub tags: Vec<Tag>,
}

impl NoteData {
    pub fn new(title: impl Into<String>, markdown: impl Into<String>, tags: Vec<Tag>) -> Self {
        Self {
            title: title.into(),
            markdown: markdown.into(),
            tags,
        }
    }
}

/// Create/update input carrying tag ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNoteData {
    pub title: String,
    pub markdown: String,
    pub tag_ids: Vec<TagId>,
}

impl From<NoteData> for RawNoteData {
    fn from(value: NoteData) -> Self {
        Self {
            title: value.title,
            markdown: value.markdown,
            tag_ids: value.tags.into_iter().map(|tag| tag.id).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteData, RawNote, RawNoteData, Tag};

    #[test]
    fn dangling_tag_ids_lists_unresolved_references_in_order() {
        let note = RawNote::from_data(
            "n1",
            RawNoteData {
                title: "A".to_string(),
                markdown: String::new(),
                tag_ids: vec!["gone".to_string(), "t1".to_string(), "gone".to_string()],
            },
        );
        let tags = [Tag::new("t1", "work")];

        assert_eq!(note.dangling_tag_ids(&tags), vec!["gone", "gone"]);
        assert_eq!(note.dangling_tag_ids(&[]).len(), 3);
    }

    #[test]
    fn note_data_maps_tags_to_ids() {
        let data = NoteData::new("A", "hi", vec![Tag::new("t1", "work"), Tag::new("t2", "home")]);
        let raw = RawNoteData::from(data);
        assert_eq!(raw.tag_ids, vec!["t1".to_string(), "t2".to_string()]);
    }
}
