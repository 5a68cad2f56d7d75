//! Note list filtering by title and tag set.
//!
//! # Invariants
//! - Filtering never reorders notes.
//! - Tag matching uses resolved tags, so dangling `tag_ids` never match.

use crate::model::note::{Note, Tag, TagId};

/// Title substring + required tag set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    /// Case-insensitive substring; blank matches every title.
    pub title: String,
    /// Every id listed must be among the note's resolved tags.
    pub tag_ids: Vec<TagId>,
}

impl NoteFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_tag(mut self, tag: &Tag) -> Self {
        self.tag_ids.push(tag.id.clone());
        self
    }

    pub fn with_tag_id(mut self, tag_id: impl Into<TagId>) -> Self {
        self.tag_ids.push(tag_id.into());
        self
    }

    /// Whether this filter lets every note through.
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.tag_ids.is_empty()
    }

    pub fn matches(&self, note: &Note) -> bool {
        self.matches_title(note) && self.tag_ids.iter().all(|tag_id| note.has_tag(tag_id))
    }

    fn matches_title(&self, note: &Note) -> bool {
        if self.title.trim().is_empty() {
            return true;
        }
        note.title
            .to_lowercase()
            .contains(&self.title.to_lowercase())
    }
}

/// Returns the notes `filter` accepts, in input order.
pub fn filter_notes<'a>(notes: &'a [Note], filter: &NoteFilter) -> Vec<&'a Note> {
    notes.iter().filter(|note| filter.matches(note)).collect()
}
