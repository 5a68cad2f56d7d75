//! Derived note view: raw notes joined with the tag collection.

use crate::model::note::{Note, RawNote, Tag};
use std::collections::HashSet;

/// Resolves every note's `tag_ids` against `tags`.
///
/// Rules:
/// - Resolved tags follow `tags` order, not `tag_ids` order.
/// - Duplicate ids in `tag_ids` resolve to one tag.
/// - Ids with no matching tag are dropped.
pub fn join_notes_with_tags(notes: &[RawNote], tags: &[Tag]) -> Vec<Note> {
    notes.iter().map(|note| resolve_note(note, tags)).collect()
}

fn resolve_note(note: &RawNote, tags: &[Tag]) -> Note {
    let referenced: HashSet<&str> = note.tag_ids.iter().map(String::as_str).collect();
    Note {
        id: note.id.clone(),
        title: note.title.clone(),
        markdown: note.markdown.clone(),
        tags: tags
            .iter()
            .filter(|tag| referenced.contains(tag.id.as_str()))
            .cloned()
            .collect(),
    }
}
