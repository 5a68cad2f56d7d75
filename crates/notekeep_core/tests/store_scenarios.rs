use notekeep_core::{
    join_notes_with_tags, open_memory_store, JsonCodec, MemoryStorage, NoteData, NoteFilter,
    NoteStore, RawNote, SequentialIdGenerator, StoreConfig, Tag,
};
use std::collections::HashSet;
use std::rc::Rc;

fn work() -> Tag {
    Tag::new("t1", "work")
}

fn fresh_store() -> NoteStore {
    open_memory_store()
}

#[test]
fn create_note_appends_one_note_per_call_with_unique_ids() {
    let mut store = fresh_store();
    let mut returned = Vec::new();
    for idx in 0..25 {
        let id = store
            .create_note(NoteData::new(format!("note {idx}"), "body", vec![]))
            .unwrap();
        returned.push(id);
    }

    assert_eq!(store.raw_notes().len(), 25);
    let unique: HashSet<&str> = store.raw_notes().iter().map(|note| note.id.as_str()).collect();
    assert_eq!(unique.len(), 25);
    let stored: Vec<String> = store.raw_notes().iter().map(|note| note.id.clone()).collect();
    assert_eq!(stored, returned);
}

#[test]
fn create_then_delete_tag_keeps_dangling_reference() {
    let mut store = fresh_store();
    store.add_tag(work()).unwrap();

    store
        .create_note(NoteData::new("A", "hi", vec![work()]))
        .unwrap();
    assert_eq!(store.raw_notes().len(), 1);
    assert_eq!(store.raw_notes()[0].tag_ids, vec!["t1".to_string()]);
    assert_eq!(store.notes_with_tags().len(), 1);
    assert_eq!(store.notes_with_tags()[0].tags, vec![work()]);

    store.delete_tag("t1").unwrap();
    assert!(store.tags().is_empty());
    assert!(store.notes_with_tags()[0].tags.is_empty());
    assert_eq!(store.raw_notes()[0].tag_ids, vec!["t1".to_string()]);
    assert_eq!(store.raw_notes()[0].dangling_tag_ids(store.tags()), vec!["t1"]);
}

#[test]
fn delete_tag_removes_exactly_one_resolved_tag() {
    let mut store = fresh_store();
    let tags = [
        Tag::new("t1", "work"),
        Tag::new("t2", "home"),
        Tag::new("t3", "urgent"),
    ];
    for tag in &tags {
        store.add_tag(tag.clone()).unwrap();
    }
    let id = store
        .create_note(NoteData::new("multi", "", tags.to_vec()))
        .unwrap();
    let before = store.note(&id).unwrap().tags.len();
    let raw_before = store.raw_notes()[0].tag_ids.clone();

    store.delete_tag("t2").unwrap();

    let after = store.note(&id).unwrap();
    assert_eq!(after.tags.len(), before - 1);
    assert!(!after.has_tag("t2"));
    assert_eq!(store.raw_notes()[0].tag_ids, raw_before);
}

#[test]
fn create_note_does_not_register_unknown_tags() {
    let mut store = fresh_store();
    store
        .create_note(NoteData::new("A", "", vec![Tag::new("new", "fresh")]))
        .unwrap();

    assert!(store.tags().is_empty());
    assert_eq!(store.raw_notes()[0].tag_ids, vec!["new".to_string()]);
    assert!(store.notes_with_tags()[0].tags.is_empty());

    store.add_tag(Tag::new("new", "fresh")).unwrap();
    assert_eq!(store.notes_with_tags()[0].tags, vec![Tag::new("new", "fresh")]);
}

#[test]
fn update_note_replaces_fields_of_matching_note_only() {
    let mut store = NoteStore::open_with(
        Rc::new(MemoryStorage::new()),
        &StoreConfig::default(),
        JsonCodec,
        Box::new(SequentialIdGenerator::new("note")),
    );
    store.add_tag(work()).unwrap();
    let first = store
        .create_note(NoteData::new("first", "one", vec![work()]))
        .unwrap();
    let second = store
        .create_note(NoteData::new("second", "two", vec![]))
        .unwrap();
    assert_eq!(first, "note-1");
    assert_eq!(second, "note-2");

    store
        .update_note(&first, NoteData::new("first v2", "one v2", vec![]))
        .unwrap();

    assert_eq!(
        store.raw_notes()[0],
        RawNote {
            id: first.clone(),
            title: "first v2".to_string(),
            markdown: "one v2".to_string(),
            tag_ids: vec![],
        }
    );
    assert_eq!(store.raw_notes()[1].title, "second");
    assert!(store.note(&first).unwrap().tags.is_empty());
}

#[test]
fn update_note_with_unknown_id_leaves_list_unchanged() {
    let mut store = fresh_store();
    store.create_note(NoteData::new("A", "a", vec![])).unwrap();
    store.create_note(NoteData::new("B", "b", vec![])).unwrap();
    let before: Vec<RawNote> = store.raw_notes().to_vec();

    store
        .update_note("does-not-exist", NoteData::new("X", "x", vec![work()]))
        .unwrap();

    assert_eq!(store.raw_notes(), before.as_slice());
}

#[test]
fn delete_note_removes_match_and_ignores_unknown() {
    let mut store = fresh_store();
    let keep = store.create_note(NoteData::new("keep", "", vec![])).unwrap();
    let removed = store.create_note(NoteData::new("drop", "", vec![])).unwrap();

    store.delete_note(&removed).unwrap();
    store.delete_note(&removed).unwrap();

    assert_eq!(store.raw_notes().len(), 1);
    assert_eq!(store.raw_notes()[0].id, keep);
    assert!(store.note(&removed).is_none());
}

#[test]
fn tag_mutations_keep_ids_and_allow_duplicates() {
    let mut store = fresh_store();
    store.add_tag(work()).unwrap();
    store.add_tag(work()).unwrap();
    assert_eq!(store.tags().len(), 2);

    store.update_tag("t1", "office").unwrap();
    assert!(store
        .tags()
        .iter()
        .all(|tag| tag.id == "t1" && tag.label == "office"));

    store.update_tag("missing", "nothing").unwrap();
    store.delete_tag("missing").unwrap();
    assert_eq!(store.tags().len(), 2);

    store.delete_tag("t1").unwrap();
    assert!(store.tags().is_empty());
}

#[test]
fn derived_view_matches_pure_join() {
    let mut store = fresh_store();
    store.add_tag(work()).unwrap();
    store.add_tag(Tag::new("t2", "home")).unwrap();
    store
        .create_note(NoteData::new("A", "", vec![Tag::new("t2", "home"), work()]))
        .unwrap();
    store.create_note(NoteData::new("B", "", vec![])).unwrap();

    let expected = join_notes_with_tags(store.raw_notes(), store.tags());
    assert_eq!(store.notes_with_tags(), expected.as_slice());
    assert_eq!(store.notes_with_tags(), store.notes_with_tags());
    assert_eq!(
        store.notes_with_tags()[0].tags,
        vec![work(), Tag::new("t2", "home")]
    );
}

#[test]
fn filtered_notes_use_resolved_tags_and_title() {
    let mut store = fresh_store();
    store.add_tag(work()).unwrap();
    store
        .create_note(NoteData::new("Standup notes", "", vec![work()]))
        .unwrap();
    store
        .create_note(NoteData::new("Standup ideas", "", vec![]))
        .unwrap();
    store
        .create_note(NoteData::new("Groceries", "", vec![work()]))
        .unwrap();

    let by_title = store.filtered_notes(&NoteFilter::new().with_title("standup"));
    assert_eq!(by_title.len(), 2);

    let by_both = store.filtered_notes(&NoteFilter::new().with_title("STAND").with_tag(&work()));
    assert_eq!(by_both.len(), 1);
    assert_eq!(by_both[0].title, "Standup notes");

    store.delete_tag("t1").unwrap();
    let dangling = store.filtered_notes(&NoteFilter::new().with_tag_id("t1"));
    assert!(dangling.is_empty());
    assert_eq!(store.filtered_notes(&NoteFilter::new()).len(), 3);
}
