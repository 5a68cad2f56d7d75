//! Note/tag store: two persistent lists plus their derived join.
//!
//! # Responsibility
//! - Own the `notes` and `TAGS` cells and every mutation of them.
//! - Serve the derived `Note` view, memoized until either list changes.
//! - Notify store subscribers after every applied mutation.
//!
//! # Invariants
//! - Mutations targeting an unknown id are silent no-ops: no write, no
//!   notification, no error.
//! - Deleting a tag never rewrites any note's `tag_ids`.
//! - The derived view is never persisted.

use crate::cell::{CellError, CellOrigin, PersistentCell, SubscriptionId};
use crate::codec::{Codec, JsonCodec};
use crate::model::id::{IdGenerator, UuidV4Generator};
use crate::model::note::{Note, NoteData, NoteId, RawNote, RawNoteData, Tag};
use crate::storage::{KeyValueStorage, MemoryStorage, SqliteStorage, StorageError};
use log::{debug, error, info};
use once_cell::unsync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::rc::Rc;

pub mod filter;
pub mod join;

pub use filter::{filter_notes, NoteFilter};
pub use join::join_notes_with_tags;

/// Slot holding the raw note list.
pub const NOTES_KEY: &str = "notes";
/// Slot holding the tag list. Uppercase spelling is part of the stored layout.
pub const TAGS_KEY: &str = "TAGS";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level failure.
#[derive(Debug)]
pub enum StoreError {
    /// Storage backend could not be opened.
    Open(StorageError),
    /// Mutation applied in memory but its slot write failed.
    Persist { key: String, source: CellError },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open(err) => write!(f, "failed to open note storage: {err}"),
            Self::Persist { key, source } => write!(f, "failed to persist slot `{key}`: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open(err) => Some(err),
            Self::Persist { source, .. } => Some(source),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Open(value)
    }
}

/// Slot names used by one store instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub notes_key: String,
    pub tags_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            notes_key: NOTES_KEY.to_string(),
            tags_key: TAGS_KEY.to_string(),
        }
    }
}

/// Which list a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    Notes,
    Tags,
}

type Listener = Box<dyn FnMut(StoreChange)>;

/// Explicitly owned note/tag state for one session.
pub struct NoteStore<C: Codec = JsonCodec> {
    notes: PersistentCell<Vec<RawNote>, C>,
    tags: PersistentCell<Vec<Tag>, C>,
    ids: Box<dyn IdGenerator>,
    derived: OnceCell<Vec<Note>>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_listener: u64,
}

impl NoteStore<JsonCodec> {
    /// Opens the store over `storage` with default slots, JSON and v4 ids.
    pub fn open(storage: Rc<dyn KeyValueStorage>) -> Self {
        Self::open_with(
            storage,
            &StoreConfig::default(),
            JsonCodec,
            Box::new(UuidV4Generator),
        )
    }
}

impl<C: Codec + Clone> NoteStore<C> {
    /// Opens the store with explicit slots, codec and id generator.
    pub fn open_with(
        storage: Rc<dyn KeyValueStorage>,
        config: &StoreConfig,
        codec: C,
        ids: Box<dyn IdGenerator>,
    ) -> Self {
        let notes: PersistentCell<Vec<RawNote>, C> = PersistentCell::open_with_codec(
            storage.clone(),
            config.notes_key.as_str(),
            Vec::new(),
            codec.clone(),
        );
        let tags: PersistentCell<Vec<Tag>, C> =
            PersistentCell::open_with_codec(storage, config.tags_key.as_str(), Vec::new(), codec);

        info!(
            "event=store_open module=store status=ok codec={} notes={} notes_origin={} tags={} tags_origin={}",
            notes.codec_name(),
            notes.get().len(),
            origin_label(notes.origin()),
            tags.get().len(),
            origin_label(tags.origin())
        );

        Self {
            notes,
            tags,
            ids,
            derived: OnceCell::new(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Persisted notes, tags referenced by id.
    pub fn raw_notes(&self) -> &[RawNote] {
        self.notes.get()
    }

    /// Every known tag, in insertion order.
    pub fn tags(&self) -> &[Tag] {
        self.tags.get()
    }

    /// Notes with tag ids resolved against the current tag list.
    pub fn notes_with_tags(&self) -> &[Note] {
        self.derived
            .get_or_init(|| join_notes_with_tags(self.notes.get(), self.tags.get()))
    }

    /// Looks one note up in the derived view.
    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes_with_tags().iter().find(|note| note.id == id)
    }

    /// Derived notes accepted by `filter`, in list order.
    pub fn filtered_notes(&self, filter: &NoteFilter) -> Vec<&Note> {
        filter_notes(self.notes_with_tags(), filter)
    }

    /// Appends a note with a freshly generated id and returns that id.
    ///
    /// Tags in `data` are stored by id only; unknown tags are not added to
    /// the tag list.
    pub fn create_note(&mut self, data: NoteData) -> StoreResult<NoteId> {
        let id = self.ids.next_id();
        let note = RawNote::from_data(id.clone(), RawNoteData::from(data));
        let written = self.notes.update(move |prev| {
            let mut next = prev.clone();
            next.push(note);
            next
        });
        self.finish(StoreChange::Notes, "create_note", written)?;
        Ok(id)
    }

    /// Replaces title, markdown and tag ids of the note matching `id`.
    pub fn update_note(&mut self, id: &str, data: NoteData) -> StoreResult<()> {
        if !self.notes.get().iter().any(|note| note.id == id) {
            return self.skip("update_note");
        }

        let data = RawNoteData::from(data);
        let written = self.notes.update(|prev| {
            prev.iter()
                .map(|note| {
                    if note.id == id {
                        RawNote::from_data(note.id.clone(), data.clone())
                    } else {
                        note.clone()
                    }
                })
                .collect()
        });
        self.finish(StoreChange::Notes, "update_note", written)
    }

    /// Removes the note matching `id`.
    pub fn delete_note(&mut self, id: &str) -> StoreResult<()> {
        if !self.notes.get().iter().any(|note| note.id == id) {
            return self.skip("delete_note");
        }

        let written = self.notes.update(|prev| {
            prev.iter()
                .filter(|note| note.id != id)
                .cloned()
                .collect()
        });
        self.finish(StoreChange::Notes, "delete_note", written)
    }

    /// Appends `tag` as given. Ids are not checked against existing tags.
    pub fn add_tag(&mut self, tag: Tag) -> StoreResult<()> {
        let written = self.tags.update(move |prev| {
            let mut next = prev.clone();
            next.push(tag);
            next
        });
        self.finish(StoreChange::Tags, "add_tag", written)
    }

    /// Relabels the tag matching `id`.
    pub fn update_tag(&mut self, id: &str, label: impl Into<String>) -> StoreResult<()> {
        if !self.tags.get().iter().any(|tag| tag.id == id) {
            return self.skip("update_tag");
        }

        let label = label.into();
        let written = self.tags.update(|prev| {
            prev.iter()
                .map(|tag| {
                    if tag.id == id {
                        Tag::new(tag.id.clone(), label.clone())
                    } else {
                        tag.clone()
                    }
                })
                .collect()
        });
        self.finish(StoreChange::Tags, "update_tag", written)
    }

    /// Removes the tag matching `id`. Notes keep their reference to it.
    pub fn delete_tag(&mut self, id: &str) -> StoreResult<()> {
        if !self.tags.get().iter().any(|tag| tag.id == id) {
            return self.skip("delete_tag");
        }

        let written = self
            .tags
            .update(|prev| prev.iter().filter(|tag| tag.id != id).cloned().collect());
        self.finish(StoreChange::Tags, "delete_tag", written)
    }

    /// Registers a callback run after every applied mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(StoreChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes one store callback. Returns `false` when `id` is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(current, _)| *current != id);
        self.listeners.len() != before
    }

    fn skip(&self, op: &'static str) -> StoreResult<()> {
        debug!("event=store_mutation module=store op={op} status=skipped reason=not_found");
        Ok(())
    }

    fn finish(
        &mut self,
        change: StoreChange,
        op: &'static str,
        written: Result<(), CellError>,
    ) -> StoreResult<()> {
        self.derived.take();
        for (_, listener) in self.listeners.iter_mut() {
            listener(change);
        }

        let key = match change {
            StoreChange::Notes => self.notes.key(),
            StoreChange::Tags => self.tags.key(),
        };
        match written {
            Ok(()) => {
                info!(
                    "event=store_mutation module=store op={op} status=ok notes={} tags={}",
                    self.notes.get().len(),
                    self.tags.get().len()
                );
                Ok(())
            }
            Err(source) => {
                error!(
                    "event=store_mutation module=store op={op} status=error key={key} error={source}"
                );
                Err(StoreError::Persist {
                    key: key.to_string(),
                    source,
                })
            }
        }
    }
}

/// Opens a JSON store persisted in the SQLite file at `path`.
pub fn open_sqlite_store(path: impl AsRef<Path>) -> StoreResult<NoteStore> {
    let storage = SqliteStorage::open(path)?;
    Ok(NoteStore::open(Rc::new(storage)))
}

/// Opens a JSON store over fresh in-memory storage.
pub fn open_memory_store() -> NoteStore {
    NoteStore::open(Rc::new(MemoryStorage::new()))
}

fn origin_label(origin: CellOrigin) -> &'static str {
    match origin {
        CellOrigin::Stored => "stored",
        CellOrigin::Default => "default",
        CellOrigin::Recovered => "recovered",
    }
}
