//! Core note/tag state for NoteKeep.
//! This crate is the single source of truth for note and tag invariants.

pub mod cell;
pub mod codec;
pub mod db;
pub mod logging;
pub mod model;
pub mod storage;
pub mod store;

pub use cell::{CellError, CellOrigin, CellResult, PersistentCell, SubscriptionId};
pub use codec::{Codec, CodecError, JsonCodec, PrettyJsonCodec};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::id::{IdGenerator, SequentialIdGenerator, UuidV4Generator};
pub use model::note::{Note, NoteData, NoteId, RawNote, RawNoteData, Tag, TagId};
pub use storage::{KeyValueStorage, MemoryStorage, SqliteStorage, StorageError, StorageResult};
pub use store::{
    filter_notes, join_notes_with_tags, open_memory_store, open_sqlite_store, NoteFilter,
    NoteStore, StoreChange, StoreConfig, StoreError, StoreResult, NOTES_KEY, TAGS_KEY,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, NOTES_KEY, TAGS_KEY};

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn slot_names_match_stored_layout() {
        assert_eq!(NOTES_KEY, "notes");
        assert_eq!(TAGS_KEY, "TAGS");
    }
}
