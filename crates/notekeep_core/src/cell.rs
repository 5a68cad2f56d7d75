//! Storage-backed observable value holder.
//!
//! # Responsibility
//! - Bind one typed in-memory value to one named storage slot.
//! - Write the slot back synchronously on every change.
//! - Notify subscribers after every change.
//!
//! # Invariants
//! - The slot is read exactly once, at `open`; opening never writes.
//! - A malformed or unreadable slot yields the default value, never a panic.
//! - The in-memory value always reflects the last `set`/`update`, even when
//!   the write-back failed.
//! - `revision` increases by exactly one per `set`/`update`.

use crate::codec::{Codec, CodecError, JsonCodec};
use crate::storage::{KeyValueStorage, StorageError};
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type CellResult<T> = Result<T, CellError>;

/// Write-back failure for one cell.
#[derive(Debug)]
pub enum CellError {
    Codec(CodecError),
    Storage(StorageError),
}

impl Display for CellError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Codec(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CellError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Codec(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<CodecError> for CellError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

impl From<StorageError> for CellError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Where a cell's initial value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOrigin {
    /// Decoded from the stored slot.
    Stored,
    /// Slot was absent; default used.
    Default,
    /// Slot was unreadable or malformed; default used.
    Recovered,
}

/// Handle returned by [`PersistentCell::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

type Subscriber<T> = Box<dyn FnMut(&T)>;

/// Typed value mirrored into one storage slot.
pub struct PersistentCell<T, C = JsonCodec> {
    key: String,
    value: T,
    origin: CellOrigin,
    revision: u64,
    storage: Rc<dyn KeyValueStorage>,
    codec: C,
    subscribers: Vec<(SubscriptionId, Subscriber<T>)>,
    next_subscription: u64,
}

impl<T, C> PersistentCell<T, C>
where
    T: Serialize + DeserializeOwned,
    C: Codec,
{
    /// Opens the cell for `key` with the codec's default instance.
    pub fn open(storage: Rc<dyn KeyValueStorage>, key: impl Into<String>, default: T) -> Self
    where
        C: Default,
    {
        Self::open_with_codec(storage, key, default, C::default())
    }

    /// Opens the cell for `key`, seeding from storage or from `default`.
    pub fn open_with_codec(
        storage: Rc<dyn KeyValueStorage>,
        key: impl Into<String>,
        default: T,
        codec: C,
    ) -> Self {
        let key = key.into();
        let (value, origin) = match storage.get_item(&key) {
            Ok(Some(raw)) => match codec.decode::<T>(&raw) {
                Ok(value) => (value, CellOrigin::Stored),
                Err(err) => {
                    warn!(
                        "event=cell_open module=cell status=recovered key={key} bytes={} error={err}",
                        raw.len()
                    );
                    (default, CellOrigin::Recovered)
                }
            },
            Ok(None) => (default, CellOrigin::Default),
            Err(err) => {
                error!("event=cell_open module=cell status=recovered key={key} error={err}");
                (default, CellOrigin::Recovered)
            }
        };

        Self {
            key,
            value,
            origin,
            revision: 0,
            storage,
            codec,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn codec_name(&self) -> &'static str {
        self.codec.name()
    }

    pub fn origin(&self) -> CellOrigin {
        self.origin
    }

    /// Number of changes applied since `open`.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replaces the value and writes it back.
    ///
    /// # Errors
    /// - Returns `CellError` when encoding or the storage write fails. The
    ///   in-memory value is replaced regardless.
    pub fn set(&mut self, next: T) -> CellResult<()> {
        self.value = next;
        self.revision += 1;
        let written = self.write_back();
        if let Err(err) = &written {
            error!(
                "event=cell_write module=cell status=error key={} revision={} error={err}",
                self.key, self.revision
            );
        }
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&self.value);
        }
        written
    }

    /// Computes the next value from the current one, then behaves as `set`.
    pub fn update(&mut self, f: impl FnOnce(&T) -> T) -> CellResult<()> {
        let next = f(&self.value);
        self.set(next)
    }

    /// Registers a change callback invoked with the new value.
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes one callback. Returns `false` when `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(current, _)| *current != id);
        self.subscribers.len() != before
    }

    fn write_back(&self) -> CellResult<()> {
        let raw = self.codec.encode(&self.value)?;
        self.storage.set_item(&self.key, &raw)?;
        Ok(())
    }
}
