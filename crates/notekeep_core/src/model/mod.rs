//! Note and tag domain model.
//!
//! # Responsibility
//! - Define the persisted shapes (`RawNote`, `Tag`) and the derived view
//!   (`Note`).
//! - Define the id-less input shapes used by create/update calls.
//!
//! # Invariants
//! - Note and tag ids are unique within their own collection.
//! - A `RawNote` may reference tag ids that no longer exist.

pub mod id;
pub mod note;
