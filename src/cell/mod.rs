//! Typed configuration cells.
//!
//! A scalar cell holds a default, a stored value, a `modified` flag (the cell
//! carries an explicit override that must be persisted) and a `dirty` flag
//! (the resolved value changed since consumers last synced). A cell may name a
//! master cell in an ancestor configuration; while unmodified it resolves to
//! the master's value, transitively up the chain.
//!
//! All scalar cells of a project live in one [`CellStore`] and are addressed
//! by typed [`CellId`]s. Master links are handles into the same store, so a
//! master that has been released simply stops resolving and the cell behaves
//! as if it never had one.
//!
//! | kind | value | dirty on assign |
//! |------|-------|-----------------|
//! | [`BooleanKind`] | `bool` | accumulate |
//! | [`IntKind`] | `u8` enum index | overwrite |
//! | [`StringKind`] | `String` | overwrite |
//! | [`PicklistKind`] | `String` + MRU history | overwrite |
//!
//! [`ListCell`] is separate: it owns its sequence and never inherits.

mod any;
mod boolean;
mod integer;
mod list;
mod picklist;
mod store;
mod string;

use std::fmt;

use crate::arena::{Arena, Id};

pub use any::AnyCell;
pub use boolean::BooleanKind;
pub use integer::{EnumTable, IntKind, UNKNOWN_NAME};
pub use list::ListCell;
pub use picklist::{DEFAULT_PICKLIST_SIZE, Picklist, PicklistKind};
pub use store::{CellStore, ScalarCell};
pub use string::StringKind;

/// Handle to a scalar cell of kind `K`.
pub type CellId<K> = Id<ScalarCell<K>>;

pub type BoolId = CellId<BooleanKind>;
pub type IntId = CellId<IntKind>;
pub type StringId = CellId<StringKind>;
pub type PicklistId = CellId<PicklistKind>;

/// How `assign` folds "the resolved value changed" into the dirty flag.
///
/// Boolean cells have always accumulated while every other kind overwrites.
/// The two behaviours are kept apart on purpose so downstream invalidation
/// keeps seeing exactly what it saw before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyPolicy {
    /// `dirty = dirty || changed`; only an explicit clear resets it.
    Accumulate,
    /// `dirty = changed`.
    Overwrite,
}

impl DirtyPolicy {
    pub fn apply(self, previous: bool, changed: bool) -> bool {
        match self {
            DirtyPolicy::Accumulate => previous || changed,
            DirtyPolicy::Overwrite => changed,
        }
    }
}

/// A family of scalar cells sharing a value type and an arena in
/// [`CellStore`].
pub trait CellKind: Sized + Clone + fmt::Debug + 'static {
    type Value: Clone + PartialEq + fmt::Debug;
    /// Per-cell data carried alongside the value (enum tables, history).
    type Attachment: Clone + fmt::Debug;

    const DIRTY_POLICY: DirtyPolicy;

    fn arena(store: &CellStore) -> &Arena<ScalarCell<Self>>;
    fn arena_mut(store: &mut CellStore) -> &mut Arena<ScalarCell<Self>>;
}
