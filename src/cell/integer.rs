use std::sync::Arc;

use log::warn;

use crate::arena::Arena;

use super::{CellKind, CellStore, DirtyPolicy, IntId, ScalarCell};

/// Display name for a stored value with no entry in the name table. Projects
/// written by newer versions can carry values this build does not know.
pub const UNKNOWN_NAME: &str = "???";

/// Enumerated option stored as a `u8` index.
///
/// The value range is 0..=255. Anything wider coming from a project file is
/// rejected while decoding instead of being truncated into range.
#[derive(Debug, Clone)]
pub enum IntKind {}

impl CellKind for IntKind {
    type Value = u8;
    type Attachment = Arc<EnumTable>;

    const DIRTY_POLICY: DirtyPolicy = DirtyPolicy::Overwrite;

    fn arena(store: &CellStore) -> &Arena<ScalarCell<Self>> {
        &store.integers
    }

    fn arena_mut(store: &mut CellStore) -> &mut Arena<ScalarCell<Self>> {
        &mut store.integers
    }
}

/// Names and command-line fragments for each value of an enumerated cell.
///
/// Tables are shared between a cell and its clones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumTable {
    names: Vec<String>,
    options: Vec<String>,
}

impl EnumTable {
    pub fn new(names: &[&str], options: &[&str]) -> Self {
        Self {
            names: names.iter().map(|s| s.to_string()).collect(),
            options: options.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Table without option fragments; options render empty.
    pub fn named(names: &[&str]) -> Self {
        Self::new(names, &[])
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name(&self, value: u8) -> &str {
        self.names
            .get(value as usize)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_NAME)
    }

    /// Option fragment followed by a separating space, or an empty string
    /// when the table has no fragment for `value`.
    pub fn option(&self, value: u8) -> String {
        match self.options.get(value as usize) {
            Some(option) => format!("{option} "),
            None => String::new(),
        }
    }

    pub fn index_of(&self, name: &str) -> Option<u8> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| u8::try_from(i).ok())
    }
}

impl CellStore {
    pub fn enum_table(&self, id: IntId) -> &EnumTable {
        self.attachment(id)
    }

    /// Symbolic name of the resolved value, [`UNKNOWN_NAME`] when out of
    /// table range.
    pub fn enum_name(&self, id: IntId) -> &str {
        self.enum_table(id).name(*self.value(id))
    }

    /// Option fragment of the resolved value with a trailing space.
    pub fn enum_option(&self, id: IntId) -> String {
        self.enum_table(id).option(*self.value(id))
    }

    /// Sets the value whose name matches. Unknown names leave the cell
    /// untouched and return `false`.
    pub fn set_value_by_name(&mut self, id: IntId, name: &str) -> bool {
        match self.enum_table(id).index_of(name) {
            Some(value) => {
                self.set_value(id, value);
                true
            }
            None => {
                warn!("event=unknown_enum_name name={name:?}");
                false
            }
        }
    }
}
