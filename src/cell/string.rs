use crate::arena::Arena;

use super::{CellId, CellKind, CellStore, DirtyPolicy, ScalarCell};

/// Free-form text: commands, directories, extra flags.
#[derive(Debug, Clone)]
pub enum StringKind {}

impl CellKind for StringKind {
    type Value = String;
    type Attachment = ();

    const DIRTY_POLICY: DirtyPolicy = DirtyPolicy::Overwrite;

    fn arena(store: &CellStore) -> &Arena<ScalarCell<Self>> {
        &store.strings
    }

    fn arena_mut(store: &mut CellStore) -> &mut Arena<ScalarCell<Self>> {
        &mut store.strings
    }
}

impl CellStore {
    /// Resolves a text cell with a caller-computed fallback standing in for
    /// a context dependent default.
    ///
    /// 1. live master, this cell and the master both unmodified, fallback
    ///    given: the fallback
    /// 2. live master, this cell unmodified: the master's resolved value
    /// 3. unmodified, fallback given: the fallback
    /// 4. otherwise the stored value
    pub fn value_with_fallback<'a, K>(&'a self, id: CellId<K>, fallback: Option<&'a str>) -> &'a str
    where
        K: CellKind<Value = String>,
    {
        let cell = self.cell(id);
        let master = self.live_master(id);
        if !cell.modified() {
            match (master, fallback) {
                (Some(master), Some(fallback)) if !self.modified(master) => return fallback,
                (Some(master), _) => return self.value(master),
                (None, Some(fallback)) => return fallback,
                (None, None) => {}
            }
        }
        cell.stored()
    }
}
