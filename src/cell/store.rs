use crate::arena::Arena;

use super::{BooleanKind, CellId, CellKind, IntKind, PicklistKind, StringKind};

/// One scalar cell. Resolution goes through [`CellStore`], which can follow
/// the master link.
#[derive(Debug, Clone)]
pub struct ScalarCell<K: CellKind> {
    master: Option<CellId<K>>,
    default: K::Value,
    value: K::Value,
    modified: bool,
    dirty: bool,
    attachment: K::Attachment,
}

impl<K: CellKind> ScalarCell<K> {
    fn new(master: Option<CellId<K>>, default: K::Value, attachment: K::Attachment) -> Self {
        Self {
            master,
            value: default.clone(),
            default,
            modified: false,
            dirty: false,
            attachment,
        }
    }

    /// Master handle as created. It may no longer resolve.
    pub fn master(&self) -> Option<CellId<K>> {
        self.master
    }

    pub fn default(&self) -> &K::Value {
        &self.default
    }

    /// The stored value, ignoring inheritance.
    pub fn stored(&self) -> &K::Value {
        &self.value
    }

    pub fn modified(&self) -> bool {
        self.modified
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn attachment(&self) -> &K::Attachment {
        &self.attachment
    }
}

/// Owner of every scalar cell in a project.
#[derive(Debug, Clone, Default)]
pub struct CellStore {
    pub(super) booleans: Arena<ScalarCell<BooleanKind>>,
    pub(super) integers: Arena<ScalarCell<IntKind>>,
    pub(super) strings: Arena<ScalarCell<StringKind>>,
    pub(super) picklists: Arena<ScalarCell<PicklistKind>>,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cell holding `default`, unmodified.
    pub fn create<K: CellKind>(
        &mut self,
        master: Option<CellId<K>>,
        default: K::Value,
        attachment: K::Attachment,
    ) -> CellId<K> {
        K::arena_mut(self).insert(ScalarCell::new(master, default, attachment))
    }

    /// # Panics
    /// Panics if `id` was released.
    pub fn cell<K: CellKind>(&self, id: CellId<K>) -> &ScalarCell<K> {
        &K::arena(self)[id]
    }

    fn cell_mut<K: CellKind>(&mut self, id: CellId<K>) -> &mut ScalarCell<K> {
        &mut K::arena_mut(self)[id]
    }

    pub fn contains<K: CellKind>(&self, id: CellId<K>) -> bool {
        K::arena(self).contains(id)
    }

    /// The master handle if it still resolves.
    pub fn live_master<K: CellKind>(&self, id: CellId<K>) -> Option<CellId<K>> {
        self.cell(id).master.filter(|master| self.contains(*master))
    }

    /// Resolved value: the master's resolved value while this cell is
    /// unmodified and has a live master, the stored value otherwise.
    pub fn value<K: CellKind>(&self, id: CellId<K>) -> &K::Value {
        let arena = K::arena(self);
        let mut current = &arena[id];
        while !current.modified {
            match current.master.and_then(|master| arena.get(master)) {
                Some(master) => current = master,
                None => break,
            }
        }
        &current.value
    }

    /// Stores `value`. With a live master any explicit set counts as an
    /// override, even one equal to the inherited value; without one the
    /// cell is modified only if the value differs from its default.
    pub fn set_value<K: CellKind>(&mut self, id: CellId<K>, value: K::Value) {
        let has_master = self.live_master(id).is_some();
        let cell = self.cell_mut(id);
        cell.modified = has_master || value != cell.default;
        cell.value = value;
    }

    /// Back to the literal default with no override. Inheritance resumes
    /// through the master, if any, because the cell is now unmodified.
    pub fn reset<K: CellKind>(&mut self, id: CellId<K>) {
        let cell = self.cell_mut(id);
        cell.value = cell.default.clone();
        cell.modified = false;
    }

    pub fn modified<K: CellKind>(&self, id: CellId<K>) -> bool {
        self.cell(id).modified
    }

    pub fn set_modified<K: CellKind>(&mut self, id: CellId<K>, modified: bool) {
        self.cell_mut(id).modified = modified;
    }

    pub fn is_dirty<K: CellKind>(&self, id: CellId<K>) -> bool {
        self.cell(id).dirty
    }

    pub fn set_dirty<K: CellKind>(&mut self, id: CellId<K>, dirty: bool) {
        self.cell_mut(id).dirty = dirty;
    }

    /// Replaces the default; the cell counts as modified when its stored
    /// value now differs from it.
    pub fn set_default<K: CellKind>(&mut self, id: CellId<K>, default: K::Value) {
        let cell = self.cell_mut(id);
        cell.modified = cell.value != default;
        cell.default = default;
    }

    pub fn attachment<K: CellKind>(&self, id: CellId<K>) -> &K::Attachment {
        &self.cell(id).attachment
    }

    pub fn attachment_mut<K: CellKind>(&mut self, id: CellId<K>) -> &mut K::Attachment {
        &mut self.cell_mut(id).attachment
    }

    /// Copies the resolved value and the modified flag of `source` into
    /// `target`. The dirty flag records whether the resolved value of
    /// `target` differed, folded in with the kind's [`DirtyPolicy`].
    ///
    /// Returns whether this assign changed the resolved value or the
    /// override state of `target`, independent of the accumulated dirty flag.
    ///
    /// [`DirtyPolicy`]: super::DirtyPolicy
    pub fn assign<K: CellKind>(&mut self, target: CellId<K>, source: CellId<K>) -> bool {
        let incoming = self.value(source).clone();
        let source_modified = self.cell(source).modified;
        let changed = *self.value(target) != incoming;
        let cell = self.cell_mut(target);
        let override_changed = cell.modified != source_modified;
        cell.dirty = K::DIRTY_POLICY.apply(cell.dirty, changed);
        cell.value = incoming;
        cell.modified = source_modified;
        changed || override_changed
    }

    /// New cell with the same master, default, stored value, modified flag
    /// and attachment. The copy starts clean.
    pub fn clone_cell<K: CellKind>(&mut self, id: CellId<K>) -> CellId<K> {
        let mut copy = self.cell(id).clone();
        copy.dirty = false;
        K::arena_mut(self).insert(copy)
    }

    /// Frees the cell. Cells that named it as master fall back to their own
    /// values from now on.
    pub fn release<K: CellKind>(&mut self, id: CellId<K>) -> bool {
        K::arena_mut(self).remove(id).is_some()
    }

    /// Total number of live cells across all kinds.
    pub fn len(&self) -> usize {
        self.booleans.len() + self.integers.len() + self.strings.len() + self.picklists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
