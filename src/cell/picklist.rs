use crate::arena::Arena;

use super::{CellKind, CellStore, DirtyPolicy, PicklistId, ScalarCell};

pub const DEFAULT_PICKLIST_SIZE: usize = 20;

/// Most-recently-used history offered next to an editable text value.
///
/// Resolution never looks at it; it travels with the cell on clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picklist {
    max: usize,
    items: Vec<String>,
}

impl Default for Picklist {
    fn default() -> Self {
        Self::new(DEFAULT_PICKLIST_SIZE)
    }
}

impl Picklist {
    pub fn new(max: usize) -> Self {
        Self {
            max: max.max(1),
            items: Vec::new(),
        }
    }

    /// Puts `item` first, dropping an older copy and the oldest entries
    /// beyond capacity. Blank items are ignored.
    pub fn add(&mut self, item: &str) {
        if item.trim().is_empty() {
            return;
        }
        self.items.retain(|existing| existing != item);
        self.items.insert(0, item.to_string());
        self.items.truncate(self.max);
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Text cell with an attached [`Picklist`].
#[derive(Debug, Clone)]
pub enum PicklistKind {}

impl CellKind for PicklistKind {
    type Value = String;
    type Attachment = Picklist;

    const DIRTY_POLICY: DirtyPolicy = DirtyPolicy::Overwrite;

    fn arena(store: &CellStore) -> &Arena<ScalarCell<Self>> {
        &store.picklists
    }

    fn arena_mut(store: &mut CellStore) -> &mut Arena<ScalarCell<Self>> {
        &mut store.picklists
    }
}

impl CellStore {
    pub fn picklist(&self, id: PicklistId) -> &Picklist {
        self.attachment(id)
    }

    pub fn picklist_mut(&mut self, id: PicklistId) -> &mut Picklist {
        self.attachment_mut(id)
    }

    /// Sets the value and records it in the history.
    pub fn set_value_remembered(&mut self, id: PicklistId, value: String) {
        self.picklist_mut(id).add(&value);
        self.set_value(id, value);
    }

    /// Replaces the history of `target` with a copy of `source`'s.
    pub fn assign_picklist(&mut self, target: PicklistId, source: PicklistId) {
        let history = self.picklist(source).clone();
        *self.picklist_mut(target) = history;
    }
}
