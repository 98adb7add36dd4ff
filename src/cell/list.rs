use std::fmt;
use std::hash::{Hash, Hasher};

use crate::render::normalize_whitespace;

/// Ordered list option (include directories, definitions, ...).
///
/// Lists have no default and do not inherit: a list is modified exactly when
/// it is non-empty, and [`value`](ListCell::value) is always its own
/// contents.
#[derive(Debug, Clone)]
pub struct ListCell<E> {
    items: Vec<E>,
    dirty: bool,
}

impl<E> Default for ListCell<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> ListCell<E> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            dirty: false,
        }
    }

    pub fn add(&mut self, item: E) {
        self.items.push(item);
    }

    pub fn value(&self) -> &Vec<E> {
        &self.items
    }

    /// Live handle; edits through it are edits of the cell.
    pub fn value_mut(&mut self) -> &mut Vec<E> {
        &mut self.items
    }

    pub fn set_value(&mut self, items: Vec<E>) {
        self.items = items;
    }

    pub fn modified(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn reset(&mut self) {
        self.items.clear();
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<E: Clone + PartialEq> ListCell<E> {
    /// Replaces the contents with `other`'s. `dirty` records whether the
    /// contents differed beforehand, which is also returned.
    pub fn assign(&mut self, other: &ListCell<E>) -> bool {
        self.dirty = self != other;
        self.reset();
        self.items.extend(other.items.iter().cloned());
        self.dirty
    }
}

impl<E: fmt::Display> ListCell<E> {
    /// Each element prefixed with `prefix`, e.g. `-I` for include paths.
    pub fn options(&self, prefix: &str) -> String {
        let joined = self
            .items
            .iter()
            .map(|item| format!("{prefix}{item}"))
            .collect::<Vec<_>>()
            .join(" ");
        normalize_whitespace(&joined)
    }
}

impl<E: PartialEq> PartialEq for ListCell<E> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<E: Eq> Eq for ListCell<E> {}

impl<E: Hash> Hash for ListCell<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.hash(state);
    }
}

impl<E> From<Vec<E>> for ListCell<E> {
    fn from(items: Vec<E>) -> Self {
        Self {
            items,
            dirty: false,
        }
    }
}
