//! Auxiliary configuration objects.
//!
//! Every block of settings attached to a build configuration (assembler
//! flags, makefile commands, pre-build step, custom tool, and anything a
//! plugin adds) implements [`AuxObject`] and lives in the configuration's
//! [`AuxPool`] under its static [`AuxObject::ID`].
//!
//! The id is a property of the type, not of the value. A pool refuses to hold
//! two different types under one id, and [`AuxPool::assign_from`] pairs
//! entries by id *and* type, so assigning one kind of block from another
//! cannot be expressed.

use log::{debug, warn};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use crate::cell::{AnyCell, CellStore, ListCell};
use crate::project::ConfId;
use crate::{Error, Result};

/// A pluggable, id-keyed block of configuration cells.
///
/// Implementors list their cells in [`fields`](AuxObject::fields) (and any
/// list options in [`lists`](AuxObject::lists)), always in the same order;
/// the provided methods do everything else field by field.
pub trait AuxObject: Any + fmt::Debug + Sized {
    /// Stable key, used as the table name in project files.
    const ID: &'static str;

    fn fields(&self) -> Vec<(&'static str, AnyCell)>;

    fn lists(&self) -> Vec<(&'static str, &ListCell<String>)> {
        Vec::new()
    }

    fn lists_mut(&mut self) -> Vec<(&'static str, &mut ListCell<String>)> {
        Vec::new()
    }

    /// Persistence change flag. Independent of the cells' `modified` flags.
    fn has_changed(&self) -> bool;

    fn set_changed(&mut self, changed: bool);

    /// Deep copy with fresh cells, owned by `owner`.
    fn clone_for(&self, cells: &mut CellStore, owner: ConfId) -> Self;

    fn id(&self) -> &'static str {
        Self::ID
    }

    /// Whether the block belongs to the shared (version-controlled) part
    /// of the project file rather than the private one.
    fn shared(&self) -> bool {
        true
    }

    fn clear_changed(&mut self) {
        self.set_changed(false);
    }

    /// Resets every cell to its default.
    fn initialize(&mut self, cells: &mut CellStore) {
        let mut had_overrides = false;
        for (_, cell) in self.fields() {
            had_overrides |= cells.any_modified(cell);
            cells.any_reset(cell);
        }
        for (_, list) in self.lists_mut() {
            had_overrides |= list.modified();
            list.reset();
        }
        if had_overrides {
            self.set_changed(true);
        }
    }

    fn modified(&self, cells: &CellStore) -> bool {
        self.fields().into_iter().any(|(_, cell)| cells.any_modified(cell))
            || self.lists().into_iter().any(|(_, list)| list.modified())
    }

    /// Cell-wise assign in field order. Raises the change flag if this
    /// assign changed any cell; dirty flags left over from earlier assigns
    /// do not count.
    fn assign(&mut self, cells: &mut CellStore, other: &Self) {
        let mut changed = false;
        for ((_, target), (_, source)) in self.fields().into_iter().zip(other.fields()) {
            changed |= cells.any_assign(target, source).unwrap_or(false);
        }
        for ((_, target), (_, source)) in self.lists_mut().into_iter().zip(other.lists()) {
            changed |= target.assign(source);
        }
        if changed {
            self.set_changed(true);
        }
    }

    fn clear_dirty(&mut self, cells: &mut CellStore) {
        for (_, cell) in self.fields() {
            cells.any_clear_dirty(cell);
        }
        for (_, list) in self.lists_mut() {
            list.set_dirty(false);
        }
    }

    fn release(&self, cells: &mut CellStore) {
        for (_, cell) in self.fields() {
            cells.any_release(cell);
        }
    }

    /// Overrides only: unmodified cells and empty lists are left out.
    fn write(&self, cells: &CellStore) -> toml::Table {
        let mut table = toml::Table::new();
        for (key, cell) in self.fields() {
            if let Some(value) = cells.any_to_toml(cell) {
                table.insert(key.to_string(), value);
            }
        }
        for (key, list) in self.lists() {
            if list.modified() {
                let items = list.value().iter().cloned().map(toml::Value::String).collect();
                table.insert(key.to_string(), toml::Value::Array(items));
            }
        }
        table
    }

    /// Restores the overrides in `table`. Keys this block does not know are
    /// skipped with a warning.
    fn read(&mut self, cells: &mut CellStore, table: &toml::Table) -> Result<()> {
        let fields = self.fields();
        for (key, value) in table {
            let path = format!("{}.{}", Self::ID, key);
            if let Some((_, cell)) = fields.iter().find(|(name, _)| name == key) {
                cells.any_from_toml(*cell, &path, value)?;
                continue;
            }
            let mut lists = self.lists_mut();
            if let Some((_, list)) = lists.iter_mut().find(|(name, _)| name == key) {
                list.set_value(string_array(&path, value)?);
                continue;
            }
            warn!("event=unknown_setting aux={} key={key}", Self::ID);
        }
        Ok(())
    }
}

fn string_array(path: &str, value: &toml::Value) -> Result<Vec<String>> {
    let invalid = || Error::InvalidValue {
        key: path.to_string(),
        expected: "array of strings",
    };
    value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}

/// Object-safe face of an [`AuxObject`], held by the pool.
trait ErasedAux: fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn id(&self) -> &'static str;
    fn type_name(&self) -> &'static str;
    fn shared(&self) -> bool;
    fn fields(&self) -> Vec<(&'static str, AnyCell)>;
    fn lists(&self) -> Vec<(&'static str, &ListCell<String>)>;
    fn lists_mut(&mut self) -> Vec<(&'static str, &mut ListCell<String>)>;
    fn has_changed(&self) -> bool;
    fn clear_changed(&mut self);
    fn initialize(&mut self, cells: &mut CellStore);
    fn modified(&self, cells: &CellStore) -> bool;
    fn assign(&mut self, cells: &mut CellStore, other: &dyn ErasedAux) -> bool;
    fn clear_dirty(&mut self, cells: &mut CellStore);
    fn release(&self, cells: &mut CellStore);
    fn clone_for(&self, cells: &mut CellStore, owner: ConfId) -> Box<dyn ErasedAux>;
    fn write(&self, cells: &CellStore) -> toml::Table;
    fn read(&mut self, cells: &mut CellStore, table: &toml::Table) -> Result<()>;
}

#[derive(Debug)]
struct Registered<T>(T);

impl<T: AuxObject> ErasedAux for Registered<T> {
    fn as_any(&self) -> &dyn Any {
        &self.0
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        &mut self.0
    }

    fn id(&self) -> &'static str {
        T::ID
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn shared(&self) -> bool {
        self.0.shared()
    }

    fn fields(&self) -> Vec<(&'static str, AnyCell)> {
        self.0.fields()
    }

    fn lists(&self) -> Vec<(&'static str, &ListCell<String>)> {
        self.0.lists()
    }

    fn lists_mut(&mut self) -> Vec<(&'static str, &mut ListCell<String>)> {
        self.0.lists_mut()
    }

    fn has_changed(&self) -> bool {
        self.0.has_changed()
    }

    fn clear_changed(&mut self) {
        self.0.clear_changed();
    }

    fn initialize(&mut self, cells: &mut CellStore) {
        self.0.initialize(cells);
    }

    fn modified(&self, cells: &CellStore) -> bool {
        self.0.modified(cells)
    }

    fn assign(&mut self, cells: &mut CellStore, other: &dyn ErasedAux) -> bool {
        match other.as_any().downcast_ref::<T>() {
            Some(other) => {
                self.0.assign(cells, other);
                true
            }
            None => false,
        }
    }

    fn clear_dirty(&mut self, cells: &mut CellStore) {
        self.0.clear_dirty(cells);
    }

    fn release(&self, cells: &mut CellStore) {
        self.0.release(cells);
    }

    fn clone_for(&self, cells: &mut CellStore, owner: ConfId) -> Box<dyn ErasedAux> {
        Box::new(Registered(self.0.clone_for(cells, owner)))
    }

    fn write(&self, cells: &CellStore) -> toml::Table {
        self.0.write(cells)
    }

    fn read(&mut self, cells: &mut CellStore, table: &toml::Table) -> Result<()> {
        self.0.read(cells, table)
    }
}

/// The aux objects of one build configuration, keyed by id.
#[derive(Debug, Default)]
pub struct AuxPool {
    entries: BTreeMap<&'static str, Box<dyn ErasedAux>>,
}

impl AuxPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `object` under `T::ID`, replacing an earlier object of the same
    /// type. Fails if the id is taken by a different type.
    pub fn register<T: AuxObject>(&mut self, object: T) -> Result<()> {
        if let Some(existing) = self.entries.get(T::ID)
            && !existing.as_any().is::<T>()
        {
            return Err(Error::AuxConflict {
                id: T::ID,
                registered: existing.type_name(),
            });
        }
        debug!("event=aux_registered id={}", T::ID);
        self.entries.insert(T::ID, Box::new(Registered(object)));
        Ok(())
    }

    pub fn get<T: AuxObject>(&self) -> Option<&T> {
        self.entries.get(T::ID)?.as_any().downcast_ref()
    }

    pub fn get_mut<T: AuxObject>(&mut self) -> Option<&mut T> {
        self.entries.get_mut(T::ID)?.as_any_mut().downcast_mut()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn initialize_all(&mut self, cells: &mut CellStore) {
        for entry in self.entries.values_mut() {
            entry.initialize(cells);
        }
    }

    pub fn has_changed(&self) -> bool {
        self.entries.values().any(|entry| entry.has_changed())
    }

    pub fn clear_changed(&mut self) {
        for entry in self.entries.values_mut() {
            entry.clear_changed();
        }
    }

    pub fn clear_dirty(&mut self, cells: &mut CellStore) {
        for entry in self.entries.values_mut() {
            entry.clear_dirty(cells);
        }
    }

    pub fn modified(&self, cells: &CellStore) -> bool {
        self.entries.values().any(|entry| entry.modified(cells))
    }

    /// Assigns every entry from the entry with the same id in `other`.
    /// Entries missing on either side are left alone.
    pub fn assign_from(&mut self, cells: &mut CellStore, other: &AuxPool) {
        for (id, entry) in self.entries.iter_mut() {
            let Some(source) = other.entries.get(id) else {
                continue;
            };
            if !entry.assign(cells, source.as_ref()) {
                warn!(
                    "event=aux_type_mismatch id={id} target={} source={}",
                    entry.type_name(),
                    source.type_name()
                );
            }
        }
    }

    pub fn clone_for(&self, cells: &mut CellStore, owner: ConfId) -> AuxPool {
        let entries = self
            .entries
            .iter()
            .map(|(id, entry)| (*id, entry.clone_for(cells, owner)))
            .collect();
        AuxPool { entries }
    }

    pub fn release(&self, cells: &mut CellStore) {
        for entry in self.entries.values() {
            entry.release(cells);
        }
    }

    /// Overrides of every entry, split into (shared, private) tables keyed
    /// by id. Entries without overrides are omitted.
    pub fn write(&self, cells: &CellStore) -> (toml::Table, toml::Table) {
        let mut shared = toml::Table::new();
        let mut private = toml::Table::new();
        for (id, entry) in &self.entries {
            let table = entry.write(cells);
            if table.is_empty() {
                continue;
            }
            let section = if entry.shared() {
                &mut shared
            } else {
                &mut private
            };
            section.insert(id.to_string(), toml::Value::Table(table));
        }
        (shared, private)
    }

    /// Restores the entry named `id`. Returns `false` if no such entry is
    /// registered.
    pub fn read(&mut self, cells: &mut CellStore, id: &str, table: &toml::Table) -> Result<bool> {
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.read(cells, table)?;
                Ok(true)
            }
            None => {
                warn!("event=unknown_aux id={id}");
                Ok(false)
            }
        }
    }

    /// Every scalar cell as `("aux.cell", cell)`, in id then field order.
    pub fn fields(&self) -> Vec<(String, AnyCell)> {
        let mut out = Vec::new();
        for (id, entry) in &self.entries {
            for (key, cell) in entry.fields() {
                out.push((format!("{id}.{key}"), cell));
            }
        }
        out
    }

    /// Every list cell as `("aux.list", list)`.
    pub fn lists(&self) -> Vec<(String, &ListCell<String>)> {
        let mut out = Vec::new();
        for (id, entry) in &self.entries {
            for (key, list) in entry.lists() {
                out.push((format!("{id}.{key}"), list));
            }
        }
        out
    }

    pub fn field(&self, path: &str) -> Option<AnyCell> {
        let (id, key) = path.split_once('.')?;
        let entry = self.entries.get(id)?;
        entry
            .fields()
            .into_iter()
            .find(|(name, _)| *name == key)
            .map(|(_, cell)| cell)
    }

    pub fn list_mut(&mut self, path: &str) -> Option<&mut ListCell<String>> {
        let (id, key) = path.split_once('.')?;
        let entry = self.entries.get_mut(id)?;
        entry
            .lists_mut()
            .into_iter()
            .find(|(name, _)| *name == key)
            .map(|(_, list)| list)
    }

    /// Sets a cell from user text. Lists take comma-separated items.
    pub fn set_field(&mut self, cells: &mut CellStore, path: &str, text: &str) -> Result<()> {
        if let Some(cell) = self.field(path) {
            return cells.any_set_text(cell, path, text);
        }
        if let Some(list) = self.list_mut(path) {
            let items = text
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect();
            list.set_value(items);
            return Ok(());
        }
        Err(Error::UnknownSetting(path.to_string()))
    }

    pub fn reset_field(&mut self, cells: &mut CellStore, path: &str) -> Result<()> {
        if let Some(cell) = self.field(path) {
            cells.any_reset(cell);
            return Ok(());
        }
        if let Some(list) = self.list_mut(path) {
            list.reset();
            return Ok(());
        }
        Err(Error::UnknownSetting(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::cell::{BoolId, StringId};
    use crate::paths::ExecEnv;
    use crate::project::BuildConfiguration;
    use crate::toolchain::CompilerType;

    #[derive(Debug)]
    struct Notes {
        text: StringId,
        pinned: BoolId,
        changed: bool,
    }

    impl Notes {
        fn new(cells: &mut CellStore) -> Self {
            Self {
                text: cells.create(None, String::new(), ()),
                pinned: cells.create(None, false, ()),
                changed: false,
            }
        }
    }

    impl AuxObject for Notes {
        const ID: &'static str = "notes";

        fn fields(&self) -> Vec<(&'static str, AnyCell)> {
            vec![("text", AnyCell::Text(self.text)), ("pinned", AnyCell::Bool(self.pinned))]
        }

        fn has_changed(&self) -> bool {
            self.changed
        }

        fn set_changed(&mut self, changed: bool) {
            self.changed = changed;
        }

        fn clone_for(&self, cells: &mut CellStore, _owner: ConfId) -> Self {
            Self {
                text: cells.clone_cell(self.text),
                pinned: cells.clone_cell(self.pinned),
                changed: self.changed,
            }
        }

        fn shared(&self) -> bool {
            false
        }
    }

    #[derive(Debug)]
    struct Impostor;

    impl AuxObject for Impostor {
        const ID: &'static str = "notes";

        fn fields(&self) -> Vec<(&'static str, AnyCell)> {
            Vec::new()
        }

        fn has_changed(&self) -> bool {
            false
        }

        fn set_changed(&mut self, _changed: bool) {}

        fn clone_for(&self, _cells: &mut CellStore, _owner: ConfId) -> Self {
            Impostor
        }
    }

    fn owner() -> ConfId {
        let mut arena: Arena<BuildConfiguration> = Arena::new();
        arena.insert(BuildConfiguration::new(
            "Debug",
            ".",
            ExecEnv::Local,
            CompilerType::GCC,
            None,
        ))
    }

    #[test]
    fn test_register_conflicting_type_fails() {
        let mut cells = CellStore::new();
        let mut pool = AuxPool::new();
        pool.register(Notes::new(&mut cells)).unwrap();
        let err = pool.register(Impostor).unwrap_err();
        assert!(matches!(err, Error::AuxConflict { id: "notes", .. }));
        assert!(pool.get::<Notes>().is_some());
    }

    #[test]
    fn test_assign_from_working_copy() {
        let mut cells = CellStore::new();
        let mut pool = AuxPool::new();
        pool.register(Notes::new(&mut cells)).unwrap();

        let mut copy = pool.clone_for(&mut cells, owner());
        copy.set_field(&mut cells, "notes.text", "remember").unwrap();
        assert!(!pool.modified(&cells));

        pool.assign_from(&mut cells, &copy);
        let notes = pool.get::<Notes>().unwrap();
        assert_eq!(cells.value(notes.text), "remember");
        assert!(pool.has_changed());
        pool.clear_changed();
        assert!(!pool.has_changed());
    }

    #[test]
    fn test_write_private_section_only_overrides() {
        let mut cells = CellStore::new();
        let mut pool = AuxPool::new();
        pool.register(Notes::new(&mut cells)).unwrap();

        let (shared, private) = pool.write(&cells);
        assert!(shared.is_empty() && private.is_empty());

        pool.set_field(&mut cells, "notes.pinned", "true").unwrap();
        let (shared, private) = pool.write(&cells);
        assert!(shared.is_empty());
        let notes = private["notes"].as_table().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes["pinned"].as_bool(), Some(true));
    }

    #[test]
    fn test_read_restores_and_skips_unknown_keys() {
        let mut cells = CellStore::new();
        let mut pool = AuxPool::new();
        pool.register(Notes::new(&mut cells)).unwrap();

        let table: toml::Table = toml::from_str("text = \"hi\"\ncolour = \"red\"\n").unwrap();
        assert!(pool.read(&mut cells, "notes", &table).unwrap());
        assert!(!pool.read(&mut cells, "missing", &table).unwrap());

        let notes = pool.get::<Notes>().unwrap();
        assert_eq!(cells.value(notes.text), "hi");
        assert!(cells.modified(notes.text));
    }

    #[test]
    fn test_unknown_setting_path() {
        let mut cells = CellStore::new();
        let mut pool = AuxPool::new();
        pool.register(Notes::new(&mut cells)).unwrap();
        let err = pool.set_field(&mut cells, "notes.colour", "red").unwrap_err();
        assert!(matches!(err, Error::UnknownSetting(_)));
        assert!(pool.reset_field(&mut cells, "nodot").is_err());
    }

    #[test]
    fn test_initialize_and_release() {
        let mut cells = CellStore::new();
        let mut pool = AuxPool::new();
        pool.register(Notes::new(&mut cells)).unwrap();
        pool.set_field(&mut cells, "notes.text", "x").unwrap();

        pool.initialize_all(&mut cells);
        assert!(!pool.modified(&cells));
        assert!(pool.has_changed());

        let before = cells.len();
        pool.release(&mut cells);
        assert_eq!(cells.len(), before - 2);
    }
}
