use crate::{Error, Result};

use super::{BoolId, CellStore, IntId, PicklistId, StringId};

/// A scalar cell of any kind, as listed by an aux object's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnyCell {
    Bool(BoolId),
    Int(IntId),
    Text(StringId),
    Pick(PicklistId),
}

macro_rules! dispatch {
    ($cell:expr, $id:ident => $body:expr) => {
        match $cell {
            AnyCell::Bool($id) => $body,
            AnyCell::Int($id) => $body,
            AnyCell::Text($id) => $body,
            AnyCell::Pick($id) => $body,
        }
    };
}

impl AnyCell {
    pub fn kind_name(self) -> &'static str {
        match self {
            AnyCell::Bool(_) => "boolean",
            AnyCell::Int(_) => "enum",
            AnyCell::Text(_) => "string",
            AnyCell::Pick(_) => "string",
        }
    }
}

impl CellStore {
    pub fn any_modified(&self, cell: AnyCell) -> bool {
        dispatch!(cell, id => self.modified(id))
    }

    pub fn any_dirty(&self, cell: AnyCell) -> bool {
        dispatch!(cell, id => self.is_dirty(id))
    }

    pub fn any_clear_dirty(&mut self, cell: AnyCell) {
        dispatch!(cell, id => self.set_dirty(id, false))
    }

    pub fn any_reset(&mut self, cell: AnyCell) {
        dispatch!(cell, id => self.reset(id))
    }

    pub fn any_release(&mut self, cell: AnyCell) -> bool {
        dispatch!(cell, id => self.release(id))
    }

    /// Unmodified with a live master: the value comes from an ancestor.
    pub fn any_inherits(&self, cell: AnyCell) -> bool {
        dispatch!(cell, id => !self.modified(id) && self.live_master(id).is_some())
    }

    /// Assigns between two cells of the same kind and reports whether the
    /// target changed (see [`CellStore::assign`]). `None` when the kinds
    /// differ; nothing is touched then.
    pub fn any_assign(&mut self, target: AnyCell, source: AnyCell) -> Option<bool> {
        let changed = match (target, source) {
            (AnyCell::Bool(t), AnyCell::Bool(s)) => self.assign(t, s),
            (AnyCell::Int(t), AnyCell::Int(s)) => self.assign(t, s),
            (AnyCell::Text(t), AnyCell::Text(s)) => self.assign(t, s),
            (AnyCell::Pick(t), AnyCell::Pick(s)) => {
                self.assign_picklist(t, s);
                self.assign(t, s)
            }
            _ => return None,
        };
        Some(changed)
    }

    /// Resolved value for display. Enum cells show their name and number.
    pub fn any_display(&self, cell: AnyCell) -> String {
        match cell {
            AnyCell::Bool(id) => self.value(id).to_string(),
            AnyCell::Int(id) => format!("{} ({})", self.enum_name(id), self.value(id)),
            AnyCell::Text(id) => self.value(id).clone(),
            AnyCell::Pick(id) => self.value(id).clone(),
        }
    }

    /// Stored value as written to a project file, or `None` for a cell
    /// that carries no override.
    pub fn any_to_toml(&self, cell: AnyCell) -> Option<toml::Value> {
        if !self.any_modified(cell) {
            return None;
        }
        let value = match cell {
            AnyCell::Bool(id) => toml::Value::Boolean(*self.cell(id).stored()),
            AnyCell::Int(id) => toml::Value::Integer(i64::from(*self.cell(id).stored())),
            AnyCell::Text(id) => toml::Value::String(self.cell(id).stored().clone()),
            AnyCell::Pick(id) => toml::Value::String(self.cell(id).stored().clone()),
        };
        Some(value)
    }

    /// Restores a persisted value. The cell ends up modified whatever its
    /// default or master says, since it was stored as an override.
    pub fn any_from_toml(&mut self, cell: AnyCell, key: &str, value: &toml::Value) -> Result<()> {
        match cell {
            AnyCell::Bool(id) => {
                let flag = value.as_bool().ok_or_else(|| invalid(key, "boolean"))?;
                self.set_value(id, flag);
            }
            AnyCell::Int(id) => {
                let raw = value.as_integer().ok_or_else(|| invalid(key, "integer"))?;
                self.set_value(id, narrow(key, raw)?);
            }
            AnyCell::Text(id) => {
                let text = value.as_str().ok_or_else(|| invalid(key, "string"))?;
                self.set_value(id, text.to_string());
            }
            AnyCell::Pick(id) => {
                let text = value.as_str().ok_or_else(|| invalid(key, "string"))?;
                self.set_value(id, text.to_string());
            }
        }
        dispatch!(cell, id => self.set_modified(id, true));
        Ok(())
    }

    /// Parses user input for a cell: `true`/`false` for booleans, a name
    /// or number for enums, anything for text.
    pub fn any_set_text(&mut self, cell: AnyCell, key: &str, text: &str) -> Result<()> {
        match cell {
            AnyCell::Bool(id) => {
                let flag = text.parse::<bool>().map_err(|_| invalid(key, "true or false"))?;
                self.set_value(id, flag);
            }
            AnyCell::Int(id) => {
                if let Ok(raw) = text.parse::<i64>() {
                    self.set_value(id, narrow(key, raw)?);
                } else if !self.set_value_by_name(id, text) {
                    return Err(invalid(key, "a known name or a number"));
                }
            }
            AnyCell::Text(id) => self.set_value(id, text.to_string()),
            AnyCell::Pick(id) => self.set_value_remembered(id, text.to_string()),
        }
        Ok(())
    }
}

fn invalid(key: &str, expected: &'static str) -> Error {
    Error::InvalidValue {
        key: key.to_string(),
        expected,
    }
}

fn narrow(key: &str, raw: i64) -> Result<u8> {
    u8::try_from(raw).map_err(|_| Error::OutOfRange {
        key: key.to_string(),
        value: raw,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cell::{EnumTable, Picklist};

    #[test]
    fn test_assign_rejects_kind_mismatch() {
        let mut store = CellStore::new();
        let flag = AnyCell::Bool(store.create(None, false, ()));
        let text = AnyCell::Text(store.create(None, String::new(), ()));
        assert_eq!(store.any_assign(flag, text), None);
        assert!(!store.any_dirty(flag));
    }

    #[test]
    fn test_assign_carries_picklist_history() {
        let mut store = CellStore::new();
        let target: PicklistId = store.create(None, String::new(), Picklist::default());
        let source: PicklistId = store.create(None, String::new(), Picklist::default());
        store.set_value_remembered(source, "make all".to_string());
        assert_eq!(
            store.any_assign(AnyCell::Pick(target), AnyCell::Pick(source)),
            Some(true)
        );
        assert_eq!(store.value(target), "make all");
        assert_eq!(store.picklist(target).items(), ["make all"]);
    }

    #[test]
    fn test_toml_only_for_overrides() {
        let mut store = CellStore::new();
        let cell = AnyCell::Text(store.create(None, "as".to_string(), ()));
        assert!(store.any_to_toml(cell).is_none());
        store.any_set_text(cell, "tool", "nasm").unwrap();
        assert_eq!(store.any_to_toml(cell), Some(toml::Value::String("nasm".into())));
    }

    #[test]
    fn test_from_toml_marks_modified_even_at_default() {
        let mut store = CellStore::new();
        let cell = AnyCell::Bool(store.create(None, false, ()));
        store
            .any_from_toml(cell, "strip", &toml::Value::Boolean(false))
            .unwrap();
        assert!(store.any_modified(cell));
    }

    #[test]
    fn test_from_toml_rejects_wide_enum_values() {
        let mut store = CellStore::new();
        let table = Arc::new(EnumTable::named(&["A", "B"]));
        let cell = AnyCell::Int(store.create(None, 0, table));

        let err = store
            .any_from_toml(cell, "level", &toml::Value::Integer(300))
            .unwrap_err();
        assert!(matches!(err, Error::OutOfRange { value: 300, .. }));
        assert!(!store.any_modified(cell));

        let err = store
            .any_from_toml(cell, "level", &toml::Value::String("B".into()))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));
    }

    #[test]
    fn test_set_text_accepts_names_and_numbers() {
        let mut store = CellStore::new();
        let table = Arc::new(EnumTable::named(&["A", "B"]));
        let id: IntId = store.create(None, 0, table);
        let cell = AnyCell::Int(id);

        store.any_set_text(cell, "level", "B").unwrap();
        assert_eq!(*store.value(id), 1);
        store.any_set_text(cell, "level", "7").unwrap();
        assert_eq!(store.any_display(cell), "??? (7)");
        assert!(store.any_set_text(cell, "level", "-1").is_err());
        assert!(store.any_set_text(cell, "level", "Z").is_err());
    }
}
