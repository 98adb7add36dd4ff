use crate::arena::Arena;

use super::{CellKind, CellStore, DirtyPolicy, ScalarCell};

/// On/off options such as "strip symbols" or "run before build".
#[derive(Debug, Clone)]
pub enum BooleanKind {}

impl CellKind for BooleanKind {
    type Value = bool;
    type Attachment = ();

    const DIRTY_POLICY: DirtyPolicy = DirtyPolicy::Accumulate;

    fn arena(store: &CellStore) -> &Arena<ScalarCell<Self>> {
        &store.booleans
    }

    fn arena_mut(store: &mut CellStore) -> &mut Arena<ScalarCell<Self>> {
        &mut store.booleans
    }
}
