use crate::cell::{AnyCell, CellStore, Picklist, PicklistId, StringId};
use crate::extension::AuxObject;
use crate::project::{ConfId, Project};
use crate::Result;

use super::{or_current_dir, resolve_in};

pub const DEFAULT_BUILD_COMMAND: &str = "${MAKE} -f Makefile";
pub const DEFAULT_CLEAN_COMMAND: &str = "${MAKE} -f Makefile clean";

/// Commands for projects built by an existing makefile.
#[derive(Debug)]
pub struct MakefileConfiguration {
    owner: ConfId,
    pub build_command_working_dir: StringId,
    pub build_command: PicklistId,
    pub clean_command: PicklistId,
    pub output: StringId,
    changed: bool,
}

impl MakefileConfiguration {
    pub fn new(cells: &mut CellStore, owner: ConfId) -> Self {
        Self {
            owner,
            build_command_working_dir: cells.create(None, ".".to_string(), ()),
            build_command: cells.create(
                None,
                DEFAULT_BUILD_COMMAND.to_string(),
                Picklist::default(),
            ),
            clean_command: cells.create(
                None,
                DEFAULT_CLEAN_COMMAND.to_string(),
                Picklist::default(),
            ),
            output: cells.create(None, String::new(), ()),
            changed: false,
        }
    }

    pub fn owner(&self) -> ConfId {
        self.owner
    }

    pub fn can_build(&self, cells: &CellStore) -> bool {
        !cells.value(self.build_command).is_empty()
    }

    pub fn can_clean(&self, cells: &CellStore) -> bool {
        !cells.value(self.clean_command).is_empty()
    }

    pub fn build_working_dir_value<'a>(&self, cells: &'a CellStore) -> &'a str {
        or_current_dir(cells.value(self.build_command_working_dir))
    }

    pub fn abs_build_working_dir(&self, project: &Project) -> Result<String> {
        let dir = self.build_working_dir_value(&project.cells);
        resolve_in(project, self.owner, dir)
    }

    /// Absolute path of the build output, empty when none is declared.
    pub fn abs_output(&self, project: &Project) -> Result<String> {
        let output = project.cells.value(self.output);
        if output.is_empty() {
            return Ok(String::new());
        }
        resolve_in(project, self.owner, output)
    }
}

impl AuxObject for MakefileConfiguration {
    const ID: &'static str = "makefile";

    fn fields(&self) -> Vec<(&'static str, AnyCell)> {
        vec![
            (
                "build_command_working_dir",
                AnyCell::Text(self.build_command_working_dir),
            ),
            ("build_command", AnyCell::Pick(self.build_command)),
            ("clean_command", AnyCell::Pick(self.clean_command)),
            ("output", AnyCell::Text(self.output)),
        ]
    }

    fn has_changed(&self) -> bool {
        self.changed
    }

    fn set_changed(&mut self, changed: bool) {
        self.changed = changed;
    }

    fn clone_for(&self, cells: &mut CellStore, owner: ConfId) -> Self {
        Self {
            owner,
            build_command_working_dir: cells.clone_cell(self.build_command_working_dir),
            build_command: cells.clone_cell(self.build_command),
            clean_command: cells.clone_cell(self.clean_command),
            output: cells.clone_cell(self.output),
            changed: self.changed,
        }
    }
}
