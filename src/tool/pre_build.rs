use crate::cell::{AnyCell, BoolId, CellStore, StringId};
use crate::extension::AuxObject;
use crate::project::{ConfId, Project};
use crate::Result;

use super::{or_current_dir, resolve_in};

/// A command run before the main build.
#[derive(Debug)]
pub struct PreBuildConfiguration {
    owner: ConfId,
    pub working_dir: StringId,
    pub command: StringId,
    /// Run the step ahead of the main build rather than only on request.
    pub pre_build_first: BoolId,
    changed: bool,
}

impl PreBuildConfiguration {
    pub fn new(cells: &mut CellStore, owner: ConfId) -> Self {
        Self {
            owner,
            working_dir: cells.create(None, ".".to_string(), ()),
            command: cells.create(None, String::new(), ()),
            pre_build_first: cells.create(None, false, ()),
            changed: false,
        }
    }

    pub fn owner(&self) -> ConfId {
        self.owner
    }

    pub fn can_pre_build(&self, cells: &CellStore) -> bool {
        !cells.value(self.command).is_empty()
    }

    pub fn working_dir_value<'a>(&self, cells: &'a CellStore) -> &'a str {
        or_current_dir(cells.value(self.working_dir))
    }

    pub fn abs_working_dir(&self, project: &Project) -> Result<String> {
        resolve_in(project, self.owner, self.working_dir_value(&project.cells))
    }
}

impl AuxObject for PreBuildConfiguration {
    const ID: &'static str = "pre_build";

    fn fields(&self) -> Vec<(&'static str, AnyCell)> {
        vec![
            ("working_dir", AnyCell::Text(self.working_dir)),
            ("command", AnyCell::Text(self.command)),
            ("pre_build_first", AnyCell::Bool(self.pre_build_first)),
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
            working_dir: cells.clone_cell(self.working_dir),
            command: cells.clone_cell(self.command),
            pre_build_first: cells.clone_cell(self.pre_build_first),
            changed: self.changed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::ExecEnv;
    use crate::toolchain::CompilerType;

    #[test]
    fn test_pre_build_step() {
        let mut project = Project::new();
        let env = ExecEnv::Remote {
            host: "h".to_string(),
        };
        let conf = project
            .add_configuration("Debug", "/work", env, CompilerType::Clang, None)
            .unwrap();
        let (command, dir, first) = {
            let step = project.aux::<PreBuildConfiguration>(conf).unwrap();
            assert!(!step.can_pre_build(&project.cells));
            assert_eq!(step.abs_working_dir(&project).unwrap(), "/work");
            (step.command, step.working_dir, step.pre_build_first)
        };

        project.cells.set_value(command, "./gen.sh".to_string());
        project.cells.set_value(dir, "tools".to_string());
        project.cells.set_value(first, true);

        let step = project.aux::<PreBuildConfiguration>(conf).unwrap();
        assert!(step.can_pre_build(&project.cells));
        assert_eq!(step.abs_working_dir(&project).unwrap(), "/work/tools");
        assert!(*project.cells.value(step.pre_build_first));
    }

    #[test]
    fn test_detached_owner_is_an_error() {
        let mut project = Project::new();
        let conf = project
            .add_configuration("Debug", "/work", ExecEnv::Local, CompilerType::GCC, None)
            .unwrap();
        let step = PreBuildConfiguration::new(&mut project.cells, conf);
        project.remove_configuration(conf).unwrap();
        assert!(step.abs_working_dir(&project).is_err());
    }
}
