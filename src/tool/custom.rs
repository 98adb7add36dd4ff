use crate::cell::{AnyCell, CellStore, StringId};
use crate::extension::AuxObject;
use crate::project::ConfId;

pub const DEFAULT_DESCRIPTION: &str = "Performing Custom Build Step";

/// A user-defined build step: a command, what it prints while running,
/// and the files it produces and depends on.
#[derive(Debug)]
pub struct CustomToolConfiguration {
    owner: ConfId,
    pub command_line: StringId,
    pub description: StringId,
    pub outputs: StringId,
    pub additional_dependencies: StringId,
    changed: bool,
}

impl CustomToolConfiguration {
    pub fn new(cells: &mut CellStore, owner: ConfId) -> Self {
        Self {
            owner,
            command_line: cells.create(None, String::new(), ()),
            description: cells.create(None, DEFAULT_DESCRIPTION.to_string(), ()),
            outputs: cells.create(None, String::new(), ()),
            additional_dependencies: cells.create(None, String::new(), ()),
            changed: false,
        }
    }

    pub fn owner(&self) -> ConfId {
        self.owner
    }

    pub fn can_run(&self, cells: &CellStore) -> bool {
        !cells.value(self.command_line).is_empty()
    }
}

impl AuxObject for CustomToolConfiguration {
    const ID: &'static str = "custom_tool";

    fn fields(&self) -> Vec<(&'static str, AnyCell)> {
        vec![
            ("command_line", AnyCell::Text(self.command_line)),
            ("description", AnyCell::Text(self.description)),
            ("outputs", AnyCell::Text(self.outputs)),
            (
                "additional_dependencies",
                AnyCell::Text(self.additional_dependencies),
            ),
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
            command_line: cells.clone_cell(self.command_line),
            description: cells.clone_cell(self.description),
            outputs: cells.clone_cell(self.outputs),
            additional_dependencies: cells.clone_cell(self.additional_dependencies),
            changed: self.changed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::ExecEnv;
    use crate::project::Project;
    use crate::toolchain::CompilerType;

    #[test]
    fn test_defaults_and_can_run() {
        let mut project = Project::new();
        let conf = project
            .add_configuration("Debug", "/p", ExecEnv::Local, CompilerType::GCC, None)
            .unwrap();
        let cells = &mut project.cells;
        let tool = CustomToolConfiguration::new(cells, conf);

        assert_eq!(cells.value(tool.description), DEFAULT_DESCRIPTION);
        assert!(!tool.can_run(cells));
        assert!(!tool.modified(cells));

        cells.set_value(tool.command_line, "protoc --cpp_out=. a.proto".to_string());
        assert!(tool.can_run(cells));
        assert!(tool.modified(cells));
    }

    #[test]
    fn test_clone_rebinds_owner_and_assign_keeps_it() {
        let mut project = Project::new();
        let a = project
            .add_configuration("A", "/p", ExecEnv::Local, CompilerType::GCC, None)
            .unwrap();
        let b = project
            .add_configuration("B", "/p", ExecEnv::Local, CompilerType::GCC, None)
            .unwrap();
        let cells = &mut project.cells;

        let mut original = CustomToolConfiguration::new(cells, a);
        let mut copy = original.clone_for(cells, b);
        assert_eq!(copy.owner(), b);

        cells.set_value(copy.outputs, "gen.cpp".to_string());
        original.assign(cells, &copy);
        assert_eq!(original.owner(), a);
        assert_eq!(cells.value(original.outputs), "gen.cpp");
        assert!(original.has_changed());

        copy.clear_changed();
        assert!(!copy.has_changed());
    }
}
