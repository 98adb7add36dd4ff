use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::cell::{AnyCell, BoolId, CellStore, EnumTable, IntId, ListCell, StringId};
use crate::extension::AuxObject;
use crate::project::ConfId;
use crate::toolchain::ToolDescriptor;

pub const DEVELOPMENT_MODE_NO_FLAGS: u8 = 0;
pub const DEVELOPMENT_MODE_DEBUG: u8 = 1;
pub const DEVELOPMENT_MODE_PERFORMANCE_DEBUG: u8 = 2;
pub const DEVELOPMENT_MODE_TEST: u8 = 3;
pub const DEVELOPMENT_MODE_DIAGNOSABLE_RELEASE: u8 = 4;
pub const DEVELOPMENT_MODE_RELEASE: u8 = 5;
pub const DEVELOPMENT_MODE_PERFORMANCE_RELEASE: u8 = 6;

pub const WARNING_LEVEL_NO_WARNINGS: u8 = 0;
pub const WARNING_LEVEL_DEFAULT: u8 = 1;
pub const WARNING_LEVEL_MORE: u8 = 2;
pub const WARNING_LEVEL_TO_ERROR: u8 = 3;

pub const BITS_DEFAULT: u8 = 0;
pub const BITS_32: u8 = 1;
pub const BITS_64: u8 = 2;

pub const DEFAULT_TOOL: &str = "as";

static DEVELOPMENT_MODES: Lazy<Arc<EnumTable>> = Lazy::new(|| {
    Arc::new(EnumTable::named(&[
        "No Flags",
        "Debug",
        "Performance Debug",
        "Test Coverage",
        "Diagnosable Release",
        "Release",
        "Performance Release",
    ]))
});

static WARNING_LEVELS: Lazy<Arc<EnumTable>> = Lazy::new(|| {
    Arc::new(EnumTable::named(&[
        "No Warnings",
        "Some Warnings",
        "More Warnings",
        "Convert Warnings to Errors",
    ]))
});

static ADDRESS_WIDTHS: Lazy<Arc<EnumTable>> =
    Lazy::new(|| Arc::new(EnumTable::named(&["Default", "32 Bits", "64 Bits"])));

/// Assembler flags for one build configuration.
///
/// Every cell except `command_line` inherits from the same cell of the
/// parent configuration's assembler block. `command_line` is per level;
/// the "all options" rendering collects it from every ancestor instead.
#[derive(Debug)]
pub struct AssemblerConfiguration {
    owner: ConfId,
    /// Configuration whose assembler block this one inherits from.
    master: Option<ConfId>,
    pub development_mode: IntId,
    pub warning_level: IntId,
    pub sixty_four_bits: IntId,
    pub strip: BoolId,
    pub tool: StringId,
    pub command_line: StringId,
    pub additional_dependencies: StringId,
    pub include_directories: ListCell<String>,
    changed: bool,
}

impl AssemblerConfiguration {
    /// With `parent`, the inheriting cells take the parent block's cells as
    /// masters.
    pub fn new(
        cells: &mut CellStore,
        owner: ConfId,
        parent: Option<(ConfId, &AssemblerConfiguration)>,
    ) -> Self {
        let up = parent.map(|(_, block)| block);
        Self {
            owner,
            master: parent.map(|(id, _)| id),
            development_mode: cells.create(
                up.map(|p| p.development_mode),
                DEVELOPMENT_MODE_DEBUG,
                Arc::clone(&DEVELOPMENT_MODES),
            ),
            warning_level: cells.create(
                up.map(|p| p.warning_level),
                WARNING_LEVEL_DEFAULT,
                Arc::clone(&WARNING_LEVELS),
            ),
            sixty_four_bits: cells.create(
                up.map(|p| p.sixty_four_bits),
                BITS_DEFAULT,
                Arc::clone(&ADDRESS_WIDTHS),
            ),
            strip: cells.create(up.map(|p| p.strip), false, ()),
            tool: cells.create(up.map(|p| p.tool), DEFAULT_TOOL.to_string(), ()),
            command_line: cells.create(None, String::new(), ()),
            additional_dependencies: cells.create(
                up.map(|p| p.additional_dependencies),
                String::new(),
                (),
            ),
            include_directories: ListCell::new(),
            changed: false,
        }
    }

    pub fn owner(&self) -> ConfId {
        self.owner
    }

    pub fn master(&self) -> Option<ConfId> {
        self.master
    }

    pub fn is_test_mode(&self, cells: &CellStore) -> bool {
        *cells.value(self.development_mode) == DEVELOPMENT_MODE_TEST
    }

    /// Executable to run. An untouched tool setting follows the tool
    /// descriptor's executable rather than the static default.
    pub fn tool_name<'a>(
        &self,
        cells: &'a CellStore,
        descriptor: &'a dyn ToolDescriptor,
    ) -> &'a str {
        cells.value_with_fallback(self.tool, descriptor.executable())
    }
}

impl AuxObject for AssemblerConfiguration {
    const ID: &'static str = "assembler";

    fn fields(&self) -> Vec<(&'static str, AnyCell)> {
        vec![
            ("development_mode", AnyCell::Int(self.development_mode)),
            ("warning_level", AnyCell::Int(self.warning_level)),
            ("sixty_four_bits", AnyCell::Int(self.sixty_four_bits)),
            ("strip", AnyCell::Bool(self.strip)),
            ("tool", AnyCell::Text(self.tool)),
            ("command_line", AnyCell::Text(self.command_line)),
            (
                "additional_dependencies",
                AnyCell::Text(self.additional_dependencies),
            ),
        ]
    }

    fn lists(&self) -> Vec<(&'static str, &ListCell<String>)> {
        vec![("include_directories", &self.include_directories)]
    }

    fn lists_mut(&mut self) -> Vec<(&'static str, &mut ListCell<String>)> {
        vec![("include_directories", &mut self.include_directories)]
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
            master: self.master,
            development_mode: cells.clone_cell(self.development_mode),
            warning_level: cells.clone_cell(self.warning_level),
            sixty_four_bits: cells.clone_cell(self.sixty_four_bits),
            strip: cells.clone_cell(self.strip),
            tool: cells.clone_cell(self.tool),
            command_line: cells.clone_cell(self.command_line),
            additional_dependencies: cells.clone_cell(self.additional_dependencies),
            include_directories: self.include_directories.clone(),
            changed: self.changed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::ExecEnv;
    use crate::project::Project;
    use crate::toolchain::{CompilerType, OptionTable};

    fn family() -> (Project, ConfId, ConfId) {
        let mut project = Project::new();
        let base = project
            .add_configuration("Base", "/p", ExecEnv::Local, CompilerType::GCC, None)
            .unwrap();
        let debug = project
            .add_configuration("Debug", "/p", ExecEnv::Local, CompilerType::GCC, Some(base))
            .unwrap();
        (project, base, debug)
    }

    #[test]
    fn test_defaults() {
        let (project, base, _) = family();
        let asm = project.aux::<AssemblerConfiguration>(base).unwrap();
        let cells = &project.cells;
        assert_eq!(cells.enum_name(asm.development_mode), "Debug");
        assert_eq!(cells.enum_name(asm.warning_level), "Some Warnings");
        assert_eq!(cells.enum_name(asm.sixty_four_bits), "Default");
        assert!(!*cells.value(asm.strip));
        assert_eq!(cells.value(asm.tool), DEFAULT_TOOL);
        assert!(asm.master().is_none());
        assert!(!asm.is_test_mode(cells));
    }

    #[test]
    fn test_child_inherits_typed_cells_but_not_command_line() {
        let (mut project, base, debug) = family();
        let parent = project.aux::<AssemblerConfiguration>(base).unwrap();
        let (bits, extra) = (parent.sixty_four_bits, parent.command_line);
        project.cells.set_value(bits, BITS_64);
        project.cells.set_value(extra, "--gstabs".to_string());

        let child = project.aux::<AssemblerConfiguration>(debug).unwrap();
        assert_eq!(child.master(), Some(base));
        assert_eq!(*project.cells.value(child.sixty_four_bits), BITS_64);
        assert!(!project.cells.modified(child.sixty_four_bits));
        assert_eq!(project.cells.value(child.command_line), "");
    }

    #[test]
    fn test_tool_name_follows_descriptor_until_overridden() {
        let (mut project, base, debug) = family();
        let msvc = OptionTable::builtin(CompilerType::MSVC);
        let tool = {
            let child = project.aux::<AssemblerConfiguration>(debug).unwrap();
            assert_eq!(child.tool_name(&project.cells, &msvc), "ml");
            project.aux::<AssemblerConfiguration>(base).unwrap().tool
        };

        project.cells.set_value(tool, "nasm".to_string());
        let child = project.aux::<AssemblerConfiguration>(debug).unwrap();
        assert_eq!(child.tool_name(&project.cells, &msvc), "nasm");
    }

    #[test]
    fn test_include_directories_round_trip_through_aux_table() {
        let (mut project, base, _) = family();
        let conf = project.configuration_mut(base).unwrap();
        let asm = conf.aux.get_mut::<AssemblerConfiguration>().unwrap();
        asm.include_directories.add("inc".to_string());

        let asm = project.aux::<AssemblerConfiguration>(base).unwrap();
        let table = asm.write(&project.cells);
        let dirs = table["include_directories"].as_array().unwrap();
        assert_eq!(dirs.len(), 1);
        assert!(asm.modified(&project.cells));
    }
}
