//! Command-line rendering.
//!
//! Turns the resolved assembler cells of a configuration into flag strings,
//! with a [`ToolDescriptor`] supplying the token for each enum value. Every
//! public function returns whitespace-normalized text: single spaces, no
//! leading or trailing space.

use log::trace;

use crate::cell::CellStore;
use crate::project::{ConfId, Project};
use crate::tool::AssemblerConfiguration;
use crate::toolchain::ToolDescriptor;
use crate::{Error, Result};

/// Collapses every whitespace run to one space and trims both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn token(option: Option<&str>) -> &str {
    option.unwrap_or("")
}

fn strip_token<'a>(
    cells: &CellStore,
    asm: &AssemblerConfiguration,
    tool: &'a dyn ToolDescriptor,
) -> &'a str {
    token(tool.strip_option(*cells.value(asm.strip)))
}

fn width_token<'a>(
    cells: &CellStore,
    asm: &AssemblerConfiguration,
    tool: &'a dyn ToolDescriptor,
) -> &'a str {
    token(tool.sixty_four_bits_option(*cells.value(asm.sixty_four_bits)))
}

fn development_token<'a>(
    cells: &CellStore,
    asm: &AssemblerConfiguration,
    tool: &'a dyn ToolDescriptor,
) -> &'a str {
    token(tool.development_mode_option(*cells.value(asm.development_mode)))
}

fn warning_token<'a>(
    cells: &CellStore,
    asm: &AssemblerConfiguration,
    tool: &'a dyn ToolDescriptor,
) -> &'a str {
    token(tool.warning_level_option(*cells.value(asm.warning_level)))
}

/// Strip and address-width tokens, then the development-mode token when the
/// test mode is selected. Other modes contribute nothing here.
pub fn basic_flags(
    cells: &CellStore,
    asm: &AssemblerConfiguration,
    tool: &dyn ToolDescriptor,
) -> String {
    let mut parts = vec![strip_token(cells, asm, tool), width_token(cells, asm, tool)];
    if asm.is_test_mode(cells) {
        parts.push(development_token(cells, asm, tool));
    }
    normalize_whitespace(&parts.join(" "))
}

/// [`basic_flags`] followed by this level's free-form flags.
pub fn flags(cells: &CellStore, asm: &AssemblerConfiguration, tool: &dyn ToolDescriptor) -> String {
    let basic = basic_flags(cells, asm, tool);
    normalize_whitespace(&format!("{basic} {}", cells.value(asm.command_line)))
}

/// [`basic_flags`], then the free-form flags of every ancestor (furthest
/// first), then this level's typed tokens recomputed, then this level's own
/// free-form flags.
///
/// Strip and width therefore appear twice: once as the leading basic
/// segment and once among the recomputed tokens. Only the ancestors'
/// free-form flags are collected; their typed settings reach this level
/// through cell inheritance instead.
pub fn all_options(project: &Project, conf: ConfId, tool: &dyn ToolDescriptor) -> Result<String> {
    let asm = assembler(project, conf)?;
    let cells = &project.cells;

    let mut inherited = Vec::new();
    let mut next = asm.master();
    while let Some(id) = next {
        let Some(ancestor) = project.aux::<AssemblerConfiguration>(id) else {
            break;
        };
        inherited.push(cells.value(ancestor.command_line).as_str());
        next = ancestor.master();
    }
    inherited.reverse();
    trace!("event=render_all_options ancestors={}", inherited.len());

    let mut text = basic_flags(cells, asm, tool);
    text = normalize_whitespace(&format!("{text} {}", inherited.join(" ")));
    let typed = [
        strip_token(cells, asm, tool),
        width_token(cells, asm, tool),
        development_token(cells, asm, tool),
        warning_token(cells, asm, tool),
    ];
    text = normalize_whitespace(&format!("{text} {}", typed.join(" ")));
    Ok(normalize_whitespace(&format!("{text} {}", cells.value(asm.command_line))))
}

/// One `prefix`ed token per include directory.
pub fn include_options(asm: &AssemblerConfiguration, prefix: &str) -> String {
    asm.include_directories.options(prefix)
}

/// Full invocation: executable, all options, include directories. Include
/// directories take `/I` for MSVC-style compilers and `-I` otherwise.
pub fn command_line(project: &Project, conf: ConfId, tool: &dyn ToolDescriptor) -> Result<String> {
    let asm = assembler(project, conf)?;
    let executable = asm.tool_name(&project.cells, tool);
    let options = all_options(project, conf, tool)?;
    let prefix = match project.configuration(conf) {
        Some(conf) if conf.compiler.uses_msvc_flags() => "/I",
        _ => "-I",
    };
    let includes = include_options(asm, prefix);
    Ok(normalize_whitespace(&format!("{executable} {options} {includes}")))
}

fn assembler(project: &Project, conf: ConfId) -> Result<&AssemblerConfiguration> {
    project
        .configuration(conf)
        .ok_or(Error::DetachedConfiguration)?
        .aux
        .get::<AssemblerConfiguration>()
        .ok_or(Error::MissingAux("assembler"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::ExecEnv;
    use crate::tool::assembler::{BITS_64, DEVELOPMENT_MODE_RELEASE, DEVELOPMENT_MODE_TEST};
    use crate::toolchain::{CompilerType, OptionTable};

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  -g \t\n --64  "), "-g --64");
        assert_eq!(normalize_whitespace("   "), "");
        let once = normalize_whitespace(" a  b ");
        assert_eq!(normalize_whitespace(&once), once);
    }

    #[test]
    fn test_basic_flags_emit_development_token_only_in_test_mode() {
        let mut project = Project::new();
        let conf = project
            .add_configuration("Debug", ".", ExecEnv::Local, CompilerType::GCC, None)
            .unwrap();
        let gnu = OptionTable::builtin(CompilerType::GCC);
        let (mode, bits, strip) = {
            let asm = project.aux::<AssemblerConfiguration>(conf).unwrap();
            assert_eq!(basic_flags(&project.cells, asm, &gnu), "");
            (asm.development_mode, asm.sixty_four_bits, asm.strip)
        };

        project.cells.set_value(bits, BITS_64);
        project.cells.set_value(strip, true);
        let asm = project.aux::<AssemblerConfiguration>(conf).unwrap();
        assert_eq!(basic_flags(&project.cells, asm, &gnu), "-s --64");

        project.cells.set_value(mode, DEVELOPMENT_MODE_TEST);
        let asm = project.aux::<AssemblerConfiguration>(conf).unwrap();
        assert_eq!(basic_flags(&project.cells, asm, &gnu), "-s --64 -g");
    }

    #[test]
    fn test_missing_tokens_render_empty() {
        let mut project = Project::new();
        let conf = project
            .add_configuration("Debug", ".", ExecEnv::Local, CompilerType::GCC, None)
            .unwrap();
        let bits = project.aux::<AssemblerConfiguration>(conf).unwrap().sixty_four_bits;
        project.cells.set_value(bits, 200);

        let empty = OptionTable::default();
        let asm = project.aux::<AssemblerConfiguration>(conf).unwrap();
        assert_eq!(flags(&project.cells, asm, &empty), "");
        assert_eq!(all_options(&project, conf, &empty).unwrap(), "");
    }

    #[test]
    fn test_all_options_walks_ancestors_furthest_first() {
        let mut project = Project::new();
        let root = project
            .add_configuration("Root", ".", ExecEnv::Local, CompilerType::GCC, None)
            .unwrap();
        let mid = project
            .add_configuration("Mid", ".", ExecEnv::Local, CompilerType::GCC, Some(root))
            .unwrap();
        let leaf = project
            .add_configuration("Leaf", ".", ExecEnv::Local, CompilerType::GCC, Some(mid))
            .unwrap();

        for (conf, text) in [(root, " --root "), (mid, "--mid"), (leaf, "--leaf  ")] {
            let cell = project.aux::<AssemblerConfiguration>(conf).unwrap().command_line;
            project.cells.set_value(cell, text.to_string());
        }
        let mode = project.aux::<AssemblerConfiguration>(root).unwrap().development_mode;
        project.cells.set_value(mode, DEVELOPMENT_MODE_RELEASE);

        let gnu = OptionTable::builtin(CompilerType::GCC);
        // Release renders no development token; default warning level has none
        assert_eq!(all_options(&project, leaf, &gnu).unwrap(), "--root --mid --leaf");
        assert_eq!(all_options(&project, root, &gnu).unwrap(), "--root");

        let asm = project.aux::<AssemblerConfiguration>(leaf).unwrap();
        assert_eq!(flags(&project.cells, asm, &gnu), "--leaf");
    }

    #[test]
    fn test_all_options_leads_with_basic_flags() {
        let mut project = Project::new();
        let root = project
            .add_configuration("Root", ".", ExecEnv::Local, CompilerType::GCC, None)
            .unwrap();
        let leaf = project
            .add_configuration("Leaf", ".", ExecEnv::Local, CompilerType::GCC, Some(root))
            .unwrap();
        let (root_line, leaf_line, strip, bits) = {
            let root_asm = project.aux::<AssemblerConfiguration>(root).unwrap();
            let leaf_asm = project.aux::<AssemblerConfiguration>(leaf).unwrap();
            (
                root_asm.command_line,
                leaf_asm.command_line,
                leaf_asm.strip,
                leaf_asm.sixty_four_bits,
            )
        };
        project.cells.set_value(root_line, "--root".to_string());
        project.cells.set_value(leaf_line, "--leaf".to_string());
        project.cells.set_value(strip, true);
        project.cells.set_value(bits, BITS_64);

        let gnu = OptionTable::builtin(CompilerType::GCC);
        assert_eq!(
            all_options(&project, leaf, &gnu).unwrap(),
            "-s --64 --root -s --64 -g --leaf"
        );
        // Debug is not the test mode, so the basic segment carries no -g
        let asm = project.aux::<AssemblerConfiguration>(leaf).unwrap();
        assert_eq!(basic_flags(&project.cells, asm, &gnu), "-s --64");
    }

    #[test]
    fn test_command_line_includes_executable_and_includes() {
        let mut project = Project::new();
        let conf = project
            .add_configuration("Debug", ".", ExecEnv::Local, CompilerType::Clang, None)
            .unwrap();
        project
            .configuration_mut(conf)
            .unwrap()
            .aux
            .get_mut::<AssemblerConfiguration>()
            .unwrap()
            .include_directories
            .add("include".to_string());

        let clang = OptionTable::builtin(CompilerType::Clang);
        assert_eq!(command_line(&project, conf, &clang).unwrap(), "clang -g -Iinclude");
    }

    #[test]
    fn test_command_line_uses_msvc_include_prefix() {
        let mut project = Project::new();
        let conf = project
            .add_configuration("Debug", ".", ExecEnv::Local, CompilerType::MSVC, None)
            .unwrap();
        project
            .configuration_mut(conf)
            .unwrap()
            .aux
            .get_mut::<AssemblerConfiguration>()
            .unwrap()
            .include_directories
            .add("include".to_string());

        let msvc = OptionTable::builtin(CompilerType::MSVC);
        assert_eq!(command_line(&project, conf, &msvc).unwrap(), "ml /Zi /W1 /Iinclude");
    }
}
