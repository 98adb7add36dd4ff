//! `mkconf flags` and `mkconf targets`

use anyhow::Result;
use colored::*;
use std::path::Path;

use super::{descriptor, find_configuration, load_project};
use crate::project::{ConfId, Project};
use crate::render;
use crate::tool::{
    AssemblerConfiguration, CustomToolConfiguration, MakefileConfiguration, PreBuildConfiguration,
};
use crate::toolchain::ToolDescriptor;
use crate::ui::Table;

/// Flag string for one configuration: this level only, or with every
/// ancestor's extra flags and all typed tokens (`all`).
pub fn render_flags(
    project: &Project,
    id: ConfId,
    tool: &dyn ToolDescriptor,
    all: bool,
) -> Result<String> {
    if all {
        return Ok(render::all_options(project, id, tool)?);
    }
    let asm = project
        .aux::<AssemblerConfiguration>(id)
        .ok_or(crate::Error::MissingAux("assembler"))?;
    Ok(render::flags(&project.cells, asm, tool))
}

pub fn run_flags(path: &Path, configuration: &str, all: bool, command: bool) -> Result<()> {
    let project = load_project(path)?;
    let id = find_configuration(&project, configuration)?;
    let tool = descriptor(&project, id)?;

    let text = if command {
        render::command_line(&project, id, &tool)?
    } else {
        render_flags(&project, id, &tool, all)?
    };
    println!("{text}");
    Ok(())
}

/// Makefile-style recipes: `(target, "cd <dir> && <command>")`.
pub fn targets(project: &Project, id: ConfId) -> Result<Vec<(String, String)>> {
    let cells = &project.cells;
    let mut out = Vec::new();

    if let Some(step) = project.aux::<PreBuildConfiguration>(id)
        && step.can_pre_build(cells)
    {
        let dir = step.abs_working_dir(project)?;
        out.push((
            "pre-build".to_string(),
            format!("cd {dir} && {}", cells.value(step.command)),
        ));
    }
    if let Some(make) = project.aux::<MakefileConfiguration>(id) {
        let dir = make.abs_build_working_dir(project)?;
        if make.can_build(cells) {
            out.push((
                "build".to_string(),
                format!("cd {dir} && {}", cells.value(make.build_command)),
            ));
        }
        if make.can_clean(cells) {
            out.push((
                "clean".to_string(),
                format!("cd {dir} && {}", cells.value(make.clean_command)),
            ));
        }
    }
    if let Some(custom) = project.aux::<CustomToolConfiguration>(id)
        && custom.can_run(cells)
    {
        out.push((
            "custom".to_string(),
            format!(
                "@echo {} && {}",
                cells.value(custom.description),
                cells.value(custom.command_line)
            ),
        ));
    }
    Ok(out)
}

pub fn run_targets(path: &Path, configuration: &str) -> Result<()> {
    let project = load_project(path)?;
    let id = find_configuration(&project, configuration)?;
    let recipes = targets(&project, id)?;

    println!("{} {}", "🎯".cyan(), configuration.bold());
    if recipes.is_empty() {
        println!("   {}", "Nothing to run".dimmed());
        return Ok(());
    }
    let mut table = Table::new(&["Target", "Command"]);
    for (target, command) in recipes {
        table.add_row(vec![target, command]);
    }
    table.print();
    Ok(())
}
