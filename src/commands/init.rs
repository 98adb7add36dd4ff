//! `mkconf init`
//!
//! Writes a starter project: a `Base` configuration holding shared
//! settings and `Debug`/`Release` children that inherit from it.

use anyhow::{Result, bail};
use colored::*;
use std::path::Path;

use super::save_project;
use crate::paths::ExecEnv;
use crate::project::Project;
use crate::tool::assembler::DEVELOPMENT_MODE_RELEASE;
use crate::toolchain::CompilerType;

/// The starter configuration tree, before it is written anywhere.
pub fn starter_project(compiler: CompilerType) -> Result<Project> {
    let mut project = Project::new();
    let base = project.add_configuration("Base", ".", ExecEnv::Local, compiler, None)?;
    project.add_configuration("Debug", ".", ExecEnv::Local, compiler, Some(base))?;
    let release =
        project.add_configuration("Release", ".", ExecEnv::Local, compiler, Some(base))?;
    project.set_field(
        release,
        "assembler.development_mode",
        &DEVELOPMENT_MODE_RELEASE.to_string(),
    )?;
    Ok(project)
}

pub fn run_init(path: &Path, compiler: CompilerType, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists.\n\n💡 Tip: Pass --force to overwrite it.",
            path.display()
        );
    }
    let mut project = starter_project(compiler)?;
    save_project(&mut project, path)?;

    println!(
        "{} Created {} with configurations {}, {} and {}",
        "✓".green(),
        path.display().to_string().bold(),
        "Base".cyan(),
        "Debug".cyan(),
        "Release".cyan()
    );
    println!("   Next: {}", "mkconf show".cyan());
    Ok(())
}
