//! CLI Command handlers
//!
//! Every handler loads `mkconf.toml`, works on the in-memory project and
//! writes it back when something changed.

pub mod edit;
pub mod flags;
pub mod init;
pub mod show;

use anyhow::{Context, Result, anyhow};
use std::path::Path;

use crate::persist;
use crate::project::{ConfId, Project};
use crate::toolchain::{self, OptionTable};

/// Loads the project file, with a hint when it does not exist yet.
pub fn load_project(path: &Path) -> Result<Project> {
    if !path.exists() {
        return Err(anyhow!(
            "{} not found.\n\n\
            💡 Tip: Run 'mkconf init' to create one.",
            path.display()
        ));
    }
    persist::load(path).with_context(|| format!("Failed to load {}", path.display()))
}

pub fn save_project(project: &mut Project, path: &Path) -> Result<()> {
    persist::save(project, path).with_context(|| format!("Failed to write {}", path.display()))
}

/// Looks a configuration up by name, listing the known ones on failure.
pub fn find_configuration(project: &Project, name: &str) -> Result<ConfId> {
    project.lookup(name).map_err(|e| {
        let known: Vec<&str> = project
            .configurations()
            .map(|(_, conf)| conf.name.as_str())
            .collect();
        anyhow!("{e}\n\n💡 Tip: Known configurations: {}", known.join(", "))
    })
}

/// Option table for the configuration's compiler family.
pub fn descriptor(project: &Project, id: ConfId) -> Result<OptionTable> {
    let conf = project
        .configuration(id)
        .ok_or_else(|| anyhow!("configuration no longer exists"))?;
    Ok(toolchain::descriptor_for(conf.compiler))
}
