//! Project file (`mkconf.toml`) encoding.
//!
//! One `[[configuration]]` entry per build configuration, parents first.
//! Each entry holds a `shared` and a `private` table, keyed by aux id, with
//! only the cells that carry an override. Everything left out re-derives
//! through its master or default when the file is read back.
//!
//! ```toml
//! [[configuration]]
//! name = "Debug"
//! base_dir = "."
//! compiler = "GCC"
//! parent = "Base"
//!
//! [configuration.env]
//! kind = "local"
//!
//! [configuration.shared.assembler]
//! strip = true
//! ```

use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::paths::ExecEnv;
use crate::project::{ConfId, Project};
use crate::toolchain::CompilerType;
use crate::{Error, Result};

pub const PROJECT_FILE: &str = "mkconf.toml";

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    #[serde(default, rename = "configuration")]
    pub configurations: Vec<ConfigurationEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationEntry {
    pub name: String,
    #[serde(default = "current_dir")]
    pub base_dir: String,
    #[serde(default)]
    pub compiler: CompilerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub env: ExecEnv,
    #[serde(default, skip_serializing_if = "toml::Table::is_empty")]
    pub shared: toml::Table,
    #[serde(default, skip_serializing_if = "toml::Table::is_empty")]
    pub private: toml::Table,
}

fn current_dir() -> String {
    ".".to_string()
}

impl ProjectFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Snapshot of the project's overrides. Parents precede their children.
pub fn encode(project: &Project) -> ProjectFile {
    let mut ids: Vec<ConfId> = project.configurations().map(|(id, _)| id).collect();
    ids.sort_by_key(|id| project.depth(*id));

    let configurations = ids
        .into_iter()
        .filter_map(|id| project.configuration(id))
        .map(|conf| {
            let (shared, private) = conf.aux.write(&project.cells);
            ConfigurationEntry {
                name: conf.name.clone(),
                base_dir: conf.base_dir.clone(),
                compiler: conf.compiler,
                parent: conf
                    .parent()
                    .and_then(|p| project.configuration(p))
                    .map(|p| p.name.clone()),
                env: conf.env.clone(),
                shared,
                private,
            }
        })
        .collect();
    ProjectFile { configurations }
}

/// Rebuilds a project. Entries may appear in any order as long as every
/// parent exists somewhere in the file.
pub fn decode(file: &ProjectFile) -> Result<Project> {
    let mut project = Project::new();
    let mut pending: Vec<&ConfigurationEntry> = file.configurations.iter().collect();

    while !pending.is_empty() {
        let before = pending.len();
        let mut deferred = Vec::new();
        for entry in pending {
            let parent = match &entry.parent {
                None => None,
                Some(name) => match project.find(name) {
                    Some(id) => Some(id),
                    None => {
                        deferred.push(entry);
                        continue;
                    }
                },
            };
            let id = project.add_configuration(
                &entry.name,
                &entry.base_dir,
                entry.env.clone(),
                entry.compiler,
                parent,
            )?;
            restore(&mut project, id, entry)?;
        }
        if deferred.len() == before {
            // Missing parents, or parents that name each other
            let missing = deferred[0].parent.clone().unwrap_or_default();
            return Err(Error::UnknownConfiguration(missing));
        }
        pending = deferred;
    }

    let ids: Vec<ConfId> = project.configurations().map(|(id, _)| id).collect();
    for id in ids {
        project.clear_dirty(id)?;
    }
    project.mark_saved();
    debug!("event=project_decoded configurations={}", project.len());
    Ok(project)
}

fn restore(project: &mut Project, id: ConfId, entry: &ConfigurationEntry) -> Result<()> {
    for (aux_id, value) in entry.shared.iter().chain(entry.private.iter()) {
        let table = value.as_table().ok_or_else(|| Error::InvalidValue {
            key: format!("{}.{aux_id}", entry.name),
            expected: "table",
        })?;
        project.read_aux(id, aux_id, table)?;
    }
    Ok(())
}

pub fn load(path: &Path) -> Result<Project> {
    decode(&ProjectFile::load(path)?)
}

pub fn save(project: &mut Project, path: &Path) -> Result<()> {
    encode(project).save(path)?;
    project.mark_saved();
    Ok(())
}
