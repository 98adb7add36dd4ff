//! Editing commands: `set`, `reset`, `clone`, `add`, `remove`.
//!
//! Setting edits go through a working copy of the configuration that is
//! committed only when the edit succeeds, so a bad value never leaves a
//! half-applied change behind.

use anyhow::{Result, bail};
use colored::*;
use std::path::Path;

use super::{find_configuration, load_project, save_project};
use crate::paths::ExecEnv;
use crate::project::Project;
use crate::toolchain::CompilerType;

#[derive(Clone, Debug)]
pub enum EditOp {
    /// Override one setting
    Set {
        configuration: String,
        setting: String,
        value: String,
    },
    /// Drop an override, back to the default (and inheritance)
    Reset {
        configuration: String,
        setting: String,
    },
    /// Copy a configuration under a new name
    Clone { configuration: String, name: String },
    /// Add a configuration with default settings
    Add {
        name: String,
        parent: Option<String>,
        compiler: Option<String>,
        base_dir: String,
        host: Option<String>,
    },
    /// Remove a configuration
    Remove { configuration: String },
}

/// Applies `op` to an in-memory project. Returns a one-line summary.
pub fn apply(project: &mut Project, op: &EditOp) -> Result<String> {
    match op {
        EditOp::Set {
            configuration,
            setting,
            value,
        } => {
            let id = find_configuration(project, configuration)?;
            project.edit(id, |p, copy| p.set_field(copy, setting, value))?;
            Ok(format!("{configuration}: {setting} = {value}"))
        }
        EditOp::Reset {
            configuration,
            setting,
        } => {
            let id = find_configuration(project, configuration)?;
            project.edit(id, |p, copy| p.reset_field(copy, setting))?;
            Ok(format!("{configuration}: {setting} reset"))
        }
        EditOp::Clone {
            configuration,
            name,
        } => {
            let id = find_configuration(project, configuration)?;
            project.clone_configuration(id, name)?;
            Ok(format!("{configuration} copied to {name}"))
        }
        EditOp::Add {
            name,
            parent,
            compiler,
            base_dir,
            host,
        } => {
            let parent_id = match parent {
                Some(parent) => Some(find_configuration(project, parent)?),
                None => None,
            };
            let compiler = match compiler {
                Some(text) => match CompilerType::from_name(text) {
                    Some(compiler) => compiler,
                    None => bail!(
                        "unknown compiler '{text}' (expected gcc, clang, msvc or clang-cl)"
                    ),
                },
                None => parent_id
                    .and_then(|p| project.configuration(p))
                    .map(|p| p.compiler)
                    .unwrap_or_default(),
            };
            let env = match host {
                Some(host) => ExecEnv::Remote { host: host.clone() },
                None => ExecEnv::Local,
            };
            project.add_configuration(name, base_dir, env, compiler, parent_id)?;
            Ok(format!("added {name} ({compiler})"))
        }
        EditOp::Remove { configuration } => {
            let id = find_configuration(project, configuration)?;
            let orphans: Vec<String> = project
                .configurations()
                .filter(|(_, conf)| conf.parent() == Some(id))
                .map(|(_, conf)| conf.name.clone())
                .collect();
            if !orphans.is_empty() {
                eprintln!(
                    "   {} {} no longer inherit from {}",
                    "⚠".yellow(),
                    orphans.join(", "),
                    configuration
                );
            }
            project.remove_configuration(id)?;
            Ok(format!("removed {configuration}"))
        }
    }
}

pub fn run_edit(path: &Path, op: &EditOp) -> Result<()> {
    let mut project = load_project(path)?;
    let summary = apply(&mut project, op)?;
    save_project(&mut project, path)?;
    println!("{} {}", "✓".green(), summary);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::starter_project;
    use crate::tool::AssemblerConfiguration;

    fn set(conf: &str, setting: &str, value: &str) -> EditOp {
        EditOp::Set {
            configuration: conf.to_string(),
            setting: setting.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_set_then_reset_restores_inheritance() {
        let mut project = starter_project(CompilerType::GCC).unwrap();
        apply(&mut project, &set("Base", "assembler.sixty_four_bits", "64 Bits")).unwrap();
        apply(&mut project, &set("Debug", "assembler.sixty_four_bits", "32 Bits")).unwrap();

        let debug = project.find("Debug").unwrap();
        let bits = project.aux::<AssemblerConfiguration>(debug).unwrap().sixty_four_bits;
        assert_eq!(project.cells.enum_name(bits), "32 Bits");

        let reset = EditOp::Reset {
            configuration: "Debug".to_string(),
            setting: "assembler.sixty_four_bits".to_string(),
        };
        apply(&mut project, &reset).unwrap();
        assert_eq!(project.cells.enum_name(bits), "64 Bits");
        assert!(!project.cells.modified(bits));
    }

    #[test]
    fn test_bad_value_leaves_project_untouched() {
        let mut project = starter_project(CompilerType::GCC).unwrap();
        let before = project.cells.len();
        let err = apply(&mut project, &set("Debug", "assembler.strip", "maybe"));
        assert!(err.is_err());
        assert_eq!(project.cells.len(), before);
        assert!(!project.modified(project.find("Debug").unwrap()));
    }

    #[test]
    fn test_add_inherits_compiler_from_parent() {
        let mut project = starter_project(CompilerType::Clang).unwrap();
        let add = EditOp::Add {
            name: "Profile".to_string(),
            parent: Some("Release".to_string()),
            compiler: None,
            base_dir: ".".to_string(),
            host: Some("build01".to_string()),
        };
        apply(&mut project, &add).unwrap();
        let id = project.find("Profile").unwrap();
        let conf = project.configuration(id).unwrap();
        assert_eq!(conf.compiler, CompilerType::Clang);
        assert_eq!(conf.env.display_name(), "build01");
    }

    #[test]
    fn test_unknown_configuration_lists_known_ones() {
        let mut project = starter_project(CompilerType::GCC).unwrap();
        let err = apply(&mut project, &set("Nope", "assembler.strip", "true")).unwrap_err();
        assert!(err.to_string().contains("Base, Debug, Release"));
    }

    #[test]
    fn test_clone_and_remove() {
        let mut project = starter_project(CompilerType::GCC).unwrap();
        let clone = EditOp::Clone {
            configuration: "Release".to_string(),
            name: "Release2".to_string(),
        };
        apply(&mut project, &clone).unwrap();
        let copy = project.find("Release2").unwrap();
        assert!(project.modified(copy));

        let remove = EditOp::Remove {
            configuration: "Release2".to_string(),
        };
        apply(&mut project, &remove).unwrap();
        assert!(project.find("Release2").is_none());
    }
}
