//! Per-tool configuration blocks.
//!
//! Each block owns a fixed set of cells, registered as an aux object on its
//! build configuration. Blocks keep the id of the configuration that owns
//! them; assign never copies it, and clone rebinds it explicitly.

pub mod assembler;
pub mod custom;
pub mod makefile;
pub mod pre_build;

pub use assembler::AssemblerConfiguration;
pub use custom::CustomToolConfiguration;
pub use makefile::MakefileConfiguration;
pub use pre_build::PreBuildConfiguration;

use crate::paths::resolve_against;
use crate::project::{ConfId, Project};
use crate::{Error, Result};

/// Resolves a directory setting against the owning configuration's base
/// directory, using the path rules of its execution environment.
pub(crate) fn resolve_in(project: &Project, owner: ConfId, value: &str) -> Result<String> {
    let conf = project
        .configuration(owner)
        .ok_or(Error::DetachedConfiguration)?;
    Ok(resolve_against(
        &conf.base_dir,
        value,
        conf.env.file_system(),
    ))
}

/// `"."` for an empty directory setting.
pub(crate) fn or_current_dir(value: &str) -> &str {
    if value.is_empty() { "." } else { value }
}
