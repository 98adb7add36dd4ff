//! Tool descriptors
//!
//! Option tokens per compiler family. Builtin tables cover the common
//! assemblers; a user database at `~/.mkconf/tools.toml` can replace any of
//! them.

pub mod descriptor;
pub mod types;

pub use descriptor::{OptionTable, ToolDatabase, ToolDescriptor};
pub use types::CompilerType;

use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::Result;

/// Reads a tool database. A missing file is an empty database.
pub fn load_database(path: &Path) -> Result<ToolDatabase> {
    if !path.exists() {
        return Ok(ToolDatabase::default());
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

/// Descriptor for `compiler`: the user's table if one exists, the builtin
/// otherwise. A database that fails to parse is reported and ignored.
pub fn descriptor_for(compiler: CompilerType) -> OptionTable {
    descriptor_from(&get_tool_database_path(), compiler)
}

pub fn descriptor_from(path: &Path, compiler: CompilerType) -> OptionTable {
    match load_database(path) {
        Ok(db) => {
            if let Some(table) = db.get(compiler) {
                debug!(
                    "event=tool_override compiler={compiler} path={}",
                    path.display()
                );
                return table.clone();
            }
        }
        Err(e) => warn!(
            "event=tool_database_unreadable path={} error={e}",
            path.display()
        ),
    }
    OptionTable::builtin(compiler)
}

/// Get the path to the user tool database
pub fn get_tool_database_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mkconf")
        .join("tools.toml")
}
