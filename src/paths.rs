//! Path resolution per execution environment.
//!
//! Working directories are stored relative to the configuration's base
//! directory. Resolving them depends on where the build runs: a local build
//! uses the host's path rules, a remote one always uses POSIX rules whatever
//! the host is.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Where a configuration's build steps run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExecEnv {
    #[default]
    Local,
    Remote { host: String },
}

impl ExecEnv {
    pub fn file_system(&self) -> &'static dyn FileSystem {
        match self {
            ExecEnv::Local => &LocalFileSystem,
            ExecEnv::Remote { .. } => &RemoteFileSystem,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            ExecEnv::Local => "localhost".to_string(),
            ExecEnv::Remote { host } => host.clone(),
        }
    }
}

pub trait FileSystem {
    fn is_absolute(&self, path: &str) -> bool;
    /// Lexical normalization: drops `.` segments and folds `..` into the
    /// preceding segment. Never touches the disk.
    fn normalize(&self, path: &str) -> String;
}

pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn is_absolute(&self, path: &str) -> bool {
        Path::new(path).is_absolute()
    }

    fn normalize(&self, path: &str) -> String {
        let mut out = PathBuf::new();
        for component in Path::new(path).components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    let ends_in_normal =
                        matches!(out.components().next_back(), Some(Component::Normal(_)));
                    if ends_in_normal {
                        out.pop();
                    } else if !out.has_root() {
                        out.push("..");
                    }
                }
                other => out.push(other.as_os_str()),
            }
        }
        out.to_string_lossy().into_owned()
    }
}

pub struct RemoteFileSystem;

impl FileSystem for RemoteFileSystem {
    fn is_absolute(&self, path: &str) -> bool {
        path.starts_with('/')
    }

    fn normalize(&self, path: &str) -> String {
        let absolute = path.starts_with('/');
        let mut parts: Vec<&str> = Vec::new();
        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => match parts.last() {
                    Some(&last) if last != ".." => {
                        parts.pop();
                    }
                    _ if absolute => {}
                    _ => parts.push(".."),
                },
                s => parts.push(s),
            }
        }
        let joined = parts.join("/");
        if absolute { format!("/{joined}") } else { joined }
    }
}

/// Resolves `value` against `base`: empty means `base` itself, absolute
/// values are kept, anything else is appended to `base`. The result is
/// normalized, and an empty normalization becomes `"."`.
pub fn resolve_against(base: &str, value: &str, fs: &dyn FileSystem) -> String {
    let joined = if value.is_empty() {
        base.to_string()
    } else if fs.is_absolute(value) {
        value.to_string()
    } else if base.is_empty() {
        value.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), value)
    };
    let normalized = fs.normalize(&joined);
    if normalized.is_empty() {
        ".".to_string()
    } else {
        normalized
    }
}
