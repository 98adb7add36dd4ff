//! # mkconf - inheriting build configuration model
//!
//! mkconf keeps the settings of a C/C++ project's build configurations
//! (assembler flags, makefile commands, pre-build and custom steps) as typed
//! cells that inherit from a parent configuration until overridden, and
//! renders them into command lines.
//!
//! ## Quick Start
//!
//! ```bash
//! # Create mkconf.toml with Base, Debug and Release configurations
//! mkconf init
//!
//! # Override a setting, then see what the assembler gets
//! mkconf set Release assembler.development_mode Release
//! mkconf flags Release --all
//! ```
//!
//! ## Module Organization
//!
//! - [`cell`] - Scalar and list cells, master inheritance, dirty tracking
//! - [`extension`] - Aux object contract and per-configuration pool
//! - [`tool`] - Assembler, makefile, pre-build and custom tool blocks
//! - [`render`] - Flag string rendering
//! - [`project`] - Configuration tree and transactional editing
//! - [`persist`] - `mkconf.toml` encoding
//! - [`toolchain`] - Compiler families and option-token tables
//! - [`commands`] - CLI command handlers

use thiserror::Error;

/// Generational arena used for cells and configurations.
pub mod arena;

/// Typed configuration cells.
pub mod cell;

/// CLI command handlers extracted from main.
pub mod commands;

/// Aux object contract and registry.
pub mod extension;

/// Logger setup for the binary.
pub mod logging;

/// Path resolution per execution environment.
pub mod paths;

/// Project file encoding (`mkconf.toml`).
pub mod persist;

/// Build configuration tree.
pub mod project;

/// Command-line rendering.
pub mod render;

/// Per-tool configuration blocks.
pub mod tool;

/// Compiler families and option tables.
pub mod toolchain;

/// Terminal UI utilities (tables, colors).
pub mod ui;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid project file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot write project file: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("no configuration named '{0}'")]
    UnknownConfiguration(String),

    #[error("configuration '{0}' already exists")]
    DuplicateConfiguration(String),

    #[error("configuration no longer exists")]
    DetachedConfiguration,

    #[error("aux id '{id}' is already registered by {registered}")]
    AuxConflict {
        id: &'static str,
        registered: &'static str,
    },

    #[error("configuration has no '{0}' block")]
    MissingAux(&'static str),

    #[error("'{key}' = {value} is outside the range 0..=255")]
    OutOfRange { key: String, value: i64 },

    #[error("'{key}' expects {expected}")]
    InvalidValue { key: String, expected: &'static str },

    #[error("unknown setting '{0}'")]
    UnknownSetting(String),
}

pub type Result<T> = std::result::Result<T, Error>;
