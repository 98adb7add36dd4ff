//! # mkconf CLI Entry Point
//!
//! Parses arguments with clap and routes each command to its handler in
//! [`mkconf::commands`].
//!
//! ## Command Structure
//!
//! - **Project**: `init`, `show`
//! - **Rendering**: `flags`, `targets`
//! - **Editing**: `set`, `reset`, `clone`, `add`, `remove`

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use std::path::PathBuf;

use mkconf::commands::{self, edit::EditOp};
use mkconf::logging;
use mkconf::persist::PROJECT_FILE;
use mkconf::toolchain::CompilerType;

#[derive(Parser)]
#[command(name = "mkconf")]
#[command(
    about = "Inheriting build configurations for make-based projects",
    version = env!("CARGO_PKG_VERSION")
)]
#[command(long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project file to operate on
    #[arg(short, long, global = true, default_value = PROJECT_FILE)]
    file: PathBuf,
    /// Log level for diagnostics on stderr (error, warn, info, debug, trace, off)
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

fn parse_compiler(text: &str) -> Result<CompilerType, String> {
    CompilerType::from_name(text)
        .ok_or_else(|| format!("unknown compiler '{text}' (gcc, clang, msvc, clang-cl)"))
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter project file (Base, Debug, Release)
    Init {
        /// Compiler family for every configuration
        #[arg(long, default_value = "gcc", value_parser = parse_compiler)]
        compiler: CompilerType,
        /// Overwrite an existing project file
        #[arg(long)]
        force: bool,
    },
    /// List settings with their resolved values and origin
    Show {
        /// Only this configuration
        configuration: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Only settings overridden at their own level
        #[arg(long)]
        overrides: bool,
    },
    /// Print the assembler flags of a configuration
    Flags {
        configuration: String,
        /// Include every ancestor's extra flags and all typed tokens
        #[arg(long)]
        all: bool,
        /// Print the whole invocation (executable, options, includes)
        #[arg(long, conflicts_with = "all")]
        command: bool,
    },
    /// Print the makefile-style targets of a configuration
    Targets { configuration: String },
    /// Override a setting, e.g. `set Debug assembler.strip true`
    Set {
        configuration: String,
        /// `<aux>.<cell>` path, see `mkconf show`
        setting: String,
        value: String,
    },
    /// Drop an override so the setting inherits again
    Reset {
        configuration: String,
        setting: String,
    },
    /// Copy a configuration under a new name
    Clone { configuration: String, name: String },
    /// Add a configuration
    Add {
        name: String,
        /// Configuration to inherit from
        #[arg(long)]
        parent: Option<String>,
        /// Compiler family [default: the parent's, else gcc]
        #[arg(long)]
        compiler: Option<String>,
        /// Directory relative settings resolve against
        #[arg(long, default_value = ".")]
        base_dir: String,
        /// Build on a remote host (POSIX path rules)
        #[arg(long)]
        host: Option<String>,
    },
    /// Remove a configuration
    Remove { configuration: String },
    /// Generate shell completion scripts
    Completion { shell: Shell },
}

fn main() {
    let cli = Cli::parse();

    let level = logging::resolve_level(cli.log_level.as_deref());
    if let Err(err) = logging::init_logging(&level) {
        eprintln!("{} {}", "x".red(), err);
        std::process::exit(2);
    }

    if let Err(err) = run(cli) {
        eprintln!("{} {:#}", "x".red(), err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let path = cli.file.as_path();
    match cli.command {
        Commands::Init { compiler, force } => commands::init::run_init(path, compiler, force),
        Commands::Show {
            configuration,
            json,
            overrides,
        } => commands::show::run_show(path, configuration.as_deref(), json, overrides),
        Commands::Flags {
            configuration,
            all,
            command,
        } => commands::flags::run_flags(path, &configuration, all, command),
        Commands::Targets { configuration } => commands::flags::run_targets(path, &configuration),
        Commands::Set {
            configuration,
            setting,
            value,
        } => commands::edit::run_edit(
            path,
            &EditOp::Set {
                configuration,
                setting,
                value,
            },
        ),
        Commands::Reset {
            configuration,
            setting,
        } => commands::edit::run_edit(
            path,
            &EditOp::Reset {
                configuration,
                setting,
            },
        ),
        Commands::Clone {
            configuration,
            name,
        } => commands::edit::run_edit(path, &EditOp::Clone { configuration, name }),
        Commands::Add {
            name,
            parent,
            compiler,
            base_dir,
            host,
        } => commands::edit::run_edit(
            path,
            &EditOp::Add {
                name,
                parent,
                compiler,
                base_dir,
                host,
            },
        ),
        Commands::Remove { configuration } => {
            commands::edit::run_edit(path, &EditOp::Remove { configuration })
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
            Ok(())
        }
    }
}
